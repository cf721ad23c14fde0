//! Effects returned by the reducer for the runtime to execute.
//!
//! The reducer never touches storage, the network, or the system browser
//! itself; it describes the work here and the runtime performs it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Rebuild the session from storage. Emitted once at startup.
    RestoreSession,

    /// Start a session. The password is accepted as-is.
    Login { email: String, password: String },

    /// End the session and clear the stored token.
    Logout,

    /// Spawn the one-shot country fetch.
    FetchCountries,

    /// Open a URL in the system browser.
    OpenBrowser { url: String },
}
