//! Effect handlers.
//!
//! Session handlers run synchronously against the auth context and report
//! back with `SessionChanged`. The fetch runs as a spawned task.

use globedash_core::config::Config;
use globedash_core::countries;
use globedash_core::session::{AuthContext, KeyValueStore};

use crate::events::UiEvent;

pub fn restore_session<S: KeyValueStore>(auth: &mut AuthContext<S>) -> UiEvent {
    match auth.restore() {
        Some(session) => tracing::info!(identity = %session.identity, "session restored"),
        None => tracing::info!("no stored session"),
    }
    UiEvent::SessionChanged
}

pub fn login<S: KeyValueStore>(auth: &mut AuthContext<S>, email: &str, password: &str) -> UiEvent {
    auth.login(email, password);
    UiEvent::SessionChanged
}

pub fn logout<S: KeyValueStore>(auth: &mut AuthContext<S>) -> UiEvent {
    auth.logout();
    UiEvent::SessionChanged
}

/// Fetches the country list. Failures arrive as an empty list.
pub async fn fetch_countries(config: Config) -> UiEvent {
    UiEvent::CountriesLoaded(countries::fetch_countries(&config).await)
}

#[cfg(test)]
mod tests {
    use globedash_core::config::RestoreIdentity;
    use globedash_core::session::MemoryStore;

    use super::*;

    #[test]
    fn test_session_round_trip() {
        let mut auth = AuthContext::new(MemoryStore::default(), RestoreIdentity::Token);
        assert!(matches!(restore_session(&mut auth), UiEvent::SessionChanged));
        assert!(!auth.is_authenticated());

        login(&mut auth, "a@b.com", "pw");
        assert_eq!(auth.identity(), Some("a@b.com"));

        logout(&mut auth);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_list() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        match fetch_countries(config).await {
            UiEvent::CountriesLoaded(records) => assert!(records.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
