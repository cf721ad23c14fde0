//! Events consumed by the reducer.

use crossterm::event::Event;
use globedash_core::countries::CountryRecord;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; advances the spinner and triggers a redraw.
    Tick,

    /// Raw terminal input (keys, mouse, paste, resize).
    Terminal(Event),

    /// The auth context was restored, logged in, or logged out.
    SessionChanged,

    /// Result of the country fetch. Empty on any failure.
    CountriesLoaded(Vec<CountryRecord>),
}
