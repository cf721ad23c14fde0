//! Modal overlays.
//!
//! An overlay takes over keyboard input while open. Each overlay owns its
//! state, key handler, and render function.
//!
//! - `details.rs`: country detail view
//! - `render_utils.rs`: shared container/hint rendering

pub mod details;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use details::DetailsState;
use globedash_core::countries::CountryRecord;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::effects::UiEffect;

/// Requests to open an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayRequest {
    Details(Box<CountryRecord>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Result of an overlay key handler.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self {
            transition: OverlayTransition::Stay,
            effects: Vec::new(),
        }
    }

    pub fn close() -> Self {
        Self {
            transition: OverlayTransition::Close,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ui_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Details(DetailsState),
}

impl Overlay {
    pub fn open(request: OverlayRequest) -> Self {
        match request {
            OverlayRequest::Details(record) => Overlay::Details(DetailsState::new(*record)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Details(d) => d.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Details(d) => d.handle_key(key),
        }
    }
}

/// Convenience helpers for `Option<Overlay>`.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}

/// Routes a key to the active overlay, closing it when asked.
///
/// Returns `None` when no overlay is open.
pub fn handle_overlay_key(overlay: &mut Option<Overlay>, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let update = overlay.as_mut()?.handle_key(key);
    if update.transition == OverlayTransition::Close {
        *overlay = None;
    }
    Some(update.effects)
}
