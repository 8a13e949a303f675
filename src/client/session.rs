//! Card Session Controller
//!
//! Arbitrates the single active-card slot bound to the editor. Every
//! transition publishes a fresh `SessionSnapshot` on a watch channel so
//! views can render from an immutable copy.
//!
//! A new-card request while a card is loaded does not clear anything: it
//! raises `pending_new_card_request` and leaves the caller to ask the user
//! whether to discard (`start_fresh`) or keep editing
//! (`new_card_request_handled`).

use tokio::sync::watch;
use uuid::Uuid;

use crate::shared::CardRecord;

/// Phase derived from the session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No active card; the editor shows fresh defaults
    Empty,
    /// A card is bound to the editor
    Loaded,
    /// A new-card request is waiting for the user's choice
    PendingNewCardChoice,
}

/// Side effect the view should perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    ScrollToEditor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active_card: Option<CardRecord>,
    /// Bumped whenever the editor must remount with fresh defaults
    pub editor_generation: u64,
    pub pending_new_card_request: bool,
    /// True until the first owner-card fetch has been resolved
    pub initial_load_in_flight: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            active_card: None,
            editor_generation: 0,
            pending_new_card_request: false,
            initial_load_in_flight: true,
        }
    }
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        match (&self.active_card, self.pending_new_card_request) {
            (Some(_), true) => SessionPhase::PendingNewCardChoice,
            (Some(_), false) => SessionPhase::Loaded,
            (None, _) => SessionPhase::Empty,
        }
    }
}

#[derive(Debug)]
pub struct CardSession {
    state: watch::Sender<SessionSnapshot>,
    has_auto_selected: bool,
}

impl Default for CardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSession {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            state,
            has_auto_selected: false,
        }
    }

    /// Bind `card` to the editor
    pub fn select(&mut self, card: CardRecord) -> SessionSignal {
        tracing::debug!("[Session] Selected card {}", card.slug);
        self.has_auto_selected = true;
        self.update(|state| {
            state.active_card = Some(card);
            state.pending_new_card_request = false;
            state.initial_load_in_flight = false;
        });
        SessionSignal::ScrollToEditor
    }

    /// Ask for a blank card
    ///
    /// With nothing loaded the editor remounts right away. With a card
    /// loaded the request is parked until the user decides.
    pub fn request_new(&mut self) -> Option<SessionSignal> {
        self.has_auto_selected = true;
        let mut signal = None;
        self.update(|state| {
            state.initial_load_in_flight = false;
            if state.active_card.is_some() {
                state.pending_new_card_request = true;
            } else {
                state.editor_generation += 1;
                signal = Some(SessionSignal::ScrollToEditor);
            }
        });
        signal
    }

    /// Acknowledge the new-card prompt without changing the active card
    pub fn new_card_request_handled(&mut self) {
        self.update(|state| state.pending_new_card_request = false);
    }

    /// Discard the active card and start a blank one
    pub fn start_fresh(&mut self) -> SessionSignal {
        self.has_auto_selected = true;
        self.update(|state| {
            state.active_card = None;
            state.editor_generation += 1;
            state.pending_new_card_request = false;
            state.initial_load_in_flight = false;
        });
        SessionSignal::ScrollToEditor
    }

    /// Owner's cards arrived; auto-select the first one at most once
    ///
    /// Returns true when a card was selected.
    pub fn owner_cards_loaded(&mut self, cards: &[CardRecord]) -> bool {
        let eligible = !self.has_auto_selected && self.state.borrow().active_card.is_none();
        let choice = if eligible { cards.first().cloned() } else { None };
        if choice.is_some() {
            self.has_auto_selected = true;
        }
        let selected = choice.is_some();
        self.update(|state| {
            if let Some(card) = choice {
                state.active_card = Some(card);
            }
            state.initial_load_in_flight = false;
        });
        selected
    }

    /// The first owner fetch failed or there is no signed-in owner
    pub fn owner_cards_unavailable(&mut self) {
        self.update(|state| state.initial_load_in_flight = false);
    }

    /// A card was deleted elsewhere; clears it if it is the active one
    pub fn card_deleted(&mut self, id: Uuid) -> bool {
        let is_active = self
            .state
            .borrow()
            .active_card
            .as_ref()
            .map(|card| card.id == id)
            .unwrap_or(false);
        if is_active {
            self.update(|state| {
                state.active_card = None;
                state.pending_new_card_request = false;
                state.editor_generation += 1;
            });
        }
        is_active
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    fn update(&mut self, f: impl FnOnce(&mut SessionSnapshot)) {
        let mut next = self.state.borrow().clone();
        f(&mut next);
        self.state.send_replace(next);
    }
}
