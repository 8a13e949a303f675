//! Property-based tests for the card session controller

use proptest::prelude::*;
use uuid::Uuid;

use devcard::client::{CardSession, SessionPhase};
use devcard::shared::CardRecord;

use crate::common::draft_card;

#[derive(Debug, Clone)]
enum Step {
    Select(u8),
    RequestNew,
    Handled,
    StartFresh,
    OwnerCards(u8),
    Unavailable,
    Deleted(u8),
}

fn card(n: u8) -> CardRecord {
    let mut card = draft_card(Uuid::from_u128(7), &format!("card{}", n));
    card.id = Uuid::from_u128(u128::from(n) + 1);
    card
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..4u8).prop_map(Step::Select),
        Just(Step::RequestNew),
        Just(Step::Handled),
        Just(Step::StartFresh),
        (0..4u8).prop_map(Step::OwnerCards),
        Just(Step::Unavailable),
        (0..4u8).prop_map(Step::Deleted),
    ]
}

proptest! {
    #[test]
    fn test_session_invariants(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let mut session = CardSession::new();
        let mut auto_selections = 0;
        let mut manual_action_seen = false;
        let mut load_cleared = false;
        let mut last_generation = 0;

        for step in steps {
            let before = session.snapshot();
            match step {
                Step::Select(n) => {
                    session.select(card(n));
                    manual_action_seen = true;
                    prop_assert_eq!(session.snapshot().editor_generation, before.editor_generation);
                }
                Step::RequestNew => {
                    let signal = session.request_new();
                    manual_action_seen = true;
                    let after = session.snapshot();
                    if before.active_card.is_some() {
                        prop_assert!(signal.is_none());
                        prop_assert_eq!(after.active_card, before.active_card);
                        prop_assert_eq!(after.editor_generation, before.editor_generation);
                        prop_assert_eq!(session.phase(), SessionPhase::PendingNewCardChoice);
                    } else {
                        prop_assert!(signal.is_some());
                        prop_assert_eq!(after.editor_generation, before.editor_generation + 1);
                    }
                }
                Step::Handled => {
                    session.new_card_request_handled();
                    prop_assert_eq!(session.snapshot().active_card, before.active_card);
                }
                Step::StartFresh => {
                    session.start_fresh();
                    manual_action_seen = true;
                }
                Step::OwnerCards(count) => {
                    let cards: Vec<CardRecord> = (0..count).map(card).collect();
                    if session.owner_cards_loaded(&cards) {
                        auto_selections += 1;
                        prop_assert!(!manual_action_seen);
                        prop_assert!(before.active_card.is_none());
                    }
                }
                Step::Unavailable => session.owner_cards_unavailable(),
                Step::Deleted(n) => {
                    session.card_deleted(card(n).id);
                }
            }

            let now = session.snapshot();
            prop_assert!(auto_selections <= 1);
            prop_assert!(now.editor_generation >= last_generation);
            last_generation = now.editor_generation;
            if load_cleared {
                prop_assert!(!now.initial_load_in_flight);
            }
            load_cleared = !now.initial_load_in_flight;
            if now.pending_new_card_request {
                prop_assert!(now.active_card.is_some());
            }
        }
    }
}
