//! Property tests for stepped navigation and deep links.

use playground_snapshot::{ExecutionStage, InterpreterSnapshot, Outcome, TraceTarget};
use playground_trace::{DeepLink, LinkMode, Navigation, ReadyTrace, TraceMode};
use proptest::prelude::*;

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Pending),
        Just(Outcome::Result(true)),
        Just(Outcome::Result(false)),
    ]
}

fn stepped(target: TraceTarget, step: u64, outcome: Outcome) -> ReadyTrace {
    ReadyTrace {
        target,
        mode: TraceMode::Stepped,
        step,
        snapshot: InterpreterSnapshot {
            stage: ExecutionStage::ExecutingSigScript,
            locking_script: vec![],
            unlocking_script: vec![],
            current_script: vec![],
            p2sh_script: None,
            witness_script: None,
            witness_stack_items: None,
            main_stack: vec![],
            alt_stack: vec![],
            outcome,
            step_index: Some(step),
        },
        stream: None,
    }
}

proptest! {
    #[test]
    fn test_previous_exists_iff_past_first_step(
        step in 0u64..1_000_000,
        outcome in outcome_strategy(),
    ) {
        let nav = Navigation::for_trace(&stepped(TraceTarget::new("ab", 0), step, outcome)).unwrap();
        prop_assert_eq!(nav.previous_step().is_some(), step > 0);
        if let Some(previous) = nav.previous_step() {
            prop_assert_eq!(previous, step - 1);
        }
    }

    #[test]
    fn test_next_exists_iff_pending(
        step in 0u64..1_000_000,
        outcome in outcome_strategy(),
    ) {
        let nav = Navigation::for_trace(&stepped(TraceTarget::new("ab", 0), step, outcome)).unwrap();
        prop_assert_eq!(nav.next_step().is_some(), outcome == Outcome::Pending);
        if let Some(next) = nav.next_step() {
            prop_assert_eq!(next, step + 1);
        }
    }

    #[test]
    fn test_navigation_links_parse_back_to_same_view(
        txid in "[0-9a-f]{64}",
        input in any::<u32>(),
        step in 1u64..1_000_000,
    ) {
        let target = TraceTarget::new(txid, input);
        let nav = Navigation::for_trace(&stepped(target.clone(), step, Outcome::Pending)).unwrap();

        for link in [nav.previous.unwrap(), nav.next.unwrap()] {
            let hashed: DeepLink = format!("#{link}").parse().unwrap();
            prop_assert_eq!(&hashed.target, &target);
            prop_assert!(matches!(hashed.mode, LinkMode::Step(_)));
            prop_assert_eq!(hashed, link);
        }
    }
}
