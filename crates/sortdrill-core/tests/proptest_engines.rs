use proptest::prelude::*;
use sortdrill_core::{
    Action, Algorithm, ConvergenceDirection, Engine, OrderDirection, PromptKind, Sequence,
    StepError,
};

use generators::*;

fn engine(
    algorithm: Algorithm,
    values: &[i32],
    order: OrderDirection,
    convergence: ConvergenceDirection,
) -> Engine {
    Engine::initialize(algorithm, Sequence::new(values.to_vec(), order, convergence))
}

/// Drive to completion with correct answers, returning the number of accepted steps.
fn solve(engine: &mut Engine) -> usize {
    let mut steps = 0;
    while let Some(action) = engine.correct_action() {
        engine
            .submit_action(action)
            .expect("correct action must be accepted");
        steps += 1;
    }
    steps
}

/// A learner-facing wrong answer for the current prompt, if one exists.
fn wrong_action(engine: &Engine) -> Option<Action> {
    let correct = engine.correct_action()?;
    let prompt = engine.current_prompt();
    match (prompt.kind, correct) {
        (PromptKind::Compare { .. }, Action::Swap) => Some(Action::Skip),
        (PromptKind::Compare { .. }, Action::Skip) => Some(Action::Swap),
        (PromptKind::Place { slots, .. }, Action::Place(right)) => slots
            .iter()
            .map(|slot| slot.slot)
            .find(|&slot| slot != right)
            .map(Action::Place),
        (PromptKind::Select { range }, Action::Select(right)) => {
            let extremal = prompt.values[right];
            range
                .into_iter()
                .find(|&index| prompt.values[index] != extremal)
                .map(Action::Select)
        }
        _ => None,
    }
}

fn sorted_copy(values: &[i32], order: OrderDirection) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    if order == OrderDirection::Descending {
        sorted.reverse();
    }
    sorted
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn correct_answers_always_sort(
        algorithm in arb_algorithm(),
        values in arb_values(20),
        order in arb_order(),
        convergence in arb_convergence(),
    ) {
        let mut e = engine(algorithm, &values, order, convergence);
        solve(&mut e);
        prop_assert!(e.is_complete());
        prop_assert!(order.is_ordered(e.sequence().values()));
        let expected = sorted_copy(&values, order);
        prop_assert_eq!(e.sequence().values(), expected.as_slice());
        prop_assert_eq!(e.settled(), 0..values.len());
    }

    #[test]
    fn left_and_right_convergence_agree(
        algorithm in arb_algorithm(),
        values in arb_values(20),
        order in arb_order(),
    ) {
        let mut left = engine(algorithm, &values, order, ConvergenceDirection::Left);
        let mut right = engine(algorithm, &values, order, ConvergenceDirection::Right);
        solve(&mut left);
        solve(&mut right);
        prop_assert_eq!(left.sequence().values(), right.sequence().values());
    }

    #[test]
    fn rejection_is_idempotent(
        algorithm in arb_algorithm(),
        values in arb_values(12),
        order in arb_order(),
        convergence in arb_convergence(),
        guesses in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut e = engine(algorithm, &values, order, convergence);
        for guess in guesses {
            if e.is_complete() {
                break;
            }
            if guess {
                if let Some(wrong) = wrong_action(&e) {
                    let before = e.clone();
                    let first = e.submit_action(wrong).unwrap_err();
                    prop_assert_eq!(&e, &before);
                    let second = e.submit_action(wrong).unwrap_err();
                    prop_assert_eq!(&e, &before);
                    prop_assert!(first.is_recoverable());
                    prop_assert_eq!(first, second);
                }
            }
            let action = e.correct_action().expect("incomplete engine has an answer");
            e.submit_action(action).expect("correct action must be accepted");
        }
    }

    #[test]
    fn completed_engines_refuse_everything(
        algorithm in arb_algorithm(),
        values in arb_values(8),
        order in arb_order(),
        convergence in arb_convergence(),
    ) {
        let mut e = engine(algorithm, &values, order, convergence);
        solve(&mut e);
        let snapshot = e.clone();
        for action in [Action::Swap, Action::Skip, Action::Pick(0), Action::Place(0), Action::Select(0)] {
            let err = e.submit_action(action).unwrap_err();
            let refused = matches!(
                err,
                StepError::AlreadyComplete | StepError::UnsupportedAction { .. }
            );
            prop_assert!(refused, "{} was not refused cleanly: {:?}", action, err);
        }
        prop_assert_eq!(e, snapshot);
    }

    #[test]
    fn prompts_only_reference_valid_indices(
        algorithm in arb_algorithm(),
        values in arb_values(20),
        order in arb_order(),
        convergence in arb_convergence(),
    ) {
        let mut e = engine(algorithm, &values, order, convergence);
        loop {
            let prompt = e.current_prompt();
            prop_assert!(prompt.settled.end <= values.len());
            if let PromptKind::Place { from, .. } = &prompt.kind {
                prop_assert!(*from < values.len());
            }
            for index in prompt.kind.eligible_indices() {
                prop_assert!(index < values.len());
                prop_assert!(prompt.values.get(index).is_some());
            }
            let Some(action) = e.correct_action() else { break };
            e.submit_action(action).expect("correct action must be accepted");
        }
    }
}
