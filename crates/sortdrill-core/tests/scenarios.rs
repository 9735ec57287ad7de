//! Walkthroughs of small sessions, one per algorithm, plus the
//! length-1 and length-2 boundaries.

use sortdrill_core::engine::{
    BubbleAction, BubbleEngine, InsertionAction, InsertionEngine, SelectionAction,
    SelectionEngine,
};
use sortdrill_core::{
    Action, Algorithm, ConvergenceDirection, Effect, Engine, OrderDirection, PromptKind,
    Sequence, StepError, Violation,
};

fn seq(values: &[i32], order: OrderDirection, convergence: ConvergenceDirection) -> Sequence {
    Sequence::new(values.to_vec(), order, convergence)
}

#[test]
fn bubble_ascending_right() {
    let mut e = BubbleEngine::new(seq(
        &[5, 3, 4],
        OrderDirection::Ascending,
        ConvergenceDirection::Right,
    ));

    assert_eq!(
        e.current_prompt().kind,
        PromptKind::Compare { left: 0, right: 1 }
    );
    e.submit(BubbleAction::Swap).unwrap();
    assert_eq!(e.sequence().values(), &[3, 5, 4]);

    assert_eq!(
        e.current_prompt().kind,
        PromptKind::Compare { left: 1, right: 2 }
    );
    let outcome = e.submit(BubbleAction::Swap).unwrap();
    assert_eq!(e.sequence().values(), &[3, 4, 5]);
    assert!(outcome.settled.contains(&2));

    assert_eq!(
        e.current_prompt().kind,
        PromptKind::Compare { left: 0, right: 1 }
    );
    let outcome = e.submit(BubbleAction::Skip).unwrap();
    assert!(outcome.complete);
    assert_eq!(e.sequence().values(), &[3, 4, 5]);
}

#[test]
fn selection_ascending_left() {
    let mut e = SelectionEngine::new(seq(
        &[4, 1, 3],
        OrderDirection::Ascending,
        ConvergenceDirection::Left,
    ));

    e.submit(SelectionAction::Select(1)).unwrap();
    assert_eq!(e.sequence().values(), &[1, 4, 3]);

    let outcome = e.submit(SelectionAction::Select(2)).unwrap();
    assert_eq!(
        outcome.effect,
        Effect::Selected {
            from: 2,
            to: 1,
            value: 3
        }
    );
    assert!(outcome.complete);
    assert_eq!(e.sequence().values(), &[1, 3, 4]);
}

#[test]
fn insertion_ascending_left() {
    let mut e = InsertionEngine::new(seq(
        &[3, 1, 2],
        OrderDirection::Ascending,
        ConvergenceDirection::Left,
    ));

    e.submit(InsertionAction::Pick(1)).unwrap();
    e.submit(InsertionAction::Place(0)).unwrap();
    assert_eq!(e.sequence().values(), &[1, 3, 2]);

    e.submit(InsertionAction::Pick(2)).unwrap();
    let outcome = e.submit(InsertionAction::Place(1)).unwrap();
    assert!(outcome.complete);
    assert_eq!(e.sequence().values(), &[1, 2, 3]);
}

#[test]
fn wrong_answers_name_the_rule() {
    let mut bubble = Engine::initialize(
        Algorithm::Bubble,
        seq(&[3, 4], OrderDirection::Ascending, ConvergenceDirection::Right),
    );
    assert_eq!(
        bubble.submit_action(Action::Swap),
        Err(StepError::InvalidAction(Violation::NoSwapNeeded {
            left: 3,
            right: 4
        }))
    );

    let mut insertion = Engine::initialize(
        Algorithm::Insertion,
        seq(&[3, 1, 2], OrderDirection::Ascending, ConvergenceDirection::Left),
    );
    insertion.submit_action(Action::Pick(1)).unwrap();
    let err = insertion.submit_action(Action::Place(1)).unwrap_err();
    assert!(err.to_string().starts_with("wrong insertion slot"));

    let mut selection = Engine::initialize(
        Algorithm::Selection,
        seq(&[4, 1, 3], OrderDirection::Descending, ConvergenceDirection::Left),
    );
    let err = selection.submit_action(Action::Select(1)).unwrap_err();
    assert_eq!(
        err,
        StepError::InvalidAction(Violation::NotExtremal {
            picked: 1,
            extremal: 4
        })
    );
}

#[test]
fn length_one_and_two_boundaries() {
    for algorithm in Algorithm::ALL {
        for convergence in [ConvergenceDirection::Left, ConvergenceDirection::Right] {
            let single = Engine::initialize(
                algorithm,
                seq(&[7], OrderDirection::Ascending, convergence),
            );
            assert!(single.is_complete(), "{algorithm} {convergence} len 1");
            assert!(single.current_prompt().is_complete());

            let mut pair = Engine::initialize(
                algorithm,
                seq(&[9, 2], OrderDirection::Ascending, convergence),
            );
            let mut decisions = 0;
            while let Some(action) = pair.correct_action() {
                // Insertion's pick is forced, not a decision.
                if !matches!(action, Action::Pick(_)) {
                    decisions += 1;
                }
                pair.submit_action(action).unwrap();
            }
            assert_eq!(decisions, 1, "{algorithm} {convergence} len 2");
            assert_eq!(pair.sequence().values(), &[2, 9]);
        }
    }
}
