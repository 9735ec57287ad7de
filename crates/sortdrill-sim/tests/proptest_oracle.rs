//! Property tests: every seed, length and mistake rate satisfies the oracle.

use proptest::prelude::*;
use sortdrill_sim::oracle::SortOracle;
use sortdrill_sim::{SimulationConfig, Simulator, TraceEventKind};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_seed_passes_the_oracle(
        seed in any::<u64>(),
        length in 0_usize..=12,
        // At 100% a bubble learner never answers correctly and the run stalls.
        mistake_percent in 0_u8..=90,
    ) {
        let config = SimulationConfig { seed, length, mistake_percent, max_steps: 10_000 };
        let result = Simulator::new(config).unwrap().run().unwrap();
        let oracle = SortOracle::check_all(&result);
        prop_assert!(oracle.passed, "violations: {:?}", oracle.violations);
    }

    #[test]
    fn replays_are_identical(seed in any::<u64>()) {
        let config = SimulationConfig { seed, ..SimulationConfig::default() };
        let a = Simulator::new(config).unwrap().run().unwrap();
        let b = Simulator::new(config).unwrap().run().unwrap();
        prop_assert_eq!(a.trace_fingerprint().unwrap(), b.trace_fingerprint().unwrap());
    }

    #[test]
    fn every_mistake_is_refused(seed in any::<u64>()) {
        let config = SimulationConfig { seed, length: 8, mistake_percent: 100, max_steps: 200 };
        let result = Simulator::new(config).unwrap().run().unwrap();
        for event in &result.trace {
            let slipped_through = matches!(
                event.kind,
                TraceEventKind::MistakeAccepted { .. } | TraceEventKind::Refused { .. }
            );
            prop_assert!(!slipped_through, "mistake was not refused: {:?}", event.kind);
        }
    }
}
