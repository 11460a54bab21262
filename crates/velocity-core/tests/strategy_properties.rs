//! Behavioral properties every strategy must satisfy, exercised through the
//! public tracker API.

use proptest::prelude::*;
use velotrace_core::{
    PointerEvent, PointerIdSet, PointerSample, Position, StrategyKind, TrackerConfig,
    VelocityTracker, Weighting,
};

const ALL_STRATEGIES: &[StrategyKind] = &[
    StrategyKind::LeastSquares {
        degree: 1,
        weighting: Weighting::None,
    },
    StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::None,
    },
    StrategyKind::LeastSquares {
        degree: 3,
        weighting: Weighting::None,
    },
    StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::Delta,
    },
    StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::Central,
    },
    StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::Recent,
    },
    StrategyKind::Integrating { degree: 1 },
    StrategyKind::Integrating { degree: 2 },
    StrategyKind::Legacy,
    StrategyKind::Impulse,
];

fn ms(millis: u64) -> u64 {
    millis * 1_000_000
}

fn feed_line(tracker: &mut VelocityTracker, id: u32, steps: u64, step_ms: u64, vx: f32, y: f32) {
    for step in 0..steps {
        let t_secs = (step * step_ms) as f32 / 1000.0;
        tracker.add_movement(
            ms(step * step_ms),
            PointerIdSet::from_ids(&[id]),
            &[Position::new(vx * t_secs, y)],
        );
    }
}

#[test]
fn constant_velocity_is_recovered_by_every_strategy() {
    for &kind in ALL_STRATEGIES {
        let mut tracker = VelocityTracker::new(kind);
        feed_line(&mut tracker, 0, 4, 16, 1000.0, 7.0);

        let velocity = tracker
            .velocity(0)
            .unwrap_or_else(|| panic!("{kind:?} produced no velocity"));
        assert!(
            (velocity.x - 1000.0).abs() < 20.0,
            "{kind:?}: vx = {}",
            velocity.x
        );
        assert!(velocity.y.abs() < 20.0, "{kind:?}: vy = {}", velocity.y);
    }
}

#[test]
fn unweighted_least_squares_has_full_confidence_on_a_line() {
    let mut tracker = VelocityTracker::new(StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::None,
    });
    feed_line(&mut tracker, 0, 4, 16, 1000.0, 7.0);

    let est = tracker.estimator(0).unwrap();
    assert!(est.confidence > 0.99, "confidence = {}", est.confidence);
}

#[test]
fn stationary_input_yields_zero_velocity() {
    for &kind in ALL_STRATEGIES {
        let mut tracker = VelocityTracker::new(kind);
        for step in 0..6u64 {
            tracker.add_movement(
                ms(step * 12),
                PointerIdSet::from_ids(&[0]),
                &[Position::new(123.0, -45.0)],
            );
        }

        if let Some(velocity) = tracker.velocity(0) {
            assert!(velocity.x.abs() < 1.0, "{kind:?}: vx = {}", velocity.x);
            assert!(velocity.y.abs() < 1.0, "{kind:?}: vy = {}", velocity.y);
        }
    }
}

#[test]
fn fresh_and_cleared_trackers_fail_queries() {
    for &kind in ALL_STRATEGIES {
        let mut tracker = VelocityTracker::new(kind);
        assert!(tracker.velocity(0).is_none(), "{kind:?}");
        assert!(tracker.estimator(0).is_none(), "{kind:?}");

        feed_line(&mut tracker, 0, 4, 16, 1000.0, 0.0);
        assert!(tracker.velocity(0).is_some(), "{kind:?}");

        tracker.clear();
        for id in [0, 1, 31] {
            assert!(tracker.velocity(id).is_none(), "{kind:?} id {id}");
            assert!(tracker.estimator(id).is_none(), "{kind:?} id {id}");
        }
    }
}

#[test]
fn clearing_one_pointer_leaves_the_other_untouched() {
    for &kind in ALL_STRATEGIES {
        let mut tracker = VelocityTracker::new(kind);
        let ids = PointerIdSet::from_ids(&[1, 2]);
        for step in 0..5u64 {
            let t = step as f32 * 0.012;
            tracker.add_movement(
                ms(step * 12),
                ids,
                &[
                    Position::new(800.0 * t, 0.0),
                    Position::new(0.0, -600.0 * t),
                ],
            );
        }

        let before = tracker.estimator(2).expect("pointer 2 has history");
        tracker.clear_pointers(PointerIdSet::from_ids(&[1]));

        assert!(
            tracker.estimator(1).is_none() && tracker.velocity(1).is_none(),
            "{kind:?}: pointer 1 must be cleared"
        );
        assert_eq!(
            tracker.estimator(2),
            Some(before),
            "{kind:?}: pointer 2 must be unaffected"
        );
    }
}

#[test]
fn simultaneous_pointers_are_independent() {
    for &kind in ALL_STRATEGIES {
        let ids = [0u32, 3, 5];
        let velocities = [(500.0f32, 0.0f32), (-250.0, 125.0), (0.0, 1000.0)];

        // Feed all three pointers in one movement per time step.
        let mut combined = VelocityTracker::new(kind);
        for step in 0..6u64 {
            let t = step as f32 * 0.010;
            let positions: Vec<Position> = velocities
                .iter()
                .map(|&(vx, vy)| Position::new(vx * t, vy * t))
                .collect();
            combined.add_movement(ms(step * 10), PointerIdSet::from_ids(&ids), &positions);
        }

        // Feed each pointer's sub-sequence alone.
        for (index, &id) in ids.iter().enumerate() {
            let mut solo = VelocityTracker::new(kind);
            for step in 0..6u64 {
                let t = step as f32 * 0.010;
                let (vx, vy) = velocities[index];
                solo.add_movement(
                    ms(step * 10),
                    PointerIdSet::from_ids(&[id]),
                    &[Position::new(vx * t, vy * t)],
                );
            }

            assert_eq!(
                combined.estimator(id),
                solo.estimator(id),
                "{kind:?}: pointer {id} must not be influenced by the others"
            );
        }
    }
}

#[test]
fn queries_are_idempotent() {
    for &kind in ALL_STRATEGIES {
        let mut tracker = VelocityTracker::new(kind);
        feed_line(&mut tracker, 0, 5, 14, 700.0, 3.0);

        assert_eq!(tracker.estimator(0), tracker.estimator(0), "{kind:?}");
        assert_eq!(tracker.velocity(0), tracker.velocity(0), "{kind:?}");
    }
}

#[test]
fn samples_beyond_the_horizon_stop_influencing_the_fit() {
    // (strategy, horizon_ms): legacy keeps twice the history of the others.
    let cases: &[(StrategyKind, u64)] = &[
        (
            StrategyKind::LeastSquares {
                degree: 2,
                weighting: Weighting::None,
            },
            100,
        ),
        (StrategyKind::Legacy, 200),
        (StrategyKind::Impulse, 100),
    ];

    for &(kind, horizon_ms) in cases {
        // Outlier at t=0, then a clean constant-velocity tail sampled every
        // 30ms until the outlier has aged past the horizon.
        let steps = horizon_ms / 30 + 2;
        let tail: Vec<(u64, f32)> = (1..=steps)
            .map(|step| {
                let t_ms = step * 30;
                (t_ms, t_ms as f32)
            })
            .collect();

        let mut with_outlier = VelocityTracker::new(kind);
        with_outlier.add_movement(
            0,
            PointerIdSet::from_ids(&[0]),
            &[Position::new(-10_000.0, 9_999.0)],
        );
        for &(t_ms, x) in &tail {
            with_outlier.add_movement(
                ms(t_ms),
                PointerIdSet::from_ids(&[0]),
                &[Position::new(x, 0.0)],
            );
        }

        let mut without_outlier = VelocityTracker::new(kind);
        for &(t_ms, x) in &tail {
            without_outlier.add_movement(
                ms(t_ms),
                PointerIdSet::from_ids(&[0]),
                &[Position::new(x, 0.0)],
            );
        }

        assert_eq!(
            with_outlier.estimator(0),
            without_outlier.estimator(0),
            "{kind:?}: an outlier older than {horizon_ms}ms must not matter"
        );
    }
}

#[test]
fn duplicate_timestamps_degrade_gracefully() {
    let mut tracker = VelocityTracker::new(StrategyKind::LeastSquares {
        degree: 2,
        weighting: Weighting::None,
    });
    tracker.add_movement(ms(5), PointerIdSet::from_ids(&[0]), &[Position::new(1.0, 1.0)]);
    tracker.add_movement(ms(5), PointerIdSet::from_ids(&[0]), &[Position::new(2.0, 2.0)]);

    let est = tracker.estimator(0).expect("estimator must still exist");
    assert_eq!(est.degree, 0);
    assert_eq!(est.xcoeff[0], 2.0);
    assert!(tracker.velocity(0).is_none());
}

#[test]
fn misconfigured_selector_still_tracks() {
    let config = TrackerConfig::default();
    let mut tracker = VelocityTracker::with_config(
        StrategyKind::LeastSquares {
            degree: 9,
            weighting: Weighting::None,
        },
        &config,
    );

    feed_line(&mut tracker, 0, 4, 16, 1000.0, 0.0);
    let velocity = tracker.velocity(0).expect("fallback strategy must work");
    assert!((velocity.x - 1000.0).abs() < 20.0);
}

// Property-based checks.

#[derive(Debug, Clone)]
struct Trace {
    samples: Vec<PointerSample>,
}

fn trace_strategy() -> impl Strategy<Value = Trace> {
    // Gaps stay below the assume-stopped threshold so a trace is one gesture.
    let step = (1u64..30, -500.0f32..500.0, -500.0f32..500.0);
    proptest::collection::vec(step, 2..15).prop_map(|steps| {
        let mut t = 0u64;
        let samples = steps
            .into_iter()
            .map(|(gap_ms, x, y)| {
                t += gap_ms * 1_000_000;
                PointerSample::single(t, 0, Position::new(x, y))
            })
            .collect();
        Trace { samples }
    })
}

proptest! {
    #[test]
    fn identical_feeds_are_bit_reproducible(trace in trace_strategy()) {
        for &kind in ALL_STRATEGIES {
            let mut a = VelocityTracker::new(kind);
            let mut b = VelocityTracker::new(kind);
            for sample in &trace.samples {
                a.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
                b.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
            }
            prop_assert_eq!(a.estimator(0), b.estimator(0));
            prop_assert_eq!(a.velocity(0), b.velocity(0));
        }
    }

    #[test]
    fn batched_event_replay_equals_manual_replay(trace in trace_strategy()) {
        for &kind in ALL_STRATEGIES {
            let mut manual = VelocityTracker::new(kind);
            for sample in &trace.samples {
                manual.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
            }

            let (last, historical) = trace.samples.split_last().unwrap();
            let mut batched = VelocityTracker::new(kind);
            batched.add_event(&PointerEvent {
                historical: historical.to_vec(),
                sample: last.clone(),
            });

            prop_assert_eq!(manual.estimator(0), batched.estimator(0));
            prop_assert_eq!(
                manual.current_pointer_ids(),
                batched.current_pointer_ids()
            );
        }
    }

    #[test]
    fn estimators_are_always_finite_and_bounded_confidence(trace in trace_strategy()) {
        for &kind in ALL_STRATEGIES {
            let mut tracker = VelocityTracker::new(kind);
            for sample in &trace.samples {
                tracker.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
            }
            if let Some(est) = tracker.estimator(0) {
                prop_assert!((0.0..=1.0).contains(&est.confidence), "{:?}", kind);
                for k in 0..=4 {
                    prop_assert!(est.xcoeff[k].is_finite(), "{:?}", kind);
                    prop_assert!(est.ycoeff[k].is_finite(), "{:?}", kind);
                }
            }
        }
    }
}
