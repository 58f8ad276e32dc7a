//! Invariants that hold for every run, checked over a spread of seeds.
use spatial_sir::{SimulationEngine, SimulationParameters, StepSnapshot, World};

fn params(seed: u64) -> SimulationParameters {
    SimulationParameters {
        seed,
        infection_duration_steps: Some(25),
        max_time_steps: Some(150),
        world_width: 120,
        world_height: 90,
        ..SimulationParameters::default()
    }
}

fn run(params: SimulationParameters) -> Vec<StepSnapshot> {
    let mut engine = SimulationEngine::new(params).unwrap();
    let mut snapshots = vec![engine.last_snapshot().clone()];
    while !engine.is_halted() {
        snapshots.push(engine.step().clone());
    }
    snapshots
}

#[test]
fn population_is_conserved() {
    for seed in 0..5 {
        let n = params(seed).population_size();
        for snapshot in run(params(seed)) {
            assert_eq!(snapshot.counts.total(), n);
            assert_eq!(snapshot.agents.len(), n);
        }
    }
}

#[test]
fn transitions_never_regress() {
    for seed in 0..5 {
        let snapshots = run(params(seed));
        for pair in snapshots.windows(2) {
            for (before, after) in pair[0].agents.iter().zip(&pair[1].agents) {
                assert_eq!(before.index, after.index);
                assert!(
                    before.state.can_transition_to(after.state),
                    "agent {} went from {} to {} at step {}",
                    before.index,
                    before.state,
                    after.state,
                    pair[1].time_step
                );
            }
        }
    }
}

#[test]
fn agents_stay_in_bounds() {
    for seed in 0..5 {
        let params = params(seed);
        let world = World::from_parameters(&params);
        for snapshot in run(params) {
            for agent in &snapshot.agents {
                assert!(
                    world.contains(agent.position),
                    "agent {} out of bounds at {:?}",
                    agent.index,
                    agent.position
                );
            }
        }
    }
}

#[test]
fn halted_engine_is_idempotent() {
    let mut engine = SimulationEngine::new(params(3)).unwrap();
    engine.run(None);
    assert!(engine.is_halted());
    let halted = engine.last_snapshot().clone();
    for _ in 0..10 {
        assert_eq!(engine.step(), &halted);
    }
    assert_eq!(engine.time_step(), halted.time_step);
}

#[test]
fn same_seed_same_run() {
    for seed in [0, 7, 12345] {
        let a = serde_json::to_string(&run(params(seed))).unwrap();
        let b = serde_json::to_string(&run(params(seed))).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn different_seeds_differ() {
    let a = run(params(1));
    let b = run(params(2));
    assert_ne!(a[0].agents, b[0].agents);
}

#[test]
fn spatial_index_changes_nothing() {
    for seed in 0..3 {
        let scanned = run(params(seed));
        let indexed = run(SimulationParameters {
            use_spatial_index: true,
            ..params(seed)
        });
        assert_eq!(scanned, indexed);
    }
}

#[test]
fn reset_with_same_parameters_replays() {
    let mut engine = SimulationEngine::new(params(9)).unwrap();
    let first: Vec<_> = (0..20).map(|_| engine.step().clone()).collect();
    engine.reset(params(9)).unwrap();
    let second: Vec<_> = (0..20).map(|_| engine.step().clone()).collect();
    assert_eq!(first, second);
}
