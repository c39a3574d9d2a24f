//! End-to-end tests through the public API.
//!
//! Property checks run over seeded `SmallRng` sequences so failures are
//! reproducible.

use std::time::Duration;

use glam::DVec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use leipnik::field::deriv;
use leipnik::prelude::*;
use leipnik::{ClampPolicy, Integrator, LoopState, Population, Trail};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn within_policy(p: DVec3, policy: &ClampPolicy) -> bool {
    p.is_finite()
        && p.abs().max_element() <= policy.clip
        && p.length() <= policy.cap * (1.0 + 1e-12)
}

#[test]
fn test_unstable_run_stays_bounded() {
    let integrator = Integrator::default();
    let params = SimulationParams {
        alpha: 0.5,
        beta: 0.5,
        stable: false,
    };
    let policy = ClampPolicy::unstable();
    let dt = 0.0625;
    assert_eq!(integrator.dt(), dt);

    let mut state = DVec3::new(0.1, 0.1, 0.1);
    for _ in 0..800 {
        state = integrator.step(state, &params, dt).state;
        assert!(within_policy(state, &policy), "out of bounds: {:?}", state);
    }
    assert!(state.is_finite());
}

#[test]
fn test_spawn_is_capped() {
    let mut pop = Population::new(200, 50);
    let mut ctx = SpawnContext::seeded(1);
    pop.spawn(5, &mut ctx);
    assert_eq!(pop.len(), 5);
    pop.spawn(250, &mut ctx);
    assert_eq!(pop.len(), 200);
}

#[test]
fn test_fit_distance_matches_field_of_view() {
    let mut camera = Camera::default();
    let lo = DVec3::new(-5.0, -2.0, 0.0);
    let hi = DVec3::new(5.0, 3.0, 4.0);
    let d = camera.fit(Some((lo, hi)), 1.3);
    let expected = 10.0 * 1.3 / 22.5_f64.to_radians().tan();
    assert!((d - expected).abs() < 1e-9);
    assert!((camera.distance() - expected).abs() < 1e-9);
    assert_eq!(camera.target(), DVec3::new(0.0, 0.5, 2.0));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_field_is_deterministic() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..200 {
        let (x, y, z) = (rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        let (a, b) = (rng.gen_range(0.0..1.5), rng.gen_range(0.0..1.5));
        assert_eq!(deriv(x, y, z, a, b), deriv(x, y, z, a, b));
    }
}

#[test]
fn test_clamp_invariant_for_random_inputs() {
    let mut rng = SmallRng::seed_from_u64(8);
    for policy in [ClampPolicy::unstable(), ClampPolicy::stable()] {
        for _ in 0..500 {
            let scale = 10f64.powi(rng.gen_range(0..8));
            let p = DVec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ) * scale;
            let (q, _) = policy.apply(p);
            assert!(within_policy(q, &policy), "{:?} -> {:?}", p, q);
        }
        let (q, touched) = policy.apply(DVec3::new(f64::NAN, f64::INFINITY, -1.0));
        assert!(touched);
        assert!(within_policy(q, &policy));
    }
}

#[test]
fn test_every_step_bounded_for_random_params() {
    let integrator = Integrator::default();
    let mut rng = SmallRng::seed_from_u64(9);
    for _ in 0..20 {
        let params = SimulationParams {
            alpha: rng.gen_range(0.0..=1.5),
            beta: rng.gen_range(0.0..=1.5),
            stable: rng.gen_bool(0.5),
        };
        let policy = integrator.policy(params.stable);
        let mut state = DVec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        for _ in 0..200 {
            state = integrator.step(state, &params, integrator.dt()).state;
            assert!(within_policy(state, &policy));
        }
    }
}

#[test]
fn test_trail_invariant() {
    let mut rng = SmallRng::seed_from_u64(10);
    let mut trail = Trail::new(50, DVec3::ZERO);
    for _ in 0..300 {
        let p = DVec3::new(rng.gen(), rng.gen(), rng.gen());
        trail.push_and_shift(p);
        assert_eq!(trail.len(), 50);
        assert_eq!(trail.newest(), p);
    }
}

#[test]
fn test_population_bound_under_random_ops() {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut ctx = SpawnContext::seeded(11);
    let mut pop = Population::new(200, 4);
    for _ in 0..500 {
        let n = rng.gen_range(0..300);
        if rng.gen_bool(0.6) {
            pop.spawn(n, &mut ctx);
        } else {
            pop.evict_oldest(n);
        }
        assert!(pop.len() <= 200);
    }
}

#[test]
fn test_reset_preserves_size_and_colors() {
    let mut sim = Simulation::new()
        .with_seed(12)
        .with_auto_spawn(false)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));
    for i in 1..=30 {
        sim.frame(ms(16 * i));
    }
    let before: Vec<_> = sim
        .population()
        .iter()
        .map(|p| (p.id(), p.color(), p.head()))
        .collect();

    sim.apply(Command::Reset, ms(500));

    assert_eq!(sim.population().len(), before.len());
    for (p, (id, color, head)) in sim.population().iter().zip(before) {
        assert_eq!(p.id(), id);
        assert_eq!(p.color(), color);
        assert_ne!(p.head(), head);
        assert!(p.trail().points().iter().all(|q| *q == p.head()));
    }
}

// ============================================================================
// Loop behavior
// ============================================================================

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut sim = Simulation::new().with_seed(99).build().unwrap();
        sim.start(ms(0));
        for i in 1..=300 {
            sim.frame(ms(16 * i));
        }
        sim.population().iter().map(|p| p.head()).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_auto_spawn_fills_to_cap_and_recycles() {
    let mut sim = Simulation::new()
        .with_seed(13)
        .with_max_particles(40)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));

    // 3.5 s ticks add 1..=3 each; enough ticks to reach 40 from 35.
    let mut now = 0;
    for _ in 0..20 {
        now += 3500;
        sim.frame(ms(now));
        assert!(sim.population().len() <= 40);
    }
    assert_eq!(sim.population().len(), 40);

    let oldest = sim.population().iter().next().unwrap().id();
    now += 3500;
    sim.frame(ms(now));
    assert_eq!(sim.population().len(), 40);
    assert!(sim.population().iter().next().unwrap().id() > oldest);
}

#[test]
fn test_late_frame_fires_each_task_once() {
    let mut sim = Simulation::new()
        .with_seed(14)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));
    // Ten intervals late: one batch, not ten.
    sim.frame(ms(35_000));
    let len = sim.population().len();
    assert!((36..=38).contains(&len));
    sim.frame(ms(35_016));
    assert_eq!(sim.population().len(), len);
}

#[test]
fn test_stop_cancels_schedules() {
    let mut sim = Simulation::new().with_seed(15).build().unwrap();
    sim.start(ms(0));
    sim.apply(Command::Resize { width: 900, height: 900 }, ms(10));
    sim.stop();
    assert_eq!(sim.state(), LoopState::Stopped);
    assert!(sim.frame(ms(60_000)).is_none());

    // Restarting re-arms from the new start time; the resize was dropped.
    sim.start(ms(60_000));
    sim.frame(ms(60_016));
    assert_eq!(sim.population().len(), 35);
    assert_eq!(sim.viewport(), Viewport::default());
}

#[test]
fn test_stop_before_start_is_safe() {
    let mut sim = Simulation::new().build().unwrap();
    sim.stop();
    sim.stop();
    sim.teardown();
    assert_eq!(sim.state(), LoopState::TornDown);
    assert!(sim.frame(ms(16)).is_none());
}

#[test]
fn test_parameter_change_applies_next_frame() {
    let mut sim = Simulation::new()
        .with_seed(16)
        .with_auto_spawn(false)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));
    sim.frame(ms(16));
    sim.apply(Command::SetBeta(1.2), ms(20));
    sim.apply(Command::SetStable(true), ms(20));
    let frame = sim.frame(ms(32)).unwrap();
    assert_eq!(frame.params.beta, 1.2);
    assert!(frame.params.stable);
}

#[test]
fn test_fit_frames_population() {
    let mut sim = Simulation::new()
        .with_seed(17)
        .with_auto_spawn(false)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));
    for i in 1..=100 {
        sim.frame(ms(16 * i));
    }
    sim.apply(Command::Fit, ms(2000));
    let camera = sim.camera();
    assert!(camera.distance() >= camera.min_distance());
    assert!(camera.distance() <= camera.max_distance());

    let (lo, hi) = sim.population().bounds().unwrap();
    assert!((camera.target() - (lo + hi) * 0.5).length() < 1e-9);
}

#[test]
fn test_zoom_respects_limits() {
    let mut sim = Simulation::new().build().unwrap();
    for _ in 0..100 {
        sim.apply(Command::ZoomIn, ms(0));
    }
    assert!((sim.camera().distance() - 2.0).abs() < 1e-9);
    for _ in 0..100 {
        sim.apply(Command::ZoomOut, ms(0));
    }
    assert!((sim.camera().distance() - 1500.0).abs() < 1e-9);
}

#[test]
fn test_frame_sink_receives_line_batch() {
    let mut sim = Simulation::new()
        .with_seed(18)
        .with_tail_length(8)
        .with_auto_spawn(false)
        .with_auto_reset(false)
        .build()
        .unwrap();
    sim.start(ms(0));

    let mut batches = Vec::new();
    let mut sink = |frame: &Frame<'_>| batches.push(frame.line_batch());
    for i in 1..=3 {
        assert!(sim.run_frame(ms(16 * i), &mut sink));
    }
    assert_eq!(batches.len(), 3);
    let last = &batches[2];
    assert_eq!(last.lines.len(), 35);
    assert_eq!(last.vertices.len(), 35 * 8);
    assert!(last.lines.iter().all(|r| r.end - r.start == 8));
}

#[test]
fn test_config_drives_simulation() {
    let config = SimConfig::from_json_str(
        r#"{
            "population": { "initial_count": 10, "max_particles": 12, "tail_length": 5 },
            "schedule": { "auto_reset": false },
            "seed": 3
        }"#,
    )
    .unwrap();
    let mut sim = Simulation::new().with_config(config).build().unwrap();
    sim.start(ms(0));
    let frame = sim.frame(ms(16)).unwrap();
    assert_eq!(frame.len(), 10);
    assert!(frame.trails().all(|t| t.points.len() == 5));
}
