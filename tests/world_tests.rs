//! World orchestration tests
//!
//! Spawning, reaping, snapshots, determinism and the safety properties that
//! must hold over long randomized runs.

use std::collections::HashSet;
use std::time::Duration;

use intersection_sim::simulation::{
    Axis, Heading, IntersectionGeometry, LightState, PhaseController, SimConfig, World,
    LANES_PER_HEADING, VEHICLE_LENGTH,
};

fn quiet_config() -> SimConfig {
    SimConfig::default().with_spawn_rate(0.0)
}

#[test]
fn test_rear_vehicle_waits_behind_front_vehicle() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    let rear = world.place_agent(Heading::North, 0, 50.0, &config);
    let front = world.place_agent(Heading::North, 0, 60.0, &config);

    world.tick(0.25, &config).unwrap();

    let rear = world.agent(rear).unwrap();
    assert!(rear.waiting);
    assert_eq!(rear.front(), 50.0);
    assert_eq!(rear.wait_ticks, 1);

    let front = world.agent(front).unwrap();
    assert!(!front.waiting);
    assert_eq!(front.front(), 60.0 + config.vehicle_speed * 0.25);
}

#[test]
fn test_vehicle_holds_at_red() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    world.set_phases(
        PhaseController::from_parts(Axis::EastWest, LightState::Green, Duration::ZERO).unwrap(),
    );
    let id = world.place_agent(Heading::North, 0, 175.0, &config);

    for _ in 0..10 {
        world.tick(0.25, &config).unwrap();
    }

    let agent = world.agent(id).unwrap();
    assert!(agent.waiting);
    assert_eq!(agent.front(), 175.0);
    assert_eq!(agent.wait_ticks, 10);
    assert_eq!(world.snapshot().waiting, 1);
}

#[test]
fn test_vehicle_commits_on_yellow() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    world.set_phases(
        PhaseController::from_parts(Axis::NorthSouth, LightState::Yellow, Duration::ZERO)
            .unwrap(),
    );
    let id = world.place_agent(Heading::North, 0, 175.0, &config);

    world.tick(0.25, &config).unwrap();

    let agent = world.agent(id).unwrap();
    assert!(!agent.waiting);
    assert!(agent.committed_to_cross());
    assert_eq!(agent.front(), 205.0);
}

#[test]
fn test_fast_follower_stops_at_bumper_ahead() {
    // Each tick covers far more than the following distance
    let config = quiet_config().with_vehicle_speed(10_000.0);
    let geometry = IntersectionGeometry::new(800.0, 1600.0).unwrap();
    let mut world = World::with_geometry(geometry, Some(7));
    world.set_phases(
        PhaseController::from_parts(Axis::EastWest, LightState::Green, Duration::ZERO).unwrap(),
    );
    // Stop line is at 680; the leader is held at red
    let rear = world.place_agent(Heading::North, 0, 370.0, &config);
    let ahead = world.place_agent(Heading::North, 0, 495.0, &config);

    for _ in 0..10 {
        world.tick(1.0 / 60.0, &config).unwrap();

        let ahead = world.agent(ahead).unwrap();
        let rear = world.agent(rear).unwrap();
        assert_eq!(ahead.front(), 495.0);
        assert!(ahead.front() - ahead.length - rear.front() >= 0.0);
    }

    assert_eq!(world.agent(rear).unwrap().front(), 465.0);
    assert!(world.agent(rear).unwrap().waiting);
}

#[test]
fn test_cross_axis_traffic_follows_its_own_light() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    let north = world.place_agent(Heading::North, 0, 170.0, &config);
    // East stop line is at 280
    let east = world.place_agent(Heading::East, 1, 270.0, &config);

    world.tick(0.25, &config).unwrap();

    assert!(!world.agent(north).unwrap().waiting);
    assert!(world.agent(east).unwrap().waiting);
}

#[test]
fn test_spawn_respects_spacing() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);

    assert!(world.spawn(Heading::South, 0, &config).is_some());
    assert!(world.spawn(Heading::South, 0, &config).is_none());
    assert!(world.spawn(Heading::South, 1, &config).is_some());
    assert!(world.spawn(Heading::East, 0, &config).is_some());
    assert_eq!(world.agents().len(), 3);
    assert_eq!(world.stats().spawns_rejected, 1);
}

#[test]
fn test_spawn_allowed_once_lane_clears() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    // North has the green, so the blocker drives on
    world.place_agent(Heading::North, 0, 179.0, &config);
    assert!(world.spawn(Heading::North, 0, &config).is_none());

    world.tick(0.25, &config).unwrap();
    assert!(world.spawn(Heading::North, 0, &config).is_some());
}

#[test]
fn test_spawn_at_capacity_is_noop() {
    let config = quiet_config().with_max_agents(2);
    let mut world = World::new_with_seed(7);

    assert!(world.spawn(Heading::North, 0, &config).is_some());
    assert!(world.spawn(Heading::South, 0, &config).is_some());
    assert!(world.spawn(Heading::East, 0, &config).is_none());
    assert_eq!(world.agents().len(), 2);
}

#[test]
fn test_spawn_unknown_lane_is_noop() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    assert!(world.spawn(Heading::North, 2, &config).is_none());
    assert!(world.agents().is_empty());
}

#[test]
fn test_reap_removes_exactly_once() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    // North track is 600 long; removal once the rear is 30 past the edge
    let id = world.place_agent(Heading::North, 0, 655.0, &config);
    let stays = world.place_agent(Heading::South, 0, 300.0, &config);

    world.tick(0.25, &config).unwrap();
    assert!(world.agent(id).is_none());
    assert!(world.agent(stays).is_some());
    assert_eq!(world.stats().total_reaped, 1);

    for _ in 0..5 {
        world.tick(0.25, &config).unwrap();
        assert!(world.agent(id).is_none());
    }
    assert_eq!(world.stats().total_reaped, 1);
}

#[test]
fn test_snapshot_counts() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    world.place_agent(Heading::North, 0, 50.0, &config);
    world.place_agent(Heading::North, 1, 300.0, &config);
    world.place_agent(Heading::East, 0, 400.0, &config);

    let snapshot = world.snapshot();
    assert_eq!(snapshot.total_agents(), 3);
    assert_eq!(snapshot.count(Heading::North), 2);
    assert_eq!(snapshot.count(Heading::East), 1);
    assert_eq!(snapshot.count(Heading::West), 0);
    assert_eq!(snapshot.in_intersection, 2);
    assert_eq!(snapshot.phase(Axis::NorthSouth).phase.state, LightState::Green);
    assert_eq!(snapshot.phase(Axis::EastWest).phase.state, LightState::Red);

    let first = &snapshot.agents[0];
    assert_eq!((first.x, first.y), (425.0, 565.0));
}

#[test]
fn test_invalid_delta_rejected_without_state_change() {
    let config = SimConfig::default();
    let mut world = World::new_with_seed(7);

    assert!(world.tick(-0.1, &config).is_err());
    assert!(world.tick(f32::NAN, &config).is_err());
    assert!(world.tick(f32::INFINITY, &config).is_err());

    assert_eq!(world.ticks(), 0);
    assert_eq!(world.time(), Duration::ZERO);
    assert!(world.agents().is_empty());
}

#[test]
fn test_clock_overflow_rejected_without_state_change() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);

    world.tick(1.0e19, &config).unwrap();
    let time = world.time();

    assert!(world.tick(1.0e19, &config).is_err());
    assert_eq!(world.ticks(), 1);
    assert_eq!(world.time(), time);
}

#[test]
fn test_place_agent_clamps_lane() {
    let config = quiet_config();
    let mut world = World::new_with_seed(7);
    let id = world.place_agent(Heading::North, 5, 50.0, &config);

    assert_eq!(world.agent(id).unwrap().lane_index, LANES_PER_HEADING - 1);
}

#[test]
fn test_invalid_config_rejected() {
    let mut world = World::new_with_seed(7);

    assert!(world.tick(0.1, &SimConfig::default().with_spawn_rate(1.5)).is_err());
    assert!(world
        .tick(0.1, &SimConfig::default().with_vehicle_speed(f32::NAN))
        .is_err());
    assert!(world.tick(0.1, &SimConfig::default().with_green_ms(0)).is_err());
    assert_eq!(world.ticks(), 0);
}

#[test]
fn test_simulated_clock_accumulates() {
    let config = quiet_config();
    let mut world = World::new();
    for _ in 0..8 {
        world.tick(0.125, &config).unwrap();
    }
    assert_eq!(world.time(), Duration::from_secs(1));
    assert_eq!(world.ticks(), 8);
}

#[test]
fn test_spawning_respects_max_agents() {
    let config = SimConfig::default().with_spawn_rate(1.0).with_max_agents(5);
    let mut world = World::new_with_seed(11);

    for _ in 0..600 {
        world.tick(1.0 / 60.0, &config).unwrap();
        assert!(world.agents().len() <= 5);
    }
    assert!(world.stats().total_spawned >= 5);
}

#[test]
fn test_same_seed_same_run() {
    let config = SimConfig::default().with_spawn_rate(0.2);
    let mut first = World::new_with_seed(42);
    let mut second = World::new_with_seed(42);

    for _ in 0..2000 {
        first.tick(1.0 / 60.0, &config).unwrap();
        second.tick(1.0 / 60.0, &config).unwrap();
    }

    assert_eq!(first.snapshot(), second.snapshot());
    assert!(first.stats().total_spawned > 0);
}

/// Long randomized run: lights stay exclusive, vehicles never overlap the
/// vehicle ahead, and reaped vehicles never come back
#[test]
fn test_safety_properties_over_long_run() {
    let config = SimConfig::default()
        .with_green_ms(2000)
        .with_yellow_ms(1000)
        .with_spawn_rate(0.3);
    let mut world = World::new_with_seed(2024);
    let mut seen = HashSet::new();
    let mut gone = HashSet::new();

    for tick in 0..6000 {
        world.tick(1.0 / 60.0, &config).unwrap();

        let snapshot = world.snapshot();
        let non_red = [&snapshot.north_south, &snapshot.east_west]
            .iter()
            .filter(|view| view.phase.state != LightState::Red)
            .count();
        assert_eq!(non_red, 1, "tick {}", tick);

        let agents = world.agents();
        for a in agents {
            for b in agents {
                if a.id == b.id || a.lane() != b.lane() || b.front() <= a.front() {
                    continue;
                }
                let gap = (b.front() - b.length) - a.front();
                assert!(gap > -VEHICLE_LENGTH, "tick {}: {:?} overlaps {:?}", tick, a, b);
                assert!(gap >= 0.0, "tick {}: {:?} touches {:?}", tick, a, b);
            }
        }

        let live: HashSet<_> = agents.iter().map(|agent| agent.id).collect();
        for id in &live {
            assert!(!gone.contains(id), "tick {}: {:?} reappeared", tick, id);
        }
        for id in seen.difference(&live) {
            gone.insert(*id);
        }
        seen = live;
    }

    assert!(world.stats().total_reaped > 0);
    assert!(world.stats().cycles_completed > 0);
}
