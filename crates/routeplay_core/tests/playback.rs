use routeplay_core::{LatLon, PlaybackPhase, PlaybackSimulator, RouteGeometry, DEFAULT_SPEED_KMH};

fn two_point_route() -> RouteGeometry {
    RouteGeometry::new(vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0)])
}

#[test]
fn first_tick_places_marker_without_accrual() {
    let mut sim = PlaybackSimulator::new(DEFAULT_SPEED_KMH);
    sim.load(two_point_route());
    assert_eq!(sim.phase(), PlaybackPhase::Running);

    let first = sim.tick().expect("running");
    assert_eq!(first.marker, LatLon::new(0.0, 0.0));
    assert!(first.telemetry.is_none());
    assert!(!first.finished);
    assert_eq!(sim.state().accumulated_distance_km, 0.0);
    assert_eq!(sim.state().cursor, 1);
}

#[test]
fn accruing_tick_reports_distance_and_minutes() {
    let mut sim = PlaybackSimulator::new(60.0);
    sim.load(two_point_route());
    sim.tick();

    let second = sim.tick().expect("running");
    let telemetry = second.telemetry.expect("telemetry on accruing tick");
    assert!((telemetry.distance_km - 111.19).abs() < 0.5);
    assert_eq!(telemetry.elapsed_minutes, 111);
    assert_eq!(telemetry.speed_kmh, 60.0);
    assert_eq!(second.marker, LatLon::new(0.0, 1.0));
    assert!(second.finished);
    assert_eq!(sim.phase(), PlaybackPhase::Finished);
    assert!(!sim.state().running);
}

#[test]
fn finished_simulator_ignores_further_ticks() {
    let mut sim = PlaybackSimulator::new(60.0);
    sim.load(two_point_route());
    while sim.tick().is_some() {}

    assert_eq!(sim.phase(), PlaybackPhase::Finished);
    let distance = sim.state().accumulated_distance_km;
    assert!(sim.tick().is_none());
    assert_eq!(sim.state().accumulated_distance_km, distance);
}

#[test]
fn single_point_finishes_after_first_tick() {
    let mut sim = PlaybackSimulator::new(60.0);
    sim.load(RouteGeometry::new(vec![LatLon::new(10.0, 20.0)]));

    let only = sim.tick().expect("running");
    assert!(only.telemetry.is_none());
    assert!(only.finished);
    assert_eq!(sim.phase(), PlaybackPhase::Finished);
    assert_eq!(sim.state().accumulated_distance_km, 0.0);
}

#[test]
fn empty_route_is_a_no_op() {
    let mut sim = PlaybackSimulator::new(60.0);
    sim.load(RouteGeometry::default());

    assert_eq!(sim.phase(), PlaybackPhase::Idle);
    assert!(sim.tick().is_none());
    assert_eq!(sim.state().cursor, 0);
}

#[test]
fn reloading_resets_progress() {
    let mut sim = PlaybackSimulator::new(60.0);
    sim.load(two_point_route());
    while sim.tick().is_some() {}
    assert!(sim.state().accumulated_distance_km > 0.0);

    sim.load(two_point_route());
    assert_eq!(sim.phase(), PlaybackPhase::Running);
    assert_eq!(sim.state().cursor, 0);
    assert_eq!(sim.state().accumulated_distance_km, 0.0);
    assert!(sim.state().running);
}

#[test]
fn elapsed_minutes_are_floored() {
    let mut sim = PlaybackSimulator::new(90.0);
    sim.load(RouteGeometry::new(vec![
        LatLon::new(0.0, 0.0),
        LatLon::new(0.0, 0.5),
        LatLon::new(0.0, 1.0),
    ]));
    let mut last = None;
    while let Some(outcome) = sim.tick() {
        if let Some(telemetry) = outcome.telemetry {
            last = Some(telemetry);
        }
    }
    let telemetry = last.expect("telemetry");
    let expected = (telemetry.distance_km / 90.0 * 60.0).floor() as u64;
    assert_eq!(telemetry.elapsed_minutes, expected);
    assert_eq!(expected, 74);
}
