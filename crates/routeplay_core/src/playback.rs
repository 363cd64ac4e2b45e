//! Fixed-step route playback.
//!
//! The simulator is driven externally, one [`PlaybackSimulator::tick`] per
//! timer interval. It never owns a timer itself, so "one timer per
//! simulator" is up to whoever drives it.

use crate::route::{LatLon, RouteGeometry};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
pub const DEFAULT_SPEED_KMH: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Live trip readout produced on each accruing tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub distance_km: f64,
    pub elapsed_minutes: u64,
    pub speed_kmh: f64,
}

impl Telemetry {
    /// Derives whole elapsed minutes from distance at a constant speed.
    pub fn at_constant_speed(distance_km: f64, speed_kmh: f64) -> Self {
        let elapsed_minutes = if speed_kmh > 0.0 {
            (distance_km / speed_kmh * 60.0).floor() as u64
        } else {
            0
        };
        Self {
            distance_km,
            elapsed_minutes,
            speed_kmh,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Distance: {:.2} km | Time: {} min | Avg Speed: {} km/h",
            self.distance_km, self.elapsed_minutes, self.speed_kmh
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub cursor: usize,
    pub accumulated_distance_km: f64,
    pub running: bool,
}

/// What a single tick changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub marker: LatLon,
    /// `None` on the first tick, which only places the marker.
    pub telemetry: Option<Telemetry>,
    /// Set when this tick consumed the last point.
    pub finished: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackSimulator {
    geometry: RouteGeometry,
    speed_kmh: f64,
    state: PlaybackState,
    phase: PlaybackPhase,
}

impl PlaybackSimulator {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    /// Replaces the route and resets cursor and distance. An empty route
    /// leaves the simulator idle.
    pub fn load(&mut self, geometry: RouteGeometry) {
        let running = !geometry.is_empty();
        self.geometry = geometry;
        self.state = PlaybackState {
            cursor: 0,
            accumulated_distance_km: 0.0,
            running,
        };
        self.phase = if running {
            PlaybackPhase::Running
        } else {
            PlaybackPhase::Idle
        };
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Advances the cursor by one point. Returns `None` unless running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.phase != PlaybackPhase::Running {
            return None;
        }
        let points = self.geometry.points();
        let cursor = self.state.cursor;
        let marker = *points.get(cursor)?;

        let telemetry = if cursor > 0 {
            self.state.accumulated_distance_km += points[cursor - 1].distance_km(&marker);
            Some(Telemetry::at_constant_speed(
                self.state.accumulated_distance_km,
                self.speed_kmh,
            ))
        } else {
            None
        };

        self.state.cursor += 1;
        let finished = self.state.cursor >= points.len();
        if finished {
            self.state.running = false;
            self.phase = PlaybackPhase::Finished;
        }

        Some(TickOutcome {
            marker,
            telemetry,
            finished,
        })
    }
}
