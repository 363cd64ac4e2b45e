use std::time::Duration;

use routeplay_core::{
    PlaybackSimulator, RouteGeometry, DEFAULT_SPEED_KMH, DEFAULT_TICK_INTERVAL_MS,
};
use routeplay_logging::{rp_info, rp_trace};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, JobId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub tick_interval: Duration,
    pub speed_kmh: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Why a playback run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished,
    /// A newer job took over before the last point.
    Superseded,
}

/// Plays a route back on a fixed interval until it finishes or `lifetime`
/// is cancelled. Ticks never overlap: each one completes before the next
/// interval is awaited, and the interval is dropped on return.
pub async fn run_playback(
    job_id: JobId,
    geometry: RouteGeometry,
    settings: PlaybackSettings,
    lifetime: &CancellationToken,
    sink: &dyn EventSink,
) -> PlaybackEnd {
    let mut simulator = PlaybackSimulator::new(settings.speed_kmh);
    let point_count = geometry.len();
    simulator.load(geometry);
    if point_count == 0 {
        sink.emit(EngineEvent::PlaybackFinished { job_id });
        return PlaybackEnd::Finished;
    }
    rp_info!("Playback of job {} started over {} points", job_id, point_count);

    // First tick fires one interval after start, like every later one.
    let period = settings.tick_interval.max(Duration::from_millis(1));
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = lifetime.cancelled() => {
                rp_info!("Playback of job {} superseded at tick {}", job_id, tick);
                return PlaybackEnd::Superseded;
            }
            _ = timer.tick() => {}
        }

        let Some(outcome) = simulator.tick() else {
            break;
        };
        tick += 1;
        rp_trace!("Playback job {} tick {}", job_id, tick);

        sink.emit(EngineEvent::MarkerMoved {
            job_id,
            position: outcome.marker,
        });
        if let Some(telemetry) = outcome.telemetry {
            sink.emit(EngineEvent::Telemetry { job_id, telemetry });
        }
        if outcome.finished {
            break;
        }
    }

    rp_info!(
        "Playback of job {} finished: {:.2} km",
        job_id,
        simulator.state().accumulated_distance_km
    );
    sink.emit(EngineEvent::PlaybackFinished { job_id });
    PlaybackEnd::Finished
}
