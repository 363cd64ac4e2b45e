use rand::Rng;
use routeplay_core::{Effect, Msg};
use routeplay_engine::{EngineEvent, JobController};
use routeplay_logging::{rp_debug, rp_info};

/// Bounds of the cosmetic progress percentage shown for progress labels.
const INDETERMINATE_RANGE: std::ops::RangeInclusive<u8> = 10..=90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct EffectRunner {
    controller: JobController,
}

impl EffectRunner {
    pub fn new(controller: JobController) -> Self {
        Self { controller }
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> Flow {
        for effect in effects {
            match effect {
                Effect::StartJob { job_id, request } => {
                    rp_info!("StartJob job_id={} {}", job_id, request.describe());
                    self.controller.start_job(job_id, request);
                }
                Effect::CancelJob => {
                    self.controller.cancel_job();
                }
                Effect::Quit => {
                    rp_info!("Quit requested");
                    return Flow::Quit;
                }
            }
        }
        Flow::Continue
    }

    /// Lets the finished job's remaining work, such as a cancel notice, complete.
    pub async fn settle(&mut self) {
        self.controller.wait().await;
    }
}

/// Converts an engine event into a core message.
///
/// Progress labels carry no percentage, so the indicator gets a random value
/// within [`INDETERMINATE_RANGE`]. It only shows that something is happening.
pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress { job_id, label } => Msg::JobProgress {
            job_id,
            label,
            indeterminate_percent: rand::rng().random_range(INDETERMINATE_RANGE),
        },
        EngineEvent::Done { job_id } => Msg::JobDone { job_id },
        EngineEvent::Cancelled { job_id } => Msg::JobCancelled { job_id },
        EngineEvent::Failed { job_id, error } => Msg::JobFailed {
            job_id,
            message: error.to_string(),
        },
        EngineEvent::StreamClosed { job_id } => Msg::StreamClosed { job_id },
        EngineEvent::RouteLoaded {
            job_id,
            point_count,
            start,
        } => Msg::RouteLoaded {
            job_id,
            point_count,
            start,
        },
        EngineEvent::RouteFailed { job_id, error } => Msg::RouteFailed {
            job_id,
            message: error.to_string(),
        },
        EngineEvent::MarkerMoved { job_id, position } => Msg::MarkerMoved { job_id, position },
        EngineEvent::Telemetry { job_id, telemetry } => {
            rp_debug!("Job {} telemetry: {}", job_id, telemetry.summary());
            Msg::TelemetryUpdated { job_id, telemetry }
        }
        EngineEvent::PlaybackFinished { job_id } => Msg::PlaybackFinished { job_id },
        EngineEvent::ArtifactSaved { job_id, path } => Msg::ArtifactSaved { job_id, path },
    }
}
