use std::fmt;
use std::path::PathBuf;

use routeplay_core::{LatLon, Telemetry};

pub use routeplay_core::JobId;

/// Everything the engine reports to the presentation layer. Every event is
/// tagged with the job it belongs to so late events from a superseded job
/// can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress { job_id: JobId, label: String },
    Done { job_id: JobId },
    Cancelled { job_id: JobId },
    Failed { job_id: JobId, error: JobError },
    StreamClosed { job_id: JobId },
    RouteLoaded {
        job_id: JobId,
        point_count: usize,
        start: Option<LatLon>,
    },
    RouteFailed { job_id: JobId, error: JobError },
    MarkerMoved { job_id: JobId, position: LatLon },
    Telemetry { job_id: JobId, telemetry: Telemetry },
    PlaybackFinished { job_id: JobId },
    ArtifactSaved { job_id: JobId, path: PathBuf },
}

impl EngineEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            EngineEvent::Progress { job_id, .. }
            | EngineEvent::Done { job_id }
            | EngineEvent::Cancelled { job_id }
            | EngineEvent::Failed { job_id, .. }
            | EngineEvent::StreamClosed { job_id }
            | EngineEvent::RouteLoaded { job_id, .. }
            | EngineEvent::RouteFailed { job_id, .. }
            | EngineEvent::MarkerMoved { job_id, .. }
            | EngineEvent::Telemetry { job_id, .. }
            | EngineEvent::PlaybackFinished { job_id }
            | EngineEvent::ArtifactSaved { job_id, .. } => *job_id,
        }
    }
}

/// How the progress stream stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The transport reported end of body.
    Ended,
    /// The backend wrote a cancellation frame.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct JobError {
    pub kind: FailureKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn aborted() -> Self {
        Self::new(FailureKind::Cancelled, "request aborted")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The request was aborted through its cancellation token.
    Cancelled,
    /// The route artifact was not a readable feature collection.
    InvalidArtifact,
    /// The feature collection had no line-shaped feature.
    MissingRoute,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::InvalidArtifact => write!(f, "invalid route artifact"),
            FailureKind::MissingRoute => write!(f, "no route in artifact"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
