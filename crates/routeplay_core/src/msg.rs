use std::path::PathBuf;

use crate::{JobId, JobRequest, LatLon, Telemetry};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked to run a new job.
    StartRequested(JobRequest),
    /// User asked to cancel the running job.
    CancelClicked,
    /// Interrupt key: cancels a streaming job once, otherwise quits.
    InterruptRequested,
    /// Progress label for a job. The percentage is cosmetic, chosen by the
    /// caller, and carries no completion information.
    JobProgress {
        job_id: JobId,
        label: String,
        indeterminate_percent: u8,
    },
    /// The backend reported completion.
    JobDone { job_id: JobId },
    /// The job was cancelled, by transport abort or by a cancellation frame.
    JobCancelled { job_id: JobId },
    /// Submission or streaming failed.
    JobFailed { job_id: JobId, message: String },
    /// Transport closed the progress stream.
    StreamClosed { job_id: JobId },
    RouteLoaded {
        job_id: JobId,
        point_count: usize,
        start: Option<LatLon>,
    },
    RouteFailed { job_id: JobId, message: String },
    MarkerMoved { job_id: JobId, position: LatLon },
    TelemetryUpdated { job_id: JobId, telemetry: Telemetry },
    PlaybackFinished { job_id: JobId },
    ArtifactSaved { job_id: JobId, path: PathBuf },
}
