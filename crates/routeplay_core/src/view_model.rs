use std::path::PathBuf;

use crate::{DownloadLink, JobId, JobPhase, LatLon, Telemetry};

/// Progress readout. When `indeterminate` is set, `percent` is a cosmetic
/// approximation and says nothing about actual completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub percent: u8,
    pub label: String,
    pub indeterminate: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub job_id: Option<JobId>,
    pub phase: JobPhase,
    pub progress: ProgressView,
    pub downloads: Vec<DownloadLink>,
    pub info: Option<String>,
    pub route_points: Option<usize>,
    pub marker: Option<LatLon>,
    pub telemetry: Option<Telemetry>,
    pub saved_artifacts: Vec<PathBuf>,
    pub dirty: bool,
}
