use std::path::PathBuf;

use crate::view_model::{AppViewModel, ProgressView};
use crate::{LatLon, Telemetry};

pub type JobId = u64;

pub const CANCELLED_NOTICE: &str = "Operation Cancelled!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Streaming,
    LoadingRoute,
    Playing,
    Finished,
    Cancelled,
    Failed,
    /// The stream closed without a completion frame.
    Ended,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobPhase::Finished | JobPhase::Cancelled | JobPhase::Failed | JobPhase::Ended
        )
    }
}

/// One of the result files exposed after completion. Opaque to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: &'static str,
    pub path: &'static str,
}

pub const ROUTE_ARTIFACT_PATH: &str = "/outputs/optimized_route.geojson";

pub const DOWNLOADS: [DownloadLink; 3] = [
    DownloadLink {
        label: "Download GeoJSON",
        path: ROUTE_ARTIFACT_PATH,
    },
    DownloadLink {
        label: "Download CSV",
        path: "/outputs/segment_details.csv",
    },
    DownloadLink {
        label: "Download Map",
        path: "/outputs/route_map.html",
    },
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    next_job_id: JobId,
    current_job: Option<JobId>,
    phase: JobPhase,
    /// A cancel was already sent for the current job.
    cancel_requested: bool,
    progress_percent: u8,
    progress_label: String,
    indeterminate: bool,
    downloads: Vec<DownloadLink>,
    info: Option<String>,
    route_points: Option<usize>,
    marker: Option<LatLon>,
    telemetry: Option<Telemetry>,
    saved_artifacts: Vec<PathBuf>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            progress_label: "0%".to_string(),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            job_id: self.current_job,
            phase: self.phase,
            progress: ProgressView {
                percent: self.progress_percent,
                label: self.progress_label.clone(),
                indeterminate: self.indeterminate,
            },
            downloads: self.downloads.clone(),
            info: self.info.clone(),
            route_points: self.route_points,
            marker: self.marker,
            telemetry: self.telemetry,
            saved_artifacts: self.saved_artifacts.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn current_job(&self) -> Option<JobId> {
        self.current_job
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Events from superseded jobs are dropped.
    pub(crate) fn is_current(&self, job_id: JobId) -> bool {
        self.current_job == Some(job_id)
    }

    /// Clears every trace of the previous run and allocates a new job id.
    pub(crate) fn begin_job(&mut self) -> JobId {
        self.next_job_id += 1;
        let job_id = self.next_job_id;
        self.current_job = Some(job_id);
        self.phase = JobPhase::Streaming;
        self.cancel_requested = false;
        self.reset_progress();
        self.downloads.clear();
        self.info = None;
        self.route_points = None;
        self.marker = None;
        self.telemetry = None;
        self.saved_artifacts.clear();
        self.mark_dirty();
        job_id
    }

    /// Marks the current job as cancel-requested. False when there is no
    /// streaming job or a cancel is already on its way.
    pub(crate) fn request_cancel(&mut self) -> bool {
        if self.phase != JobPhase::Streaming || self.cancel_requested {
            return false;
        }
        self.cancel_requested = true;
        true
    }

    pub(crate) fn apply_progress(&mut self, label: String, percent: u8) {
        if self.phase != JobPhase::Streaming {
            return;
        }
        self.progress_label = label;
        self.progress_percent = percent.min(100);
        self.indeterminate = true;
        self.mark_dirty();
    }

    pub(crate) fn apply_done(&mut self) {
        if self.phase != JobPhase::Streaming {
            return;
        }
        self.progress_percent = 100;
        self.progress_label = "100%".to_string();
        self.indeterminate = false;
        self.downloads = DOWNLOADS.to_vec();
        self.phase = JobPhase::LoadingRoute;
        self.mark_dirty();
    }

    pub(crate) fn apply_cancelled(&mut self) {
        if self.phase != JobPhase::Streaming {
            return;
        }
        self.reset_progress();
        self.info = Some(CANCELLED_NOTICE.to_string());
        self.phase = JobPhase::Cancelled;
        self.mark_dirty();
    }

    pub(crate) fn apply_failed(&mut self, message: &str) {
        if self.phase != JobPhase::Streaming {
            return;
        }
        self.reset_progress();
        self.downloads.clear();
        self.info = Some(format!("Job failed: {message}"));
        self.phase = JobPhase::Failed;
        self.mark_dirty();
    }

    pub(crate) fn apply_stream_closed(&mut self) {
        if self.phase == JobPhase::Streaming {
            self.phase = JobPhase::Ended;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_route_loaded(&mut self, point_count: usize, start: Option<LatLon>) {
        if self.phase != JobPhase::LoadingRoute {
            return;
        }
        self.route_points = Some(point_count);
        match start {
            Some(start) if point_count > 0 => {
                self.marker = Some(start);
                self.phase = JobPhase::Playing;
            }
            _ => {
                self.info = Some("Route has no coordinates to play back".to_string());
                self.phase = JobPhase::Finished;
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_route_failed(&mut self, message: &str) {
        if self.phase != JobPhase::LoadingRoute {
            return;
        }
        self.info = Some(format!("Route unavailable: {message}"));
        self.phase = JobPhase::Failed;
        self.mark_dirty();
    }

    pub(crate) fn apply_marker(&mut self, position: LatLon) {
        if self.phase != JobPhase::Playing {
            return;
        }
        self.marker = Some(position);
        self.mark_dirty();
    }

    pub(crate) fn apply_telemetry(&mut self, telemetry: Telemetry) {
        if self.phase != JobPhase::Playing {
            return;
        }
        self.info = Some(telemetry.summary());
        self.telemetry = Some(telemetry);
        self.mark_dirty();
    }

    pub(crate) fn apply_playback_finished(&mut self) {
        if matches!(self.phase, JobPhase::Playing | JobPhase::LoadingRoute) {
            self.phase = JobPhase::Finished;
            self.mark_dirty();
        }
    }

    pub(crate) fn record_saved_artifact(&mut self, path: PathBuf) {
        self.saved_artifacts.push(path);
        self.mark_dirty();
    }

    fn reset_progress(&mut self) {
        self.progress_percent = 0;
        self.progress_label = "0%".to_string();
        self.indeterminate = false;
    }
}
