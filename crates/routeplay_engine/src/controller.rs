use std::path::PathBuf;
use std::sync::Arc;

use routeplay_core::{FramingPolicy, JobRequest, ProgressEvent, DOWNLOADS};
use routeplay_logging::{rp_debug, rp_error, rp_info, rp_warn};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::persist::{artifact_file_name, AtomicFileWriter};
use crate::playback::{run_playback, PlaybackEnd, PlaybackSettings};
use crate::{EngineEvent, EventSink, JobBackend, JobError, JobId, StreamConsumer, StreamOutcome};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub framing: FramingPolicy,
    pub playback: PlaybackSettings,
    /// Where to store the result files after completion, if anywhere.
    pub download_dir: Option<PathBuf>,
    /// Also tell the server to stop when the user cancels.
    pub notify_backend_on_cancel: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            framing: FramingPolicy::default(),
            playback: PlaybackSettings::default(),
            download_dir: None,
            notify_backend_on_cancel: true,
        }
    }
}

/// Owns the single in-flight job: its cancellation token, the token bounding
/// its playback, and the task running both.
pub struct JobController {
    backend: Arc<dyn JobBackend>,
    sink: Arc<dyn EventSink>,
    settings: ControllerSettings,
    active: Option<ActiveJob>,
    /// Cancel notifications still in flight, one per cancelled job.
    cancel_notices: Vec<JoinHandle<()>>,
}

struct ActiveJob {
    job_id: JobId,
    /// Signalled by the user or by a newer job; aborts the stream.
    cancel: CancellationToken,
    /// Signalled only by a newer job; stops route loading and playback.
    lifetime: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl JobController {
    pub fn new(
        backend: Arc<dyn JobBackend>,
        sink: Arc<dyn EventSink>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            backend,
            sink,
            settings,
            active: None,
            cancel_notices: Vec::new(),
        }
    }

    /// Invalidates any previous job, then spawns this one on the current
    /// tokio runtime. The previous token is cancelled before this returns.
    pub fn start_job(&mut self, job_id: JobId, request: JobRequest) {
        if let Some(previous) = self.active.take() {
            rp_info!("Job {} superseded by job {}", previous.job_id, job_id);
            previous.cancel.cancel();
            previous.lifetime.cancel();
        }
        if request.is_blank() {
            rp_warn!("Job {} has neither an upload nor a sample id", job_id);
        }
        rp_info!("Starting job {}: {}", job_id, request.describe());

        let cancel = CancellationToken::new();
        let lifetime = CancellationToken::new();
        let context = JobContext {
            job_id,
            request,
            backend: self.backend.clone(),
            sink: self.sink.clone(),
            settings: self.settings.clone(),
            cancel: cancel.clone(),
            lifetime: lifetime.clone(),
        };
        let task = tokio::spawn(run_job(context));

        self.active = Some(ActiveJob {
            job_id,
            cancel,
            lifetime,
            task: Some(task),
        });
    }

    /// Signals the active job's token. A no-op when no job was started.
    pub fn cancel_job(&mut self) {
        let Some(active) = &self.active else {
            rp_debug!("Cancel requested with no active job");
            return;
        };
        if active.cancel.is_cancelled() {
            return;
        }
        rp_info!("Cancelling job {}", active.job_id);
        active.cancel.cancel();

        if self.settings.notify_backend_on_cancel {
            let backend = self.backend.clone();
            let job_id = active.job_id;
            self.cancel_notices.retain(|notice| !notice.is_finished());
            self.cancel_notices.push(tokio::spawn(async move {
                if let Err(err) = backend.request_cancel().await {
                    rp_warn!("Cancel notification for job {} failed: {}", job_id, err);
                }
            }));
        }
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active.as_ref().map(|active| active.job_id)
    }

    pub fn active_token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|active| active.cancel.clone())
    }

    /// Waits for the active job's task, including its playback, and for a
    /// pending cancel notifications.
    pub async fn wait(&mut self) {
        for notice in self.cancel_notices.drain(..) {
            if let Err(err) = notice.await {
                rp_error!("Cancel notification task failed: {}", err);
            }
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Some(task) = active.task.take() {
            if let Err(err) = task.await {
                rp_error!("Job {} task failed: {}", active.job_id, err);
            }
        }
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.lifetime.cancel();
        }
    }
}

struct JobContext {
    job_id: JobId,
    request: JobRequest,
    backend: Arc<dyn JobBackend>,
    sink: Arc<dyn EventSink>,
    settings: ControllerSettings,
    cancel: CancellationToken,
    lifetime: CancellationToken,
}

/// Streams progress and, once the first `Done` frame is seen, loads and plays
/// the route concurrently with the rest of the stream.
async fn run_job(context: JobContext) {
    let (done_tx, done_rx) = oneshot::channel();
    let stream_phase = stream_progress(&context, done_tx);
    let route_phase = async {
        if done_rx.await.is_ok() {
            load_and_play(&context).await;
        }
    };
    tokio::join!(stream_phase, route_phase);
}

async fn stream_progress(context: &JobContext, done_tx: oneshot::Sender<()>) {
    let job_id = context.job_id;
    let sink = context.sink.as_ref();

    let submitted = tokio::select! {
        biased;
        _ = context.cancel.cancelled() => Err(JobError::aborted()),
        result = context.backend.submit(&context.request) => result,
    };

    let result = match submitted {
        Ok(stream) => {
            let mut done_tx = Some(done_tx);
            let mut consumer = StreamConsumer::new(context.settings.framing);
            consumer
                .consume(stream, &context.cancel, |event| match event {
                    ProgressEvent::Progress(label) => {
                        sink.emit(EngineEvent::Progress { job_id, label });
                    }
                    ProgressEvent::Done => {
                        sink.emit(EngineEvent::Done { job_id });
                        if let Some(tx) = done_tx.take() {
                            let _ = tx.send(());
                        }
                    }
                    // Reported below, once the loop has stopped.
                    ProgressEvent::Cancelled => {}
                })
                .await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(StreamOutcome::Ended) => {
            rp_debug!("Job {} stream closed", job_id);
            sink.emit(EngineEvent::StreamClosed { job_id });
        }
        Ok(StreamOutcome::Cancelled) => {
            rp_info!("Job {} cancelled by server", job_id);
            sink.emit(EngineEvent::Cancelled { job_id });
        }
        Err(err) if err.is_cancelled() => {
            rp_info!("Job {} aborted", job_id);
            sink.emit(EngineEvent::Cancelled { job_id });
        }
        Err(error) => {
            rp_warn!("Job {} failed: {}", job_id, error);
            sink.emit(EngineEvent::Failed { job_id, error });
        }
    }
}

async fn load_and_play(context: &JobContext) {
    let job_id = context.job_id;
    let sink = context.sink.as_ref();

    let fetched = tokio::select! {
        biased;
        _ = context.lifetime.cancelled() => return,
        fetched = context.backend.fetch_route() => fetched,
    };
    let geometry = match fetched {
        Ok(geometry) => geometry,
        Err(error) => {
            rp_error!("Route for job {} unavailable: {}", job_id, error);
            sink.emit(EngineEvent::RouteFailed { job_id, error });
            return;
        }
    };
    sink.emit(EngineEvent::RouteLoaded {
        job_id,
        point_count: geometry.len(),
        start: geometry.start(),
    });

    let playback = run_playback(
        job_id,
        geometry,
        context.settings.playback,
        &context.lifetime,
        sink,
    );
    let downloads = save_downloads(context);
    let (end, ()) = tokio::join!(playback, downloads);
    if end == PlaybackEnd::Superseded {
        // The newer job owns the screen; nothing more to report for this one.
        rp_debug!("Job {} stopped before its route finished playing", job_id);
    }
}

async fn save_downloads(context: &JobContext) {
    let Some(dir) = context.settings.download_dir.clone() else {
        return;
    };
    let writer = AtomicFileWriter::new(dir);
    for link in DOWNLOADS {
        let fetched = tokio::select! {
            biased;
            _ = context.lifetime.cancelled() => return,
            fetched = context.backend.download(link.path) => fetched,
        };
        let saved = fetched
            .map_err(|err| err.to_string())
            .and_then(|body| {
                let name = artifact_file_name(link.path).map_err(|err| err.to_string())?;
                writer.write(name, &body).map_err(|err| err.to_string())
            });
        match saved {
            Ok(path) => {
                rp_info!("Saved {} for job {} to {:?}", link.label, context.job_id, path);
                context.sink.emit(EngineEvent::ArtifactSaved {
                    job_id: context.job_id,
                    path,
                });
            }
            Err(err) => {
                rp_warn!("Could not save {} for job {}: {}", link.path, context.job_id, err);
            }
        }
    }
}
