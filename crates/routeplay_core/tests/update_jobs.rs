use std::sync::Once;

use pretty_assertions::assert_eq;
use routeplay_core::{
    update, AppState, Effect, JobId, JobPhase, JobRequest, LatLon, Msg, Telemetry, UploadedFile,
    CANCELLED_NOTICE, DOWNLOADS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(routeplay_logging::initialize_for_tests);
}

fn sample(id: &str) -> JobRequest {
    JobRequest::from_inputs(None, id)
}

fn start(state: AppState, id: &str) -> (AppState, JobId) {
    let (state, effects) = update(state, Msg::StartRequested(sample(id)));
    let job_id = state.current_job().expect("job started");
    assert_eq!(
        effects,
        vec![Effect::StartJob {
            job_id,
            request: sample(id),
        }]
    );
    (state, job_id)
}

fn progress(job_id: JobId, label: &str, percent: u8) -> Msg {
    Msg::JobProgress {
        job_id,
        label: label.to_string(),
        indeterminate_percent: percent,
    }
}

#[test]
fn request_prefers_upload_over_sample() {
    let upload = UploadedFile {
        file_name: "stations.geojson".to_string(),
        bytes: b"{}".to_vec(),
    };
    let request = JobRequest::from_inputs(Some(upload.clone()), "demo.geojson");
    assert_eq!(request, JobRequest::Upload(upload));
    assert_eq!(request.field_name(), "geojson_file");

    let request = JobRequest::from_inputs(None, "demo.geojson");
    assert_eq!(request.field_name(), "demo_file");
    assert!(!request.is_blank());
    assert!(JobRequest::from_inputs(None, "").is_blank());
}

#[test]
fn progress_updates_label_and_marks_indeterminate() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (mut state, _) = update(state, progress(job_id, "building", 42));

    let view = state.view();
    assert_eq!(view.phase, JobPhase::Streaming);
    assert_eq!(view.progress.label, "building");
    assert_eq!(view.progress.percent, 42);
    assert!(view.progress.indeterminate);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn done_completes_progress_and_exposes_downloads() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, progress(job_id, "building", 30));
    let (state, _) = update(state, Msg::JobDone { job_id });

    let view = state.view();
    assert_eq!(view.phase, JobPhase::LoadingRoute);
    assert_eq!(view.progress.percent, 100);
    assert_eq!(view.progress.label, "100%");
    assert!(!view.progress.indeterminate);
    assert_eq!(view.downloads, DOWNLOADS.to_vec());
}

#[test]
fn cancelled_resets_progress_and_reports() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, progress(job_id, "building", 70));
    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::CancelJob]);

    let (state, _) = update(state, Msg::JobCancelled { job_id });
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Cancelled);
    assert_eq!(view.progress.percent, 0);
    assert_eq!(view.progress.label, "0%");
    assert_eq!(view.info.as_deref(), Some(CANCELLED_NOTICE));
    assert!(view.phase.is_terminal());
}

#[test]
fn new_job_clears_previous_run() {
    init_logging();
    let (state, first) = start(AppState::new(), "a.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id: first });
    let (state, _) = update(
        state,
        Msg::RouteLoaded {
            job_id: first,
            point_count: 2,
            start: Some(LatLon::new(1.0, 2.0)),
        },
    );
    assert_eq!(state.view().phase, JobPhase::Playing);

    let (state, second) = start(state, "b.geojson");
    assert_ne!(first, second);
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Streaming);
    assert_eq!(view.progress.percent, 0);
    assert!(view.downloads.is_empty());
    assert!(view.marker.is_none());
    assert!(view.info.is_none());
    assert!(view.route_points.is_none());
}

#[test]
fn stale_job_events_are_ignored() {
    init_logging();
    let (state, first) = start(AppState::new(), "a.geojson");
    let (state, second) = start(state, "b.geojson");

    // The superseded job reports its abort after the new one started.
    let (state, _) = update(state, Msg::JobCancelled { job_id: first });
    let (state, _) = update(state, progress(first, "old", 50));
    let view = state.view();
    assert_eq!(view.job_id, Some(second));
    assert_eq!(view.phase, JobPhase::Streaming);
    assert_eq!(view.progress.label, "0%");
    assert!(view.info.is_none());
}

#[test]
fn playback_events_drive_marker_and_telemetry() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, _) = update(
        state,
        Msg::RouteLoaded {
            job_id,
            point_count: 2,
            start: Some(LatLon::new(0.0, 0.0)),
        },
    );
    assert_eq!(state.view().marker, Some(LatLon::new(0.0, 0.0)));

    let telemetry = Telemetry::at_constant_speed(111.19, 60.0);
    let (state, _) = update(
        state,
        Msg::MarkerMoved {
            job_id,
            position: LatLon::new(0.0, 1.0),
        },
    );
    let (state, _) = update(state, Msg::TelemetryUpdated { job_id, telemetry });
    let view = state.view();
    assert_eq!(view.marker, Some(LatLon::new(0.0, 1.0)));
    assert_eq!(view.telemetry, Some(telemetry));
    assert_eq!(
        view.info.as_deref(),
        Some("Distance: 111.19 km | Time: 111 min | Avg Speed: 60 km/h")
    );

    let (state, _) = update(state, Msg::PlaybackFinished { job_id });
    assert_eq!(state.view().phase, JobPhase::Finished);
}

#[test]
fn route_failure_is_visible() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, _) = update(
        state,
        Msg::RouteFailed {
            job_id,
            message: "no LineString feature".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Failed);
    assert_eq!(
        view.info.as_deref(),
        Some("Route unavailable: no LineString feature")
    );
    // Completion stays visible; the result files exist on the server.
    assert_eq!(view.progress.percent, 100);
    assert_eq!(view.downloads.len(), 3);
}

#[test]
fn empty_route_finishes_without_playback() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, _) = update(
        state,
        Msg::RouteLoaded {
            job_id,
            point_count: 0,
            start: None,
        },
    );
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Finished);
    assert!(view.marker.is_none());
}

#[test]
fn transport_failure_leaves_idle_indicators() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, progress(job_id, "building", 55));
    let (state, _) = update(
        state,
        Msg::JobFailed {
            job_id,
            message: "http status 500".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Failed);
    assert_eq!(view.progress.percent, 0);
    assert!(view.downloads.is_empty());
    assert_eq!(view.info.as_deref(), Some("Job failed: http status 500"));
}

#[test]
fn cancel_after_done_is_ignored() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::JobCancelled { job_id });
    assert_eq!(state.view().phase, JobPhase::LoadingRoute);
    assert_eq!(state.view().progress.percent, 100);
}

#[test]
fn stream_closed_without_done_ends_job() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::StreamClosed { job_id });
    assert_eq!(state.view().phase, JobPhase::Ended);

    let (state, job_id) = start(state, "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, _) = update(state, Msg::StreamClosed { job_id });
    assert_eq!(state.view().phase, JobPhase::LoadingRoute);
}

#[test]
fn interrupt_without_streaming_job_quits() {
    let (_state, effects) = update(AppState::new(), Msg::InterruptRequested);
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn interrupt_cancels_stream_once_then_quits() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, effects) = update(state, Msg::InterruptRequested);
    assert_eq!(effects, vec![Effect::CancelJob]);

    let (state, effects) = update(state, Msg::InterruptRequested);
    assert_eq!(effects, vec![Effect::Quit]);
    assert_eq!(state.view().phase, JobPhase::Streaming);

    let (state, _) = update(state, Msg::JobCancelled { job_id });
    assert_eq!(state.view().phase, JobPhase::Cancelled);
}

#[test]
fn interrupt_during_playback_quits_on_first_press() {
    init_logging();
    let (state, job_id) = start(AppState::new(), "demo.geojson");
    let (state, _) = update(state, Msg::JobDone { job_id });
    let (state, _) = update(
        state,
        Msg::RouteLoaded {
            job_id,
            point_count: 2,
            start: Some(LatLon::new(0.0, 0.0)),
        },
    );
    assert_eq!(state.view().phase, JobPhase::Playing);

    let (_state, effects) = update(state, Msg::InterruptRequested);
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn repeated_cancel_clicks_send_one_cancel() {
    init_logging();
    let (state, _job_id) = start(AppState::new(), "demo.geojson");
    let (state, first) = update(state, Msg::CancelClicked);
    let (state, second) = update(state, Msg::CancelClicked);
    assert_eq!(first, vec![Effect::CancelJob]);
    assert!(second.is_empty());

    let (state, _job_id) = start(state, "demo.geojson");
    let (_state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::CancelJob]);
}
