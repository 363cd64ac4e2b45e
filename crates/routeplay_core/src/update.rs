use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested(request) => {
            // The engine aborts the previous job before submitting this one.
            let job_id = state.begin_job();
            vec![Effect::StartJob { job_id, request }]
        }
        Msg::CancelClicked => {
            if state.request_cancel() {
                vec![Effect::CancelJob]
            } else {
                Vec::new()
            }
        }
        Msg::InterruptRequested => {
            if state.request_cancel() {
                vec![Effect::CancelJob]
            } else {
                vec![Effect::Quit]
            }
        }
        Msg::JobProgress {
            job_id,
            label,
            indeterminate_percent,
        } => {
            if state.is_current(job_id) {
                state.apply_progress(label, indeterminate_percent);
            }
            Vec::new()
        }
        Msg::JobDone { job_id } => {
            if state.is_current(job_id) {
                state.apply_done();
            }
            Vec::new()
        }
        Msg::JobCancelled { job_id } => {
            if state.is_current(job_id) {
                state.apply_cancelled();
            }
            Vec::new()
        }
        Msg::JobFailed { job_id, message } => {
            if state.is_current(job_id) {
                state.apply_failed(&message);
            }
            Vec::new()
        }
        Msg::StreamClosed { job_id } => {
            if state.is_current(job_id) {
                state.apply_stream_closed();
            }
            Vec::new()
        }
        Msg::RouteLoaded {
            job_id,
            point_count,
            start,
        } => {
            if state.is_current(job_id) {
                state.apply_route_loaded(point_count, start);
            }
            Vec::new()
        }
        Msg::RouteFailed { job_id, message } => {
            if state.is_current(job_id) {
                state.apply_route_failed(&message);
            }
            Vec::new()
        }
        Msg::MarkerMoved { job_id, position } => {
            if state.is_current(job_id) {
                state.apply_marker(position);
            }
            Vec::new()
        }
        Msg::TelemetryUpdated { job_id, telemetry } => {
            if state.is_current(job_id) {
                state.apply_telemetry(telemetry);
            }
            Vec::new()
        }
        Msg::PlaybackFinished { job_id } => {
            if state.is_current(job_id) {
                state.apply_playback_finished();
            }
            Vec::new()
        }
        Msg::ArtifactSaved { job_id, path } => {
            if state.is_current(job_id) {
                state.record_saved_artifact(path);
            }
            Vec::new()
        }
    };

    (state, effects)
}
