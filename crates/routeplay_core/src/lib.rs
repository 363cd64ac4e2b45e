//! Routeplay core: pure job state machine, stream framing, geodesy and playback.
mod effect;
mod frame;
mod geodesic;
mod msg;
mod playback;
mod request;
mod route;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use frame::{classify_frame, FrameSplitter, FramingPolicy, ProgressEvent, FRAME_DELIMITER};
pub use geodesic::{haversine_km, EARTH_RADIUS_KM};
pub use msg::Msg;
pub use playback::{
    PlaybackPhase, PlaybackSimulator, PlaybackState, Telemetry, TickOutcome,
    DEFAULT_SPEED_KMH, DEFAULT_TICK_INTERVAL_MS,
};
pub use request::{JobRequest, UploadedFile, SAMPLE_FIELD, UPLOAD_FIELD};
pub use route::{LatLon, RouteGeometry};
pub use state::{
    AppState, DownloadLink, JobId, JobPhase, CANCELLED_NOTICE, DOWNLOADS, ROUTE_ARTIFACT_PATH,
};
pub use update::update;
pub use view_model::{AppViewModel, ProgressView};
