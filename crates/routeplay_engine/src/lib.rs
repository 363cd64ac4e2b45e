//! Routeplay engine: backend I/O, stream consumption, playback timing and
//! the job controller tying them together.
mod backend;
mod controller;
mod persist;
mod playback;
mod route;
mod sink;
mod stream;
mod types;

pub use backend::{BackendSettings, ByteStream, JobBackend, ReqwestBackend};
pub use controller::{ControllerSettings, JobController};
pub use persist::{artifact_file_name, ensure_output_dir, AtomicFileWriter, PersistError};
pub use playback::{run_playback, PlaybackEnd, PlaybackSettings};
pub use route::parse_route_geometry;
pub use sink::{ChannelEventSink, EventSink};
pub use stream::StreamConsumer;
pub use types::{EngineEvent, FailureKind, JobError, JobId, StreamOutcome};
