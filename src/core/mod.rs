pub mod clip;
pub mod clip_source;
pub mod event_log;
pub mod orchestrator;
pub mod placer;
pub mod pointer;
pub mod queue;
pub mod registry;
pub mod status;

// Re-export commonly used types for convenience
pub use clip::ClipRef;
pub use clip_source::{ClipSourceError, load_clips};
pub use event_log::{CallEvent, CsvEventLog, EventLogError, EventSink, now_timestamp};
pub use orchestrator::{LaunchOutcome, Orchestrator, RunSnapshot};
pub use placer::{CallPlacer, CallRequest, LaunchError, PlacedCall, TwilioCallPlacer};
pub use pointer::PointerStore;
pub use status::{AnsweredBy, CallStatus};
