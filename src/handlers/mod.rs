//! HTTP request handlers
//!
//! - `api` - Health check and run summary
//! - `audio` - Static recording download used as clip playback URL
//! - `voice` - Connect webhook answering what to play on a call
//! - `webhook` - Call progress and AMD status webhook
//! - `params` - Shared form/query field extraction for provider webhooks

pub mod api;
pub mod audio;
pub mod params;
pub mod voice;
pub mod webhook;

pub use voice::incoming_call;
pub use webhook::call_status;
