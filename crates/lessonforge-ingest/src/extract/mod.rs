//! Text extraction backends.

pub mod local;
pub mod remote;

pub use remote::{HttpRemoteExtractor, RemoteExtractor};
