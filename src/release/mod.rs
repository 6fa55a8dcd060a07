//! Release pipeline stages: locate the latest tag, walk history, compose
//! notes, publish.

pub mod batch;
pub mod composer;
pub mod locator;
pub mod publisher;
pub mod walker;

pub use composer::compose_release_body;
pub use locator::{TagLocation, TagLocator};
pub use publisher::ReleasePublisher;
pub use walker::{HistoryWalker, WalkOutcome};
