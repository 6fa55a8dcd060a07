//! Commit analysis - derives the version bump from walked commit messages

pub mod bump_classifier;

pub use bump_classifier::BumpClassifier;
