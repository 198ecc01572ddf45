pub mod artifact_store;
pub mod notifier;
pub mod outcome_classifier;
pub mod submission_builder;
pub mod token_extractor;

pub use artifact_store::{ArtifactStore, FileArtifactStore, MemoryArtifactStore};
pub use notifier::{FileNotifier, Notifier, RecordingNotifier};
pub use outcome_classifier::classify;
pub use submission_builder::{submission_label, SubmissionBuilder};
pub use token_extractor::{FormTokenBundle, FormTokenExtractor, TokenField};
