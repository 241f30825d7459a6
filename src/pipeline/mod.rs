pub mod orchestrator;
pub mod reply;
pub mod state;

pub use orchestrator::SubmissionPipeline;
pub use state::{IdentityResult, ProcessingResult, Submission};
