pub mod orchestrator;
pub mod registry;
pub mod session;

pub use orchestrator::{DiagnosisWorkflow, WorkflowError};
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{DiagnosisSession, EnrichedReport, FeedbackReceipt, SessionStage};
