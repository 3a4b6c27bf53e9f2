pub mod form;
pub mod submission;

pub use form::ReviewForm;
pub use submission::{
    validate_draft, RejectionReason, ReviewSubmitter, SubmissionPhase, SubmissionResult,
};
