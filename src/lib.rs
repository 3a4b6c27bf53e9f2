// Core modules
pub mod cli;
pub mod config;
pub mod models;
pub mod moderation;
pub mod review;
pub mod storage;

pub mod infrastructure;

pub use cli::args;
pub use models::{DisplayReview, NewReview, ProductId, Rating, ReviewDraft, StoredReview};
pub use moderation::{Moderator, ProfanityFilter};
pub use review::{validate_draft, RejectionReason, ReviewForm, ReviewSubmitter, SubmissionResult};
pub use storage::{HttpReviewStore, ReviewStore, StoreError};
