pub mod review;

pub use review::{
    DisplayReview, NewReview, ProductId, Rating, ReviewDraft, StoredReview, GUEST_DISPLAY_NAME,
};
