use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::models::{DisplayReview, NewReview, ReviewDraft};
use crate::moderation::Moderator;
use crate::storage::ReviewStore;

/// 评论被拒绝的原因，`Display` 即展示给用户的提示
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    #[error("Both rating and comment are required.")]
    MissingFields,

    #[error("Your comment contains inappropriate language. Please revise it.")]
    InappropriateLanguage,

    #[error("Failed to submit review")]
    SubmissionFailed,

    #[error("A review submission is already in progress.")]
    SubmissionInProgress,
}

impl RejectionReason {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MissingFields => "missing_fields",
            RejectionReason::InappropriateLanguage => "inappropriate_language",
            RejectionReason::SubmissionFailed => "submission_failed",
            RejectionReason::SubmissionInProgress => "submission_in_progress",
        }
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionResult {
    Accepted(DisplayReview),
    Rejected(RejectionReason),
}

impl SubmissionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionResult::Accepted(_))
    }

    pub fn review(&self) -> Option<&DisplayReview> {
        match self {
            SubmissionResult::Accepted(review) => Some(review),
            SubmissionResult::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            SubmissionResult::Accepted(_) => None,
            SubmissionResult::Rejected(reason) => Some(*reason),
        }
    }

    /// 拒绝时返回提示文本，成功时为 `None`
    pub fn message(&self) -> Option<String> {
        self.reason().map(|reason| reason.message())
    }
}

/// 单次提交的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Persisting,
    Accepted,
    Rejected,
}

impl SubmissionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionPhase::Accepted | SubmissionPhase::Rejected)
    }
}

/// 本地校验：先检查必填项，再做内容审核。
///
/// 通过时返回待发送的创建请求体，字段与草稿完全一致。
pub fn validate_draft(draft: &ReviewDraft, moderator: &dyn Moderator) -> Result<NewReview, RejectionReason> {
    let (rating, comment) = match (draft.rating, draft.comment.as_deref()) {
        (Some(rating), Some(comment)) if !comment.is_empty() => (rating, comment),
        _ => return Err(RejectionReason::MissingFields),
    };

    if moderator.clean(comment) != comment {
        return Err(RejectionReason::InappropriateLanguage);
    }

    Ok(NewReview {
        product_id: draft.product_id.clone(),
        rating,
        comment: comment.to_string(),
    })
}

/// 评论提交器：本地校验通过后把评论交给存储服务
pub struct ReviewSubmitter<S, M> {
    store: S,
    moderator: M,
    in_flight: AtomicBool,
}

impl<S, M> ReviewSubmitter<S, M>
where
    S: ReviewStore,
    M: Moderator,
{
    pub fn new(store: S, moderator: M) -> Self {
        Self {
            store,
            moderator,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn moderator(&self) -> &M {
        &self.moderator
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// 提交器当前状态：有请求在发送时为 `Persisting`，否则为 `Idle`
    pub fn phase(&self) -> SubmissionPhase {
        if self.is_in_flight() {
            SubmissionPhase::Persisting
        } else {
            SubmissionPhase::Idle
        }
    }

    /// 只做本地校验，不发请求
    pub fn check(&self, draft: &ReviewDraft) -> Result<NewReview, RejectionReason> {
        validate_draft(draft, &self.moderator)
    }

    /// 提交评论。所有失败都以 `Rejected` 返回，草稿本身不会被修改。
    pub async fn submit(&self, draft: &ReviewDraft) -> SubmissionResult {
        let span = tracing::info_span!(
            "review_submission",
            attempt = %Uuid::new_v4(),
            product_id = %draft.product_id,
        );

        self.run(draft).instrument(span).await
    }

    async fn run(&self, draft: &ReviewDraft) -> SubmissionResult {
        tracing::debug!(phase = ?self.phase(), "收到评论提交");
        tracing::debug!(phase = ?SubmissionPhase::Validating, "开始校验评论");

        let review = match self.check(draft) {
            Ok(review) => review,
            Err(reason) => return reject(reason),
        };

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return reject(RejectionReason::SubmissionInProgress);
        };

        tracing::debug!(phase = ?SubmissionPhase::Persisting, rating = %review.rating, "提交评论到存储服务");

        match self.store.create_review(&review).await {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    phase = ?SubmissionPhase::Accepted,
                    status = response.status,
                    response = %response.body,
                    "评论提交成功"
                );
                SubmissionResult::Accepted(DisplayReview::from(&review))
            }
            Ok(response) => {
                tracing::warn!(status = response.status, response = %response.body, "存储服务返回失败状态");
                reject(RejectionReason::SubmissionFailed)
            }
            Err(e) => {
                tracing::warn!(error = %e, retryable = e.is_retryable(), "评论提交请求失败");
                reject(RejectionReason::SubmissionFailed)
            }
        }
    }
}

fn reject(reason: RejectionReason) -> SubmissionResult {
    tracing::warn!(phase = ?SubmissionPhase::Rejected, reason = reason.as_str(), "评论被拒绝");
    SubmissionResult::Rejected(reason)
}

/// 持久化阶段的互斥标记，离开作用域时自动释放
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
