use crate::models::{DisplayReview, ProductId, ReviewDraft};
use crate::moderation::Moderator;
use crate::storage::{ReviewStore, StoreError};

use super::submission::{ReviewSubmitter, SubmissionResult};

/// 评论表单的可变状态，由界面层持有
///
/// 提交成功后清空评分和评论，失败时保留输入并更新错误提示，方便用户修改后重新提交。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub product_id: ProductId,
    pub rating: String,
    pub comment: String,
    pub error: Option<String>,
    pub reviews: Vec<DisplayReview>,
}

impl ReviewForm {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            rating: String::new(),
            comment: String::new(),
            error: None,
            reviews: Vec::new(),
        }
    }

    pub fn set_rating(&mut self, rating: impl Into<String>) {
        self.rating = rating.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// 按当前输入生成不可变草稿
    pub fn draft(&self) -> ReviewDraft {
        ReviewDraft::from_form(self.product_id.clone(), &self.rating, &self.comment)
    }

    pub async fn submit<S, M>(&mut self, submitter: &ReviewSubmitter<S, M>) -> SubmissionResult
    where
        S: ReviewStore,
        M: Moderator,
    {
        let draft = self.draft();
        let result = submitter.submit(&draft).await;

        match &result {
            SubmissionResult::Accepted(review) => {
                self.rating.clear();
                self.comment.clear();
                self.error = None;
                self.reviews.insert(0, review.clone());
            }
            SubmissionResult::Rejected(reason) => {
                self.error = Some(reason.message());
            }
        }

        result
    }

    /// 从存储服务重新加载评论列表
    pub async fn refresh<S: ReviewStore + ?Sized>(&mut self, store: &S) -> Result<usize, StoreError> {
        let stored = store.list_reviews(&self.product_id).await?;
        self.reviews = stored.into_iter().map(DisplayReview::from).collect();
        Ok(self.reviews.len())
    }
}
