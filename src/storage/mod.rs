use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewReview, ProductId, StoredReview};

pub mod http;

pub use http::{HttpReviewStore, HttpStoreConfig};

/// 存储服务调用错误：请求本身未能完成，或响应无法使用
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("存储服务返回错误状态 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Transport(e) => e.is_timeout() || e.is_connect(),
            StoreError::Status { status, .. } => *status >= 500 || *status == 429,
            StoreError::Decode(_) => false,
        }
    }
}

/// 一次已完成的创建请求的响应
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl CreateResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 评论存储服务
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// 发送创建请求。只要 HTTP 交互完成（包括非 2xx）就返回 `Ok`。
    async fn create_review(&self, review: &NewReview) -> Result<CreateResponse, StoreError>;

    /// 获取某个商品的评论列表
    async fn list_reviews(&self, product_id: &ProductId) -> Result<Vec<StoredReview>, StoreError>;
}

#[async_trait]
impl<T: ReviewStore + ?Sized> ReviewStore for std::sync::Arc<T> {
    async fn create_review(&self, review: &NewReview) -> Result<CreateResponse, StoreError> {
        (**self).create_review(review).await
    }

    async fn list_reviews(&self, product_id: &ProductId) -> Result<Vec<StoredReview>, StoreError> {
        (**self).list_reviews(product_id).await
    }
}
