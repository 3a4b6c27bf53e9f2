use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CreateResponse, ReviewStore, StoreError};
use crate::models::{NewReview, ProductId, StoredReview};

/// HTTP 存储服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpStoreConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/reviews".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// 通过 REST 接口读写评论
pub struct HttpReviewStore {
    config: HttpStoreConfig,
    client: Arc<reqwest::Client>,
}

impl HttpReviewStore {
    /// 按配置创建客户端；客户端构建失败时返回错误，不会退回到无超时的默认客户端
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl ReviewStore for HttpReviewStore {
    async fn create_review(&self, review: &NewReview) -> Result<CreateResponse, StoreError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(review)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // 响应体只用于日志，非 JSON 时按原文保存
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        tracing::debug!(
            endpoint = %self.config.endpoint,
            status = status.as_u16(),
            response = %body,
            "评论创建请求已返回"
        );

        Ok(CreateResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn list_reviews(&self, product_id: &ProductId) -> Result<Vec<StoredReview>, StoreError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("productId", product_id.to_string())])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let reviews: Vec<StoredReview> = serde_json::from_str(&text)?;
        tracing::debug!(product_id = %product_id, count = reviews.len(), "已获取评论列表");
        Ok(reviews)
    }
}
