use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use review_gate::models::{NewReview, ProductId, StoredReview};
use review_gate::storage::{CreateResponse, ReviewStore, StoreError};

/// 模拟存储服务的返回方式
#[derive(Debug, Clone, Copy)]
pub enum MockOutcome {
    Status(u16),
    /// 存储层报错（不区分网络或解析错误）；真实的网络故障由 wiremock 测试覆盖
    Error,
}

/// 记录所有创建请求的内存存储
pub struct RecordingStore {
    requests: Mutex<Vec<NewReview>>,
    outcome: MockOutcome,
    delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<NewReview> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewStore for RecordingStore {
    async fn create_review(&self, review: &NewReview) -> Result<CreateResponse, StoreError> {
        self.requests.lock().unwrap().push(review.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcome {
            MockOutcome::Status(status) => Ok(CreateResponse {
                status,
                body: json!({ "message": "mock" }),
            }),
            MockOutcome::Error => {
                let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
                Err(StoreError::Decode(err))
            }
        }
    }

    async fn list_reviews(&self, _product_id: &ProductId) -> Result<Vec<StoredReview>, StoreError> {
        Ok(Vec::new())
    }
}
