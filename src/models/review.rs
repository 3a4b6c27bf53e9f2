use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未登录用户提交评论时使用的展示名
pub const GUEST_DISPLAY_NAME: &str = "Guest User";

/// 商品标识，既可能是数字也可能是字符串，原样透传给存储服务
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Numeric(u64),
    Text(String),
}

impl ProductId {
    /// 从命令行或表单输入解析：纯数字按数字处理，其余按字符串处理
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(id) => ProductId::Numeric(id),
            Err(_) => ProductId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Numeric(id) => write!(f, "{}", id),
            ProductId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Text(id)
    }
}

/// 评分，取值范围 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Rating(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 解析表单下拉框中的评分文本，空值、非数字或越界都视为未填写
    pub fn parse_form_value(raw: &str) -> Option<Self> {
        raw.trim().parse::<u8>().ok().and_then(Rating::new)
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| {
            format!("rating must be between {} and {}, got {}", Self::MIN, Self::MAX, value)
        })
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 待提交的评论草稿，仅在一次提交过程中存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub product_id: ProductId,
    pub rating: Option<Rating>,
    pub comment: Option<String>,
}

impl ReviewDraft {
    pub fn new(product_id: impl Into<ProductId>, rating: Option<Rating>, comment: Option<String>) -> Self {
        Self {
            product_id: product_id.into(),
            rating,
            comment,
        }
    }

    /// 从原始表单输入构建草稿。评论内容保持原样，不做 trim。
    pub fn from_form(product_id: impl Into<ProductId>, rating_text: &str, comment_text: &str) -> Self {
        let comment = if comment_text.is_empty() {
            None
        } else {
            Some(comment_text.to_string())
        };

        Self {
            product_id: product_id.into(),
            rating: Rating::parse_form_value(rating_text),
            comment,
        }
    }
}

/// 创建评论请求体，字段固定为 productId / rating / comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: Rating,
    pub comment: String,
}

/// 提交成功后立即回显给界面的评论，不是存储服务的权威记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayReview {
    pub rating: Rating,
    pub comment: String,
    pub display_name: String,
}

impl DisplayReview {
    pub fn guest(rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
            display_name: GUEST_DISPLAY_NAME.to_string(),
        }
    }
}

impl From<&NewReview> for DisplayReview {
    fn from(review: &NewReview) -> Self {
        DisplayReview::guest(review.rating, review.comment.clone())
    }
}

/// 存储服务返回的评论记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReview {
    pub product_id: ProductId,
    pub rating: Rating,
    pub comment: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

fn default_display_name() -> String {
    GUEST_DISPLAY_NAME.to_string()
}

impl From<StoredReview> for DisplayReview {
    fn from(review: StoredReview) -> Self {
        Self {
            rating: review.rating,
            comment: review.comment,
            display_name: review.display_name,
        }
    }
}
