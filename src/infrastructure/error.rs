use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StoreError;

/// 基础设施层错误（配置、词表、存储）
#[derive(Error, Debug)]
pub enum GateError {
    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("词表读取失败: {} - {source}", .path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("屏蔽词正则编译失败: {0}")]
    Pattern(#[source] regex::Error),

    #[error("存储错误: {0}")]
    Storage(#[from] StoreError),
}

impl GateError {
    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        GateError::Configuration {
            message: message.into(),
        }
    }

    /// 创建词表错误
    pub fn word_list(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GateError::WordList {
            path: path.into(),
            source,
        }
    }

    pub fn pattern(source: regex::Error) -> Self {
        GateError::Pattern(source)
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GateError::config("endpoint 不能为空");
        assert_eq!(err.to_string(), "配置错误: endpoint 不能为空");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = GateError::word_list("/tmp/words.txt", io);
        assert!(err.to_string().contains("/tmp/words.txt"));
    }

    #[test]
    fn test_pattern_error() {
        let source = regex::RegexBuilder::new("a{1000}{1000}")
            .size_limit(10)
            .build()
            .unwrap_err();
        let err = GateError::pattern(source);
        assert!(err.to_string().starts_with("屏蔽词正则编译失败"));
    }

    #[test]
    fn test_storage_error_converts() {
        let err: GateError = StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
        .into();
        assert!(matches!(err, GateError::Storage(StoreError::Status { status: 503, .. })));
        assert!(err.to_string().contains("503"));
    }
}
