pub mod filter;
pub mod words;

pub use filter::{ProfanityFilter, DEFAULT_PLACEHOLDER};
pub use words::DEFAULT_WORDS;

/// 文本审核接口：返回遮盖违规内容后的文本
///
/// 提交流程只把它当作检测信号使用，清洗结果与原文不同即视为违规。
pub trait Moderator: Send + Sync {
    fn clean(&self, text: &str) -> String;

    fn is_profane(&self, text: &str) -> bool {
        self.clean(text) != text
    }
}

impl<F> Moderator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn clean(&self, text: &str) -> String {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_moderator() {
        let upper = |text: &str| text.to_uppercase();
        assert!(upper.is_profane("abc"));
        assert!(!upper.is_profane("ABC"));
    }
}
