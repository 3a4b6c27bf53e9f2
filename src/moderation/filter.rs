use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::words::DEFAULT_WORDS;
use super::Moderator;
use crate::infrastructure::error::{GateError, Result};

/// 默认遮盖字符
pub const DEFAULT_PLACEHOLDER: char = '*';

/// 单个正则最多容纳的词条数，超出后拆成多个正则
const WORDS_PER_PATTERN: usize = 1000;

/// 单个正则的编译大小上限
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

static DEFAULT_FILTER: Lazy<ProfanityFilter> = Lazy::new(|| {
    ProfanityFilter::with_words(DEFAULT_WORDS.iter().copied()).expect("内置屏蔽词表无法编译")
});

/// 基于词表的脏话过滤器
///
/// 词表匹配不区分大小写，并且只匹配完整单词（`class` 不会命中 `ass`）。
/// 以 `$` 等非单词字符开头或结尾的词条，在该侧不要求单词边界，
/// 因此 `a$$`、`$hit` 这类变体写法同样能命中。
/// 命中的每个字符都会被替换为遮盖字符，因此清洗后的文本长度不变。
#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: BTreeSet<String>,
    placeholder: char,
    matchers: Vec<Regex>,
}

impl ProfanityFilter {
    /// 使用内置默认词表
    pub fn new() -> Self {
        DEFAULT_FILTER.clone()
    }

    /// 只使用给定词表
    pub fn with_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self {
            words: BTreeSet::new(),
            placeholder: DEFAULT_PLACEHOLDER,
            matchers: Vec::new(),
        };
        filter.add_words(words)?;
        Ok(filter)
    }

    pub fn with_placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    pub fn add_words<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
        self.rebuild()
    }

    /// 从词表中移除（放行）指定单词
    pub fn remove_words<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.remove(&word.as_ref().trim().to_lowercase());
        }
        self.rebuild()
    }

    /// 读取词表文件：每行一个词，忽略空行和 `#` 开头的注释
    pub fn load_word_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GateError::word_list(path, e))?;

        let words: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        let count = words.len();
        self.add_words(words)?;

        tracing::debug!(path = %path.display(), count, patterns = self.matchers.len(), "已加载屏蔽词表");
        Ok(count)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 重新编译匹配正则。失败时保留原有正则，不会让过滤器失效。
    fn rebuild(&mut self) -> Result<()> {
        // 长词优先
        let mut words: Vec<&String> = self.words.iter().collect();
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

        let matchers = words
            .chunks(WORDS_PER_PATTERN)
            .map(|chunk| compile_pattern(chunk))
            .collect::<Result<Vec<_>>>()?;

        self.matchers = matchers;
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 只在词条首尾为单词字符的一侧加 `\b`
fn word_alternative(word: &str) -> String {
    let lead = if word.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
    let trail = if word.chars().last().is_some_and(is_word_char) { r"\b" } else { "" };
    format!("{}{}{}", lead, regex::escape(word), trail)
}

fn compile_pattern(words: &[&String]) -> Result<Regex> {
    let alternation = words
        .iter()
        .map(|w| word_alternative(w))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!("(?:{})", alternation))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(GateError::pattern)
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Moderator for ProfanityFilter {
    fn clean(&self, text: &str) -> String {
        let placeholder = self.placeholder;
        let mut cleaned = text.to_string();

        for matcher in &self.matchers {
            cleaned = matcher
                .replace_all(&cleaned, |caps: &regex::Captures| {
                    placeholder.to_string().repeat(caps[0].chars().count())
                })
                .into_owned();
        }
        cleaned
    }
}
