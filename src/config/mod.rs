use std::env;
use std::path::PathBuf;

use crate::infrastructure::error::{GateError, Result};
use crate::infrastructure::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::moderation::{ProfanityFilter, DEFAULT_PLACEHOLDER};
use crate::storage::{HttpReviewStore, HttpStoreConfig};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/reviews";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub reviews_endpoint: String,
    pub timeout_seconds: u64,
    pub word_file: Option<String>,
    pub allowed_words: Vec<String>,
    pub placeholder: char,
    pub debug: bool,
    pub log_format: LogFormat,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reviews_endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            word_file: None,
            allowed_words: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER,
            debug: false,
            log_format: LogFormat::Compact,
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(home).join(".review-gate").join(".env");
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(endpoint) = env::var("REVIEW_GATE_ENDPOINT") {
            self.reviews_endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("REVIEW_GATE_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(secs) => self.timeout_seconds = secs,
                Err(_) => tracing::warn!(value = %timeout, "REVIEW_GATE_TIMEOUT 不是合法的秒数，已忽略"),
            }
        }
        if let Ok(path) = env::var("REVIEW_GATE_WORD_FILE") {
            self.word_file = Some(path);
        }
        if let Ok(words) = env::var("REVIEW_GATE_ALLOWED_WORDS") {
            self.allowed_words = words
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        if let Ok(placeholder) = env::var("REVIEW_GATE_PLACEHOLDER") {
            if let Some(c) = placeholder.chars().next() {
                self.placeholder = c;
            }
        }
        if let Ok(debug) = env::var("REVIEW_GATE_DEBUG") {
            self.debug = matches!(debug.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(format) = env::var("REVIEW_GATE_LOG_FORMAT") {
            match format.trim().parse() {
                Ok(format) => self.log_format = format,
                Err(e) => tracing::warn!(value = %format, "REVIEW_GATE_LOG_FORMAT 无效，已忽略: {}", e),
            }
        }
        if let Ok(path) = env::var("REVIEW_GATE_LOG_FILE") {
            self.log_file = Some(path);
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if !args.endpoint.is_empty() {
            self.reviews_endpoint = args.endpoint.clone();
        }
        if let Some(timeout) = args.timeout {
            self.timeout_seconds = timeout;
        }
        if let Some(path) = &args.word_file {
            self.word_file = Some(path.clone());
        }
        if args.debug {
            self.debug = true;
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.reviews_endpoint).map_err(|e| {
            GateError::config(format!("Invalid reviews endpoint '{}': {}", self.reviews_endpoint, e))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(GateError::config(format!(
                "Reviews endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(GateError::config("Timeout must be greater than 0 seconds"));
        }
        Ok(())
    }

    /// 按配置生成日志设置：debug 决定级别，log_format/log_file 决定格式和输出位置
    pub fn logging_config(&self) -> LoggingConfig {
        let base = if self.debug {
            LoggingConfig::debug()
        } else {
            LoggingConfig::default()
        };

        LoggingConfig {
            format: self.log_format,
            output: match &self.log_file {
                Some(path) => LogOutput::File(path.clone()),
                None => LogOutput::Stderr,
            },
            ..base
        }
    }

    /// 按配置组装脏话过滤器：默认词表 + 词表文件 - 放行词
    pub fn build_filter(&self) -> Result<ProfanityFilter> {
        let mut filter = ProfanityFilter::new().with_placeholder(self.placeholder);

        if let Some(path) = &self.word_file {
            filter.load_word_file(path)?;
        }
        if !self.allowed_words.is_empty() {
            filter.remove_words(&self.allowed_words)?;
        }

        Ok(filter)
    }

    pub fn store_config(&self) -> HttpStoreConfig {
        HttpStoreConfig {
            endpoint: self.reviews_endpoint.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }

    pub fn build_store(&self) -> Result<HttpReviewStore> {
        Ok(HttpReviewStore::new(self.store_config())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Args;
    use crate::moderation::Moderator;
    use clap::Parser;
    use std::env;
    use std::io::Write;

    fn clear_env() {
        env::remove_var("REVIEW_GATE_ENDPOINT");
        env::remove_var("REVIEW_GATE_TIMEOUT");
        env::remove_var("REVIEW_GATE_WORD_FILE");
        env::remove_var("REVIEW_GATE_ALLOWED_WORDS");
        env::remove_var("REVIEW_GATE_PLACEHOLDER");
        env::remove_var("REVIEW_GATE_DEBUG");
        env::remove_var("REVIEW_GATE_LOG_FORMAT");
        env::remove_var("REVIEW_GATE_LOG_FILE");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.reviews_endpoint, "http://localhost:5000/api/reviews");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.word_file.is_none());
        assert!(config.allowed_words.is_empty());
        assert_eq!(config.placeholder, '*');
        assert!(!config.debug);
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.log_file.is_none());
    }

    // 所有修改环境变量的断言放在同一个测试里，避免并行测试互相干扰
    #[test]
    fn test_config_from_env() {
        clear_env();
        env::set_var("REVIEW_GATE_ENDPOINT", "https://shop.example.com/api/reviews");
        env::set_var("REVIEW_GATE_TIMEOUT", "5");
        env::set_var("REVIEW_GATE_WORD_FILE", "/etc/review-gate/words.txt");
        env::set_var("REVIEW_GATE_ALLOWED_WORDS", "damn, crap,");
        env::set_var("REVIEW_GATE_PLACEHOLDER", "#");
        env::set_var("REVIEW_GATE_DEBUG", "true");
        env::set_var("REVIEW_GATE_LOG_FORMAT", "json");
        env::set_var("REVIEW_GATE_LOG_FILE", "/var/log/review-gate.log");

        let config = Config::new();
        assert_eq!(config.reviews_endpoint, "https://shop.example.com/api/reviews");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.word_file.as_deref(), Some("/etc/review-gate/words.txt"));
        assert_eq!(config.allowed_words, vec!["damn".to_string(), "crap".to_string()]);
        assert_eq!(config.placeholder, '#');
        assert!(config.debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_file.as_deref(), Some("/var/log/review-gate.log"));

        env::set_var("REVIEW_GATE_TIMEOUT", "soon");
        env::set_var("REVIEW_GATE_LOG_FORMAT", "xml");
        let config = Config::new();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.log_format, LogFormat::Compact);

        clear_env();
    }

    #[test]
    fn test_update_from_args() {
        let mut config = Config::default();
        let args = Args::parse_from([
            "review-gate",
            "--endpoint",
            "http://127.0.0.1:9000/reviews",
            "--timeout",
            "3",
            "--debug",
            "--log-format",
            "pretty",
            "--log-file",
            "/tmp/review-gate.log",
        ]);
        config.update_from_args(&args);

        assert_eq!(config.reviews_endpoint, "http://127.0.0.1:9000/reviews");
        assert_eq!(config.timeout_seconds, 3);
        assert!(config.debug);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.log_file.as_deref(), Some("/tmp/review-gate.log"));

        // 未指定的参数不覆盖已有值
        let args = Args::parse_from(["review-gate"]);
        config.update_from_args(&args);
        assert_eq!(config.reviews_endpoint, "http://127.0.0.1:9000/reviews");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.reviews_endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(GateError::Configuration { .. })));

        config.reviews_endpoint = "ftp://example.com/reviews".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));

        config.reviews_endpoint = DEFAULT_ENDPOINT.to_string();
        config.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(GateError::Configuration { .. })));
    }

    #[test]
    fn test_logging_config() {
        let config = Config::default();
        let logging = config.logging_config();
        assert_eq!(logging.level, tracing::Level::WARN);
        assert_eq!(logging.format, LogFormat::Compact);
        assert_eq!(logging.output, LogOutput::Stderr);

        let config = Config {
            debug: true,
            log_format: LogFormat::Json,
            log_file: Some("/tmp/review-gate.log".to_string()),
            ..Config::default()
        };
        let logging = config.logging_config();
        assert_eq!(logging.level, tracing::Level::DEBUG);
        assert!(logging.include_span_events);
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(logging.output, LogOutput::File("/tmp/review-gate.log".to_string()));
    }

    #[test]
    fn test_build_store() {
        let config = Config {
            reviews_endpoint: "http://127.0.0.1:9000/reviews".to_string(),
            timeout_seconds: 3,
            ..Config::default()
        };
        let store = config.build_store().unwrap();
        assert_eq!(store.endpoint(), "http://127.0.0.1:9000/reviews");
    }

    #[test]
    fn test_build_filter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "frak").unwrap();

        let config = Config {
            word_file: Some(file.path().display().to_string()),
            allowed_words: vec!["damn".to_string()],
            placeholder: '#',
            ..Config::default()
        };
        let filter = config.build_filter().unwrap();

        assert_eq!(filter.clean("frak"), "####");
        assert_eq!(filter.clean("damn"), "damn");
        assert_eq!(filter.clean("shit"), "####");
    }

    #[test]
    fn test_build_filter_missing_word_file() {
        let config = Config {
            word_file: Some("/nonexistent/review-gate/words.txt".to_string()),
            ..Config::default()
        };
        assert!(config.build_filter().is_err());
    }
}
