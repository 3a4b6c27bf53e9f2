use clap::Parser;

use crate::infrastructure::logging::LogFormat;

#[derive(Parser, Debug, Default)]
#[command(
    name = "review-gate",
    version,
    about = "商品评论提交工具 - 本地校验、脏话过滤后提交到评论服务",
    long_about = "review-gate 在提交商品评论前检查评分和评论是否填写、评论是否包含不当用语，通过后再把评论发送到评论存储服务。也可以只做本地检查或查看某个商品的评论列表。"
)]
pub struct Args {
    /// 商品 ID（纯数字按数字发送）
    #[arg(short = 'i', long = "product-id", value_name = "ID")]
    pub product_id: Option<String>,

    /// 评分 1-5（空值或非法值视为未填写）
    #[arg(short = 'r', long, value_name = "RATING", default_value = "")]
    pub rating: String,

    /// 评论内容
    #[arg(short = 'c', long, value_name = "TEXT", default_value = "")]
    pub comment: String,

    /// 只做本地校验和内容审核，不发送请求
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// 列出商品的评论
    #[arg(short = 'l', long, default_value_t = false)]
    pub list: bool,

    /// 评论服务地址
    #[arg(short = 'e', long, default_value = "")] // 空字符串表示未指定
    pub endpoint: String,

    /// 请求超时时间（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 额外的屏蔽词表文件，每行一个词
    #[arg(long = "word-file", value_name = "PATH")]
    pub word_file: Option<String>,

    /// 以 JSON 格式输出结果
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// 日志格式：pretty、compact 或 json
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// 日志写入文件（追加），默认输出到 stderr
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// 输出调试日志
    #[arg(short = 'd', long, default_value_t = false)]
    pub debug: bool,
}
