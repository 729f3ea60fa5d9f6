//! 配置管理模块
//!
//! 提供CLI参数解析和翻译配置管理功能

// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use clap::Parser;

// 本地模块导入
use crate::api_constants::{api_config, get_batch_size, is_valid_api_url, service_config};
use crate::error::Result;
use crate::glossary::GlossaryBackend;
use crate::language::TranslationBackend;
use crate::translation_error;
use crate::translator::HttpBackend;

/// 翻译配置
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use html_translator::config::TranslatorConfig;
///
/// let config = TranslatorConfig::new()
///     .languages("en", "hi")
///     .with_api_url("http://localhost:1188/translate")
///     .with_batch_size(50);
/// assert_eq!(config.batch_size(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// 源语言代码
    from_lang: String,
    /// 目标语言代码
    to_lang: String,
    /// 翻译API服务地址
    api_url: String,
    /// 离线词表文件，设置后不使用HTTP翻译服务
    glossary: Option<PathBuf>,
    /// 批处理大小
    batch_size: usize,
    /// 请求超时时间（秒）
    timeout_secs: u64,
}

impl TranslatorConfig {
    /// 创建新的配置实例
    ///
    /// 默认值：
    /// - 语言: "en" -> "hi"
    /// - API地址: 本地翻译服务
    /// - 批处理大小: 25
    /// - 超时: 30秒
    pub fn new() -> Self {
        Self {
            from_lang: service_config::DEFAULT_SOURCE_LANG.to_string(),
            to_lang: service_config::DEFAULT_TARGET_LANG.to_string(),
            api_url: api_config::LOCAL_API_URL.to_string(),
            glossary: None,
            batch_size: service_config::DEFAULT_BATCH_SIZE,
            timeout_secs: api_config::REQUEST_TIMEOUT_SECONDS,
        }
    }

    /// 从命令行参数构建配置
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::new()
            .languages(&cli.from, &cli.to)
            .with_api_url(&cli.api)
            .with_batch_size(cli.batch_size)
            .with_timeout(cli.timeout);
        if let Some(glossary) = &cli.glossary {
            config = config.with_glossary(glossary);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_lang(&self) -> &str {
        &self.from_lang
    }

    pub fn to_lang(&self) -> &str {
        &self.to_lang
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn glossary(&self) -> Option<&Path> {
        self.glossary.as_deref()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// 设置源语言和目标语言
    pub fn languages(mut self, from: &str, to: &str) -> Self {
        self.from_lang = from.to_string();
        self.to_lang = to.to_string();
        self
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn with_glossary(mut self, path: &Path) -> Self {
        self.glossary = Some(path.to_path_buf());
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = get_batch_size(Some(size));
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// 检查配置项
    pub fn validate(&self) -> Result<()> {
        if self.glossary.is_none() && !is_valid_api_url(&self.api_url) {
            return Err(translation_error!(config, "api", format!("无效的API地址: {}", self.api_url)));
        }
        if self.timeout_secs == 0 {
            return Err(translation_error!(config, "timeout", "超时时间必须大于0"));
        }
        Ok(())
    }

    /// 根据配置创建翻译后端
    pub fn backend(&self) -> Result<Box<dyn TranslationBackend>> {
        match &self.glossary {
            Some(path) => Ok(Box::new(GlossaryBackend::from_file(path)?)),
            None => Ok(Box::new(HttpBackend::new(self)?)),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// CLI参数结构
#[derive(Parser, Debug)]
#[command(
    name = "html-translator",
    author,
    version,
    about = "批量翻译HTML文件中的可见文本，保留脚本与样式 (原地覆盖)",
    long_about = None
)]
pub struct Cli {
    /// 需要翻译的HTML文件，或包含HTML文件的目录
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// 源语言代码 (ISO 639-1)
    #[arg(short, long, default_value = service_config::DEFAULT_SOURCE_LANG)]
    pub from: String,

    /// 目标语言代码 (ISO 639-1)
    #[arg(short, long, default_value = service_config::DEFAULT_TARGET_LANG)]
    pub to: String,

    /// 输出文件路径 (仅限单个输入文件，默认覆盖输入文件)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// 翻译API地址
    #[arg(short, long, default_value = api_config::LOCAL_API_URL)]
    pub api: String,

    /// 使用离线JSON词表代替翻译API
    #[arg(short, long, value_name = "FILE")]
    pub glossary: Option<PathBuf>,

    /// 每次请求的文本数量
    #[arg(long, default_value_t = service_config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// 请求超时时间（秒）
    #[arg(long, default_value_t = api_config::REQUEST_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 日志文件目录 (默认当前目录)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// 详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 显示统计信息
    #[arg(long)]
    pub stats: bool,
}
