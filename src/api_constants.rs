/// 翻译相关常量配置
///
/// 统一管理翻译服务、文档处理和日志相关的常量

/// 翻译API配置
pub mod api_config {
    /// 本地翻译服务地址 (DeepLX兼容接口)
    pub const LOCAL_API_URL: &str = "http://localhost:1188/translate";

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

/// 翻译服务配置
pub mod service_config {
    /// 默认源语言
    pub const DEFAULT_SOURCE_LANG: &str = "en";

    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "hi";

    /// HTTP翻译服务支持的语言代码
    pub const SUPPORTED_LANGUAGES: &[&str] = &[
        "zh", "en", "ja", "ko", "fr", "de", "es", "it", "pt", "ru",
        "ar", "hi", "th", "vi", "id", "ms", "tl", "nl", "sv", "da",
        "no", "fi", "pl", "cs", "sk", "hu", "ro", "bg", "hr", "sr",
        "sl", "et", "lv", "lt", "mt", "ga", "cy", "is", "mk", "sq"
    ];

    /// 默认批处理大小
    pub const DEFAULT_BATCH_SIZE: usize = 25;
}

/// 文档处理配置
pub mod document_config {
    /// 预处理时剥离、后处理时恢复的文档类型声明
    pub const DOCTYPE_TAG: &str = "<!DOCTYPE html>";

    /// 美化输出的缩进单位
    pub const INDENT: &str = " ";

    /// 目录参数展开时接受的文件扩展名
    pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

    /// 需要翻译的属性
    pub const TRANSLATABLE_ATTRIBUTES: &[&str] = &["title", "alt", "placeholder"];
}

/// 实用工具函数
/// 验证API URL是否有效
pub fn is_valid_api_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// 验证语言代码是否被HTTP翻译服务支持
pub fn is_supported_language(lang: &str) -> bool {
    service_config::SUPPORTED_LANGUAGES.contains(&lang)
}

/// 获取批处理大小
pub fn get_batch_size(custom_size: Option<usize>) -> usize {
    match custom_size {
        Some(size) if size > 0 => size,
        _ => service_config::DEFAULT_BATCH_SIZE,
    }
}
