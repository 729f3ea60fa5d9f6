//! 统一错误处理模块
//!
//! 定义翻译流水线中所有可能出现的错误类型。流水线内部不吞掉任何错误，
//! 只有最外层的批处理入口会统一记录并以非零状态退出。

// 标准库导入
use std::fmt;
use std::path::PathBuf;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// HTML翻译统一错误类型
#[derive(Debug)]
pub enum TranslationError {
    /// 语言代码无法解析 (配置错误，不可重试)
    UnsupportedLanguage {
        /// 无法解析的语言代码
        codes: Vec<String>,
    },

    /// 两种语言都已知，但不存在对应的翻译路径 (配置错误，不可重试)
    UnsupportedLanguagePair {
        from: String,
        to: String,
    },

    /// 文件读写错误
    Io {
        /// 文件路径
        path: PathBuf,
        /// 操作类型（读取、写入）
        operation: &'static str,
        /// 底层IO错误
        source: std::io::Error,
    },

    /// 翻译后的文档缺少 `<head>` 或 `<body>` 容器
    Structural {
        /// 缺失的容器名称
        container: String,
    },

    /// HTML序列化失败
    Serialize {
        details: String,
    },

    /// 网络请求相关错误
    Network {
        message: String,
        status_code: Option<u16>,
    },

    /// 翻译API返回错误状态
    TranslationApi {
        status_code: u16,
        message: String,
        api_url: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        source: AnyhowError,
    },
}

impl TranslationError {
    /// 是否为会话构建阶段的配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TranslationError::UnsupportedLanguage { .. }
                | TranslationError::UnsupportedLanguagePair { .. }
                | TranslationError::Configuration { .. }
        )
    }

    /// 读取文件失败
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io {
            path: path.into(),
            operation: "读取",
            source,
        }
    }

    /// 写入文件失败
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io {
            path: path.into(),
            operation: "写入",
            source,
        }
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::UnsupportedLanguage { codes } => {
                write!(f, "不支持的语言代码: {}", codes.join(", "))
            }
            TranslationError::UnsupportedLanguagePair { from, to } => {
                write!(f, "没有从 '{}' 到 '{}' 的可用翻译", from, to)
            }
            TranslationError::Io { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path.display(), source)
            }
            TranslationError::Structural { container } => {
                write!(f, "翻译后的文档缺少 <{}> 元素", container)
            }
            TranslationError::Serialize { details } => {
                write!(f, "HTML序列化失败: {}", details)
            }
            TranslationError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            TranslationError::TranslationApi { status_code, message, api_url } => {
                write!(f, "翻译API错误 [{}] {}: {}", status_code, api_url, message)
            }
            TranslationError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            TranslationError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslationError::Io { source, .. } => Some(source),
            TranslationError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 翻译流水线结果类型别名
pub type Result<T> = std::result::Result<T, TranslationError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! translation_error {
    (network, $msg:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (network, $msg:expr, $code:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (translation_api, $code:expr, $msg:expr, $url:expr) => {
        $crate::error::TranslationError::TranslationApi {
            status_code: $code,
            message: $msg.to_string(),
            api_url: $url.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::TranslationError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (structural, $container:expr) => {
        $crate::error::TranslationError::Structural {
            container: $container.to_string(),
        }
    };
    (serialize, $details:expr) => {
        $crate::error::TranslationError::Serialize {
            details: $details.to_string(),
        }
    };
}

/// 从anyhow::Error转换为TranslationError
impl From<AnyhowError> for TranslationError {
    fn from(error: AnyhowError) -> Self {
        TranslationError::Internal { source: error }
    }
}

/// 从reqwest::Error转换为TranslationError
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        TranslationError::Network {
            message: error.to_string(),
            status_code,
        }
    }
}
