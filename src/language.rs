//! 语言解析与翻译能力接口
//!
//! 翻译引擎本身是外部能力：给定源语言、目标语言和一段文本，返回译文，
//! 或者表明该语言对不受支持。这里只定义两个接口：
//! - [`TranslationBackend`]：解析语言代码，并为语言对提供翻译器
//! - [`TextTranslator`]：对文本做实际翻译

use std::fmt;

use crate::error::Result;

/// 已解析的语言 (ISO 639-1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    code: String,
    name: &'static str,
}

impl Language {
    /// 从两字母代码解析语言，未知代码返回 `None`
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_lowercase();
        if normalized.len() != 2 {
            return None;
        }

        let language = isolang::Language::from_639_1(&normalized)?;
        Some(Self {
            code: normalized,
            name: language.to_name(),
        })
    }

    /// 两字母语言代码
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 英文语言名称
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// 文本翻译器，绑定到一个固定的语言对
pub trait TextTranslator {
    /// 翻译单段文本
    fn translate(&self, text: &str) -> Result<String>;

    /// 批量翻译，结果与输入一一对应
    fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        texts.iter().map(|text| self.translate(text)).collect()
    }
}

/// 翻译后端：语言解析 + 翻译路径查找
pub trait TranslationBackend {
    /// 解析语言代码
    fn resolve_language(&self, code: &str) -> Option<Language> {
        Language::from_code(code)
    }

    /// 获取从 `from` 到 `to` 的翻译器，不存在翻译路径时返回 `None`
    fn translator(&self, from: &Language, to: &Language) -> Option<Box<dyn TextTranslator>>;
}
