//! 离线词表翻译后端
//!
//! 从JSON文件加载单个语言对的词表，按去除首尾空白后的原文精确匹配，
//! 词表中没有的文本原样返回。

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TranslationError};
use crate::language::{Language, TextTranslator, TranslationBackend};
use crate::translation_error;

/// 词表文件格式
///
/// ```json
/// { "from": "en", "to": "hi", "entries": { "Hello": "नमस्ते" } }
/// ```
#[derive(Debug, Deserialize)]
struct GlossaryFile {
    from: String,
    to: String,
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// 词表后端，只支持词表声明的语言对
#[derive(Debug, Clone)]
pub struct GlossaryBackend {
    from: String,
    to: String,
    entries: Rc<HashMap<String, String>>,
}

impl GlossaryBackend {
    pub fn new(from: &str, to: &str, entries: HashMap<String, String>) -> Self {
        Self {
            from: from.trim().to_lowercase(),
            to: to.trim().to_lowercase(),
            entries: Rc::new(entries),
        }
    }

    /// 从JSON文件加载词表
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TranslationError::read(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: GlossaryFile =
            serde_json::from_str(content).map_err(|e| translation_error!(config, "glossary", e))?;
        debug!("📖 词表加载完成: {} -> {}, {} 条", file.from, file.to, file.entries.len());
        Ok(Self::new(&file.from, &file.to, file.entries))
    }
}

impl TranslationBackend for GlossaryBackend {
    fn translator(&self, from: &Language, to: &Language) -> Option<Box<dyn TextTranslator>> {
        if from.code() != self.from || to.code() != self.to {
            return None;
        }
        Some(Box::new(GlossaryTranslator {
            entries: Rc::clone(&self.entries),
        }))
    }
}

struct GlossaryTranslator {
    entries: Rc<HashMap<String, String>>,
}

impl TextTranslator for GlossaryTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        Ok(self
            .entries
            .get(text.trim())
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}
