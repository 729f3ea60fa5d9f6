//! 翻译会话
//!
//! 会话在创建时一次性检查语言对：两个语言代码都必须能解析，且必须存在
//! 翻译路径，否则会话不会被创建。创建后不可变，可以顺序翻译多个文件。

use std::collections::HashMap;

use tracing::{debug, info};

use crate::api_constants::service_config::DEFAULT_BATCH_SIZE;
use crate::document::{DocumentTree, StructuralParser};
use crate::error::{Result, TranslationError};
use crate::language::{Language, TextTranslator, TranslationBackend};

/// 翻译调用的结果
pub struct TranslatedDocument<T> {
    /// 从译文文本重新解析得到的文档树
    pub tree: T,
    /// 发送给翻译能力的文本片段数量
    pub segments: usize,
}

/// 绑定了源语言、目标语言和翻译器的会话
pub struct TranslationSession {
    source: Language,
    target: Language,
    translator: Box<dyn TextTranslator>,
    batch_size: usize,
}

impl TranslationSession {
    /// 创建会话
    ///
    /// 语言代码无法解析时返回 [`TranslationError::UnsupportedLanguage`]，列出所有无法解析的代码；
    /// 语言对没有翻译路径时返回 [`TranslationError::UnsupportedLanguagePair`]。
    pub fn create(backend: &dyn TranslationBackend, from: &str, to: &str) -> Result<Self> {
        let source = backend.resolve_language(from);
        let target = backend.resolve_language(to);

        let (source, target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (source, target) => {
                let mut codes = Vec::new();
                if source.is_none() {
                    codes.push(from.to_string());
                }
                if target.is_none() {
                    codes.push(to.to_string());
                }
                return Err(TranslationError::UnsupportedLanguage { codes });
            }
        };

        let translator = backend.translator(&source, &target).ok_or_else(|| {
            TranslationError::UnsupportedLanguagePair {
                from: from.to_string(),
                to: to.to_string(),
            }
        })?;

        info!("🌐 翻译会话: {} -> {}", source, target);
        Ok(Self {
            source,
            target,
            translator,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// 设置每次调用翻译器的文本片段数量
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn source(&self) -> &Language {
        &self.source
    }

    pub fn target(&self) -> &Language {
        &self.target
    }

    /// 翻译经过预处理的文档文本
    ///
    /// 译文先序列化为文本，再重新解析为新的文档树返回，翻译过程中修改过的树不会被继续使用。
    pub fn translate_document<P: StructuralParser>(
        &self,
        parser: &P,
        text: &str,
    ) -> Result<TranslatedDocument<P::Tree>> {
        let mut tree = parser.parse(text);
        let segments = tree.text_segments();
        debug!("📝 提取到 {} 个可翻译文本", segments.len());

        if !segments.is_empty() {
            let mut translations = HashMap::with_capacity(segments.len());
            for chunk in segments.chunks(self.batch_size) {
                let translated = self.translator.translate_batch(chunk)?;
                if translated.len() != chunk.len() {
                    return Err(anyhow::anyhow!(
                        "翻译器返回 {} 个结果，期望 {} 个",
                        translated.len(),
                        chunk.len()
                    )
                    .into());
                }
                translations.extend(chunk.iter().cloned().zip(translated));
            }
            tree.apply_translations(&translations);
        }

        let rendered = tree.to_html()?;
        Ok(TranslatedDocument {
            tree: parser.parse(&rendered),
            segments: segments.len(),
        })
    }
}
