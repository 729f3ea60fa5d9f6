//! 文件翻译流程
//!
//! 读取 -> 预处理 -> 翻译 -> 后处理 -> 写入。写入是最后一步，
//! 任何一步失败都不会产生输出文件。

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::document::StructuralParser;
use crate::error::{Result, TranslationError};
use crate::html_processor::Html5everParser;
use crate::postprocess::reassemble;
use crate::preprocess::sanitize;
use crate::session::TranslationSession;
use crate::stats::{format_duration, FileReport};
use crate::utils::resolve_output_path;

/// 内存中的翻译结果
#[derive(Debug, Clone)]
pub struct TranslatedText {
    pub html: String,
    pub segments_translated: usize,
    pub scripts_moved: usize,
    pub stylesheets_moved: usize,
    pub comments_removed: usize,
}

/// 文件翻译器：一个会话加一个结构化解析器
pub struct FileTranslator<P: StructuralParser = Html5everParser> {
    session: TranslationSession,
    parser: P,
}

impl FileTranslator<Html5everParser> {
    pub fn new(session: TranslationSession) -> Self {
        Self::with_parser(session, Html5everParser)
    }
}

impl<P: StructuralParser> FileTranslator<P> {
    pub fn with_parser(session: TranslationSession, parser: P) -> Self {
        Self { session, parser }
    }

    /// 翻译一段完整的HTML文本
    pub fn translate_text(&self, raw: &str) -> Result<TranslatedText> {
        let (sanitized, bundle) = sanitize(&self.parser, raw)?;
        let translated = self.session.translate_document(&self.parser, &sanitized)?;
        let html = reassemble(translated.tree, &bundle)?;

        Ok(TranslatedText {
            html,
            segments_translated: translated.segments,
            scripts_moved: bundle.scripts.len(),
            stylesheets_moved: bundle.stylesheets.len(),
            comments_removed: bundle.comments_removed,
        })
    }

    /// 翻译文件，`output` 为空时覆盖输入文件
    pub fn translate_file(&self, input: &Path, output: Option<&Path>) -> Result<FileReport> {
        let start = Instant::now();
        let output = resolve_output_path(input, output);

        let raw = std::fs::read_to_string(input).map_err(|e| TranslationError::read(input, e))?;
        debug!("📏 文件大小: {} 字节", raw.len());

        let translated = self.translate_text(&raw)?;

        std::fs::write(&output, &translated.html).map_err(|e| TranslationError::write(&output, e))?;

        let report = FileReport {
            input: input.to_path_buf(),
            output,
            input_size: raw.len(),
            output_size: translated.html.len(),
            segments_translated: translated.segments_translated,
            scripts_moved: translated.scripts_moved,
            stylesheets_moved: translated.stylesheets_moved,
            comments_removed: translated.comments_removed,
            elapsed: start.elapsed(),
        };
        info!(
            "✅ 完成: '{}' -> '{}' (文本 {} 项, 脚本 {} 个, 样式表 {} 个, 耗时 {})",
            report.input.display(),
            report.output.display(),
            report.segments_translated,
            report.scripts_moved,
            report.stylesheets_moved,
            format_duration(report.elapsed)
        );
        Ok(report)
    }
}
