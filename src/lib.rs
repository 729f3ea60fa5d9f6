//! HTML Translator - 批量HTML翻译工具库
//!
//! 翻译HTML文档中的可读文本，同时保留文档结构、内嵌脚本和样式表。
//! 核心是"拆分/重组"流水线：先移除注释、脚本、样式表和文档类型声明，
//! 翻译剩余文档，再把脚本和样式表放回译文中。

pub mod api_constants;
pub mod config;
pub mod document;
pub mod error;
pub mod glossary;
pub mod html_processor;
pub mod language;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
pub mod serializer;
pub mod session;
pub mod stats;
pub mod translator;
pub mod utils;

pub use document::{Container, DocumentTree, ExtractedNode, ExtractedNodeBundle, NodeKind, StructuralParser};
pub use error::{Result, TranslationError};
pub use html_processor::{Html5everParser, RcDocument};
pub use language::{Language, TextTranslator, TranslationBackend};
pub use pipeline::FileTranslator;
pub use session::TranslationSession;
