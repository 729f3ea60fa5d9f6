//! 预处理：移除翻译能力无法正确处理的内容
//!
//! 按顺序执行，后一步依赖前一步已经处理过的文本：
//! 1. 去掉开头的 `<!DOCTYPE html>`，否则译文顶部会出现多余的 "html" 文本
//! 2. 移除注释，翻译后注释标记会丢失，注释内容会显示在页面上
//! 3. 移除脚本，代码中的 `&` 等字符会被转义为 `&amp;`
//! 4. 移除样式表，原因同上
//!
//! 每一步都重新解析当前文本，处理完再序列化为文本。

use tracing::debug;

use crate::api_constants::document_config::DOCTYPE_TAG;
use crate::document::{DocumentTree, ExtractedNode, ExtractedNodeBundle, NodeKind, StructuralParser};
use crate::error::Result;

/// 去掉开头的文档类型声明，只识别 `<!DOCTYPE html>` 这一种写法
pub fn strip_doctype(raw: &str) -> &str {
    raw.strip_prefix(DOCTYPE_TAG).unwrap_or(raw)
}

/// 生成可以交给翻译能力的文本，并返回被移除的脚本和样式表
pub fn sanitize<P: StructuralParser>(parser: &P, raw: &str) -> Result<(String, ExtractedNodeBundle)> {
    let content = strip_doctype(raw);

    let (content, comments) = remove_nodes(parser, content, NodeKind::Comment)?;
    let (content, scripts) = remove_nodes(parser, &content, NodeKind::Script)?;
    let (content, stylesheets) = remove_nodes(parser, &content, NodeKind::Stylesheet)?;

    debug!(
        "🧹 预处理完成: 注释 {} 个, 脚本 {} 个, 样式表 {} 个",
        comments.len(),
        scripts.len(),
        stylesheets.len()
    );

    Ok((
        content,
        ExtractedNodeBundle {
            scripts,
            stylesheets,
            comments_removed: comments.len(),
        },
    ))
}

fn remove_nodes<P: StructuralParser>(
    parser: &P,
    content: &str,
    kind: NodeKind,
) -> Result<(String, Vec<ExtractedNode>)> {
    let mut tree = parser.parse(content);
    let removed = tree.extract(kind);
    Ok((tree.to_html()?, removed))
}
