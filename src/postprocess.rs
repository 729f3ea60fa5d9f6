//! 后处理：把预处理移除的脚本和样式表放回译文
//!
//! 脚本追加到 `<body>` 末尾，样式表追加到 `<head>` 末尾，按原顺序。
//! 这里总是新建元素再写入原内容，不复用之前解析得到的节点。

use tracing::debug;

use crate::api_constants::document_config::DOCTYPE_TAG;
use crate::document::{Container, DocumentTree, ExtractedNode, ExtractedNodeBundle};
use crate::error::Result;

/// 重新插入脚本和样式表，返回最终文本
///
/// 输出总是以 `<!DOCTYPE html>` 加换行开头，无论原文档是否有该声明。
pub fn reassemble<T: DocumentTree>(mut tree: T, bundle: &ExtractedNodeBundle) -> Result<String> {
    append_all(&mut tree, Container::Body, &bundle.scripts)?;
    append_all(&mut tree, Container::Head, &bundle.stylesheets)?;

    debug!(
        "🔧 重新插入脚本 {} 个, 样式表 {} 个",
        bundle.scripts.len(),
        bundle.stylesheets.len()
    );

    Ok(format!("{}\n{}", DOCTYPE_TAG, tree.prettify()))
}

fn append_all<T: DocumentTree>(tree: &mut T, container: Container, nodes: &[ExtractedNode]) -> Result<()> {
    for node in nodes {
        if let Some(tag) = node.kind.tag_name() {
            tree.append_element(container, tag, node)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeKind, StructuralParser};
    use crate::error::TranslationError;
    use crate::html_processor::Html5everParser;

    fn bundle() -> ExtractedNodeBundle {
        ExtractedNodeBundle {
            scripts: vec![
                ExtractedNode::new(NodeKind::Script, "a=1;"),
                ExtractedNode::new(NodeKind::Script, "b=2;"),
            ],
            stylesheets: vec![ExtractedNode::new(NodeKind::Stylesheet, ".a{color:red}")],
            comments_removed: 2,
        }
    }

    #[test]
    fn test_reassemble_appends_in_order() {
        let tree = Html5everParser.parse("<html><head><title>t</title></head><body><p>x</p></body></html>");
        let output = reassemble(tree, &bundle()).unwrap();

        assert!(output.starts_with("<!DOCTYPE html>\n<html>\n"));

        let reparsed = Html5everParser.parse(&output);
        let body = reparsed.child_elements(Container::Body);
        let tags: Vec<_> = body.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(tags, vec!["p", "script", "script"]);
        assert_eq!(body[1].1, "a=1;");
        assert_eq!(body[2].1, "b=2;");
        let head = reparsed.child_elements(Container::Head);
        assert_eq!(head.last().unwrap(), &("style".to_string(), ".a{color:red}".to_string()));
    }

    #[test]
    fn test_reassemble_restores_doctype_unconditionally() {
        let tree = Html5everParser.parse("<p>x</p>");
        let output = reassemble(tree, &ExtractedNodeBundle::default()).unwrap();
        assert!(output.starts_with("<!DOCTYPE html>\n"));
        assert_eq!(output.matches("<!DOCTYPE html>").count(), 1);
    }

    #[test]
    fn test_missing_body_is_structural_error() {
        let tree = Html5everParser.parse("<html><head></head><frameset><frame src=\"a.html\"></frameset></html>");
        let err = reassemble(tree, &bundle()).unwrap_err();
        assert!(matches!(err, TranslationError::Structural { .. }));
    }

    #[test]
    fn test_missing_body_without_scripts_is_fine() {
        let tree = Html5everParser.parse("<html><head></head><frameset><frame src=\"a.html\"></frameset></html>");
        let output = reassemble(tree, &ExtractedNodeBundle::default()).unwrap();
        assert!(output.contains("<frameset>"));
    }
}
