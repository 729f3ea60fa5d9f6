//! HTML处理模块
//!
//! 基于 html5ever + markup5ever_rcdom 实现 [`StructuralParser`] 和 [`DocumentTree`]：
//! 解析、节点提取、可翻译文本收集、元素创建和序列化

// 标准库导入
use std::collections::{HashMap, HashSet};

// 第三方crate导入
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{create_element, NodeOrText, TreeSink};
use html5ever::{ns, LocalName, Namespace};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use tracing::debug;

// 本地模块导入
use crate::api_constants::document_config::TRANSLATABLE_ATTRIBUTES;
use crate::document::{Container, DocumentTree, ExtractedNode, NodeKind, StructuralParser};
use crate::error::Result;
use crate::serializer::{attribute_name, prettify};
use crate::translation_error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// 内容不是可读文本的元素，不进入其子树收集译文
const SKIPPED_SUBTREES: &[&str] = &["script", "style", "noscript", "template"];

/// html5ever解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everParser;

impl StructuralParser for Html5everParser {
    type Tree = RcDocument;

    fn parse(&self, text: &str) -> RcDocument {
        let dom = parse_document(RcDom::default(), Default::default()).one(text);
        RcDocument { dom }
    }
}

/// 基于RcDom的文档树
pub struct RcDocument {
    dom: RcDom,
}

impl RcDocument {
    /// 按文档顺序查找第一个名为 `tag` 的元素
    pub fn find_element(&self, tag: &str) -> Option<Handle> {
        let mut found = Vec::new();
        collect_nodes(&self.dom.document, &|node| element_name(node) == Some(tag), &mut found);
        found.into_iter().next()
    }
}

#[cfg(test)]
impl RcDocument {
    pub(crate) fn dom(&self) -> &RcDom {
        &self.dom
    }

    /// 统计名为 `tag` 的元素数量
    pub(crate) fn count_elements(&self, tag: &str) -> usize {
        let mut found = Vec::new();
        collect_nodes(&self.dom.document, &|node| element_name(node) == Some(tag), &mut found);
        found.len()
    }

    /// 容器的子元素 (标签名, 文本内容)，不含文本节点
    pub(crate) fn child_elements(&self, container: Container) -> Vec<(String, String)> {
        let Some(parent) = self.find_element(container.tag_name()) else {
            return Vec::new();
        };

        let children = parent.children.borrow();
        children
            .iter()
            .filter_map(|child| element_name(child).map(|name| (name.to_string(), text_content(child))))
            .collect()
    }

    pub(crate) fn has_comments(&self) -> bool {
        let mut found = Vec::new();
        collect_nodes(&self.dom.document, &|node| matches!(node.data, NodeData::Comment { .. }), &mut found);
        !found.is_empty()
    }
}

impl DocumentTree for RcDocument {
    fn extract(&mut self, kind: NodeKind) -> Vec<ExtractedNode> {
        let mut matches = Vec::new();
        collect_nodes(&self.dom.document, &|node| is_extractable(node, kind), &mut matches);

        matches
            .into_iter()
            .map(|node| {
                let extracted = snapshot(&node, kind);
                self.dom.remove_from_parent(&node);
                extracted
            })
            .collect()
    }

    fn text_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut seen = HashSet::new();

        visit_translatable(&self.dom.document, &mut |node| match node.data {
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                let trimmed = text.trim();
                if is_translatable_text(trimmed) && seen.insert(trimmed.to_string()) {
                    segments.push(trimmed.to_string());
                }
            }
            NodeData::Element { ref attrs, .. } => {
                for attr in attrs.borrow().iter() {
                    if !TRANSLATABLE_ATTRIBUTES.contains(&&*attr.name.local) {
                        continue;
                    }
                    let value = attr.value.trim();
                    if is_translatable_text(value) && seen.insert(value.to_string()) {
                        segments.push(value.to_string());
                    }
                }
            }
            _ => {}
        });

        segments
    }

    fn apply_translations(&mut self, translations: &HashMap<String, String>) -> usize {
        let mut applied = 0;

        visit_translatable(&self.dom.document, &mut |node| match node.data {
            NodeData::Text { ref contents } => {
                let replaced = {
                    let text = contents.borrow();
                    translations
                        .get(text.trim())
                        .map(|translation| preserve_padding(&text, translation))
                };
                if let Some(replaced) = replaced {
                    *contents.borrow_mut() = StrTendril::from_slice(&replaced);
                    applied += 1;
                }
            }
            NodeData::Element { ref attrs, .. } => {
                for attr in attrs.borrow_mut().iter_mut() {
                    if !TRANSLATABLE_ATTRIBUTES.contains(&&*attr.name.local) {
                        continue;
                    }
                    let value = attr.value.trim().to_string();
                    if let Some(translation) = translations.get(&value) {
                        attr.value = StrTendril::from_slice(translation);
                        applied += 1;
                    }
                }
            }
            _ => {}
        });

        debug!("🎯 总共应用了 {} 个翻译", applied);
        applied
    }

    fn append_element(&mut self, container: Container, tag: &str, node: &ExtractedNode) -> Result<()> {
        let parent = self
            .find_element(container.tag_name())
            .ok_or_else(|| translation_error!(structural, container.tag_name()))?;

        let attrs = node
            .attributes
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from(name.as_str())),
                value: StrTendril::from_slice(value),
            })
            .collect();
        let element = create_element(
            &self.dom,
            QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
            attrs,
        );

        if !node.payload.is_empty() {
            self.dom
                .append(&element, NodeOrText::AppendText(StrTendril::from_slice(&node.payload)));
        }
        self.dom.append(&parent, NodeOrText::AppendNode(element));
        Ok(())
    }

    fn to_html(&self) -> Result<String> {
        let mut buffer = Vec::new();

        serialize(
            &mut buffer,
            &SerializableHandle::from(self.dom.document.clone()),
            SerializeOpts::default(),
        )
        .map_err(|e| translation_error!(serialize, e))?;

        String::from_utf8(buffer).map_err(|e| translation_error!(serialize, format!("UTF-8转换失败: {}", e)))
    }

    fn prettify(&self) -> String {
        prettify(&self.dom.document)
    }
}

/// 元素的本地名称，非元素节点返回 `None`
pub(crate) fn element_name(node: &Handle) -> Option<&str> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// 直接子文本节点拼接而成的文本
pub(crate) fn text_content(node: &Handle) -> String {
    node.children
        .borrow()
        .iter()
        .filter_map(|child| match child.data {
            NodeData::Text { ref contents } => Some(contents.borrow().to_string()),
            _ => None,
        })
        .collect()
}

/// 判断文本是否值得发送给翻译能力
pub fn is_translatable_text(text: &str) -> bool {
    !text.is_empty()
        && !text
            .chars()
            .all(|c| c.is_whitespace() || c.is_ascii_punctuation() || c.is_ascii_digit())
}

/// 深度优先、按文档顺序收集满足条件的节点
///
/// 使用显式栈遍历，嵌套再深也不会耗尽调用栈。
fn collect_nodes(root: &Handle, predicate: &dyn Fn(&Handle) -> bool, found: &mut Vec<Handle>) {
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if predicate(&node) {
            found.push(node.clone());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
}

/// 访问可翻译子树中的每个节点，顺序同 [`collect_nodes`]
fn visit_translatable(root: &Handle, visitor: &mut dyn FnMut(&Handle)) {
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        visitor(&node);

        if element_name(&node).is_some_and(|name| SKIPPED_SUBTREES.contains(&name)) {
            continue;
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
}

/// 脚本和样式只有带内联内容时才提取，外链脚本留在原处。
/// SVG/MathML 中同名的元素属于外部命名空间，不提取。
fn is_extractable(node: &Handle, kind: NodeKind) -> bool {
    match kind.tag_name() {
        None => matches!(node.data, NodeData::Comment { .. }),
        Some(tag) => match node.data {
            NodeData::Element { ref name, .. } => {
                name.ns == ns!(html) && &*name.local == tag && !text_content(node).is_empty()
            }
            _ => false,
        },
    }
}

fn snapshot(node: &Handle, kind: NodeKind) -> ExtractedNode {
    match node.data {
        NodeData::Comment { ref contents } => ExtractedNode::new(kind, contents.to_string()),
        NodeData::Element { ref attrs, .. } => ExtractedNode {
            kind,
            payload: text_content(node),
            attributes: attrs
                .borrow()
                .iter()
                .map(|attr| (attribute_name(attr), attr.value.to_string()))
                .collect(),
        },
        _ => ExtractedNode::new(kind, String::new()),
    }
}

/// 保留原文本节点首尾的空白
fn preserve_padding(original: &str, translation: &str) -> String {
    let leading = &original[..original.len() - original.trim_start().len()];
    let trailing = &original[original.trim_end().len()..];
    format!("{}{}{}", leading, translation.trim(), trailing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> RcDocument {
        Html5everParser.parse(html)
    }

    #[test]
    fn test_extracts_scripts_in_document_order() {
        let mut doc = parse(
            "<html><head><script>a=1;</script></head><body><script type=\"module\">b=2;</script></body></html>",
        );

        let scripts = doc.extract(NodeKind::Script);
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].payload, "a=1;");
        assert_eq!(scripts[1].payload, "b=2;");
        assert_eq!(scripts[1].attributes, vec![("type".to_string(), "module".to_string())]);
        assert_eq!(doc.count_elements("script"), 0);
    }

    #[test]
    fn test_external_scripts_stay_in_place() {
        let mut doc = parse("<html><head><script src=\"app.js\"></script></head><body></body></html>");

        assert!(doc.extract(NodeKind::Script).is_empty());
        assert_eq!(doc.count_elements("script"), 1);
    }

    #[test]
    fn test_extracts_comments_everywhere() {
        let mut doc = parse("<!-- top --><html><head><!-- head --></head><body><p>x<!-- <b>inline</b> --></p></body></html>");

        let comments = doc.extract(NodeKind::Comment);
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[2].payload, " <b>inline</b> ");
        assert!(!doc.has_comments());
    }

    #[test]
    fn test_text_segments_skip_code_and_punctuation() {
        let doc = parse(
            "<html><head><title>Home</title><style>p{}</style></head>\
             <body><p> Hello </p><p>Hello</p><p>...</p><p>42</p>\
             <img alt=\"A cat\"><noscript>Enable JS</noscript><script>var s = 'x';</script></body></html>",
        );

        assert_eq!(doc.text_segments(), vec!["Home", "Hello", "A cat"]);
    }

    #[test]
    fn test_apply_translations_preserves_padding() {
        let mut doc = parse("<html><body><p> Hello </p><img alt=\"A cat\"></body></html>");
        let translations = HashMap::from([
            ("Hello".to_string(), "नमस्ते".to_string()),
            ("A cat".to_string(), "एक बिल्ली".to_string()),
        ]);

        assert_eq!(doc.apply_translations(&translations), 2);
        let html = doc.to_html().unwrap();
        assert!(html.contains("<p> नमस्ते </p>"));
        assert!(html.contains("alt=\"एक बिल्ली\""));
    }

    #[test]
    fn test_append_element_is_last_child() {
        let mut doc = parse("<html><head><title>t</title></head><body><p>x</p></body></html>");

        let node = ExtractedNode::new(NodeKind::Stylesheet, ".a{color:red}").with_attribute("media", "print");
        doc.append_element(Container::Head, "style", &node).unwrap();

        let children = doc.child_elements(Container::Head);
        assert_eq!(children.last().unwrap(), &("style".to_string(), ".a{color:red}".to_string()));
        assert!(doc.to_html().unwrap().contains("<style media=\"print\">.a{color:red}</style></head>"));
    }

    #[test]
    fn test_append_element_without_container_fails() {
        let mut doc = parse("<html><head></head><frameset><frame src=\"a.html\"></frameset></html>");

        let node = ExtractedNode::new(NodeKind::Script, "x=1;");
        let err = doc.append_element(Container::Body, "script", &node).unwrap_err();
        assert!(matches!(err, crate::error::TranslationError::Structural { ref container } if container == "body"));
    }

    #[test]
    fn test_foreign_script_and_style_stay_in_svg() {
        let mut doc = parse(
            "<html><head></head><body><svg><style>circle{fill:red}</style>\
             <script>svgInit()</script><circle r=\"1\"></circle></svg></body></html>",
        );

        assert!(doc.extract(NodeKind::Stylesheet).is_empty());
        assert!(doc.extract(NodeKind::Script).is_empty());

        let svg = doc.find_element("svg").unwrap();
        let children: Vec<_> = svg
            .children
            .borrow()
            .iter()
            .filter_map(|child| element_name(child).map(str::to_string))
            .collect();
        assert_eq!(children, vec!["style", "script", "circle"]);
    }

    #[test]
    fn test_deeply_nested_document_is_walked() {
        const DEPTH: usize = 20_000;
        let html = format!(
            "<html><head><style>a{{}}</style></head><body>{}<p title=\"Deep\">Hello</p>{}<!-- end --></body></html>",
            "<div>".repeat(DEPTH),
            "</div>".repeat(DEPTH)
        );
        let mut doc = parse(&html);

        assert_eq!(doc.count_elements("div"), DEPTH);
        assert_eq!(doc.text_segments(), vec!["Deep", "Hello"]);
        assert_eq!(doc.extract(NodeKind::Comment).len(), 1);
        assert_eq!(doc.extract(NodeKind::Stylesheet).len(), 1);

        let translations = HashMap::from([("Hello".to_string(), "नमस्ते".to_string())]);
        assert_eq!(doc.apply_translations(&translations), 1);
        assert!(doc.to_html().unwrap().contains("<p title=\"Deep\">नमस्ते</p>"));
    }

    #[test]
    fn test_is_translatable_text() {
        assert!(is_translatable_text("Hello"));
        assert!(is_translatable_text("I"));
        assert!(!is_translatable_text(""));
        assert!(!is_translatable_text(" - "));
        assert!(!is_translatable_text("2024"));
    }
}
