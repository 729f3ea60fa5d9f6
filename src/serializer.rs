//! 带缩进的HTML序列化
//!
//! 每个元素独占一行，子节点按深度缩进；文本节点去除首尾空白后独占一行。
//! 脚本、样式等原始文本元素和 `pre`/`textarea` 的内容保持原样，与标签写在同一行。

use html5ever::interface::Attribute;
use markup5ever_rcdom::{Handle, NodeData};

use crate::api_constants::document_config::INDENT;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// 序列化步骤：进入节点时写开始标签，离开时写结束标签
enum Op {
    Open(Handle, usize),
    Close(String, usize),
}

/// 将文档序列化为带缩进的HTML
///
/// 文档类型节点不会输出，最终文本的文档类型声明由后处理统一添加。
/// 遍历使用显式栈，嵌套层数不受调用栈限制。
pub fn prettify(document: &Handle) -> String {
    let mut out = String::new();
    let mut ops: Vec<Op> = document
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| Op::Open(child.clone(), 0))
        .collect();

    while let Some(op) = ops.pop() {
        let (node, depth) = match op {
            Op::Open(node, depth) => (node, depth),
            Op::Close(tag, depth) => {
                out.push_str(&format!("{}</{}>\n", INDENT.repeat(depth), tag));
                continue;
            }
        };
        let indent = INDENT.repeat(depth);

        match node.data {
            NodeData::Document => {
                ops.extend(node.children.borrow().iter().rev().map(|child| Op::Open(child.clone(), depth)));
            }
            NodeData::Doctype { .. } => {}
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push_str(&indent);
                    out.push_str(&escape_text(trimmed));
                    out.push('\n');
                }
            }
            NodeData::Comment { ref contents } => {
                out.push_str(&format!("{}<!--{}-->\n", indent, contents));
            }
            NodeData::ProcessingInstruction { ref target, ref contents } => {
                out.push_str(&format!("{}<?{} {}>\n", indent, target, contents));
            }
            NodeData::Element {
                ref name,
                ref attrs,
                ref template_contents,
                ..
            } => {
                let tag = &*name.local;
                out.push_str(&indent);
                out.push_str(&open_tag(tag, &attrs.borrow()));

                if VOID_ELEMENTS.contains(&tag) {
                    out.push('\n');
                    continue;
                }

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    for child in node.children.borrow().iter() {
                        if let NodeData::Text { ref contents } = child.data {
                            out.push_str(&contents.borrow());
                        }
                    }
                    out.push_str(&format!("</{}>\n", tag));
                    continue;
                }

                if PREFORMATTED_ELEMENTS.contains(&tag) {
                    let inner = write_inline(&node);
                    // 解析器会吞掉 <pre> 后的第一个换行
                    if inner.starts_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&inner);
                    out.push_str(&format!("</{}>\n", tag));
                    continue;
                }

                out.push('\n');
                ops.push(Op::Close(tag.to_string(), depth));
                let content = template_contents.borrow().clone().unwrap_or_else(|| node.clone());
                ops.extend(
                    content
                        .children
                        .borrow()
                        .iter()
                        .rev()
                        .map(|child| Op::Open(child.clone(), depth + 1)),
                );
            }
        }
    }
    out
}

/// 不加缩进和换行的紧凑序列化，用于空白敏感的元素内部，只输出 `parent` 的子节点
fn write_inline(parent: &Handle) -> String {
    let mut out = String::new();
    let mut ops: Vec<Op> = parent
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| Op::Open(child.clone(), 0))
        .collect();

    while let Some(op) = ops.pop() {
        let node = match op {
            Op::Open(node, _) => node,
            Op::Close(tag, _) => {
                out.push_str(&format!("</{}>", tag));
                continue;
            }
        };

        match node.data {
            NodeData::Text { ref contents } => out.push_str(&escape_text(&contents.borrow())),
            NodeData::Comment { ref contents } => out.push_str(&format!("<!--{}-->", contents)),
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag = &*name.local;
                out.push_str(&open_tag(tag, &attrs.borrow()));
                if VOID_ELEMENTS.contains(&tag) {
                    continue;
                }
                ops.push(Op::Close(tag.to_string(), 0));
                ops.extend(node.children.borrow().iter().rev().map(|child| Op::Open(child.clone(), 0)));
            }
            _ => {}
        }
    }
    out
}

fn open_tag(tag: &str, attrs: &[Attribute]) -> String {
    let mut open = format!("<{}", tag);
    for attr in attrs {
        open.push_str(&format!(" {}=\"{}\"", attribute_name(attr), escape_attribute(&attr.value)));
    }
    open.push('>');
    open
}

/// 带命名空间前缀的属性名
pub(crate) fn attribute_name(attr: &Attribute) -> String {
    let local = &*attr.name.local;
    match &*attr.name.ns {
        "http://www.w3.org/XML/1998/namespace" => format!("xml:{}", local),
        "http://www.w3.org/1999/xlink" => format!("xlink:{}", local),
        "http://www.w3.org/2000/xmlns/" if local == "xmlns" => local.to_string(),
        "http://www.w3.org/2000/xmlns/" => format!("xmlns:{}", local),
        _ => local.to_string(),
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StructuralParser;
    use crate::html_processor::Html5everParser;

    fn pretty(html: &str) -> String {
        let doc = Html5everParser.parse(html);
        prettify(&doc.dom().document)
    }

    #[test]
    fn test_indents_nested_elements() {
        let output = pretty("<html><head></head><body><p>Hello</p></body></html>");
        assert_eq!(
            output,
            "<html>\n <head>\n </head>\n <body>\n  <p>\n   Hello\n  </p>\n </body>\n</html>\n"
        );
    }

    #[test]
    fn test_raw_text_stays_on_one_line() {
        let output = pretty("<html><head><style>.a{color:red}</style></head><body><script>if (a && b < c) {}</script></body></html>");
        assert!(output.contains("  <style>.a{color:red}</style>\n"));
        assert!(output.contains("  <script>if (a && b < c) {}</script>\n"));
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let output = pretty("<html><body><a title=\"&quot;x&quot; &amp; y\">a &lt; b</a><br></body></html>");
        assert!(output.contains("<a title=\"&quot;x&quot; &amp; y\">"));
        assert!(output.contains("a &lt; b"));
        assert!(output.contains("<br>\n"));
        assert!(!output.contains("</br>"));
    }

    #[test]
    fn test_preformatted_content_is_kept() {
        let output = pretty("<html><body><pre>  line 1\n  <b>line</b> 2</pre></body></html>");
        assert!(output.contains("<pre>  line 1\n  <b>line</b> 2</pre>\n"));
    }

    #[test]
    fn test_template_contents_are_written() {
        let output = pretty("<html><body><template><p>x</p></template></body></html>");
        assert!(output.contains("  <template>\n   <p>\n    x\n   </p>\n  </template>\n"));
    }

    #[test]
    fn test_deep_nesting_does_not_exhaust_the_stack() {
        const DEPTH: usize = 5_000;
        let html = format!(
            "<html><body>{}<span>Hello</span><pre>{}x{}</pre>{}</body></html>",
            "<div>".repeat(DEPTH),
            "<span>".repeat(DEPTH),
            "</span>".repeat(DEPTH),
            "</div>".repeat(DEPTH)
        );

        let output = pretty(&html);

        assert_eq!(output.matches("<div>").count(), DEPTH);
        assert_eq!(output.matches("</div>").count(), DEPTH);
        let hello = format!("{}Hello\n", INDENT.repeat(DEPTH + 3));
        assert!(output.contains(&hello));
        let pre = format!("<pre>{}x{}</pre>", "<span>".repeat(DEPTH), "</span>".repeat(DEPTH));
        assert!(output.contains(&pre));
        assert!(output.ends_with(" </body>\n</html>\n"));
    }

    #[test]
    fn test_doctype_is_not_written() {
        let output = pretty("<!doctype html><html><head></head><body></body></html>");
        assert!(output.starts_with("<html>"));
        assert!(!output.to_lowercase().contains("<!doctype"));
    }
}
