//! 文档模型
//!
//! 结构化解析器是外部能力，流水线只通过 [`StructuralParser`] 和
//! [`DocumentTree`] 两个接口使用它。文档树的生命周期只限于一个阶段：
//! 每个阶段都从文本重新解析，阶段之间只传递文本和 [`ExtractedNodeBundle`]。

use std::collections::HashMap;

use crate::error::Result;

/// 被提取节点的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Comment,
    Script,
    Stylesheet,
}

impl NodeKind {
    /// 对应的元素标签名，注释没有标签
    pub fn tag_name(self) -> Option<&'static str> {
        match self {
            NodeKind::Comment => None,
            NodeKind::Script => Some("script"),
            NodeKind::Stylesheet => Some("style"),
        }
    }
}

/// 从文档中移除的节点副本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedNode {
    pub kind: NodeKind,
    /// 文本内容 (脚本代码、样式表或注释文本)
    pub payload: String,
    /// 原元素上的属性，按原顺序保存
    pub attributes: Vec<(String, String)>,
}

impl ExtractedNode {
    pub fn new(kind: NodeKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// 预处理阶段的提取结果，供同一文件的后处理阶段使用
///
/// 注释会被提取，但不会被重新插入，这里只记录数量。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedNodeBundle {
    pub scripts: Vec<ExtractedNode>,
    pub stylesheets: Vec<ExtractedNode>,
    pub comments_removed: usize,
}

/// 重新插入节点的目标容器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Head,
    Body,
}

impl Container {
    pub fn tag_name(self) -> &'static str {
        match self {
            Container::Head => "head",
            Container::Body => "body",
        }
    }
}

/// 结构化解析器：文本 -> 可变文档树
pub trait StructuralParser {
    type Tree: DocumentTree;

    fn parse(&self, text: &str) -> Self::Tree;
}

/// 可变文档树
pub trait DocumentTree {
    /// 按文档顺序移除所有 `kind` 类型的节点并返回其副本
    fn extract(&mut self, kind: NodeKind) -> Vec<ExtractedNode>;

    /// 收集可翻译的文本片段 (已去除首尾空白，去重，按文档顺序)
    fn text_segments(&self) -> Vec<String>;

    /// 用译文替换文本片段，返回替换次数
    fn apply_translations(&mut self, translations: &HashMap<String, String>) -> usize;

    /// 新建 `tag` 元素并追加为 `container` 的最后一个子节点
    fn append_element(&mut self, container: Container, tag: &str, node: &ExtractedNode) -> Result<()>;

    /// 序列化为紧凑的HTML文本
    fn to_html(&self) -> Result<String>;

    /// 序列化为带缩进的HTML文本
    fn prettify(&self) -> String;
}
