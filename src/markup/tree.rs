//! 通用节点树
//! 严格树结构：每个节点只属于一个父节点，由父节点独占所有权

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use super::token::TagId;

/// 无需闭合标签的元素
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag_name))
}

/// 默认按原样保留空白与换行的元素
pub const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "code"];

/// 树节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Element(ElementNode),
    Text(String),
    LineBreak,
}

/// 元素节点：标签名 + 属性（保持源顺序） + 有序子节点
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(TreeNode::Text(text.into()))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// 去掉子节点后的壳
    pub fn shell(&self) -> NodeShell {
        NodeShell {
            tag_name: self.tag_name.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl From<ElementNode> for TreeNode {
    fn from(element: ElementNode) -> Self {
        TreeNode::Element(element)
    }
}

/// 节点壳：只有标签名与属性，作为重建时的原型
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeShell {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
}

impl NodeShell {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// 生成一个全新的空元素（不带子节点）
    pub fn fresh_clone(&self) -> ElementNode {
        ElementNode {
            tag_name: self.tag_name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }
}

/// 节点壳提供方：按标签标识返回全新的空元素
pub trait ShellSource {
    fn fresh_node(&self, id: &TagId) -> Option<ElementNode>;
}

impl<S: BuildHasher> ShellSource for HashMap<String, NodeShell, S> {
    fn fresh_node(&self, id: &TagId) -> Option<ElementNode> {
        self.get(id.as_str()).map(NodeShell::fresh_clone)
    }
}

impl ShellSource for BTreeMap<String, NodeShell> {
    fn fresh_node(&self, id: &TagId) -> Option<ElementNode> {
        self.get(id.as_str()).map(NodeShell::fresh_clone)
    }
}

impl<S: BuildHasher> ShellSource for HashMap<TagId, NodeShell, S> {
    fn fresh_node(&self, id: &TagId) -> Option<ElementNode> {
        self.get(id).map(NodeShell::fresh_clone)
    }
}

impl<T: ShellSource + ?Sized> ShellSource for &T {
    fn fresh_node(&self, id: &TagId) -> Option<ElementNode> {
        (**self).fresh_node(id)
    }
}

/// 根容器
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<TreeNode>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, child: impl Into<TreeNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// 纯文本内容，换行节点输出为 `\n`
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// 渲染为 HTML（转义文本与属性值）
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        render_nodes(&self.children, &mut out);
        out
    }

    /// 元素总数（先序遍历）
    pub fn element_count(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    TreeNode::Element(el) => 1 + count(&el.children),
                    _ => 0,
                })
                .sum()
        }
        count(&self.children)
    }
}

fn collect_text(nodes: &[TreeNode], out: &mut String) {
    for node in nodes {
        match node {
            TreeNode::Element(el) => collect_text(&el.children, out),
            TreeNode::Text(text) => out.push_str(text),
            TreeNode::LineBreak => out.push('\n'),
        }
    }
}

fn render_nodes(nodes: &[TreeNode], out: &mut String) {
    for node in nodes {
        match node {
            TreeNode::Element(el) => render_element(el, out),
            TreeNode::Text(text) => escape_into(text, false, out),
            TreeNode::LineBreak => out.push_str("<br>"),
        }
    }
}

fn render_element(el: &ElementNode, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag_name);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    if el.children.is_empty() && is_void_element(&el.tag_name) {
        return;
    }
    render_nodes(&el.children, out);
    out.push_str("</");
    out.push_str(&el.tag_name);
    out.push('>');
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clone_has_no_children() {
        let shell = NodeShell::new("a").with_attribute("href", "/x");
        let mut node = shell.fresh_clone();
        node.children.push(TreeNode::Text("x".to_string()));

        let again = shell.fresh_clone();
        assert!(again.children.is_empty());
        assert_eq!(again.attribute("href"), Some("/x"));
    }

    #[test]
    fn test_to_html_escapes() {
        let fragment = Fragment::new()
            .with_child(
                ElementNode::new("a")
                    .with_attribute("title", "say \"hi\" & <go>")
                    .with_text("1 < 2 & 3"),
            )
            .with_child(TreeNode::LineBreak)
            .with_child(ElementNode::new("img").with_attribute("src", "x.png"));

        assert_eq!(
            fragment.to_html(),
            "<a title=\"say &quot;hi&quot; &amp; &lt;go&gt;\">1 &lt; 2 &amp; 3</a><br><img src=\"x.png\">"
        );
    }

    #[test]
    fn test_text_content_and_count() {
        let fragment = Fragment::new().with_child(
            ElementNode::new("p")
                .with_text("a")
                .with_child(TreeNode::LineBreak)
                .with_child(ElementNode::new("b").with_text("b").into()),
        );
        assert_eq!(fragment.text_content(), "a\nb");
        assert_eq!(fragment.element_count(), 2);
    }

    #[test]
    fn test_shell_source_maps() {
        let mut by_literal = HashMap::new();
        by_literal.insert("t0".to_string(), NodeShell::new("div"));
        assert_eq!(by_literal.fresh_node(&TagId::new(0)).map(|n| n.tag_name), Some("div".to_string()));
        assert!(by_literal.fresh_node(&TagId::new(1)).is_none());

        let mut by_id = HashMap::new();
        by_id.insert(TagId::new(2), NodeShell::new("span"));
        assert!((&by_id).fresh_node(&TagId::new(2)).is_some());
    }
}
