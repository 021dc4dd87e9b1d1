//! 树重建器
//! 以显式栈维护当前插入点：根容器单独持有，栈内为尚未闭合的元素。
//! 任何畸形输入都只产生警告，返回尽力而为的部分树。
//! 文本中转义过的 `&lt;tN>` 还原为字面标记

use std::fmt;

use serde::Serialize;

use super::token::{TagId, TagToken};
use super::tokenizer::TagTokenizer;
use super::tree::{ElementNode, Fragment, PREFORMATTED_ELEMENTS, ShellSource, TreeNode};
use crate::config::GlobalConfig;

/// 重建警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconstructWarning {
    /// 开标签引用了不存在的节点壳
    UnknownTagReference { tag: TagId },
    /// 只剩根容器时遇到闭标签
    UnmatchedCloseTag { tag: TagId },
    /// 记号结束时仍有未闭合元素
    UnbalancedTagsAtEnd { open: usize },
}

impl ReconstructWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            ReconstructWarning::UnknownTagReference { .. } => "unknown_tag_reference",
            ReconstructWarning::UnmatchedCloseTag { .. } => "unmatched_close_tag",
            ReconstructWarning::UnbalancedTagsAtEnd { .. } => "unbalanced_tags_at_end",
        }
    }
}

impl fmt::Display for ReconstructWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructWarning::UnknownTagReference { tag } => {
                write!(f, "未知标签引用 <{}>，已跳过", tag)
            }
            ReconstructWarning::UnmatchedCloseTag { tag } => {
                write!(f, "多余的闭合标签 </{}>，已忽略", tag)
            }
            ReconstructWarning::UnbalancedTagsAtEnd { open } => {
                write!(f, "结束时仍有{}个未闭合标签，返回部分结果", open)
            }
        }
    }
}

/// 重建结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconstruction {
    pub root: Fragment,
    pub warnings: Vec<ReconstructWarning>,
}

/// 树重建器
#[derive(Debug, Clone)]
pub struct TreeReconstructor {
    // 保留原样输出文本的标签名（大小写不敏感）
    preformatted_tags: Vec<String>,
}

impl Default for TreeReconstructor {
    fn default() -> Self {
        Self {
            preformatted_tags: PREFORMATTED_ELEMENTS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TreeReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preformatted_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preformatted_tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::with_preformatted_tags(config.preformatted_tags.iter().cloned())
    }

    pub fn is_preformatted(&self, tag_name: &str) -> bool {
        self.preformatted_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag_name))
    }

    /// 分词并重建
    pub fn reconstruct_tagged<S: ShellSource + ?Sized>(&self, tagged_text: &str, shells: &S) -> Reconstruction {
        self.reconstruct(TagTokenizer::tokenize(tagged_text), shells)
    }

    pub fn reconstruct<I, S>(&self, tokens: I, shells: &S) -> Reconstruction
    where
        I: IntoIterator<Item = TagToken>,
        S: ShellSource + ?Sized,
    {
        let mut state = BuildState::default();

        for token in tokens {
            match token {
                TagToken::Open(id) => match shells.fresh_node(&id) {
                    Some(node) => state.open.push(node),
                    None => state
                        .warnings
                        .push(ReconstructWarning::UnknownTagReference { tag: id }),
                },
                TagToken::Close(id) => {
                    if !state.close_top() {
                        state
                            .warnings
                            .push(ReconstructWarning::UnmatchedCloseTag { tag: id });
                    }
                }
                TagToken::Text(content) => self.insert_text(&mut state, content),
            }
        }

        state.finish()
    }

    fn insert_text(&self, state: &mut BuildState, content: String) {
        let content = TagTokenizer::unescape_text(&content).into_owned();
        let preformatted = state
            .open
            .last()
            .is_some_and(|top| self.is_preformatted(&top.tag_name));
        let children = state.current_children();

        if preformatted {
            children.push(TreeNode::Text(content));
            return;
        }

        for (i, segment) in content.split('\n').enumerate() {
            if i > 0 {
                children.push(TreeNode::LineBreak);
            }
            if !segment.is_empty() {
                children.push(TreeNode::Text(segment.to_string()));
            }
        }
    }
}

#[derive(Default)]
struct BuildState {
    root: Fragment,
    open: Vec<ElementNode>,
    warnings: Vec<ReconstructWarning>,
}

impl BuildState {
    // 当前插入点
    fn current_children(&mut self) -> &mut Vec<TreeNode> {
        match self.open.last_mut() {
            Some(top) => &mut top.children,
            None => &mut self.root.children,
        }
    }

    // 弹出栈顶并挂到新的栈顶；栈中只剩根容器时返回 false
    fn close_top(&mut self) -> bool {
        match self.open.pop() {
            Some(node) => {
                self.current_children().push(TreeNode::Element(node));
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> Reconstruction {
        if !self.open.is_empty() {
            self.warnings.push(ReconstructWarning::UnbalancedTagsAtEnd {
                open: self.open.len(),
            });
            while self.close_top() {}
        }
        Reconstruction {
            root: self.root,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::markup::tree::NodeShell;

    fn shells(entries: &[(&str, NodeShell)]) -> HashMap<String, NodeShell> {
        entries
            .iter()
            .map(|(id, shell)| (id.to_string(), shell.clone()))
            .collect()
    }

    fn text(s: &str) -> TreeNode {
        TreeNode::Text(s.to_string())
    }

    #[test]
    fn test_nested_elements() {
        let map = shells(&[("t0", NodeShell::new("div")), ("t1", NodeShell::new("b"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>Hello <t1>World</t1></t0>", &map);

        let expected = Fragment::new().with_child(
            ElementNode::new("div")
                .with_text("Hello ")
                .with_child(ElementNode::new("b").with_text("World").into()),
        );
        assert_eq!(result.root, expected);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_preformatted_text_is_verbatim() {
        let map = shells(&[("t0", NodeShell::new("PRE"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>line1\nline2</t0>", &map);

        let expected = Fragment::new().with_child(ElementNode::new("PRE").with_text("line1\nline2"));
        assert_eq!(result.root, expected);
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        let map = shells(&[("t0", NodeShell::new("p"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>a\nb\n\nc\n</t0>", &map);

        let TreeNode::Element(p) = &result.root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(p.children, vec![
            text("a"),
            TreeNode::LineBreak,
            text("b"),
            TreeNode::LineBreak,
            TreeNode::LineBreak,
            text("c"),
            TreeNode::LineBreak,
        ]);
    }

    #[test]
    fn test_custom_preformatted_tags() {
        let map = shells(&[("t0", NodeShell::new("textarea")), ("t1", NodeShell::new("pre"))]);
        let reconstructor = TreeReconstructor::with_preformatted_tags(["textarea"]);
        let result = reconstructor.reconstruct_tagged("<t0>a\nb</t0><t1>c\nd</t1>", &map);

        assert_eq!(result.root.children[0], TreeNode::from(ElementNode::new("textarea").with_text("a\nb")));
        assert_eq!(
            result.root.children[1],
            TreeNode::from(
                ElementNode::new("pre")
                    .with_text("c")
                    .with_child(TreeNode::LineBreak)
                    .with_text("d")
            )
        );
    }

    #[test]
    fn test_mismatched_close_at_root_is_ignored() {
        let map = shells(&[("t0", NodeShell::new("div"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>A</t1>", &map);

        // </t1> 结构性地闭合了 t0
        assert_eq!(result.root, Fragment::new().with_child(ElementNode::new("div").with_text("A")));
        assert!(result.warnings.is_empty());

        let result = TreeReconstructor::new().reconstruct_tagged("<t0>A</t0></t1>B", &map);
        assert_eq!(result.warnings, vec![ReconstructWarning::UnmatchedCloseTag { tag: TagId::new(1) }]);
        assert_eq!(result.root.children[1], text("B"));
    }

    #[test]
    fn test_unknown_tag_is_skipped_at_same_depth() {
        let map = shells(&[("t0", NodeShell::new("div"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>a<t9>b</t0>c", &map);

        assert_eq!(result.warnings, vec![ReconstructWarning::UnknownTagReference { tag: TagId::new(9) }]);
        // <t9> 未入栈，</t0> 闭合 div 后 c 落在根容器
        assert_eq!(
            result.root,
            Fragment::new()
                .with_child(ElementNode::new("div").with_text("a").with_text("b"))
                .with_child(text("c"))
        );
    }

    #[test]
    fn test_unbalanced_returns_partial_tree() {
        let map = shells(&[("t0", NodeShell::new("div")), ("t1", NodeShell::new("span"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>a<t1>b", &map);

        assert_eq!(result.warnings, vec![ReconstructWarning::UnbalancedTagsAtEnd { open: 2 }]);
        assert_eq!(
            result.root,
            Fragment::new().with_child(
                ElementNode::new("div")
                    .with_text("a")
                    .with_child(ElementNode::new("span").with_text("b").into())
            )
        );
    }

    #[test]
    fn test_shells_are_cloned_per_reference() {
        let map = shells(&[("t0", NodeShell::new("i").with_attribute("class", "x"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>a</t0><t0>b</t0>", &map);

        assert_eq!(result.root.children.len(), 2);
        assert_eq!(
            result.root.children[1],
            TreeNode::from(ElementNode::new("i").with_attribute("class", "x").with_text("b"))
        );
    }

    #[test]
    fn test_escaped_marker_text_is_restored() {
        let map = shells(&[("t0", NodeShell::new("p"))]);
        let result = TreeReconstructor::new().reconstruct_tagged("<t0>use &lt;t0> here</t0>", &map);

        assert!(result.warnings.is_empty());
        assert_eq!(result.root, Fragment::new().with_child(ElementNode::new("p").with_text("use <t0> here")));
    }

    proptest! {
        #[test]
        fn prop_reconstruct_is_pure(tagged in "(<t[0-3]>|</t[0-3]>|&lt;t[0-3]>|[a-z \n]{0,3}){0,12}") {
            let entries = [
                ("t0", NodeShell::new("div").with_attribute("class", "c")),
                ("t1", NodeShell::new("pre")),
                ("t2", NodeShell::new("b")),
            ];
            let map = shells(&entries);
            let reconstructor = TreeReconstructor::new();

            let first = reconstructor.reconstruct_tagged(&tagged, &map);
            let second = reconstructor.reconstruct_tagged(&tagged, &map);
            prop_assert_eq!(first, second);
            // 节点壳映射不被修改
            prop_assert_eq!(map, shells(&entries));
        }
    }
}
