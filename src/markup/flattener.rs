//! 标签扁平化：重建的逆过程
//! 先序编号 t0, t1, ...；元素写成 `<tN>…</tN>` 并记录节点壳，换行节点输出为 `\n`，
//! 文本中形如标记的内容经 `TagTokenizer::escape_text` 转义

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::token::TagId;
use super::tokenizer::TagTokenizer;
use super::tree::{Fragment, NodeShell, TreeNode};

/// 扁平化结果：带标签文本 + 以 "tN" 为键的节点壳
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlattenedFragment {
    pub tagged_text: String,
    pub shells: BTreeMap<String, NodeShell>,
}

pub struct TagFlattener;

impl TagFlattener {
    pub fn flatten(fragment: &Fragment) -> FlattenedFragment {
        let mut out = FlattenedFragment::default();
        let mut next_id = 0;
        Self::flatten_nodes(&fragment.children, &mut out, &mut next_id);
        out
    }

    fn flatten_nodes(nodes: &[TreeNode], out: &mut FlattenedFragment, next_id: &mut u64) {
        // 相邻文本合并后再转义，避免拼接处形成标记
        let mut pending = String::new();
        for node in nodes {
            match node {
                TreeNode::Element(el) => {
                    Self::flush_text(&mut pending, out);
                    let id = TagId::new(*next_id);
                    *next_id += 1;

                    out.tagged_text.push('<');
                    out.tagged_text.push_str(id.as_str());
                    out.tagged_text.push('>');
                    Self::flatten_nodes(&el.children, out, next_id);
                    out.tagged_text.push_str("</");
                    out.tagged_text.push_str(id.as_str());
                    out.tagged_text.push('>');

                    out.shells.insert(id.to_string(), el.shell());
                }
                TreeNode::Text(text) => pending.push_str(text),
                TreeNode::LineBreak => pending.push('\n'),
            }
        }
        Self::flush_text(&mut pending, out);
    }

    fn flush_text(pending: &mut String, out: &mut FlattenedFragment) {
        if !pending.is_empty() {
            out.tagged_text.push_str(&TagTokenizer::escape_text(pending));
            pending.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::markup::reconstructor::TreeReconstructor;
    use crate::markup::tree::ElementNode;

    #[test]
    fn test_flatten_preorder_numbering() {
        let fragment = Fragment::new()
            .with_child(
                ElementNode::new("div")
                    .with_attribute("class", "card")
                    .with_text("Hello ")
                    .with_child(ElementNode::new("b").with_text("World").into()),
            )
            .with_child(TreeNode::LineBreak)
            .with_child(ElementNode::new("a").with_attribute("href", "/"));

        let flat = TagFlattener::flatten(&fragment);
        assert_eq!(flat.tagged_text, "<t0>Hello <t1>World</t1></t0>\n<t2></t2>");
        assert_eq!(flat.shells.len(), 3);
        assert_eq!(flat.shells["t0"], NodeShell::new("div").with_attribute("class", "card"));
        assert_eq!(flat.shells["t1"], NodeShell::new("b"));
        assert_eq!(flat.shells["t2"], NodeShell::new("a").with_attribute("href", "/"));
    }

    #[test]
    fn test_marker_like_text_is_escaped() {
        let fragment = Fragment::new().with_child(ElementNode::new("p").with_text("use <t0> here"));
        let flat = TagFlattener::flatten(&fragment);
        assert_eq!(flat.tagged_text, "<t0>use &lt;t0> here</t0>");

        let result = TreeReconstructor::new().reconstruct_tagged(&flat.tagged_text, &flat.shells);
        assert!(result.warnings.is_empty());
        assert_eq!(result.root, fragment);
        assert_eq!(result.root.to_html(), "<p>use &lt;t0&gt; here</p>");
    }

    #[test]
    fn test_adjacent_text_nodes_cannot_form_marker() {
        let fragment = Fragment::new()
            .with_child(ElementNode::new("b").with_text("<").with_text("t0>"));
        let flat = TagFlattener::flatten(&fragment);
        assert_eq!(flat.tagged_text, "<t0>&lt;t0></t0>");
    }

    // 合并相邻文本节点，使生成的树满足可逆前提
    fn merge_text(nodes: Vec<TreeNode>) -> Vec<TreeNode> {
        let mut merged: Vec<TreeNode> = Vec::new();
        for node in nodes {
            if let (TreeNode::Text(next), Some(TreeNode::Text(prev))) = (&node, merged.last_mut()) {
                prev.push_str(next);
                continue;
            }
            merged.push(node);
        }
        merged
    }

    fn arb_node() -> impl Strategy<Value = TreeNode> {
        let leaf = prop_oneof![
            "([a-z ]|<t[0-9]>|</t1>|&lt;t2>){1,4}".prop_map(TreeNode::Text),
            Just(TreeNode::LineBreak),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            (
                prop::sample::select(vec!["div", "span", "b", "p"]),
                prop::collection::vec(("[a-z]{1,4}", "[a-z ]{0,6}"), 0..2),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(tag, attributes, children)| {
                    TreeNode::Element(ElementNode {
                        tag_name: tag.to_string(),
                        attributes,
                        children: merge_text(children),
                    })
                })
        })
    }

    fn arb_fragment() -> impl Strategy<Value = Fragment> {
        prop::collection::vec(arb_node(), 0..5).prop_map(|children| Fragment {
            children: merge_text(children),
        })
    }

    proptest! {
        #[test]
        fn prop_flatten_then_reconstruct_round_trips(fragment in arb_fragment()) {
            let flat = TagFlattener::flatten(&fragment);
            let result = TreeReconstructor::new().reconstruct_tagged(&flat.tagged_text, &flat.shells);
            prop_assert!(result.warnings.is_empty());
            prop_assert_eq!(result.root, fragment);
        }

        #[test]
        fn prop_malformed_input_never_panics(tagged in "(<t[0-3]>|</t[0-3]>|[a-z\n]{0,3}){0,12}") {
            let mut shells = BTreeMap::new();
            shells.insert("t0".to_string(), NodeShell::new("div"));
            shells.insert("t1".to_string(), NodeShell::new("pre"));

            let result = TreeReconstructor::new().reconstruct_tagged(&tagged, &shells);
            // 畸形输入下文本内容仍按原顺序完整保留
            let stripped: String = crate::markup::TagTokenizer::tokenize(&tagged)
                .into_iter()
                .filter_map(|t| match t {
                    crate::markup::TagToken::Text(s) => Some(s),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(result.root.text_content(), stripped);
        }
    }
}
