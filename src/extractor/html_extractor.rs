//! HTML片段提取器
//! 基于html5ever分词器将HTML片段转换为通用节点树：
//! 开标签入栈，闭标签闭合最近的同名元素，<br> 转为换行节点，script/style 内容与注释丢弃；
//! 预格式化元素之外的连续空白折叠为单个空格，源码缩进与换行不会变成换行节点

use std::cell::RefCell;
use std::mem;

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use markup5ever::interface::Attribute;
use once_cell::sync::Lazy;
use regex::Regex;
use tendril::StrTendril;
use tracing::debug;

use crate::markup::tree::{PREFORMATTED_ELEMENTS, is_void_element};
use crate::markup::{ElementNode, Fragment, TreeNode};

// HTML空白字符：空格、制表、换行、回车、换页
static HTML_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").unwrap());

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// 创建新的提取器
    pub fn new() -> Self {
        Self
    }

    /// 从HTML字符串提取节点树
    pub fn extract(&self, html: &str) -> Fragment {
        let tokenizer = Tokenizer::new(FragmentSink::default(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let fragment = tokenizer.sink.into_fragment();
        debug!("HTML提取完成：{}个元素", fragment.element_count());
        fragment
    }
}

#[derive(Default)]
struct FragmentState {
    root: Fragment,
    open: Vec<ElementNode>,
    // 相邻字符记号合并后再写入
    pending_text: String,
    // 正在跳过内容的 script/style 标签名
    skipping: Option<String>,
}

#[derive(Default)]
struct FragmentSink {
    state: RefCell<FragmentState>,
}

impl TokenSink for FragmentSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        match token {
            Token::TagToken(tag) => return state.handle_tag(tag),
            Token::CharacterTokens(text) => {
                if state.skipping.is_none() {
                    state.pending_text.push_str(&text);
                }
            }
            // 注释、DOCTYPE、空字符、解析错误一律忽略
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl FragmentSink {
    fn into_fragment(self) -> Fragment {
        let mut state = self.state.into_inner();
        state.flush_text();
        while state.close_top() {}
        state.root
    }
}

impl FragmentState {
    fn handle_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let Tag {
            kind,
            name,
            self_closing,
            attrs,
            ..
        } = tag;
        let name = name.to_string().to_ascii_lowercase();

        if let Some(skipping) = &self.skipping {
            if kind == TagKind::EndTag && *skipping == name {
                self.skipping = None;
            }
            return TokenSinkResult::Continue;
        }

        match kind {
            TagKind::StartTag => match name.as_str() {
                "script" | "style" if !self_closing => {
                    let raw = if name == "script" {
                        RawKind::ScriptData
                    } else {
                        RawKind::Rawtext
                    };
                    self.skipping = Some(name);
                    return TokenSinkResult::RawData(raw);
                }
                "script" | "style" => {}
                "br" => {
                    self.flush_text();
                    self.children().push(TreeNode::LineBreak);
                }
                _ => {
                    self.flush_text();
                    let element = ElementNode {
                        tag_name: name,
                        attributes: convert_attributes(&attrs),
                        children: Vec::new(),
                    };
                    if self_closing || is_void_element(&element.tag_name) {
                        self.children().push(TreeNode::Element(element));
                    } else {
                        self.open.push(element);
                    }
                }
            },
            TagKind::EndTag => {
                // 闭合最近的同名元素，途经的未闭合元素一并闭合；找不到则忽略
                if let Some(pos) = self.open.iter().rposition(|el| el.tag_name == name) {
                    self.flush_text();
                    while self.open.len() > pos {
                        self.close_top();
                    }
                }
            }
        }
        TokenSinkResult::Continue
    }

    fn children(&mut self) -> &mut Vec<TreeNode> {
        match self.open.last_mut() {
            Some(top) => &mut top.children,
            None => &mut self.root.children,
        }
    }

    fn close_top(&mut self) -> bool {
        match self.open.pop() {
            Some(node) => {
                self.children().push(TreeNode::Element(node));
                true
            }
            None => false,
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let mut text = mem::take(&mut self.pending_text);
        if !self.in_preformatted() {
            text = HTML_WHITESPACE.replace_all(&text, " ").into_owned();
        }
        self.children().push(TreeNode::Text(text));
    }

    fn in_preformatted(&self) -> bool {
        self.open
            .iter()
            .any(|el| PREFORMATTED_ELEMENTS.contains(&el.tag_name.as_str()))
    }
}

/// 属性按源顺序转换
fn convert_attributes(attrs: &[Attribute]) -> Vec<(String, String)> {
    attrs
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}
