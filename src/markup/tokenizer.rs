//! 带标签文本分词器
//! 只识别 `<tN>` / `</tN>`，其余内容均视为文本；不检查配对。
//! 文本中形如标记的字面内容写作 `&lt;tN>`，已是该形式的字面内容再多加一层 `amp;`

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::token::{TagId, TagToken};

static TAG_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(/?)t([0-9]+)>").unwrap());

// `<` 或 `&(amp;)*lt;` 后接标记主体
static MARKER_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<|&(?:amp;)*lt;)(/?t[0-9]+>)").unwrap());

static ESCAPED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&((?:amp;)*)lt;(/?t[0-9]+>)").unwrap());

pub struct TagTokenizer;

impl TagTokenizer {
    pub fn tokenize(tagged_text: &str) -> Vec<TagToken> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        for caps in TAG_MARKER.captures_iter(tagged_text) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            Self::push_text(&mut tokens, &tagged_text[pos..whole.start()]);

            let id = TagId::from_digits(digits.as_str());
            let is_close = caps.get(1).is_some_and(|slash| !slash.as_str().is_empty());
            tokens.push(if is_close { TagToken::Close(id) } else { TagToken::Open(id) });
            pos = whole.end();
        }
        Self::push_text(&mut tokens, &tagged_text[pos..]);

        tokens
    }

    /// 转义文本中形如标记的内容，使其不会被分词为标签
    pub fn escape_text(text: &str) -> Cow<'_, str> {
        MARKER_LIKE.replace_all(text, |caps: &Captures| {
            let prefix = &caps[1];
            if prefix == "<" {
                format!("&lt;{}", &caps[2])
            } else {
                format!("&amp;{}{}", &prefix[1..], &caps[2])
            }
        })
    }

    /// `escape_text` 的逆操作
    pub fn unescape_text(text: &str) -> Cow<'_, str> {
        ESCAPED_MARKER.replace_all(text, |caps: &Captures| {
            let amps = &caps[1];
            if amps.is_empty() {
                format!("<{}", &caps[2])
            } else {
                format!("&{}lt;{}", &amps[4..], &caps[2])
            }
        })
    }

    // 空文本段直接丢弃
    fn push_text(tokens: &mut Vec<TagToken>, text: &str) {
        if !text.is_empty() {
            tokens.push(TagToken::Text(text.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(n: u64) -> TagToken {
        TagToken::Open(TagId::new(n))
    }

    fn close(n: u64) -> TagToken {
        TagToken::Close(TagId::new(n))
    }

    fn text(s: &str) -> TagToken {
        TagToken::Text(s.to_string())
    }

    #[test]
    fn test_tokenize_nested() {
        let tokens = TagTokenizer::tokenize("<t0>Hello <t1>World</t1></t0>");
        assert_eq!(tokens, vec![open(0), text("Hello "), open(1), text("World"), close(1), close(0)]);
    }

    #[test]
    fn test_tokenize_drops_empty_text_runs() {
        assert_eq!(TagTokenizer::tokenize("<t0></t0>"), vec![open(0), close(0)]);
        assert!(TagTokenizer::tokenize("").is_empty());
    }

    #[test]
    fn test_non_tag_markup_is_text() {
        let tokens = TagTokenizer::tokenize("a <b> <t> <tx1> < t1> c");
        assert_eq!(tokens, vec![text("a <b> <t> <tx1> < t1> c")]);
    }

    #[test]
    fn test_escape_marker_like_text() {
        assert_eq!(TagTokenizer::escape_text("use <t0> and </t12>"), "use &lt;t0> and &lt;/t12>");
        assert_eq!(TagTokenizer::escape_text("&lt;t1> &amp;lt;t2>"), "&amp;lt;t1> &amp;amp;lt;t2>");
        assert_eq!(TagTokenizer::escape_text("a <b> &lt;p> <t>"), "a <b> &lt;p> <t>");

        let escaped = TagTokenizer::escape_text("<<t0>");
        assert_eq!(TagTokenizer::tokenize(&escaped), vec![text("<&lt;t0>")]);
    }

    #[test]
    fn test_unescape_restores_literal_text() {
        for original in ["use <t0> here", "&lt;/t3>", "&amp;lt;t4><t5>", "&amp<t0>", "&amp;<t0>", "plain & <b>"] {
            let escaped = TagTokenizer::escape_text(original);
            assert!(TagTokenizer::tokenize(&escaped).iter().all(|t| matches!(t, TagToken::Text(_))));
            assert_eq!(TagTokenizer::unescape_text(&escaped), original);
        }
    }

    #[test]
    fn test_unbalanced_markers_are_not_validated() {
        let tokens = TagTokenizer::tokenize("</t3>x<t12>");
        assert_eq!(tokens, vec![close(3), text("x"), open(12)]);
    }
}
