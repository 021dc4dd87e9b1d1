//! 内置默认规则集
//! 未指定规则文件时使用；顺序即生效顺序

use super::model::{GENERAL_CATEGORY, Rule, RuleSet};

impl RuleSet {
    /// 内置规则：通用黑名单 + 各语言文字白名单
    pub fn builtin() -> Self {
        let general = vec![
            // 纯空白/标点/符号/数字
            Rule::blacklist("neutral-only", r"^[\s\d\p{P}\p{S}]+$"),
            Rule::blacklist("url", r"^(?:https?|ftp)://\S+$").with_flags("i"),
            Rule::blacklist("email", r"^[\w.+-]+@[\w-]+(?:\.[\w-]+)+$"),
            Rule::blacklist(
                "tech-acronyms",
                r"(?-u:\b)(?:API|SDK|CLI|HTTPS?|URL|URI|JSON|XML|HTML|CSS|SQL|GPU|CPU|RAM|SSD|USB|PDF|ID|OK)(?-u:\b)",
            )
            .with_flags("g"),
            Rule::blacklist("version-numbers", r"(?-u:\b)[vV]?\d+(?:\.\d+)+(?-u:\b)").with_flags("g"),
        ];

        let default_whitelists = [
            ("ZH", "han", r"\p{Han}+"),
            ("JA", "kana-kanji", r"[\p{Hiragana}\p{Katakana}\p{Han}ー]+"),
            ("KO", "hangul", r"\p{Hangul}+"),
            ("RU", "cyrillic", r"\p{Cyrillic}+"),
            ("EN", "latin", r"[A-Za-z]+"),
            ("AR", "arabic", r"\p{Arabic}+"),
            ("TH", "thai", r"\p{Thai}+"),
        ];

        let mut rule_set = RuleSet::new().with_category(GENERAL_CATEGORY, general);
        for (language, name, pattern) in default_whitelists {
            rule_set.push_category(language, vec![Rule::whitelist(name, pattern).with_flags("gu")]);
        }
        rule_set
    }
}
