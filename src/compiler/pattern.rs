//! 编译后模式模型
//! 正则编译后的结构

use regex::Regex;

use crate::rule::{RegexFlags, RuleMode};

/// 编译成功的匹配器（正则 + 实际生效的标志，总含 g）
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub regex: Regex,
    pub flags: RegexFlags,
}

/// 一次擦除的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erasure {
    pub text: String,
    // 被移除的非空匹配数
    pub removed: usize,
}

impl CompiledMatcher {
    /// 整串测试
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// 擦除全部非空匹配；擦除总是全局进行，与规则自身的 `g` 标志无关
    pub fn erase(&self, text: &str) -> Erasure {
        let mut out = String::with_capacity(text.len());
        let mut removed = 0;
        let mut pos = 0;

        for m in self.regex.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            out.push_str(&text[pos..m.start()]);
            pos = m.end();
            removed += 1;
        }
        out.push_str(&text[pos..]);

        Erasure { text: out, removed }
    }
}

/// 编译后的单条规则
/// 编译失败时保留错误信息，求值时在规则本应生效的位置回放为诊断条目
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub category: String,
    pub name: String,
    pub mode: RuleMode,
    pub enabled: bool,
    pub anchored: bool,
    pub matcher: Result<CompiledMatcher, String>,
}

/// 编译失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCompileFailure {
    pub category: String,
    pub name: String,
    pub message: String,
}

/// 编译后的规则集（保持配置顺序）
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    pub rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    /// 启用的锚定黑名单规则（阶段A）
    pub fn anchored_blacklist(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules
            .iter()
            .filter(|r| r.enabled && r.mode == RuleMode::Blacklist && r.anchored)
    }

    /// 所有启用的黑名单规则（阶段B）
    pub fn blacklist(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules
            .iter()
            .filter(|r| r.enabled && r.mode == RuleMode::Blacklist)
    }

    /// 目标语言分类下第一条启用的白名单规则
    pub fn whitelist_for(&self, language: &str) -> Option<&CompiledRule> {
        self.rules
            .iter()
            .find(|r| r.category == language && r.enabled && r.mode == RuleMode::Whitelist)
    }

    /// 编译失败的规则列表
    pub fn compile_errors(&self) -> Vec<RuleCompileFailure> {
        self.rules
            .iter()
            .filter_map(|r| {
                r.matcher.as_ref().err().map(|message| RuleCompileFailure {
                    category: r.category.clone(),
                    name: r.name.clone(),
                    message: message.clone(),
                })
            })
            .collect()
    }
}
