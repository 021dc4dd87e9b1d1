//! 规则编译器核心
//! 仅负责将原始规则编译为可执行的正则模式；单条规则失败不影响其余规则

use std::time::Instant;

use regex::RegexBuilder;
use tracing::{debug, warn};

use super::pattern::{CompiledMatcher, CompiledRule, CompiledRuleSet};
use crate::error::RstResult;
use crate::rule::{RegexFlags, Rule, RuleMode, RuleSet};

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则集（失败的规则以错误信息占位，保持原有顺序）
    pub fn compile(rule_set: &RuleSet) -> CompiledRuleSet {
        let start = Instant::now();
        let mut stats = CompileStats::default();
        let mut rules = Vec::with_capacity(rule_set.len());

        for (category, rule) in rule_set.rules() {
            let matcher = Self::compile_rule(rule).map_err(|e| {
                warn!("规则编译失败：分类={}，规则={}，模式={}，错误={}", category, rule.name, rule.pattern, e);
                e.to_string()
            });
            stats.record(rule, matcher.is_ok());

            rules.push(CompiledRule {
                category: category.to_string(),
                name: rule.name.clone(),
                mode: rule.mode,
                enabled: rule.enabled,
                anchored: rule.is_anchored(),
                matcher,
            });
        }

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：黑名单{}条（锚定{}条）、白名单{}条、禁用{}条、失败{}条",
            stats.blacklist_count,
            stats.anchored_count,
            stats.whitelist_count,
            stats.disabled_count,
            stats.failed_count
        );

        CompiledRuleSet { rules }
    }

    /// 编译单条规则（标志与模式均需合法）
    pub fn compile_rule(rule: &Rule) -> RstResult<CompiledMatcher> {
        let flags = rule.regex_flags()?;
        let regex = Self::build_regex(&rule.pattern, flags)?;
        // 擦除阶段一律全局匹配，规则本身的标志保持不变
        Ok(CompiledMatcher {
            regex,
            flags: flags.with_global(),
        })
    }

    /// 按标志构建正则；g 不参与编译，u 对本引擎无额外效果
    fn build_regex(pattern: &str, flags: RegexFlags) -> RstResult<regex::Regex> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.ignore_case)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .unicode(true)
            .build()?;
        Ok(regex)
    }
}

impl CompiledRuleSet {
    pub fn compile(rule_set: &RuleSet) -> Self {
        RuleCompiler::compile(rule_set)
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    blacklist_count: usize,
    anchored_count: usize,
    whitelist_count: usize,
    disabled_count: usize,
    failed_count: usize,
}

impl CompileStats {
    fn record(&mut self, rule: &Rule, compiled: bool) {
        if !compiled {
            self.failed_count += 1;
        }
        if !rule.enabled {
            self.disabled_count += 1;
            return;
        }
        match rule.mode {
            RuleMode::Blacklist => {
                self.blacklist_count += 1;
                if rule.is_anchored() {
                    self.anchored_count += 1;
                }
            }
            RuleMode::Whitelist => self.whitelist_count += 1,
        }
    }
}
