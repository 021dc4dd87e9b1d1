//! 判定分析器：阶段A（锚定黑名单短路）与阶段B（擦除模型）
use once_cell::sync::Lazy;
use regex::Regex;

use super::trace::TraceEntry;
use crate::compiler::{CompiledRule, CompiledRuleSet};

// 中性字符：数字、空白、标点（P）、符号（S）
static NEUTRAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d\s\p{P}\p{S}]").unwrap());

/// 锚定黑名单分析器
pub struct AnchoredBlacklistAnalyzer;

impl AnchoredBlacklistAnalyzer {
    /// 按配置顺序测试启用的锚定黑名单规则，返回第一条整串命中的规则
    pub fn analyze<'a>(
        compiled: &'a CompiledRuleSet,
        text: &str,
        trace: &mut Vec<TraceEntry>,
    ) -> Option<&'a CompiledRule> {
        for rule in compiled.anchored_blacklist() {
            match &rule.matcher {
                Ok(matcher) => {
                    if matcher.is_match(text) {
                        trace.push(TraceEntry::AnchoredBlacklistMatch {
                            category: rule.category.clone(),
                            rule: rule.name.clone(),
                        });
                        return Some(rule);
                    }
                }
                Err(message) => trace.push(compile_error(rule, message)),
            }
        }
        None
    }
}

/// 擦除分析器
pub struct ErasureAnalyzer;

impl ErasureAnalyzer {
    /// 依次擦除黑名单匹配、目标语言白名单匹配、中性字符，返回残留文本
    pub fn analyze(
        compiled: &CompiledRuleSet,
        text: &str,
        target_language: &str,
        trace: &mut Vec<TraceEntry>,
    ) -> String {
        let mut working = text.to_string();

        // 1. 所有启用的黑名单规则（强制全局匹配，累积擦除）
        for rule in compiled.blacklist() {
            let matcher = match &rule.matcher {
                Ok(matcher) => matcher,
                Err(message) => {
                    trace.push(compile_error(rule, message));
                    continue;
                }
            };
            let erasure = matcher.erase(&working);
            if erasure.removed > 0 {
                trace.push(TraceEntry::BlacklistErased {
                    category: rule.category.clone(),
                    rule: rule.name.clone(),
                    removed: erasure.removed,
                });
                working = erasure.text;
            }
        }

        // 2. 目标语言分类下的第一条白名单规则
        match compiled.whitelist_for(target_language) {
            Some(rule) => match &rule.matcher {
                Ok(matcher) => {
                    let erasure = matcher.erase(&working);
                    if erasure.removed > 0 {
                        trace.push(TraceEntry::WhitelistErased {
                            language: target_language.to_string(),
                            rule: rule.name.clone(),
                            removed: erasure.removed,
                        });
                        working = erasure.text;
                    }
                }
                Err(message) => trace.push(compile_error(rule, message)),
            },
            None => trace.push(TraceEntry::WhitelistMissing {
                language: target_language.to_string(),
            }),
        }

        // 3. 单次移除所有中性字符
        let before = working.chars().count();
        let residual = NEUTRAL_REGEX.replace_all(&working, "").into_owned();
        let removed = before - residual.chars().count();
        if removed > 0 {
            trace.push(TraceEntry::NeutralErased { removed });
        }

        residual
    }
}

fn compile_error(rule: &CompiledRule, message: &str) -> TraceEntry {
    TraceEntry::RuleCompileError {
        category: rule.category.clone(),
        rule: rule.name.clone(),
        message: message.to_string(),
    }
}
