//! 判定过程诊断条目
//! 结构化的 {kind, params}，文案渲染仅作调试展示

use std::fmt;

use serde::Serialize;

/// 单条诊断条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    /// 输入为空
    EmptyText,
    /// 锚定黑名单规则整串命中
    AnchoredBlacklistMatch { category: String, rule: String },
    /// 规则编译失败（已跳过）
    RuleCompileError {
        category: String,
        rule: String,
        message: String,
    },
    /// 黑名单规则擦除了内容
    BlacklistErased {
        category: String,
        rule: String,
        removed: usize,
    },
    /// 目标语言白名单规则擦除了内容
    WhitelistErased {
        language: String,
        rule: String,
        removed: usize,
    },
    /// 目标语言没有可用的白名单规则
    WhitelistMissing { language: String },
    /// 移除了中性字符（数字/空白/标点/符号）
    NeutralErased { removed: usize },
    /// 擦除后的残留内容
    Residual { text: String },
    /// 最终判定
    Decision { translate: bool },
}

impl TraceEntry {
    /// 条目类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEntry::EmptyText => "empty_text",
            TraceEntry::AnchoredBlacklistMatch { .. } => "anchored_blacklist_match",
            TraceEntry::RuleCompileError { .. } => "rule_compile_error",
            TraceEntry::BlacklistErased { .. } => "blacklist_erased",
            TraceEntry::WhitelistErased { .. } => "whitelist_erased",
            TraceEntry::WhitelistMissing { .. } => "whitelist_missing",
            TraceEntry::NeutralErased { .. } => "neutral_erased",
            TraceEntry::Residual { .. } => "residual",
            TraceEntry::Decision { .. } => "decision",
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEntry::EmptyText => write!(f, "文本为空，无需翻译"),
            TraceEntry::AnchoredBlacklistMatch { category, rule } => {
                write!(f, "整串命中锚定黑名单规则：[{}] {}", category, rule)
            }
            TraceEntry::RuleCompileError { category, rule, message } => {
                write!(f, "规则编译失败，已跳过：[{}] {}，错误：{}", category, rule, message)
            }
            TraceEntry::BlacklistErased { category, rule, removed } => {
                write!(f, "黑名单规则 [{}] {} 移除了{}处内容", category, rule, removed)
            }
            TraceEntry::WhitelistErased { language, rule, removed } => {
                write!(f, "目标语言 {} 的白名单规则 {} 移除了{}处内容", language, rule, removed)
            }
            TraceEntry::WhitelistMissing { language } => {
                write!(f, "目标语言 {} 没有启用的白名单规则", language)
            }
            TraceEntry::NeutralErased { removed } => {
                write!(f, "移除了{}个中性字符", removed)
            }
            TraceEntry::Residual { text } => write!(f, "残留未解释内容：{:?}", text),
            TraceEntry::Decision { translate } => {
                if *translate {
                    write!(f, "判定：需要翻译")
                } else {
                    write!(f, "判定：无需翻译")
                }
            }
        }
    }
}

/// 判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub translate: bool,
    pub trace: Vec<TraceEntry>,
}

impl Classification {
    /// 渲染为可读的诊断文本
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }

    /// 判定依据的锚定黑名单规则名（若由阶段A短路）
    pub fn matched_anchored_rule(&self) -> Option<&str> {
        self.trace.iter().find_map(|entry| match entry {
            TraceEntry::AnchoredBlacklistMatch { rule, .. } => Some(rule.as_str()),
            _ => None,
        })
    }
}
