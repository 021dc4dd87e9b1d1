//! 翻译资格判定器
//! 无状态服务：同一输入总是得到相同的判定与诊断条目，内部不做任何 I/O

use tracing::debug;

use super::analyzer::{AnchoredBlacklistAnalyzer, ErasureAnalyzer};
use super::trace::{Classification, TraceEntry};
use crate::compiler::{CompiledRuleSet, RuleCompiler};
use crate::rule::RuleSet;
use crate::utils::preview::preview_compact;

/// 翻译资格判定器
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityClassifier;

impl EligibilityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 编译规则集后判定
    pub fn classify(&self, text: &str, rule_set: &RuleSet, target_language: &str) -> Classification {
        let compiled = RuleCompiler::compile(rule_set);
        self.classify_compiled(text, &compiled, target_language)
    }

    /// 使用预编译规则集判定（批量判定时避免重复编译）
    pub fn classify_compiled(
        &self,
        text: &str,
        compiled: &CompiledRuleSet,
        target_language: &str,
    ) -> Classification {
        let mut trace = Vec::new();

        if text.is_empty() {
            trace.push(TraceEntry::EmptyText);
            return Self::decide(false, trace);
        }

        // 阶段A：锚定黑名单整串命中直接短路
        if AnchoredBlacklistAnalyzer::analyze(compiled, text, &mut trace).is_some() {
            return Self::decide(false, trace);
        }

        // 阶段B：擦除模型
        let residual = ErasureAnalyzer::analyze(compiled, text, target_language, &mut trace);
        let translate = !residual.is_empty();
        if translate {
            debug!("残留未解释内容：{}", preview_compact(&residual, 40));
            trace.push(TraceEntry::Residual { text: residual });
        }

        Self::decide(translate, trace)
    }

    fn decide(translate: bool, mut trace: Vec<TraceEntry>) -> Classification {
        trace.push(TraceEntry::Decision { translate });
        Classification { translate, trace }
    }
}

/// 便捷函数：一次性判定
pub fn classify(text: &str, rule_set: &RuleSet, target_language: &str) -> Classification {
    EligibilityClassifier::new().classify(text, rule_set, target_language)
}
