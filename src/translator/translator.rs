//! 页面翻译服务：串联判定、扁平化、外部翻译与树重建
//! 显式构造的服务值，不依赖任何全局单例

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::{Classification, EligibilityClassifier};
use crate::compiler::{CompiledRuleSet, RuleCompileFailure, RuleCompiler};
use crate::config::GlobalConfig;
use crate::error::RstResult;
use crate::extractor::HtmlExtractor;
use crate::markup::{Fragment, Reconstruction, TagFlattener, TreeReconstructor};
use crate::rule::{RuleLoader, RuleSet};
use crate::utils::preview_compact;

/// 外部机器翻译接口：输入带 `<tN>` 标记的文本，返回保留标记的译文
pub trait MachineTranslator {
    fn translate(&self, tagged_text: &str, target_language: &str) -> RstResult<String>;
}

impl<F> MachineTranslator for F
where
    F: Fn(&str, &str) -> RstResult<String>,
{
    fn translate(&self, tagged_text: &str, target_language: &str) -> RstResult<String> {
        self(tagged_text, target_language)
    }
}

/// 单个片段的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FragmentOutcome {
    /// 判定无需翻译
    Skipped { classification: Classification },
    /// 已翻译并重建
    Translated {
        classification: Classification,
        reconstruction: Reconstruction,
    },
}

impl FragmentOutcome {
    pub fn classification(&self) -> &Classification {
        match self {
            FragmentOutcome::Skipped { classification } => classification,
            FragmentOutcome::Translated { classification, .. } => classification,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, FragmentOutcome::Translated { .. })
    }

    /// 重建后的译文树
    pub fn translated_fragment(&self) -> Option<&Fragment> {
        match self {
            FragmentOutcome::Translated { reconstruction, .. } => Some(&reconstruction.root),
            FragmentOutcome::Skipped { .. } => None,
        }
    }
}

/// 页面翻译服务
#[derive(Debug, Clone)]
pub struct PageTranslator {
    config: GlobalConfig,
    rule_set: Arc<RuleSet>,
    compiled: Arc<CompiledRuleSet>,
    classifier: EligibilityClassifier,
    reconstructor: TreeReconstructor,
}

impl PageTranslator {
    /// 按配置加载规则并创建服务
    pub fn new(config: GlobalConfig) -> RstResult<Self> {
        // 1. 加载规则集
        let rule_set = RuleLoader::load(&config)?;
        // 2. 编译并组装
        Ok(Self::with_rules(config, rule_set))
    }

    /// 使用指定规则集创建服务
    pub fn with_rules(config: GlobalConfig, rule_set: RuleSet) -> Self {
        let compiled = RuleCompiler::compile(&rule_set);
        let reconstructor = TreeReconstructor::from_config(&config);

        Self {
            config,
            rule_set: Arc::new(rule_set),
            compiled: Arc::new(compiled),
            classifier: EligibilityClassifier::new(),
            reconstructor,
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn compile_errors(&self) -> Vec<RuleCompileFailure> {
        self.compiled.compile_errors()
    }

    /// 判定文本是否需要翻译
    pub fn should_translate(&self, text: &str) -> Classification {
        self.classifier
            .classify_compiled(text, &self.compiled, &self.config.target_language)
    }

    /// 翻译单个片段：判定 -> 扁平化 -> 外部翻译 -> 重建
    pub fn translate_fragment<T>(&self, fragment: &Fragment, translator: &T) -> RstResult<FragmentOutcome>
    where
        T: MachineTranslator + ?Sized,
    {
        let text = fragment.text_content();
        let classification = self.should_translate(&text);
        if !classification.translate {
            debug!("跳过翻译：{}", preview_compact(&text, 40));
            return Ok(FragmentOutcome::Skipped { classification });
        }

        let flattened = TagFlattener::flatten(fragment);
        debug!(
            "提交翻译：{}个标签，目标语言={}",
            flattened.shells.len(),
            self.config.target_language
        );
        let translated = translator.translate(&flattened.tagged_text, &self.config.target_language)?;

        let reconstruction = self
            .reconstructor
            .reconstruct_tagged(&translated, &flattened.shells);
        for warning in &reconstruction.warnings {
            warn!("译文重建异常：{}，译文：{}", warning, preview_compact(&translated, 60));
        }

        Ok(FragmentOutcome::Translated {
            classification,
            reconstruction,
        })
    }

    /// 提取HTML片段后翻译
    pub fn translate_html<T>(&self, html: &str, translator: &T) -> RstResult<FragmentOutcome>
    where
        T: MachineTranslator + ?Sized,
    {
        let fragment = HtmlExtractor::new().extract(html);
        self.translate_fragment(&fragment, translator)
    }
}
