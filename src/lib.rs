//! rstranslate - 网页原地翻译核心
//! 规则驱动的翻译资格判定 + 带标签译文的节点树重建

// 导出全局错误类型
pub use self::error::{RstError, RstResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig};

// 导出规则模块核心接口
pub use self::rule::{GENERAL_CATEGORY, RegexFlags, Rule, RuleCategory, RuleLoader, RuleMode, RuleSet};

// 导出编译模块核心接口
pub use self::compiler::{CompiledRuleSet, RuleCompileFailure, RuleCompiler};

// 导出判定模块核心接口
pub use self::classifier::{Classification, EligibilityClassifier, TraceEntry, classify};

// 导出标记模块核心接口
pub use self::markup::{
    ElementNode, FlattenedFragment, Fragment, NodeShell, ReconstructWarning, Reconstruction,
    ShellSource, TagFlattener, TagId, TagToken, TagTokenizer, TreeNode, TreeReconstructor,
};

// 导出提取模块核心接口
pub use self::extractor::HtmlExtractor;

// 导出翻译服务接口
pub use self::translator::{FragmentOutcome, MachineTranslator, PageTranslator};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod classifier;
pub mod markup;
pub mod extractor;
pub mod translator;
pub mod utils;

/// 分词并重建（默认预格式化标签 pre/code）
pub fn reconstruct<S: ShellSource + ?Sized>(tagged_text: &str, shells: &S) -> Reconstruction {
    TreeReconstructor::new().reconstruct_tagged(tagged_text, shells)
}
