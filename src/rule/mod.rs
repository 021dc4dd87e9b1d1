//! 规则模块：负责规则的加载与数据模型定义
pub mod model;
pub mod defaults;
pub mod loader;

// 导出核心接口
pub use self::model::{GENERAL_CATEGORY, RegexFlags, Rule, RuleCategory, RuleMode, RuleSet};
pub use self::loader::RuleLoader;
