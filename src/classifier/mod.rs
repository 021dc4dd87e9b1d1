//! 判定模块：根据规则集判定文本是否需要翻译
pub mod analyzer;
pub mod classifier;
pub mod trace;

pub use self::classifier::{classify, EligibilityClassifier};
pub use self::trace::{Classification, TraceEntry};
