//! 翻译服务模块
pub mod translator;

pub use self::translator::{FragmentOutcome, MachineTranslator, PageTranslator};
