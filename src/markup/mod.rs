//! 标记模块：带标签文本的分词、树重建与扁平化
pub mod token;
pub mod tokenizer;
pub mod tree;
pub mod reconstructor;
pub mod flattener;

pub use self::token::{TagId, TagToken};
pub use self::tokenizer::TagTokenizer;
pub use self::tree::{ElementNode, Fragment, NodeShell, ShellSource, TreeNode, PREFORMATTED_ELEMENTS, VOID_ELEMENTS};
pub use self::reconstructor::{ReconstructWarning, Reconstruction, TreeReconstructor};
pub use self::flattener::{FlattenedFragment, TagFlattener};
