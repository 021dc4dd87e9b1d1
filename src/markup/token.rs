//! 标签记号模型

use std::fmt;

use serde::{Deserialize, Serialize};

/// 标签标识，保留标记中的原始字面量（如 "t0"、"t07"），用于查找节点壳
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// 由序号构建（t0, t1, ...）
    pub fn new(index: u64) -> Self {
        Self(format!("t{}", index))
    }

    /// 由数字部分构建，前导零原样保留
    pub(crate) fn from_digits(digits: &str) -> Self {
        Self(format!("t{}", digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 数字序号（超出 u64 范围时为 None）
    pub fn index(&self) -> Option<u64> {
        self.0.get(1..).and_then(|digits| digits.parse().ok())
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 带标签文本的记号
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagToken {
    Open(TagId),
    Close(TagId),
    Text(String),
}

impl fmt::Display for TagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagToken::Open(id) => write!(f, "<{}>", id),
            TagToken::Close(id) => write!(f, "</{}>", id),
            TagToken::Text(text) => f.write_str(text),
        }
    }
}
