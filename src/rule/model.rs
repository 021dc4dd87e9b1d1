//! 规则数据模型定义
//! 仅存储规则数据，无任何业务逻辑，支持序列化/反序列化
//! 分类与规则均以有序容器保存，顺序即配置顺序

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RstError, RstResult};

/// 通用分类键（不属于任何语言的规则）
pub const GENERAL_CATEGORY: &str = "general";

/// 规则模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    /// 黑名单：命中的内容无需翻译
    #[default]
    Blacklist,
    /// 白名单：命中的内容视为目标语言文字
    Whitelist,
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMode::Blacklist => f.write_str("blacklist"),
            RuleMode::Whitelist => f.write_str("whitelist"),
        }
    }
}

/// 正则标志（g/i/m/s/u 的子集）
/// 不可变值：需要强制全局匹配时通过 `with_global` 派生新值，不修改规则本身
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegexFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multi_line: bool,
    pub dot_all: bool,
    pub unicode: bool,
}

impl RegexFlags {
    /// 解析标志字符串，未知或重复的标志返回错误
    pub fn parse(raw: &str) -> RstResult<Self> {
        let mut flags = Self::default();
        for c in raw.chars() {
            let slot = match c {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multi_line,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                other => return Err(RstError::InvalidRegexFlag(other)),
            };
            if *slot {
                return Err(RstError::DuplicateRegexFlag(c));
            }
            *slot = true;
        }
        Ok(flags)
    }

    /// 派生强制全局匹配的标志集，其余标志保持不变
    pub fn with_global(self) -> Self {
        Self {
            global: true,
            ..self
        }
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (enabled, c) in [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multi_line, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
        ] {
            if enabled {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// 单条规则
/// `flags` 保留原始字符串，非法标志只在编译阶段报告，不影响整份规则集的加载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub mode: RuleMode,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, mode: RuleMode) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            flags: String::new(),
            mode,
            enabled: true,
        }
    }

    pub fn blacklist(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, RuleMode::Blacklist)
    }

    pub fn whitelist(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, RuleMode::Whitelist)
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// 锚定规则：模式文本以 `^` 开头且以 `$` 结尾，视为整串匹配
    pub fn is_anchored(&self) -> bool {
        self.pattern.starts_with('^') && self.pattern.ends_with('$')
    }

    pub fn regex_flags(&self) -> RstResult<RegexFlags> {
        RegexFlags::parse(&self.flags)
    }
}

/// 规则分类（语言代码或 "general"）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCategory {
    pub key: String,
    pub rules: Vec<Rule>,
}

/// 完整规则集
/// 序列化形式为有序 JSON 对象：`{ "<分类>": [Rule, ...], ... }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    categories: Vec<RuleCategory>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加分类；键已存在时替换其规则但保留原位置
    pub fn push_category(&mut self, key: impl Into<String>, rules: Vec<Rule>) {
        let key = key.into();
        match self.categories.iter_mut().find(|c| c.key == key) {
            Some(existing) => existing.rules = rules,
            None => self.categories.push(RuleCategory { key, rules }),
        }
    }

    pub fn with_category(mut self, key: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.push_category(key, rules);
        self
    }

    pub fn category(&self, key: &str) -> Option<&RuleCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn categories(&self) -> &[RuleCategory] {
        &self.categories
    }

    /// 按配置顺序遍历 (分类键, 规则)
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.categories
            .iter()
            .flat_map(|c| c.rules.iter().map(move |r| (c.key.as_str(), r)))
    }

    /// 规则总数
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.key, &category.rules)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category key to rule list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RuleSet, A::Error> {
                // MapAccess 按输入顺序产出条目
                let mut rule_set = RuleSet::new();
                while let Some((key, rules)) = access.next_entry::<String, Vec<Rule>>()? {
                    rule_set.push_category(key, rules);
                }
                Ok(rule_set)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}
