//! 规则加载管理器
//! 负责从JSON文本、本地文件或内置规则构建规则集

use std::path::Path;

use tracing::{debug, warn};

use super::model::{RuleMode, RuleSet};
use crate::config::GlobalConfig;
use crate::error::{RstError, RstResult};

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 按配置加载规则集（指定文件优先，否则使用内置规则）
    pub fn load(config: &GlobalConfig) -> RstResult<RuleSet> {
        let Some(path) = config.rule_path.as_deref() else {
            debug!("未指定规则文件，使用内置规则集");
            return Ok(RuleSet::builtin());
        };
        Self::load_from_path(path)
    }

    /// 从本地JSON文件加载规则集
    pub fn load_from_path(path: &Path) -> RstResult<RuleSet> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RstError::RuleLoadError(format!("读取规则文件失败：{}，错误：{}", path.display(), e))
        })?;
        let rule_set = Self::load_from_str(&text)?;
        debug!("从 {} 加载规则集成功", path.display());
        Ok(rule_set)
    }

    /// 从JSON文本解析规则集
    pub fn load_from_str(json: &str) -> RstResult<RuleSet> {
        let rule_set: RuleSet = serde_json::from_str(json)
            .map_err(|e| RstError::RuleParseError(format!("规则JSON格式错误：{}", e)))?;
        Self::debug_count_rules(&rule_set);
        Ok(rule_set)
    }

    // ===== 统计规则数量 =====
    fn debug_count_rules(rule_set: &RuleSet) {
        let mut blacklist_count = 0;
        let mut whitelist_count = 0;
        let mut disabled_count = 0;

        for (category, rule) in rule_set.rules() {
            if !rule.enabled {
                disabled_count += 1;
                continue;
            }
            match rule.mode {
                RuleMode::Blacklist => blacklist_count += 1,
                RuleMode::Whitelist => whitelist_count += 1,
            }
            if rule.pattern.is_empty() {
                warn!("分类 [{}] 的规则 {} 模式为空，将匹配任意位置", category, rule.name);
            }
        }

        debug!("===== 规则集统计 =====");
        debug!("  分类总数：{}", rule_set.categories().len());
        debug!("  黑名单规则：{}", blacklist_count);
        debug!("  白名单规则：{}", whitelist_count);
        debug!("  已禁用规则：{}", disabled_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::rule::model::GENERAL_CATEGORY;

    #[test]
    fn test_load_without_path_uses_builtin() {
        let rule_set = RuleLoader::load(&ConfigManager::get_default()).unwrap();
        assert_eq!(rule_set, RuleSet::builtin());
    }

    #[test]
    fn test_load_from_str() {
        let rule_set = RuleLoader::load_from_str(
            r#"{"general": [{"name": "digits", "pattern": "^\\d+$"}]}"#,
        )
        .unwrap();
        assert_eq!(rule_set.category(GENERAL_CATEGORY).unwrap().rules[0].name, "digits");
    }

    #[test]
    fn test_load_from_str_rejects_bad_json() {
        let err = RuleLoader::load_from_str(r#"{"general": [{"name": 1}]}"#).unwrap_err();
        assert!(matches!(err, RstError::RuleParseError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let config = ConfigManager::custom()
            .rule_path("/nonexistent/rstranslate/rules.json".into())
            .build();
        assert!(matches!(RuleLoader::load(&config), Err(RstError::RuleLoadError(_))));
    }
}
