//! 全局配置管理,存储所有可配置项

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RstError, RstResult};

/// 全局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    // 规则文件路径（为空时使用内置规则）
    pub rule_path: Option<PathBuf>,
    // 目标语言（需与规则集中的分类键一致，如 "ZH"）
    pub target_language: String,
    // 预格式化上下文的标签名（大小写不敏感）
    pub preformatted_tags: Vec<String>,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rule_path: None,
            target_language: "ZH".to_string(),
            preformatted_tags: vec!["pre".to_string(), "code".to_string()],
            verbose: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }

    /// 从JSON文件加载配置（缺省字段取默认值）
    pub fn load(path: &Path) -> RstResult<GlobalConfig> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RstError::RuleLoadError(format!("读取配置文件失败：{}，错误：{}", path.display(), e))
        })?;
        let config: GlobalConfig = serde_json::from_str(&text)?;
        debug!("配置加载完成：{}，目标语言={}", path.display(), config.target_language);
        Ok(config)
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn rule_path(mut self, path: PathBuf) -> Self {
        self.config.rule_path = Some(path);
        self
    }

    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.config.target_language = language.into();
        self
    }

    pub fn preformatted_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.preformatted_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ConfigManager::custom()
            .target_language("JA")
            .preformatted_tags(["PRE", "samp"])
            .verbose(true)
            .build();

        assert_eq!(config.target_language, "JA");
        assert_eq!(config.preformatted_tags, vec!["PRE".to_string(), "samp".to_string()]);
        assert!(config.verbose);
        assert!(config.rule_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GlobalConfig = serde_json::from_str(r#"{"target_language":"KO"}"#).unwrap();
        assert_eq!(config.target_language, "KO");
        assert_eq!(config.preformatted_tags, ConfigManager::get_default().preformatted_tags);
        assert!(!config.verbose);
    }
}
