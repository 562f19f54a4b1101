//! 签名库加载管理器
//! 负责按来源（内置 / 本地 JSON 文件）取得编译后的签名库

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::model::RuleLibrary;
use crate::compiler::{RuleCompiler, SignatureCatalog};
use crate::config::{GlobalConfig, RuleOrigin};
use crate::detector::global::builtin_catalog;
use crate::error::{RsfError, RsfResult};

/// 签名库加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 按配置加载签名库
    pub async fn load(config: &GlobalConfig) -> RsfResult<Arc<SignatureCatalog>> {
        match &config.rule_origin {
            RuleOrigin::Embedded => {
                debug!("Using embedded signature catalog");
                Ok(builtin_catalog())
            }
            RuleOrigin::LocalFile(path) => {
                let rule_lib = Self::load_from_file(path).await?;
                let catalog = RuleCompiler::compile(&rule_lib)?;
                debug!(
                    "Loaded signature catalog from {} ({} signatures)",
                    path.display(),
                    catalog.len()
                );
                Ok(Arc::new(catalog))
            }
        }
    }

    /// 从本地 JSON 文件读取原始签名库
    pub async fn load_from_file(path: &Path) -> RsfResult<RuleLibrary> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RsfError::RuleLoadError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// 解析 JSON 签名库
    pub fn parse(content: &str) -> RsfResult<RuleLibrary> {
        let rule_lib: RuleLibrary = serde_json::from_str(content)
            .map_err(|e| RsfError::RuleParseError(e.to_string()))?;

        if rule_lib.headers.is_empty()
            && rule_lib.technologies.is_empty()
            && rule_lib.analytics.is_empty()
        {
            return Err(RsfError::RuleParseError(
                "signature catalog contains no signatures".to_string(),
            ));
        }

        Ok(rule_lib)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    const CUSTOM_RULES: &str = r#"{
        "headers": [
            {"header": "X-Engine", "rules": [
                {"matcher": {"literal": "Acme"}, "name": "Acme Engine", "category": "server"}
            ]}
        ],
        "technologies": [
            {"name": "Acme UI", "category": "frontend-framework",
             "matchers": [{"literal": "acme-ui"}, {"pattern": "acme-ui@\\d+"}],
             "version": "acme-ui@(\\d+\\.\\d+)"}
        ]
    }"#;

    #[test]
    fn test_parse_custom_catalog() {
        let lib = RuleLoader::parse(CUSTOM_RULES).unwrap();
        assert_eq!(lib.headers.len(), 1);
        assert_eq!(lib.technologies[0].name, "Acme UI");
        assert!(lib.analytics.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_catalog() {
        assert!(matches!(RuleLoader::parse("{}"), Err(RsfError::RuleParseError(_))));
        assert!(matches!(RuleLoader::parse("not json"), Err(RsfError::RuleParseError(_))));
    }

    #[tokio::test]
    async fn test_load_from_local_file() {
        let path = std::env::temp_dir().join(format!("rsfingerprint-rules-{}.json", std::process::id()));
        tokio::fs::write(&path, CUSTOM_RULES).await.unwrap();

        let config = ConfigManager::custom()
            .rule_origin(RuleOrigin::LocalFile(path.clone()))
            .build();
        let catalog = RuleLoader::load(&config).await.unwrap();
        assert_eq!(catalog.headers[0].header, "x-engine");
        assert_eq!(catalog.technologies.len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let config = ConfigManager::custom()
            .rule_origin(RuleOrigin::LocalFile("/nonexistent/rules.json".into()))
            .build();
        assert!(matches!(
            RuleLoader::load(&config).await,
            Err(RsfError::RuleLoadError(_))
        ));
    }

    #[tokio::test]
    async fn test_load_embedded() {
        let catalog = RuleLoader::load(&ConfigManager::get_default()).await.unwrap();
        assert!(!catalog.is_empty());
    }
}
