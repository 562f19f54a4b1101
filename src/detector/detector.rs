//! 检测器核心：整合技术检测与统计脚本检测，输出指纹报告
use std::collections::HashMap;
use std::sync::Arc;

use super::analytics::AnalyticsDetector;
use super::framework::FrameworkDetector;
use crate::compiler::SignatureCatalog;
use crate::config::GlobalConfig;
use crate::error::RsfResult;
use crate::rule::RuleLoader;
use crate::rule::model::{AnalyticsDetection, FingerprintReport, FrameworkDetection};

/// 指纹检测器
#[derive(Debug, Clone)]
pub struct TechDetector {
    frameworks: FrameworkDetector,
    analytics: AnalyticsDetector,
}

impl TechDetector {
    /// 基于已编译签名库创建检测器
    pub fn new(catalog: Arc<SignatureCatalog>, max_html_len: usize) -> Self {
        Self {
            frameworks: FrameworkDetector::new(catalog.clone()).with_max_html_len(max_html_len),
            analytics: AnalyticsDetector::new(catalog).with_max_html_len(max_html_len),
        }
    }

    /// 按配置加载签名库并创建检测器
    pub async fn from_config(config: &GlobalConfig) -> RsfResult<Self> {
        let catalog = RuleLoader::load(config).await?;
        Ok(Self::new(catalog, config.max_html_len))
    }

    /// 技术检测（HTML + 可选 Header）
    pub fn detect_frameworks(
        &self,
        html: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> FrameworkDetection {
        self.frameworks.detect(html, headers)
    }

    /// 统计/追踪脚本检测
    pub fn detect_analytics(&self, html: &str) -> AnalyticsDetection {
        self.analytics.detect(html)
    }

    /// 完整指纹：两类检测结果原样合并，警告先技术后统计
    pub fn fingerprint(&self, html: &str, headers: &HashMap<String, String>) -> FingerprintReport {
        let frameworks = self.frameworks.detect(html, Some(headers));
        let analytics = self.analytics.detect(html);

        let mut warnings = frameworks.warnings;
        warnings.extend(analytics.warnings);

        FingerprintReport {
            technologies: frameworks.detected,
            analytics: analytics.detected,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigManager, RuleOrigin};
    use crate::detector::global::builtin_catalog;
    use crate::rule::model::Confidence;

    fn detector() -> TechDetector {
        TechDetector::new(builtin_catalog(), ConfigManager::get_default().max_html_len)
    }

    #[test]
    fn test_fingerprint_merges_both_detectors() {
        let html = r#"<html><head>
            <meta name="generator" content="WordPress 6.4.2">
            <link rel="stylesheet" href="/wp-content/themes/twenty/style.css">
            <script async src="https://www.googletagmanager.com/gtag/js?id=G-ABC123"></script>
        </head></html>"#;
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "nginx/1.25".to_string());

        let report = detector().fingerprint(html, &headers);

        let wordpress = report.technologies.iter().find(|t| t.name == "WordPress").unwrap();
        assert_eq!(wordpress.version.as_deref(), Some("6.4.2"));
        assert_eq!(wordpress.confidence, Confidence::High);
        assert!(report.technologies.iter().any(|t| t.name == "Nginx"));
        assert_eq!(report.analytics.len(), 1);
        assert_eq!(report.analytics[0].name, "Google Analytics");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_warnings_framework_first_then_analytics() {
        let report = detector().fingerprint("", &HashMap::new());
        assert!(report.technologies.is_empty());
        assert!(report.analytics.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                "Empty HTML content provided".to_string(),
                "Empty HTML content provided".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_from_config_with_missing_rule_file_fails() {
        let config = ConfigManager::custom()
            .rule_origin(RuleOrigin::LocalFile("/nonexistent/rsf-rules.json".into()))
            .build();
        assert!(TechDetector::from_config(&config).await.is_err());
    }
}
