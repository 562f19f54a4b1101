//! 技术（框架/CMS/服务器）检测器
use std::collections::HashMap;
use std::sync::Arc;

use super::analyzer::{HeaderAnalyzer, HtmlAnalyzer};
use crate::compiler::SignatureCatalog;
use crate::config::DEFAULT_MAX_HTML_LEN;
use crate::rule::model::FrameworkDetection;
use crate::utils::{DetectionUpdater, HeaderConverter, HtmlInputGuard};

/// 技术检测器
#[derive(Debug, Clone)]
pub struct FrameworkDetector {
    catalog: Arc<SignatureCatalog>,
    max_html_len: usize,
}

impl FrameworkDetector {
    pub fn new(catalog: Arc<SignatureCatalog>) -> Self {
        Self {
            catalog,
            max_html_len: DEFAULT_MAX_HTML_LEN,
        }
    }

    pub fn with_max_html_len(mut self, max_html_len: usize) -> Self {
        self.max_html_len = max_html_len;
        self
    }

    /// 检测流程：
    /// 1. 空 HTML 只产生警告，Header 检测照常执行
    /// 2. HTML 内容签名匹配 + 置信度计算
    /// 3. Header 签名匹配（键先转小写）
    /// 4. 按名称去重，再按置信度稳定排序
    pub fn detect(&self, html: &str, headers: Option<&HashMap<String, String>>) -> FrameworkDetection {
        let mut warnings = Vec::new();
        let mut detected = Vec::new();

        let guarded = HtmlInputGuard::guard(html, self.max_html_len);
        if let Some(warning) = guarded.warning() {
            warnings.push(warning);
        }
        if let Some(text) = guarded.text() {
            HtmlAnalyzer::analyze(&self.catalog, text, &mut detected);
        }

        if let Some(headers) = headers.filter(|h| !h.is_empty()) {
            let normalized = HeaderConverter::normalize(headers);
            HeaderAnalyzer::analyze(&self.catalog, &normalized, &mut detected);
        }

        let mut detected = DetectionUpdater::dedup(detected);
        DetectionUpdater::sort_by_confidence(&mut detected);

        FrameworkDetection { detected, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::global::builtin_catalog;
    use crate::rule::model::{Confidence, TechnologyCategory};

    fn detector() -> FrameworkDetector {
        FrameworkDetector::new(builtin_catalog())
    }

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_react_from_two_indicators() {
        let html = r#"<html><body><div id="root" data-reactroot=""></div>
            <script src="https://unpkg.com/react@18.2.0/umd/react.production.min.js"></script>
            </body></html>"#;
        let result = detector().detect(html, None);

        let react = result.detected.iter().find(|t| t.name == "React").unwrap();
        assert_eq!(react.category, TechnologyCategory::FrontendFramework);
        assert!(matches!(react.confidence, Confidence::Medium | Confidence::High));
        assert_eq!(react.version.as_deref(), Some("18.2.0"));
        assert!(react.evidence.as_deref().unwrap().contains("data-reactroot"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_express_header_with_empty_html() {
        let result = detector().detect("", Some(&headers(&[("X-Powered-By", "Express")])));

        assert_eq!(result.warnings, vec!["Empty HTML content provided".to_string()]);
        assert_eq!(result.detected.len(), 1);
        let express = &result.detected[0];
        assert_eq!(express.name, "Express");
        assert_eq!(express.category, TechnologyCategory::BackendFramework);
        assert_eq!(express.confidence, Confidence::High);
        assert_eq!(express.version, None);
        assert_eq!(express.evidence.as_deref(), Some("x-powered-by: Express"));
    }

    #[test]
    fn test_angular_version() {
        let html = r#"<app-root ng-version="17.0.0"></app-root>"#;
        let result = detector().detect(html, None);
        let angular = result.detected.iter().find(|t| t.name == "Angular").unwrap();
        assert_eq!(angular.version.as_deref(), Some("17.0.0"));
    }

    #[test]
    fn test_whitespace_html_has_no_html_detections() {
        let result = detector().detect("  \n\t  ", None);
        assert!(result.detected.is_empty());
        assert_eq!(result.warnings, vec!["Empty HTML content provided".to_string()]);
    }

    #[test]
    fn test_header_and_html_merge_into_one_entry() {
        // HTML 命中 1/4 个 Next.js 匹配器（medium），Header 命中（high）
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{}</script>"#;
        let result = detector().detect(html, Some(&headers(&[("x-powered-by", "Next.js")])));

        let next: Vec<_> = result.detected.iter().filter(|t| t.name == "Next.js").collect();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].confidence, Confidence::High);
        assert_eq!(next[0].evidence.as_deref(), Some("x-powered-by: Next.js"));
    }

    #[test]
    fn test_results_sorted_by_confidence() {
        let html = r#"<link href="/wp-content/themes/a/style.css"><script src="/wp-includes/js/jquery/jquery.min.js"></script>
            <div class="navbar-expand-lg">"#;
        let result = detector().detect(html, Some(&headers(&[("Server", "nginx")])));

        let ranks: Vec<usize> = result.detected.iter().map(|t| t.confidence.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        assert!(result.detected.iter().any(|t| t.name == "Nginx"));
        assert!(result.detected.iter().any(|t| t.name == "WordPress"));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let html = r#"<div data-reactroot></div><div class="svelte-abc123">x</div>"#;
        let hdrs = headers(&[("Server", "cloudflare"), ("X-Powered-By", "PHP/8.2"), ("CF-Ray", "abc")]);
        let first = detector().detect(html, Some(&hdrs));
        for _ in 0..5 {
            assert_eq!(detector().detect(html, Some(&hdrs)), first);
        }
    }

    #[test]
    fn test_second_set_cookie_value_is_matched() {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        let mut header_map = HeaderMap::new();
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static("XSRF-TOKEN=abc; path=/"));
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static("laravel_session=def; path=/"));
        let headers = HeaderConverter::to_single_value(&HeaderConverter::to_hashmap(&header_map));

        let result = detector().detect("<p>hi</p>", Some(&headers));
        let laravel = result.detected.iter().find(|t| t.name == "Laravel").unwrap();
        assert_eq!(laravel.confidence, Confidence::High);
        assert_eq!(laravel.category, TechnologyCategory::BackendFramework);
    }

    #[test]
    fn test_oversized_html_is_truncated_with_warning() {
        let html = format!("<div data-reactroot></div>{}", " ".repeat(64));
        let result = detector().with_max_html_len(32).detect(&html, None);
        assert!(result.detected.iter().any(|t| t.name == "React"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("HTML content truncated"));
    }
}
