//! 统计/追踪脚本检测器
//! 二值判定：无置信度、无版本；同名签名只取第一个命中者
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::compiler::SignatureCatalog;
use crate::config::DEFAULT_MAX_HTML_LEN;
use crate::rule::model::{AnalyticsDetection, DetectedAnalytics};
use crate::utils::{EvidenceExtractor, HtmlInputGuard};

/// 统计/追踪脚本检测器
#[derive(Debug, Clone)]
pub struct AnalyticsDetector {
    catalog: Arc<SignatureCatalog>,
    max_html_len: usize,
}

impl AnalyticsDetector {
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

    pub fn detect(&self, html: &str) -> AnalyticsDetection {
        let guarded = HtmlInputGuard::guard(html, self.max_html_len);
        let warnings: Vec<String> = guarded.warning().into_iter().collect();
        let Some(html) = guarded.text() else {
            return AnalyticsDetection {
                detected: Vec::new(),
                warnings,
            };
        };

        // 匹配器同时尝试原文与小写副本
        let lowered = html.to_lowercase();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut detected = Vec::new();

        for sig in &self.catalog.analytics {
            if seen.contains(sig.name.as_str()) {
                continue;
            }

            let Some(rule) = sig
                .matchers
                .iter()
                .find(|m| m.is_match(html) || m.is_match(&lowered))
            else {
                continue;
            };

            debug!("Analytics match: name={}, rule={}", sig.name, rule.describe());

            seen.insert(sig.name.as_str());
            detected.push(DetectedAnalytics {
                name: sig.name.clone(),
                kind: sig.kind,
                // 证据只在原文上取，仅小写副本命中时为空
                evidence: EvidenceExtractor::evidence_for(html, rule),
            });
        }

        AnalyticsDetection { detected, warnings }
    }
}
