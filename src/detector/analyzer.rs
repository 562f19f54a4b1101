//! 检测分析器：负责 HTML / Header 两类数据的签名匹配
use std::collections::HashMap;
use tracing::debug;

use crate::compiler::{Matcher, SignatureCatalog};
use crate::rule::model::{Confidence, DetectedTechnology};
use crate::utils::{EvidenceExtractor, VersionExtractor};

/// HTML分析器
pub struct HtmlAnalyzer;

impl HtmlAnalyzer {
    /// 对每条内容签名统计命中的匹配器数量并计算置信度
    pub fn analyze(
        catalog: &SignatureCatalog,
        html: &str,
        detected: &mut Vec<DetectedTechnology>,
    ) {
        for sig in &catalog.technologies {
            let matched: Vec<&Matcher> = sig.matchers.iter().filter(|m| m.is_match(html)).collect();
            if matched.is_empty() {
                continue;
            }

            let confidence = Confidence::from_match_count(matched.len(), sig.matchers.len());
            let version = VersionExtractor::extract(html, sig.version.as_ref());
            // 证据只取实际命中的匹配器，保持签名声明顺序
            let evidence = EvidenceExtractor::find(html, matched.iter().copied());

            debug!(
                "HTML match: tech={}, matched={}/{}, confidence={}, version={:?}",
                sig.name,
                matched.len(),
                sig.matchers.len(),
                confidence,
                version
            );

            detected.push(DetectedTechnology {
                name: sig.name.clone(),
                version,
                confidence,
                category: sig.category,
                evidence,
            });
        }
    }
}

/// Header分析器
pub struct HeaderAnalyzer;

impl HeaderAnalyzer {
    /// headers 须为已转小写键的表
    /// 每个 Header 只取第一条命中的规则，置信度固定为 high，不提取版本
    pub fn analyze(
        catalog: &SignatureCatalog,
        headers: &HashMap<String, String>,
        detected: &mut Vec<DetectedTechnology>,
    ) {
        for sig in &catalog.headers {
            let Some(value) = headers.get(&sig.header) else {
                continue;
            };

            let Some(rule) = sig.rules.iter().find(|rule| rule.matcher.is_match(value)) else {
                continue;
            };

            debug!(
                "Header match: tech={}, header={}, value={}, rule={}",
                rule.name,
                sig.header,
                value,
                rule.matcher.describe()
            );

            detected.push(DetectedTechnology {
                name: rule.name.clone(),
                version: None,
                confidence: Confidence::High,
                category: rule.category,
                evidence: Some(format!("{}: {}", sig.header, value)),
            });
        }
    }
}
