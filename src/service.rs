//! 对外服务：三类操作（URL 指纹、技术检测、统计脚本检测），统一包装为响应信封
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GlobalConfig;
use crate::detector::TechDetector;
use crate::envelope::Envelope;
use crate::error::RsfResult;
use crate::fetcher::{normalize_url, PageFetcher};
use crate::rule::model::{DetectedAnalytics, DetectedTechnology};

/// URL 指纹结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintData {
    pub url: String,
    pub status: Option<u16>,
    pub technologies: Vec<DetectedTechnology>,
    pub analytics: Vec<DetectedAnalytics>,
}

/// 技术检测结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkData {
    pub technologies: Vec<DetectedTechnology>,
}

/// 统计/追踪脚本检测结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub analytics: Vec<DetectedAnalytics>,
}

/// 指纹服务，可在多个传输层之间共享
#[derive(Debug, Clone)]
pub struct FingerprintService {
    detector: TechDetector,
    fetcher: PageFetcher,
}

impl FingerprintService {
    pub fn new(detector: TechDetector, fetcher: PageFetcher) -> Self {
        Self { detector, fetcher }
    }

    /// 按配置加载签名库并创建服务
    pub async fn from_config(config: &GlobalConfig) -> RsfResult<Self> {
        let detector = TechDetector::from_config(config).await?;
        let fetcher = PageFetcher::new(config)?;
        Ok(Self::new(detector, fetcher))
    }

    pub fn detector(&self) -> &TechDetector {
        &self.detector
    }

    /// 抓取 URL 并生成指纹；抓取失败时不调用检测器，返回 ok=false
    pub async fn fingerprint_url(&self, url: &str, timeout_ms: Option<u64>) -> Envelope<FingerprintData> {
        let target = normalize_url(url).unwrap_or_else(|_| url.to_string());

        let page = match self.fetcher.fetch(url, timeout_ms).await {
            Ok(page) => page,
            Err(e) => {
                let data = FingerprintData {
                    url: target.clone(),
                    ..Default::default()
                };
                return Envelope::failure(data, e.to_string()).with_source(target);
            }
        };

        let report = self.detector.fingerprint(&page.html, &page.headers);
        let mut warnings = Vec::new();
        if page.truncated {
            warnings.push(format!("Response body truncated to {} bytes", page.html.len()));
        }
        warnings.extend(report.warnings);
        let data = FingerprintData {
            url: page.url.clone(),
            status: Some(page.status),
            technologies: report.technologies,
            analytics: report.analytics,
        };
        Envelope::success(data, warnings).with_source(page.url)
    }

    /// 对调用方提供的 HTML（及可选 Header）做技术检测
    pub fn detect_frameworks(
        &self,
        html: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Envelope<FrameworkData> {
        let result = self.detector.detect_frameworks(html, headers);
        Envelope::success(
            FrameworkData {
                technologies: result.detected,
            },
            result.warnings,
        )
    }

    /// 对调用方提供的 HTML 做统计/追踪脚本检测
    pub fn detect_analytics(&self, html: &str) -> Envelope<AnalyticsData> {
        let result = self.detector.detect_analytics(html);
        Envelope::success(
            AnalyticsData {
                analytics: result.detected,
            },
            result.warnings,
        )
    }
}
