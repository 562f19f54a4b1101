//! 签名数据模型定义
//! 原始签名（可序列化，供内置表与 JSON 签名库共用）与检测结果结构

use std::fmt;
use serde::{Deserialize, Serialize};

/// 技术分类（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyCategory {
    FrontendFramework,
    BackendFramework,
    CssFramework,
    Cms,
    Ecommerce,
    Server,
    Runtime,
    Analytics,
    Tracking,
    Marketing,
    Library,
    Other,
}

impl TechnologyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TechnologyCategory::FrontendFramework => "frontend-framework",
            TechnologyCategory::BackendFramework => "backend-framework",
            TechnologyCategory::CssFramework => "css-framework",
            TechnologyCategory::Cms => "cms",
            TechnologyCategory::Ecommerce => "ecommerce",
            TechnologyCategory::Server => "server",
            TechnologyCategory::Runtime => "runtime",
            TechnologyCategory::Analytics => "analytics",
            TechnologyCategory::Tracking => "tracking",
            TechnologyCategory::Marketing => "marketing",
            TechnologyCategory::Library => "library",
            TechnologyCategory::Other => "other",
        }
    }
}

impl fmt::Display for TechnologyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统计/追踪脚本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsKind {
    Analytics,
    Tracking,
    Marketing,
}

/// 置信度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// 排序键：high < medium < low
    pub const ORDER: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

    pub fn rank(&self) -> usize {
        Self::ORDER.iter().position(|c| c == self).unwrap_or(Self::ORDER.len())
    }

    /// 是否严格优于另一档位
    pub fn is_better_than(&self, other: &Confidence) -> bool {
        self.rank() < other.rank()
    }

    /// 按命中数计算置信度
    /// - high：命中比例 ≥ 1/2，或命中数 ≥ 3
    /// - medium：命中比例 ≥ 1/4，或命中数 ≥ 2
    /// - low：其余
    ///
    /// 比例比较用整数交叉相乘，避免浮点误差
    pub fn from_match_count(match_count: usize, total_matchers: usize) -> Confidence {
        if total_matchers == 0 || match_count == 0 {
            return Confidence::Low;
        }
        if match_count * 2 >= total_matchers || match_count >= 3 {
            Confidence::High
        } else if match_count * 4 >= total_matchers || match_count >= 2 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(s)
    }
}

/// 字面量或正则（原始形式）
/// JSON 形式：`{"literal": "..."}` 或 `{"pattern": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawMatcher {
    Literal(String),
    Pattern(String),
}

impl RawMatcher {
    pub fn literal(s: impl Into<String>) -> Self {
        RawMatcher::Literal(s.into())
    }

    pub fn pattern(s: impl Into<String>) -> Self {
        RawMatcher::Pattern(s.into())
    }
}

/// Header 候选规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderRule {
    pub matcher: RawMatcher,
    pub name: String,
    pub category: TechnologyCategory,
}

/// Header 签名：一个 Header 名对应多条候选规则，首条命中生效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSignature {
    pub header: String,
    pub rules: Vec<HeaderRule>,
}

/// 页面内容签名（HTML/Script）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSignature {
    pub name: String,
    pub category: TechnologyCategory,
    pub matchers: Vec<RawMatcher>,
    // 版本提取正则，取第 1 个捕获组
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// 统计/追踪签名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSignature {
    pub name: String,
    pub kind: AnalyticsKind,
    pub matchers: Vec<RawMatcher>,
}

/// 完整签名库（未编译）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleLibrary {
    #[serde(default)]
    pub headers: Vec<HeaderSignature>,
    #[serde(default)]
    pub technologies: Vec<ContentSignature>,
    #[serde(default)]
    pub analytics: Vec<AnalyticsSignature>,
}

/// 技术检测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTechnology {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub confidence: Confidence,
    pub category: TechnologyCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

// ======== 为 DetectedTechnology 实现 Display trait（用于 CLI 输出） ========
impl fmt::Display for DetectedTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) if !v.is_empty() => write!(f, "{} {} [{}, {}]", self.name, v, self.category, self.confidence),
            _ => write!(f, "{} [{}, {}]", self.name, self.category, self.confidence),
        }
    }
}

/// 统计/追踪脚本检测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedAnalytics {
    pub name: String,
    pub kind: AnalyticsKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl fmt::Display for DetectedAnalytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AnalyticsKind::Analytics => "analytics",
            AnalyticsKind::Tracking => "tracking",
            AnalyticsKind::Marketing => "marketing",
        };
        write!(f, "{} [{}]", self.name, kind)
    }
}

/// 技术检测输出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDetection {
    pub detected: Vec<DetectedTechnology>,
    pub warnings: Vec<String>,
}

/// 统计/追踪脚本检测输出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsDetection {
    pub detected: Vec<DetectedAnalytics>,
    pub warnings: Vec<String>,
}

/// 指纹报告：两类检测结果原样合并，警告按 技术 → 统计 的顺序拼接
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintReport {
    pub technologies: Vec<DetectedTechnology>,
    pub analytics: Vec<DetectedAnalytics>,
    pub warnings: Vec<String>,
}
