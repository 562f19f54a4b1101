//! 签名模块：负责签名的数据模型、内置签名表与加载
pub mod model;
pub mod builtin;
pub mod loader;

// 导出核心接口
pub use self::model::{
    AnalyticsDetection, AnalyticsKind, AnalyticsSignature, Confidence, ContentSignature,
    DetectedAnalytics, DetectedTechnology, FingerprintReport, FrameworkDetection, HeaderRule,
    HeaderSignature, RawMatcher, RuleLibrary, TechnologyCategory,
};
pub use self::builtin::builtin_rule_library;
pub use self::loader::RuleLoader;
