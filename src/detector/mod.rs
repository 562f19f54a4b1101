//! 检测模块：技术检测与统计脚本检测核心逻辑
pub mod global;
pub mod analyzer;
pub mod framework;
pub mod analytics;
pub mod detector;

// 导出核心接口
pub use self::global::{
    builtin_catalog, fingerprint_html, get_global_detector, init_detector,
    init_detector_with_config,
};
pub use self::analyzer::{HeaderAnalyzer, HtmlAnalyzer};
pub use self::framework::FrameworkDetector;
pub use self::analytics::AnalyticsDetector;
pub use self::detector::TechDetector;
