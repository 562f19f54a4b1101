//! rsfingerprint - 基于签名匹配的网站技术栈 / 统计脚本识别
//! 提供库接口，以及 JSON-RPC（stdio / HTTP）工具服务

// 导出全局错误类型
pub use self::error::{RsfError, RsfResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, GlobalConfig, RuleOrigin};

// 导出签名模块核心接口
pub use self::rule::{
    AnalyticsDetection, AnalyticsKind, Confidence, DetectedAnalytics, DetectedTechnology,
    FingerprintReport, FrameworkDetection, RawMatcher, RuleLibrary, RuleLoader, TechnologyCategory,
};

// 导出编译模块核心接口
pub use self::compiler::{Matcher, RuleCompiler, SignatureCatalog};

// 导出工具模块核心接口
pub use self::utils::{EvidenceExtractor, HeaderConverter, VersionExtractor};

// 导出检测模块核心接口
pub use self::detector::{
    builtin_catalog, fingerprint_html, init_detector, init_detector_with_config,
    AnalyticsDetector, FrameworkDetector, TechDetector,
};

// 导出抓取与服务接口
pub use self::envelope::Envelope;
pub use self::fetcher::{normalize_url, FetchedPage, PageFetcher};
pub use self::service::FingerprintService;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod compiler;
pub mod detector;
pub mod fetcher;
pub mod envelope;
pub mod service;
pub mod server;
pub mod cli;
