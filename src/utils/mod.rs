//! 工具模块：版本提取、证据片段、Header 转换、结果去重与输入守卫
pub mod version_extractor;
pub mod evidence;
pub mod header_converter;
pub mod detection_updater;
pub mod html_input_guard;

pub use self::version_extractor::VersionExtractor;
pub use self::evidence::EvidenceExtractor;
pub use self::header_converter::HeaderConverter;
pub use self::detection_updater::DetectionUpdater;
pub use self::html_input_guard::{GuardedHtml, HtmlInputGuard};
