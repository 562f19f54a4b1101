//! 全局签名库与检测器单例管理
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::detector::TechDetector;
use crate::compiler::{RuleCompiler, SignatureCatalog};
use crate::config::{ConfigManager, GlobalConfig};
use crate::error::{RsfError, RsfResult};
use crate::rule::builtin_rule_library;
use crate::rule::model::FingerprintReport;

/// 内置签名库（首次使用时编译，进程内只编译一次）
static BUILTIN_CATALOG: Lazy<Arc<SignatureCatalog>> = Lazy::new(|| {
    // 内置签名随代码发布，编译失败属于程序缺陷
    let catalog = RuleCompiler::compile(&builtin_rule_library())
        .unwrap_or_else(|e| panic!("embedded signature catalog is invalid: {e}"));
    Arc::new(catalog)
});

/// 全局检测器实例
static GLOBAL_DETECTOR: Lazy<OnceCell<TechDetector>> = Lazy::new(OnceCell::new);

/// 获取内置签名库
pub fn builtin_catalog() -> Arc<SignatureCatalog> {
    BUILTIN_CATALOG.clone()
}

/// 初始化全局检测器（默认配置）
pub async fn init_detector() -> RsfResult<()> {
    init_detector_with_config(ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局检测器，重复初始化时保留首次结果
pub async fn init_detector_with_config(config: GlobalConfig) -> RsfResult<()> {
    GLOBAL_DETECTOR
        .get_or_try_init(|| async { TechDetector::from_config(&config).await })
        .await?;
    Ok(())
}

/// 获取全局检测器
pub fn get_global_detector() -> RsfResult<&'static TechDetector> {
    GLOBAL_DETECTOR.get().ok_or(RsfError::DetectorNotInitialized)
}

/// 使用全局检测器生成指纹报告
pub fn fingerprint_html(html: &str, headers: &HashMap<String, String>) -> RsfResult<FingerprintReport> {
    let detector = get_global_detector()?;
    Ok(detector.fingerprint(html, headers))
}
