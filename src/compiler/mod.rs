//! 编译模块：将原始签名编译为可执行的匹配器
pub mod pattern;
pub mod compiler;

pub use self::pattern::{
    CompiledAnalyticsSignature, CompiledContentSignature, CompiledHeaderRule,
    CompiledHeaderSignature, Matcher, SignatureCatalog,
};
pub use self::compiler::RuleCompiler;
