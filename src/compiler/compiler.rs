//! 签名编译器核心
//! 仅负责将原始签名编译为可执行的匹配器，并做基础校验

use std::time::Instant;
use regex::Regex;
use tracing::debug;

use super::pattern::{
    CompiledAnalyticsSignature, CompiledContentSignature, CompiledHeaderRule,
    CompiledHeaderSignature, Matcher, SignatureCatalog,
};
use crate::error::{RsfError, RsfResult};
use crate::rule::model::{
    AnalyticsSignature, ContentSignature, HeaderSignature, RawMatcher, RuleLibrary,
};

/// 签名编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译签名库
    pub fn compile(rule_lib: &RuleLibrary) -> RsfResult<SignatureCatalog> {
        let start = Instant::now();
        let mut stats = CompileStats::default();

        let headers = rule_lib
            .headers
            .iter()
            .map(|sig| Self::compile_header_signature(sig, &mut stats))
            .collect::<RsfResult<Vec<_>>>()?;

        let technologies = rule_lib
            .technologies
            .iter()
            .map(|sig| Self::compile_content_signature(sig, &mut stats))
            .collect::<RsfResult<Vec<_>>>()?;

        let analytics = rule_lib
            .analytics
            .iter()
            .map(|sig| Self::compile_analytics_signature(sig, &mut stats))
            .collect::<RsfResult<Vec<_>>>()?;

        debug!("Signature catalog compiled in {:?}", start.elapsed());
        debug!(
            "Compile stats: header rules={}, content matchers={}, version extractors={}, analytics matchers={}, regexes={}",
            stats.header_count,
            stats.content_count,
            stats.version_count,
            stats.analytics_count,
            stats.regex_count
        );

        Ok(SignatureCatalog {
            headers,
            technologies,
            analytics,
        })
    }

    /// 编译 Header 签名（Header 名统一转小写）
    fn compile_header_signature(
        sig: &HeaderSignature,
        stats: &mut CompileStats,
    ) -> RsfResult<CompiledHeaderSignature> {
        let header = sig.header.trim().to_lowercase();
        if header.is_empty() {
            return Err(RsfError::InvalidSignature {
                name: sig.header.clone(),
                reason: "empty header name".to_string(),
            });
        }

        let mut rules = Vec::with_capacity(sig.rules.len());
        for rule in &sig.rules {
            rules.push(CompiledHeaderRule {
                matcher: Self::compile_matcher(&rule.matcher, stats)?,
                name: rule.name.clone(),
                category: rule.category,
            });
            stats.header_count += 1;
        }

        Ok(CompiledHeaderSignature { header, rules })
    }

    /// 编译页面内容签名
    fn compile_content_signature(
        sig: &ContentSignature,
        stats: &mut CompileStats,
    ) -> RsfResult<CompiledContentSignature> {
        if sig.matchers.is_empty() {
            return Err(RsfError::InvalidSignature {
                name: sig.name.clone(),
                reason: "content signature needs at least one matcher".to_string(),
            });
        }

        let matchers = Self::compile_matcher_list(&sig.matchers, stats)?;
        stats.content_count += matchers.len();

        let version = match &sig.version {
            Some(raw) => {
                let regex = Regex::new(raw)?;
                // captures_len 包含第 0 组
                if regex.captures_len() < 2 {
                    return Err(RsfError::InvalidSignature {
                        name: sig.name.clone(),
                        reason: format!("version extractor `{}` has no capture group", raw),
                    });
                }
                stats.version_count += 1;
                Some(regex)
            }
            None => None,
        };

        Ok(CompiledContentSignature {
            name: sig.name.clone(),
            category: sig.category,
            matchers,
            version,
        })
    }

    /// 编译统计/追踪签名
    fn compile_analytics_signature(
        sig: &AnalyticsSignature,
        stats: &mut CompileStats,
    ) -> RsfResult<CompiledAnalyticsSignature> {
        if sig.matchers.is_empty() {
            return Err(RsfError::InvalidSignature {
                name: sig.name.clone(),
                reason: "analytics signature needs at least one matcher".to_string(),
            });
        }

        let matchers = Self::compile_matcher_list(&sig.matchers, stats)?;
        stats.analytics_count += matchers.len();

        Ok(CompiledAnalyticsSignature {
            name: sig.name.clone(),
            kind: sig.kind,
            matchers,
        })
    }

    fn compile_matcher_list(
        raw: &[RawMatcher],
        stats: &mut CompileStats,
    ) -> RsfResult<Vec<Matcher>> {
        raw.iter().map(|m| Self::compile_matcher(m, stats)).collect()
    }

    /// 编译单个匹配器
    fn compile_matcher(raw: &RawMatcher, stats: &mut CompileStats) -> RsfResult<Matcher> {
        match raw {
            RawMatcher::Literal(s) => Ok(Matcher::Literal(s.clone())),
            RawMatcher::Pattern(p) => {
                let regex = Regex::new(p)?;
                stats.regex_count += 1;
                Ok(Matcher::Pattern(regex))
            }
        }
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    header_count: usize,
    content_count: usize,
    version_count: usize,
    analytics_count: usize,
    regex_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::builtin::builtin_rule_library;
    use crate::rule::model::{HeaderRule, TechnologyCategory};

    #[test]
    fn test_compile_builtin_library() {
        let lib = builtin_rule_library();
        let catalog = RuleCompiler::compile(&lib).unwrap();
        assert_eq!(catalog.headers.len(), lib.headers.len());
        assert_eq!(catalog.technologies.len(), lib.technologies.len());
        assert_eq!(catalog.analytics.len(), lib.analytics.len());
    }

    #[test]
    fn test_header_name_is_lowercased() {
        let lib = RuleLibrary {
            headers: vec![HeaderSignature {
                header: "X-Powered-By".to_string(),
                rules: vec![HeaderRule {
                    matcher: RawMatcher::literal("Express"),
                    name: "Express".to_string(),
                    category: TechnologyCategory::BackendFramework,
                }],
            }],
            ..Default::default()
        };
        let catalog = RuleCompiler::compile(&lib).unwrap();
        assert_eq!(catalog.headers[0].header, "x-powered-by");
    }

    #[test]
    fn test_reject_invalid_regex() {
        let lib = RuleLibrary {
            technologies: vec![ContentSignature {
                name: "Broken".to_string(),
                category: TechnologyCategory::Other,
                matchers: vec![RawMatcher::pattern("(unclosed")],
                version: None,
            }],
            ..Default::default()
        };
        assert!(matches!(
            RuleCompiler::compile(&lib),
            Err(RsfError::RegexCompileError(_))
        ));
    }

    #[test]
    fn test_reject_empty_matchers_and_groupless_version() {
        let empty = RuleLibrary {
            technologies: vec![ContentSignature {
                name: "Empty".to_string(),
                category: TechnologyCategory::Other,
                matchers: Vec::new(),
                version: None,
            }],
            ..Default::default()
        };
        assert!(matches!(
            RuleCompiler::compile(&empty),
            Err(RsfError::InvalidSignature { .. })
        ));

        let groupless = RuleLibrary {
            technologies: vec![ContentSignature {
                name: "NoGroup".to_string(),
                category: TechnologyCategory::Other,
                matchers: vec![RawMatcher::literal("x")],
                version: Some(r"v\d+".to_string()),
            }],
            ..Default::default()
        };
        assert!(matches!(
            RuleCompiler::compile(&groupless),
            Err(RsfError::InvalidSignature { .. })
        ));
    }
}
