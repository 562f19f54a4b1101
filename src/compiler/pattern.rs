//! 编译后签名模型
//! 正则编译后的结构，进程内只读共享

use regex::Regex;

use crate::rule::model::{AnalyticsKind, TechnologyCategory};

/// 字面量或正则匹配器
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String), // 子串包含（区分大小写）
    Pattern(Regex),  // 正则搜索（非全匹配）
}

impl Matcher {
    /// 简单匹配判断
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Literal(s) => text.contains(s.as_str()),
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }

    /// 规则描述（日志用）
    pub fn describe(&self) -> &str {
        match self {
            Matcher::Literal(s) => s,
            Matcher::Pattern(r) => r.as_str(),
        }
    }
}

/// 编译后的 Header 候选规则
#[derive(Debug, Clone)]
pub struct CompiledHeaderRule {
    pub matcher: Matcher,
    pub name: String,
    pub category: TechnologyCategory,
}

/// 编译后的 Header 签名（header 名已转小写）
#[derive(Debug, Clone)]
pub struct CompiledHeaderSignature {
    pub header: String,
    pub rules: Vec<CompiledHeaderRule>,
}

/// 编译后的页面内容签名
#[derive(Debug, Clone)]
pub struct CompiledContentSignature {
    pub name: String,
    pub category: TechnologyCategory,
    pub matchers: Vec<Matcher>,
    pub version: Option<Regex>,
}

/// 编译后的统计/追踪签名
#[derive(Debug, Clone)]
pub struct CompiledAnalyticsSignature {
    pub name: String,
    pub kind: AnalyticsKind,
    pub matchers: Vec<Matcher>,
}

/// 编译后的签名库
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    pub headers: Vec<CompiledHeaderSignature>,
    pub technologies: Vec<CompiledContentSignature>,
    pub analytics: Vec<CompiledAnalyticsSignature>,
}

impl SignatureCatalog {
    /// 签名总数
    pub fn len(&self) -> usize {
        self.headers.len() + self.technologies.len() + self.analytics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_case_sensitive_substring() {
        let matcher = Matcher::Literal("data-reactroot".to_string());
        assert!(matcher.is_match(r#"<div data-reactroot="">"#));
        assert!(!matcher.is_match(r#"<div DATA-REACTROOT="">"#));
    }

    #[test]
    fn test_pattern_is_search_not_full_match() {
        let matcher = Matcher::Pattern(Regex::new(r"ng-version=").unwrap());
        assert!(matcher.is_match(r#"<app-root ng-version="17.0.0">"#));
        assert!(!matcher.is_match("<app-root>"));
    }
}
