//! 证据片段提取
//! 字面量命中：取首次出现位置前后各 20 个字符，两端加 `...`
//! 正则命中：取整个匹配串（第 0 组）

use crate::compiler::Matcher;

/// 证据提取工具类
pub struct EvidenceExtractor;

impl EvidenceExtractor {
    /// 字面量命中时前后保留的上下文字符数
    pub const CONTEXT_CHARS: usize = 20;
    /// 窗口两端的省略标记
    pub const ELLIPSIS: &'static str = "...";

    /// 按顺序扫描匹配器，取第一个命中者的证据
    pub fn find<'a, I>(text: &str, matchers: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a Matcher>,
    {
        matchers
            .into_iter()
            .find_map(|matcher| Self::evidence_for(text, matcher))
    }

    /// 单个匹配器的证据，未命中返回 None
    pub fn evidence_for(text: &str, matcher: &Matcher) -> Option<String> {
        match matcher {
            Matcher::Literal(literal) => {
                let start = text.find(literal.as_str())?;
                let end = start + literal.len();
                Some(Self::window(text, start, end))
            }
            Matcher::Pattern(regex) => regex.find(text).map(|m| m.as_str().to_string()),
        }
    }

    /// 以字符为单位截取 [start, end) 前后的上下文窗口
    /// 按字符而非字节计数，窗口边界总落在 UTF-8 字符边界上
    fn window(text: &str, start: usize, end: usize) -> String {
        let window_start = text[..start]
            .char_indices()
            .rev()
            .nth(Self::CONTEXT_CHARS - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let window_end = text[end..]
            .char_indices()
            .nth(Self::CONTEXT_CHARS)
            .map(|(idx, _)| end + idx)
            .unwrap_or(text.len());

        format!(
            "{}{}{}",
            Self::ELLIPSIS,
            &text[window_start..window_end],
            Self::ELLIPSIS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn lit(s: &str) -> Matcher {
        Matcher::Literal(s.to_string())
    }

    #[test]
    fn test_literal_window_is_clamped_to_text() {
        let evidence = EvidenceExtractor::evidence_for("<div data-reactroot>", &lit("data-reactroot"));
        assert_eq!(evidence.as_deref(), Some("...<div data-reactroot>..."));
    }

    #[test]
    fn test_literal_window_has_twenty_chars_each_side() {
        let text = format!("{}NEEDLE{}", "a".repeat(30), "b".repeat(30));
        let evidence = EvidenceExtractor::evidence_for(&text, &lit("NEEDLE")).unwrap();
        assert_eq!(evidence, format!("...{}NEEDLE{}...", "a".repeat(20), "b".repeat(20)));
    }

    #[test]
    fn test_literal_window_uses_first_occurrence() {
        let text = "xx MARK yy MARK zz";
        let evidence = EvidenceExtractor::evidence_for(text, &lit("MARK")).unwrap();
        assert_eq!(evidence, "...xx MARK yy MARK zz...");
    }

    #[test]
    fn test_window_on_multibyte_text() {
        let text = format!("{}NEEDLE{}", "中".repeat(25), "文".repeat(25));
        let evidence = EvidenceExtractor::evidence_for(&text, &lit("NEEDLE")).unwrap();
        assert_eq!(evidence, format!("...{}NEEDLE{}...", "中".repeat(20), "文".repeat(20)));
    }

    #[test]
    fn test_pattern_returns_whole_match() {
        let matcher = Matcher::Pattern(Regex::new(r#"ng-version="[^"]*""#).unwrap());
        let evidence = EvidenceExtractor::evidence_for(r#"<app-root ng-version="17.0.0">"#, &matcher);
        assert_eq!(evidence.as_deref(), Some(r#"ng-version="17.0.0""#));
    }

    #[test]
    fn test_find_uses_first_matching_rule_in_order() {
        let matchers = vec![
            lit("absent"),
            Matcher::Pattern(Regex::new(r"v\d+").unwrap()),
            lit("present"),
        ];
        let evidence = EvidenceExtractor::find("present v42", &matchers);
        assert_eq!(evidence.as_deref(), Some("v42"));
        assert_eq!(EvidenceExtractor::find("nothing", &matchers[..1]), None);
    }
}
