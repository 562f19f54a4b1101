//! 版本提取工具模块
//! 负责用签名的版本正则从页面文本中提取技术版本号

use regex::Regex;

/// 版本提取工具类
/// 提供静态方法 `extract` 用于版本号提取
pub struct VersionExtractor;

impl VersionExtractor {
    /// 从文本中提取版本号
    ///
    /// # 参数
    /// - `text`: 待提取的完整文本
    /// - `extractor`: 版本正则（可选），取第一个匹配的第 1 个捕获组
    ///
    /// # 返回值
    /// - `Some(String)`: 提取到的版本号
    /// - `None`: 未提供正则 / 无匹配 / 第 1 组未参与匹配
    pub fn extract(text: &str, extractor: Option<&Regex>) -> Option<String> {
        extractor
            .and_then(|regex| regex.captures(text))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_without_extractor() {
        assert_eq!(VersionExtractor::extract("ng-version=\"17.0.0\"", None), None);
    }

    #[test]
    fn test_extract_first_match_group_one() {
        let regex = Regex::new(r#"ng-version="([^"]+)""#).unwrap();
        let html = r#"<app-root ng-version="17.0.0"></app-root><x ng-version="16.2.1">"#;
        assert_eq!(VersionExtractor::extract(html, Some(&regex)), Some("17.0.0".to_string()));
    }

    #[test]
    fn test_extract_no_match() {
        let regex = Regex::new(r"react@(\d+\.\d+\.\d+)").unwrap();
        assert_eq!(VersionExtractor::extract("<div data-reactroot>", Some(&regex)), None);
    }

    #[test]
    fn test_extract_non_participating_group() {
        // 第 1 组位于未命中的分支
        let regex = Regex::new(r"jquery(?:-(\d+\.\d+\.\d+))?\.js").unwrap();
        assert_eq!(VersionExtractor::extract("/jquery.js", Some(&regex)), None);
        assert_eq!(
            VersionExtractor::extract("/jquery-3.7.1.js", Some(&regex)),
            Some("3.7.1".to_string())
        );
    }
}
