//! Header格式转换工具
//! 不同Header格式之间的转换，统一输出小写键

use std::collections::HashMap;
use reqwest::header::HeaderMap;
use tracing::debug;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 将HeaderMap转换为HashMap<String, Vec<String>>（键转小写，保留多值）
    pub fn to_hashmap(header_map: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        for (key, value) in header_map.iter() {
            // 非可见 ASCII 的值按有损 UTF-8 解码
            let value_str = match value.to_str() {
                Ok(v) => v.to_string(),
                Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
            };
            map.entry(key.as_str().to_lowercase())
                .or_default()
                .push(value_str);
        }

        debug!("Header conversion produced {} entries", map.len());
        map
    }

    /// 将HashMap<String, Vec<String>>转换为单值HashMap<String, String>
    /// 重复出现的 Header（如多条 Set-Cookie）按出现顺序以 `, ` 拼接，空值跳过
    pub fn to_single_value(hashmap: &HashMap<String, Vec<String>>) -> HashMap<String, String> {
        let mut single_map = HashMap::new();
        for (key, values) in hashmap {
            let joined = values
                .iter()
                .filter(|v| !v.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if !joined.is_empty() {
                single_map.insert(key.clone(), joined);
            }
        }
        single_map
    }

    /// 调用方提供的单值 Header 表：键统一转小写
    /// 大小写不同的重复键按键名排序后取第一个，保证结果确定
    pub fn normalize(headers: &HashMap<String, String>) -> HashMap<String, String> {
        let mut entries: Vec<(&String, &String)> = headers.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut normalized = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            normalized
                .entry(key.to_lowercase())
                .or_insert_with(|| value.clone());
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn test_header_map_to_single_value() {
        let mut header_map = HeaderMap::new();
        header_map.append(HeaderName::from_static("server"), HeaderValue::from_static("nginx"));
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static(""));
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static("laravel_session=abc"));

        let multi = HeaderConverter::to_hashmap(&header_map);
        assert_eq!(multi["set-cookie"].len(), 2);

        let single = HeaderConverter::to_single_value(&multi);
        assert_eq!(single["server"], "nginx");
        assert_eq!(single["set-cookie"], "laravel_session=abc");
    }

    #[test]
    fn test_repeated_header_values_are_joined() {
        let mut header_map = HeaderMap::new();
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static("XSRF-TOKEN=abc; path=/"));
        header_map.append(HeaderName::from_static("set-cookie"), HeaderValue::from_static("laravel_session=def; path=/"));

        let single = HeaderConverter::to_single_value(&HeaderConverter::to_hashmap(&header_map));
        assert_eq!(single["set-cookie"], "XSRF-TOKEN=abc; path=/, laravel_session=def; path=/");
    }

    #[test]
    fn test_normalize_lowercases_keys() {
        let mut headers = HashMap::new();
        headers.insert("X-Powered-By".to_string(), "Express".to_string());
        headers.insert("Server".to_string(), "nginx".to_string());

        let normalized = HeaderConverter::normalize(&headers);
        assert_eq!(normalized.get("x-powered-by").map(String::as_str), Some("Express"));
        assert_eq!(normalized.get("server").map(String::as_str), Some("nginx"));
        assert!(!normalized.contains_key("Server"));
    }

    #[test]
    fn test_normalize_duplicate_keys_is_deterministic() {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "Apache".to_string());
        headers.insert("server".to_string(), "nginx".to_string());

        // "Server" < "server"（大写字母排序在前）
        let normalized = HeaderConverter::normalize(&headers);
        assert_eq!(normalized["server"], "Apache");
    }
}
