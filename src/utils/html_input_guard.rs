//! HTML 输入守卫：负责在进入匹配前
//! 判定输入是否为空，并把超长输入截断到上限以内

/// 守卫结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedHtml<'a> {
    /// 空串或全空白
    Empty,
    /// 原样可用
    Intact(&'a str),
    /// 已截断（UTF-8 边界安全）
    Truncated { html: &'a str, original_len: usize },
}

pub struct HtmlInputGuard;

impl HtmlInputGuard {
    /// 空 HTML 警告文本
    pub const EMPTY_HTML_WARNING: &'static str = "Empty HTML content provided";

    #[inline]
    pub fn guard(html: &str, max_len: usize) -> GuardedHtml<'_> {
        if html.trim().is_empty() {
            return GuardedHtml::Empty;
        }

        if html.len() <= max_len {
            return GuardedHtml::Intact(html);
        }

        let mut cut = max_len;
        while !html.is_char_boundary(cut) {
            cut -= 1;
        }
        GuardedHtml::Truncated {
            html: &html[..cut],
            original_len: html.len(),
        }
    }
}

impl<'a> GuardedHtml<'a> {
    /// 可供匹配的文本，空输入返回 None
    pub fn text(&self) -> Option<&'a str> {
        match *self {
            GuardedHtml::Empty => None,
            GuardedHtml::Intact(html) => Some(html),
            GuardedHtml::Truncated { html, .. } => Some(html),
        }
    }

    /// 对应的警告文本
    pub fn warning(&self) -> Option<String> {
        match *self {
            GuardedHtml::Empty => Some(HtmlInputGuard::EMPTY_HTML_WARNING.to_string()),
            GuardedHtml::Intact(_) => None,
            GuardedHtml::Truncated { html, original_len } => Some(format!(
                "HTML content truncated from {} to {} bytes",
                original_len,
                html.len()
            )),
        }
    }
}
