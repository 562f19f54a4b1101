//! 统一响应信封：`{ ok, data, meta: { source?, retrieved_at, pagination, warnings } }`
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 分页信息（本服务不分页，始终为空）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub next_cursor: Option<String>,
}

/// 信封元信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub retrieved_at: DateTime<Utc>,
    pub pagination: Pagination,
    pub warnings: Vec<String>,
}

/// 响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: T,
    pub meta: Meta,
}

impl<T> Envelope<T> {
    fn build(ok: bool, data: T, warnings: Vec<String>) -> Self {
        Self {
            ok,
            data,
            meta: Meta {
                source: None,
                retrieved_at: Utc::now(),
                pagination: Pagination::default(),
                warnings,
            },
        }
    }

    /// 成功结果；检测期的告警（如空 HTML）仍属成功
    pub fn success(data: T, warnings: Vec<String>) -> Self {
        Self::build(true, data, warnings)
    }

    /// 失败结果，携带一条可读的错误说明
    pub fn failure(data: T, warning: impl Into<String>) -> Self {
        Self::build(false, data, vec![warning.into()])
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }
}
