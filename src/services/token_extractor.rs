//! 表单令牌提取 - 业务能力层
//!
//! 只负责从表单页面中抠出四个状态令牌，不解析 HTML

use crate::error::MalformedPageError;

/// 表单要求随 POST 回传的四个状态令牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    ViewState,
    ViewStateMac,
    ViewStateCsrf,
    ViewStateVersion,
}

impl TokenField {
    pub const ALL: [TokenField; 4] = [
        TokenField::ViewState,
        TokenField::ViewStateMac,
        TokenField::ViewStateCsrf,
        TokenField::ViewStateVersion,
    ];

    /// 字段名后缀
    pub fn suffix(self) -> &'static str {
        match self {
            TokenField::ViewState => "ViewState",
            TokenField::ViewStateMac => "ViewStateMAC",
            TokenField::ViewStateCsrf => "ViewStateCSRF",
            TokenField::ViewStateVersion => "ViewStateVersion",
        }
    }

    /// 表单中注册的完整字段名
    pub fn field_name(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.suffix())
    }
}

/// 从一次 GET 响应中抓取的令牌，只能用于紧随其后的一次 POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTokenBundle {
    pub view_state: String,
    pub view_state_mac: String,
    pub view_state_csrf: String,
    pub view_state_version: String,
}

impl FormTokenBundle {
    pub fn get(&self, field: TokenField) -> &str {
        match field {
            TokenField::ViewState => &self.view_state,
            TokenField::ViewStateMac => &self.view_state_mac,
            TokenField::ViewStateCsrf => &self.view_state_csrf,
            TokenField::ViewStateVersion => &self.view_state_version,
        }
    }
}

/// 表单令牌提取器
///
/// 每个令牌是开始标记 `<字段名>" value="` 与其后第一个 `"` 之间的文本
#[derive(Debug, Clone)]
pub struct FormTokenExtractor {
    field_prefix: String,
}

impl FormTokenExtractor {
    pub fn new(field_prefix: impl Into<String>) -> Self {
        Self {
            field_prefix: field_prefix.into(),
        }
    }

    /// 提取全部四个令牌；任一缺失则整体失败
    pub fn extract(&self, html: &str) -> Result<FormTokenBundle, MalformedPageError> {
        Ok(FormTokenBundle {
            view_state: self.extract_one(html, TokenField::ViewState)?,
            view_state_mac: self.extract_one(html, TokenField::ViewStateMac)?,
            view_state_csrf: self.extract_one(html, TokenField::ViewStateCsrf)?,
            view_state_version: self.extract_one(html, TokenField::ViewStateVersion)?,
        })
    }

    fn extract_one(&self, html: &str, field: TokenField) -> Result<String, MalformedPageError> {
        let marker = format!("{}\" value=\"", field.field_name(&self.field_prefix));
        html.find(&marker)
            .map(|start| &html[start + marker.len()..])
            .and_then(|rest| rest.find('"').map(|end| rest[..end].to_string()))
            .ok_or(MalformedPageError {
                missing: field.suffix(),
            })
    }
}
