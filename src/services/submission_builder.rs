//! 提交表单构建 - 业务能力层
//!
//! 只负责把一条目录项 + 令牌拼成 `application/x-www-form-urlencoded` 请求体

use crate::models::ScopeKey;
use crate::services::token_extractor::{FormTokenBundle, TokenField};
use tracing::debug;
use url::form_urlencoded;

/// 表单 id，同时作为提交标记字段
const FORM_ID: &str = "configurenew:j_id1";
const ADD_BUTTON_FIELD: &str = "configurenew:j_id1:blockNew:j_id43:addButton";
const LABEL_FIELD: &str = "configurenew:j_id1:blockNew:j_id9:nameSectionItem:editName";
const CODE_FIELD: &str = "configurenew:j_id1:blockNew:j_id9:codeSectionItem:editIsoCode";
const INT_VAL_FIELD: &str = "configurenew:j_id1:blockNew:j_id9:intValSectionItem:editIntVal";
const ACTIVE_FIELD: &str = "configurenew:j_id1:blockNew:j_id9:activeSectionItem:editActive";

/// 计算提交用的标签
///
/// 显示名中包含子区划代码时远端会拒绝，此时改用占位标签
///
/// # 参数
/// - `display_name`: 目录中的显示名
/// - `subdivision_code`: 子区划代码
/// - `sentinel`: 占位标签
///
/// # 返回
/// `display_name` 或 `sentinel`
pub fn submission_label<'a>(
    display_name: &'a str,
    subdivision_code: &str,
    sentinel: &'a str,
) -> &'a str {
    if display_name.contains(subdivision_code) {
        sentinel
    } else {
        display_name
    }
}

/// 提交表单构建器
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    token_field_prefix: String,
}

impl SubmissionBuilder {
    pub fn new(token_field_prefix: impl Into<String>) -> Self {
        Self {
            token_field_prefix: token_field_prefix.into(),
        }
    }

    /// 按固定顺序输出字段；不做任何内容校验
    ///
    /// # 参数
    /// - `scope`: 仅用于日志
    /// - `submission_label`: 见 [`submission_label`]
    /// - `subdivision_code`: 子区划代码
    /// - `display_name`: 原始显示名，作为内部值提交
    /// - `tokens`: 本次 GET 取得的令牌
    ///
    /// # 返回
    /// `application/x-www-form-urlencoded` 编码的请求体
    pub fn build(
        &self,
        scope: &ScopeKey,
        submission_label: &str,
        subdivision_code: &str,
        display_name: &str,
        tokens: &FormTokenBundle,
    ) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair(FORM_ID, FORM_ID)
            .append_pair(ADD_BUTTON_FIELD, "Add")
            .append_pair(LABEL_FIELD, submission_label)
            .append_pair(CODE_FIELD, subdivision_code)
            .append_pair(INT_VAL_FIELD, display_name)
            .append_pair(ACTIVE_FIELD, "true");

        for field in TokenField::ALL {
            form.append_pair(
                &field.field_name(&self.token_field_prefix),
                tokens.get(field),
            );
        }

        let body = form.finish();
        debug!("[{}] 提交表单 {} 字节", scope, body.len());
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "com.salesforce.visualforce.";

    fn tokens() -> FormTokenBundle {
        FormTokenBundle {
            view_state: "i:AA/+=".to_string(),
            view_state_mac: "mac".to_string(),
            view_state_csrf: "csrf".to_string(),
            view_state_version: "202410".to_string(),
        }
    }

    fn decode(body: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn label_equal_to_code_uses_sentinel() {
        assert_eq!(submission_label("07", "07", "Unknown"), "Unknown");
    }

    #[test]
    fn label_without_code_is_unchanged() {
        assert_eq!(submission_label("Antalya", "07", "Unknown"), "Antalya");
    }

    #[test]
    fn label_containing_code_uses_sentinel() {
        assert_eq!(submission_label("District 07", "07", "N/A"), "N/A");
    }

    #[test]
    fn body_carries_data_and_token_fields() {
        let scope = ScopeKey::new("TR", "07");
        let body = SubmissionBuilder::new(PREFIX).build(&scope, "Antalya", "07", "Antalya", &tokens());
        let pairs = decode(&body);

        assert_eq!(value(&pairs, ADD_BUTTON_FIELD), Some("Add"));
        assert_eq!(value(&pairs, LABEL_FIELD), Some("Antalya"));
        assert_eq!(value(&pairs, CODE_FIELD), Some("07"));
        assert_eq!(value(&pairs, INT_VAL_FIELD), Some("Antalya"));
        assert_eq!(value(&pairs, ACTIVE_FIELD), Some("true"));
        assert_eq!(
            value(&pairs, "com.salesforce.visualforce.ViewState"),
            Some("i:AA/+=")
        );
        assert_eq!(
            value(&pairs, "com.salesforce.visualforce.ViewStateVersion"),
            Some("202410")
        );
        assert_eq!(pairs.len(), 10);
    }

    #[test]
    fn non_ascii_names_are_percent_encoded() {
        let scope = ScopeKey::new("TR", "34");
        let body = SubmissionBuilder::new(PREFIX).build(&scope, "İstanbul", "34", "İstanbul", &tokens());

        assert!(!body.contains('İ'));
        assert!(body.contains("%C4%B0stanbul"));
        assert_eq!(value(&decode(&body), LABEL_FIELD), Some("İstanbul"));
    }

    #[test]
    fn build_is_deterministic() {
        let scope = ScopeKey::new("TR", "07");
        let builder = SubmissionBuilder::new(PREFIX);
        assert_eq!(
            builder.build(&scope, "Antalya", "07", "Antalya", &tokens()),
            builder.build(&scope, "Antalya", "07", "Antalya", &tokens())
        );
    }
}
