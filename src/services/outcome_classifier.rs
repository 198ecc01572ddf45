//! 响应分类 - 业务能力层
//!
//! 只负责把一次提交的响应体归类为 `Outcome`，不关心流程

use crate::models::Outcome;
use regex::Regex;
use std::sync::LazyLock;

/// 多条错误的列表块
pub const ERRORS_BLOCK_MARKER: &str = "<h4>Errors</h4>";
/// 单条错误
pub const ERROR_MARKER: &str = "<h4>Error:</h4>";
/// 地区代码本身不被远端识别时出现的提示
pub const MISSING_INFO_MARKER: &str = "Required fields are missing";
/// 成功后重定向地址中的标记
pub const SUCCESS_MARKER: &str = "success=true";

const LIST_ITEM_OPEN: &str = "<li>";
const LIST_ITEM_CLOSE: &str = "</li>";
const BLOCK_CLOSE: &str = "</div>";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 按顺序匹配，先命中者为准：
/// 1. 错误列表块 → 第一条 `<li>` 文本
/// 2. 单条错误 → 标记后到 `</div>` 的文本
/// 3. 缺少必要信息 → `<地区代码> does not exist`
/// 4. 成功标记 → `Success`
/// 5. 其余 → `UnexpectedFailure`（携带完整响应体）
///
/// # 参数
/// - `body`: POST 响应体
/// - `region_code`: 地区代码，用于生成"不存在"消息
pub fn classify(body: &str, region_code: &str) -> Outcome {
    if let Some(rest) = after(body, ERRORS_BLOCK_MARKER) {
        let item = after(rest, LIST_ITEM_OPEN)
            .map(|item| until(item, LIST_ITEM_CLOSE))
            .unwrap_or_else(|| until(rest, BLOCK_CLOSE));
        return Outcome::handled(clean_text(item));
    }

    if let Some(rest) = after(body, ERROR_MARKER) {
        return Outcome::handled(clean_text(until(rest, BLOCK_CLOSE)));
    }

    if body.contains(MISSING_INFO_MARKER) {
        return Outcome::handled(format!("{} does not exist", region_code));
    }

    if body.contains(SUCCESS_MARKER) {
        return Outcome::Success;
    }

    Outcome::unexpected(body)
}

fn after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.find(marker).map(|idx| &text[idx + marker.len()..])
}

/// 截取到结束标记为止；没有结束标记时取剩余全部
fn until<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker).map(|idx| &text[..idx]).unwrap_or(text)
}

/// 去掉内嵌标签并压缩空白
fn clean_text(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, " ");
    SPACE_RE.replace_all(&without_tags, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_block_yields_first_list_item() {
        let body = r#"<div class="messageText"><h4>Errors</h4><ul>
            <li>  Duplicate integration value: Antalya </li>
            <li>Duplicate code: 07</li></ul></div>"#;
        assert_eq!(
            classify(body, "TR"),
            Outcome::handled("Duplicate integration value: Antalya")
        );
    }

    #[test]
    fn single_error_is_trimmed() {
        let body = r#"<div class="messageText"><span><h4>Error:</h4></span>
            Invalid Data.<br>Review all error messages below.</div>"#;
        assert_eq!(
            classify(body, "TR"),
            Outcome::handled("Invalid Data. Review all error messages below.")
        );
    }

    #[test]
    fn missing_information_names_region() {
        let body = "<p>Required fields are missing: [Country]</p>";
        assert_eq!(classify(body, "ZZ"), Outcome::handled("ZZ does not exist"));
    }

    #[test]
    fn success_marker_is_success() {
        let body = r#"<script>window.location.href = '/i18n/ConfigureNewState?success=true';</script>"#;
        assert_eq!(classify(body, "TR"), Outcome::Success);
    }

    #[test]
    fn unknown_shape_keeps_raw_body() {
        let body = "<html><body>Maintenance window</body></html>";
        assert_eq!(classify(body, "TR"), Outcome::unexpected(body));
    }

    #[test]
    fn errors_block_wins_over_success_marker() {
        let body = "<h4>Errors</h4><ul><li>Duplicate</li></ul><a href=\"?success=true\">";
        assert_eq!(classify(body, "TR"), Outcome::handled("Duplicate"));
    }

    #[test]
    fn single_error_wins_over_missing_information() {
        let body = "<h4>Error:</h4>Bad value</div> Required fields are missing";
        assert_eq!(classify(body, "TR"), Outcome::handled("Bad value"));
    }

    #[test]
    fn missing_information_wins_over_success_marker() {
        let body = "Required fields are missing ... success=true";
        assert_eq!(classify(body, "ZZ"), Outcome::handled("ZZ does not exist"));
    }

    #[test]
    fn errors_block_without_list_items_uses_block_text() {
        let body = "<h4>Errors</h4> Something went wrong </div>";
        assert_eq!(classify(body, "TR"), Outcome::handled("Something went wrong"));
    }
}
