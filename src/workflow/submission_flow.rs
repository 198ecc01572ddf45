//! 单条目录项提交流程 - 流程层
//!
//! 核心职责：定义"一个 scope"的完整提交流程
//!
//! 流程顺序：
//! 1. GET 表单页面（按地区代码）
//! 2. 提取四个令牌（缺失 → UnexpectedFailure）
//! 3. 计算提交标签
//! 4. 构建表单
//! 5. POST 提交
//! 6. 分类响应

use crate::config::Config;
use crate::error::TransportError;
use crate::infrastructure::{HttpRequest, RetryingHttpClient};
use crate::models::{Outcome, ScopeKey};
use crate::services::{classify, submission_label, FormTokenExtractor, SubmissionBuilder};
use crate::utils::logging::truncate_text;
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

const FORM_PATH: &str = "/i18n/ConfigureNewState";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 单条目录项提交流程
///
/// - 每次调用恰好一次 GET + 一次 POST（各自内部最多重试一次）
/// - 令牌只用于本次 POST，不跨 scope 复用
/// - 传输错误原样向上抛出，由编排层处理
pub struct SubmissionWorkflow {
    client: RetryingHttpClient,
    extractor: FormTokenExtractor,
    builder: SubmissionBuilder,
    base_url: String,
    session_header: (String, String),
    timeout: Duration,
    label_sentinel: String,
}

impl SubmissionWorkflow {
    pub fn new(config: &Config, client: RetryingHttpClient) -> Self {
        Self {
            client,
            extractor: FormTokenExtractor::new(&config.token_field_prefix),
            builder: SubmissionBuilder::new(&config.token_field_prefix),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_header: config.session_credential(),
            timeout: config.request_timeout(),
            label_sentinel: config.label_sentinel.clone(),
        }
    }

    /// 为一个 scope 执行一次完整的 GET → 构建 → POST → 分类
    ///
    /// # 参数
    /// - `scope`: 待录入的 scope
    /// - `display_name`: 目录中的显示名
    ///
    /// # 返回
    /// 分类结果；只有重试后仍失败的传输错误才返回 `Err`
    pub async fn submit(
        &self,
        scope: &ScopeKey,
        display_name: &str,
    ) -> Result<Outcome, TransportError> {
        let region = scope.region_code();
        let subdivision = scope.subdivision_code();

        // ========== 1. 获取表单页面 ==========
        let form_page = self.client.exchange(&self.form_request(region)).await?;

        // ========== 2. 提取令牌 ==========
        let tokens = match self.extractor.extract(&form_page.body) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("[{}] ⚠️ {}", scope, e);
                return Ok(Outcome::unexpected(form_page.body));
            }
        };

        // ========== 3-4. 构建表单 ==========
        let label = submission_label(display_name, subdivision, &self.label_sentinel);
        if label != display_name {
            debug!("[{}] 显示名包含子区划代码，使用占位标签 {}", scope, label);
        }
        let body = self
            .builder
            .build(scope, label, subdivision, display_name, &tokens);

        // ========== 5. 提交 ==========
        let request = HttpRequest::post(self.form_url(), body, self.timeout)
            .header(&self.session_header.0, &self.session_header.1)
            .header("Content-Type", FORM_CONTENT_TYPE);
        let response = self.client.exchange(&request).await?;

        debug!(
            "[{}] 提交响应 {}: {}",
            scope,
            response.status,
            truncate_text(&response.body, 200)
        );

        // ========== 6. 分类 ==========
        Ok(classify(&response.body, region))
    }

    /// 探活请求：GET 根地址
    pub fn probe_request(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/", self.base_url), self.timeout)
            .header(&self.session_header.0, &self.session_header.1)
    }

    pub fn client(&self) -> &RetryingHttpClient {
        &self.client
    }

    fn form_url(&self) -> String {
        format!("{}{}", self.base_url, FORM_PATH)
    }

    fn form_request(&self, region: &str) -> HttpRequest {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("countryIso", region)
            .finish();
        HttpRequest::get(format!("{}?{}", self.form_url(), query), self.timeout)
            .header(&self.session_header.0, &self.session_header.1)
    }
}
