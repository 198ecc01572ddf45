#![allow(dead_code)]

use add_state_submit::error::TransportError;
use add_state_submit::infrastructure::http_transport::mocks::ScriptedTransport;
use add_state_submit::infrastructure::{HttpMethod, HttpRequest, HttpResponse};
use add_state_submit::orchestrator::{Collaborators, InMemoryJobRegistry};
use add_state_submit::services::{MemoryArtifactStore, RecordingNotifier};
use add_state_submit::Config;
use std::sync::Arc;
use url::form_urlencoded;

pub const BASE_URL: &str = "https://remote.test";
pub const PREFIX: &str = "com.salesforce.visualforce.";

pub const SUCCESS_BODY: &str =
    "<script>window.location.href='/i18n/ConfigureNewState?success=true';</script>";
pub const MISSING_INFO_BODY: &str = "<div>Required fields are missing: [Country]</div>";
pub const UNKNOWN_BODY: &str = "<html><body>Scheduled maintenance</body></html>";

pub fn config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        session_id: "SID".to_string(),
        ..Config::default()
    }
}

/// 带四个令牌的表单页面，令牌值以 `tag` 区分
pub fn form_page(tag: &str) -> String {
    let field = |name: &str, value: String| {
        format!(r#"<input type="hidden" id="{PREFIX}{name}" name="{PREFIX}{name}" value="{value}" />"#)
    };
    format!(
        "<html><form id=\"configurenew:j_id1\">{}{}{}{}</form></html>",
        field("ViewState", format!("vs-{tag}")),
        field("ViewStateMAC", format!("mac-{tag}")),
        field("ViewStateCSRF", format!("csrf-{tag}")),
        field("ViewStateVersion", "202410".to_string()),
    )
}

/// 取表单中以 `suffix` 结尾的字段值
pub fn post_field(request: &HttpRequest, suffix: &str) -> Option<String> {
    let body = request.body.as_deref()?;
    form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k.ends_with(suffix))
        .map(|(_, v)| v.into_owned())
}

pub fn is_form_get(request: &HttpRequest) -> bool {
    request.method == HttpMethod::Get && request.url.contains("ConfigureNewState?countryIso=")
}

pub fn is_post(request: &HttpRequest) -> bool {
    request.method == HttpMethod::Post
}

/// 模拟远端：探活返回首页，表单 GET 返回带编号令牌的页面，
/// POST 交给 `respond(地区, 子区划)` 决定响应体
pub fn fake_remote(
    respond: impl Fn(&str, &str) -> String + Send + 'static,
) -> ScriptedTransport {
    let mut last_region = String::new();
    let mut served = 0usize;
    ScriptedTransport::new(move |request: &HttpRequest| -> Result<HttpResponse, TransportError> {
        if is_form_get(request) {
            served += 1;
            last_region = request
                .url
                .rsplit("countryIso=")
                .next()
                .unwrap_or_default()
                .to_string();
            return Ok(HttpResponse::ok(form_page(&format!("{last_region}-{served}"))));
        }
        if is_post(request) {
            let code = post_field(request, "editIsoCode").unwrap_or_default();
            return Ok(HttpResponse::ok(respond(&last_region, &code)));
        }
        Ok(HttpResponse::ok("<html>home</html>"))
    })
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub registry: Arc<InMemoryJobRegistry>,
    pub artifacts: Arc<MemoryArtifactStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(transport: ScriptedTransport) -> Self {
        Self::with_registry(transport, Arc::new(InMemoryJobRegistry::new()))
    }

    pub fn with_registry(transport: ScriptedTransport, registry: Arc<InMemoryJobRegistry>) -> Self {
        Self {
            transport: Arc::new(transport),
            registry,
            artifacts: Arc::new(MemoryArtifactStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            transport: self.transport.clone(),
            registry: self.registry.clone(),
            artifacts: self.artifacts.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn posts(&self) -> Vec<HttpRequest> {
        self.transport.requests().into_iter().filter(is_post).collect()
    }
}
