//! HTTP 传输 - 基础设施层
//!
//! 持有 reqwest 客户端，只暴露"执行一次 HTTP 交换"的能力

use crate::error::TransportError;
use async_trait::async_trait;
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

/// 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// 一次逻辑 HTTP 交换的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
            timeout,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 响应：任何状态码都原样返回，由调用方解释
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// 执行单次 HTTP 交换的能力
///
/// 只在连接、超时、读取失败时返回 `TransportError`；
/// 应用层错误（包括非 2xx 状态）作为正常响应返回
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// 基于 reqwest 的传输实现
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn classify_error(url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify_error(&request.url, e))?;
        let status = response.status().as_u16();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                TransportError::Body {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("{} {} -> {} ({} 字节)", request.method, request.url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    type Handler = Box<dyn FnMut(&HttpRequest) -> Result<HttpResponse, TransportError> + Send>;

    /// 按脚本应答的传输实现，记录收到的全部请求
    pub struct ScriptedTransport {
        handler: Mutex<Handler>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(
            handler: impl FnMut(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + 'static,
        ) -> Self {
            Self {
                handler: Mutex::new(Box::new(handler)),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// 所有请求都返回同一响应体
        pub fn always(body: impl Into<String>) -> Self {
            let body = body.into();
            Self::new(move |_| Ok(HttpResponse::ok(body.clone())))
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut handler = self.handler.lock().unwrap();
            (*handler)(request)
        }
    }
}
