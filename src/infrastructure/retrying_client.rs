//! 带单次重试的 HTTP 客户端 - 基础设施层

use crate::error::TransportError;
use crate::infrastructure::http_transport::{HttpRequest, HttpResponse, HttpTransport};
use std::sync::Arc;
use tracing::warn;

/// 执行一次逻辑 HTTP 交换，传输失败时恰好再试一次
///
/// 职责：
/// - 只重试传输层错误（连接失败、超时、读取失败）
/// - 应用层错误响应原样交给调用方
/// - 不认识表单 / scope，只转发请求
#[derive(Clone)]
pub struct RetryingHttpClient {
    transport: Arc<dyn HttpTransport>,
}

impl RetryingHttpClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 执行交换；第二次失败的错误原样返回
    pub async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        match self.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(first) => {
                warn!(
                    "⚠️ {} {} 传输失败: {}，重试一次...",
                    request.method, request.url, first
                );
                self.transport.send(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_transport::mocks::ScriptedTransport;
    use std::time::Duration;

    fn request() -> HttpRequest {
        HttpRequest::get("https://remote.test/", Duration::from_secs(60))
    }

    fn timeout() -> TransportError {
        TransportError::Timeout {
            url: "https://remote.test/".to_string(),
        }
    }

    #[tokio::test]
    async fn success_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::always("hello"));
        let client = RetryingHttpClient::new(transport.clone());

        let response = client.exchange(&request()).await.unwrap();
        assert_eq!(response.body, "hello");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn single_transport_failure_is_retried_once() {
        let mut calls = 0;
        let transport = Arc::new(ScriptedTransport::new(move |_| {
            calls += 1;
            if calls == 1 {
                Err(timeout())
            } else {
                Ok(HttpResponse::ok("second"))
            }
        }));
        let client = RetryingHttpClient::new(transport.clone());

        let response = client.exchange(&request()).await.unwrap();
        assert_eq!(response.body, "second");
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn second_failure_propagates_untransformed() {
        let mut calls = 0;
        let transport = Arc::new(ScriptedTransport::new(move |_| {
            calls += 1;
            if calls == 1 {
                Err(timeout())
            } else {
                Err(TransportError::Connect {
                    url: "https://remote.test/".to_string(),
                    message: "refused".to_string(),
                })
            }
        }));
        let client = RetryingHttpClient::new(transport.clone());

        let err = client.exchange(&request()).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Connect {
                url: "https://remote.test/".to_string(),
                message: "refused".to_string(),
            }
        );
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn application_error_status_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(HttpResponse {
                status: 500,
                body: "server error".to_string(),
            })
        }));
        let client = RetryingHttpClient::new(transport.clone());

        let response = client.exchange(&request()).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(transport.call_count(), 1);
    }
}
