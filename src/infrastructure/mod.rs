//! 基础设施层：持有网络客户端，只暴露"执行 HTTP 交换"的能力

pub mod http_transport;
pub mod retrying_client;

pub use http_transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use retrying_client::RetryingHttpClient;
