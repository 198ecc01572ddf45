use crate::error::ConfigError;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 远端管理系统根地址
    pub base_url: String,
    /// 已登录会话的凭据
    pub session_id: String,
    /// 携带凭据的请求头名称
    pub session_header: String,
    /// 单次 HTTP 交换超时（秒）
    pub request_timeout_secs: u64,
    /// 每个工作单元包含的 scope 数量
    pub chunk_size: usize,
    /// 调度器对单个工作单元的最大尝试次数
    pub max_unit_attempts: usize,
    /// 相邻两次提交之间的间隔（毫秒）
    pub submit_delay_ms: u64,
    /// 显示名包含子区划代码时使用的占位标签
    pub label_sentinel: String,
    /// 四个表单令牌字段名的公共前缀
    pub token_field_prefix: String,
    /// 目录 TOML 文件路径
    pub catalog_path: String,
    /// 只处理这些地区代码（为空表示全部）
    pub region_filter: Vec<String>,
    /// 无法识别的响应存放目录
    pub artifact_dir: String,
    /// 运行报告输出文件
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://example.my.site.com".to_string(),
            session_id: String::new(),
            session_header: "Cookie".to_string(),
            request_timeout_secs: 60,
            chunk_size: 1,
            max_unit_attempts: 1,
            submit_delay_ms: 0,
            label_sentinel: "Unknown".to_string(),
            token_field_prefix: "com.salesforce.visualforce.".to_string(),
            catalog_path: "catalog.toml".to_string(),
            region_filter: Vec::new(),
            artifact_dir: "unexpected".to_string(),
            report_file: "report.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            session_id: std::env::var("SESSION_ID").unwrap_or(default.session_id),
            session_header: std::env::var("SESSION_HEADER").unwrap_or(default.session_header),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            chunk_size: std::env::var("CHUNK_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chunk_size),
            max_unit_attempts: std::env::var("MAX_UNIT_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_unit_attempts),
            submit_delay_ms: std::env::var("SUBMIT_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_delay_ms),
            label_sentinel: std::env::var("LABEL_SENTINEL").unwrap_or(default.label_sentinel),
            token_field_prefix: std::env::var("TOKEN_FIELD_PREFIX").unwrap_or(default.token_field_prefix),
            catalog_path: std::env::var("CATALOG_PATH").unwrap_or(default.catalog_path),
            region_filter: std::env::var("REGION_FILTER").map(|v| parse_region_filter(&v)).unwrap_or(default.region_filter),
            artifact_dir: std::env::var("ARTIFACT_DIR").unwrap_or(default.artifact_dir),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查运行前必须具备的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing { name: "BASE_URL" });
        }
        if self.session_id.trim().is_empty() {
            return Err(ConfigError::Missing { name: "SESSION_ID" });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                name: "CHUNK_SIZE",
                value: "0".to_string(),
                expected: "正整数",
            });
        }
        if self.max_unit_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_UNIT_ATTEMPTS",
                value: "0".to_string(),
                expected: "正整数",
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 按请求头类型组装会话凭据
    ///
    /// `Cookie` 头发送 `sid=<session_id>`，其他头原样发送
    pub fn session_credential(&self) -> (String, String) {
        let value = if self.session_header.eq_ignore_ascii_case("cookie") {
            format!("sid={}", self.session_id)
        } else {
            self.session_id.clone()
        };
        (self.session_header.clone(), value)
    }
}

fn parse_region_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
