use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 传输层错误（已用尽唯一一次重试）
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 表单页面缺少令牌
    #[error("页面错误: {0}")]
    Page(#[from] MalformedPageError),
    /// 作业生命周期错误
    #[error("作业错误: {0}")]
    Job(#[from] JobError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 是否为传输层错误（调度器据此决定是否重跑工作单元）
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

/// 传输层错误
///
/// 只有这一类错误会被 `RetryingHttpClient` 重试
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// 请求超时
    #[error("请求超时: {url}")]
    Timeout { url: String },
    /// 无法建立连接
    #[error("连接失败 ({url}): {message}")]
    Connect { url: String, message: String },
    /// 请求发送失败
    #[error("请求失败 ({url}): {message}")]
    Request { url: String, message: String },
    /// 读取响应体失败
    #[error("读取响应失败 ({url}): {message}")]
    Body { url: String, message: String },
}

/// 表单页面中缺少某个令牌标记
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("表单页面缺少令牌: {missing}")]
pub struct MalformedPageError {
    pub missing: &'static str,
}

/// 作业生命周期错误
#[derive(Debug, Error)]
pub enum JobError {
    /// 同类型作业已在运行
    #[error("作业 {job_type} 已在运行")]
    AlreadyRunning { job_type: String },
    /// 当前状态不允许该操作
    #[error("作业当前状态为 {state}，无法执行该操作")]
    NotRunning { state: &'static str },
    /// 作业已被中止
    #[error("作业已被中止")]
    Aborted,
    /// 工作单元中出现目录之外的 scope
    #[error("scope {scope} 不在目录中")]
    UnknownScope { scope: String },
    /// 启动时探活失败
    #[error("远端系统不可达: {source}")]
    Unreachable {
        #[source]
        source: TransportError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 内容解析失败
    #[error("解析文件失败 ({path}): {message}")]
    Parse { path: String, message: String },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必填项缺失
    #[error("缺少必需配置 {name}")]
    Missing { name: &'static str },
    /// 配置值不合法
    #[error("配置 {name} 的值 '{value}' 无效，应为{expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ========== 便捷构造函数 ==========

impl FileError {
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::Write {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        FileError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
