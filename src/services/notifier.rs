//! 运行报告投递 - 业务能力层
//!
//! 只负责把一次运行的报告交出去，每次运行调用一次，不重试

use crate::error::FileError;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::fs;
use tracing::info;

/// 报告投递渠道
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, report: &str) -> Result<(), FileError>;

    /// 投递位置描述（用于日志）
    fn target(&self) -> String;
}

/// 把报告写入文件并同步输出到日志
pub struct FileNotifier {
    path: String,
}

impl FileNotifier {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Notifier for FileNotifier {
    async fn deliver(&self, report: &str) -> Result<(), FileError> {
        let content = format!(
            "{}\n地区子区划录入报告 - {}\n{}\n\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60),
            report
        );

        fs::write(&self.path, content)
            .await
            .map_err(|e| FileError::write(&self.path, e))?;

        info!("📨 运行报告:\n{}", report);
        Ok(())
    }

    fn target(&self) -> String {
        self.path.clone()
    }
}

/// 记录收到的报告，用于测试
#[derive(Default)]
pub struct RecordingNotifier {
    reports: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, report: &str) -> Result<(), FileError> {
        self.reports.lock().unwrap().push(report.to_string());
        Ok(())
    }

    fn target(&self) -> String {
        "memory".to_string()
    }
}
