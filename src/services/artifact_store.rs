//! 无法识别响应的存档 - 业务能力层
//!
//! 只负责"按 scope 保存原始响应体"能力，不关心流程

use crate::error::FileError;
use crate::models::ScopeKey;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;
use tracing::debug;

/// 按 scope 保存原始响应体的存储
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// 保存（覆盖）该 scope 的原始响应体，返回存放位置
    async fn store(&self, scope: &ScopeKey, raw_body: &str) -> Result<String, FileError>;
}

/// 写入目录 `<dir>/<REGION-SUBDIVISION>.html`
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 文件名只保留字母、数字、`-` 与 `_`，其余字符替换为 `_`，
    /// 保证结果始终落在存档目录内
    pub fn path_for(&self, scope: &ScopeKey) -> PathBuf {
        let file_stem: String = scope
            .to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.html", file_stem))
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn store(&self, scope: &ScopeKey, raw_body: &str) -> Result<String, FileError> {
        let path = self.path_for(scope);
        let location = path.display().to_string();

        debug!("保存原始响应: {} | 长度: {}", scope, raw_body.len());

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FileError::write(self.dir.display().to_string(), e))?;
        fs::write(&path, raw_body)
            .await
            .map_err(|e| FileError::write(&location, e))?;

        Ok(location)
    }
}

/// 内存存档，用于测试
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<BTreeMap<String, String>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &ScopeKey) -> Option<String> {
        self.artifacts.lock().unwrap().get(&scope.to_string()).cloned()
    }

    pub fn len(&self) -> usize {
        self.artifacts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, scope: &ScopeKey, raw_body: &str) -> Result<String, FileError> {
        let key = scope.to_string();
        self.artifacts
            .lock()
            .unwrap()
            .insert(key.clone(), raw_body.to_string());
        Ok(key)
    }
}
