//! 作业登记表
//!
//! 保证同一类型的作业同时最多只有一个在运行。核心只消费这个接口，
//! 互斥本身由登记表的实现负责

use crate::error::JobError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Mutex;

/// 登记表中一次运行的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Aborted,
    Finished,
}

/// 一次已登记运行的句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub job_type: String,
    pub run_id: u64,
}

impl Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.job_type, self.run_id)
    }
}

#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// 该类型是否已有登记中的运行
    async fn is_active(&self, job_type: &str) -> bool;

    /// 原子地"检查并登记"；已有运行时返回 `AlreadyRunning`
    async fn register(&self, job_type: &str) -> Result<JobHandle, JobError>;

    async fn status(&self, handle: &JobHandle) -> Option<JobStatus>;

    /// 请求中止：后续工作单元不再被调度
    async fn abort(&self, handle: &JobHandle);

    async fn mark_finished(&self, handle: &JobHandle);

    /// 解除登记，之后同类型作业可以再次启动
    async fn unregister(&self, handle: &JobHandle);
}

#[derive(Default)]
struct RegistryState {
    next_run_id: u64,
    active: HashMap<String, u64>,
    runs: HashMap<u64, JobStatus>,
}

/// 进程内登记表
#[derive(Default)]
pub struct InMemoryJobRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RegistryState) -> T) -> T {
        // 锁内不会 panic，中毒后数据仍然一致
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

#[async_trait]
impl JobRegistry for InMemoryJobRegistry {
    async fn is_active(&self, job_type: &str) -> bool {
        self.with_state(|s| s.active.contains_key(job_type))
    }

    async fn register(&self, job_type: &str) -> Result<JobHandle, JobError> {
        self.with_state(|s| {
            if s.active.contains_key(job_type) {
                return Err(JobError::AlreadyRunning {
                    job_type: job_type.to_string(),
                });
            }
            s.next_run_id += 1;
            let run_id = s.next_run_id;
            s.active.insert(job_type.to_string(), run_id);
            s.runs.insert(run_id, JobStatus::Running);
            Ok(JobHandle {
                job_type: job_type.to_string(),
                run_id,
            })
        })
    }

    async fn status(&self, handle: &JobHandle) -> Option<JobStatus> {
        self.with_state(|s| s.runs.get(&handle.run_id).copied())
    }

    async fn abort(&self, handle: &JobHandle) {
        self.with_state(|s| {
            if let Some(status) = s.runs.get_mut(&handle.run_id) {
                if *status == JobStatus::Running {
                    *status = JobStatus::Aborted;
                }
            }
        })
    }

    async fn mark_finished(&self, handle: &JobHandle) {
        self.with_state(|s| {
            if let Some(status) = s.runs.get_mut(&handle.run_id) {
                *status = JobStatus::Finished;
            }
        })
    }

    async fn unregister(&self, handle: &JobHandle) {
        self.with_state(|s| {
            if s.active.get(&handle.job_type) == Some(&handle.run_id) {
                s.active.remove(&handle.job_type);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_registration_is_rejected() {
        let registry = InMemoryJobRegistry::new();
        let first = registry.register("provision").await.unwrap();

        assert!(registry.is_active("provision").await);
        let err = registry.register("provision").await.unwrap_err();
        assert!(matches!(err, JobError::AlreadyRunning { .. }));

        registry.unregister(&first).await;
        assert!(!registry.is_active("provision").await);
        assert!(registry.register("provision").await.is_ok());
    }

    #[tokio::test]
    async fn different_job_types_do_not_conflict() {
        let registry = InMemoryJobRegistry::new();
        registry.register("a").await.unwrap();
        assert!(registry.register("b").await.is_ok());
    }

    #[tokio::test]
    async fn abort_and_finish_update_status() {
        let registry = InMemoryJobRegistry::new();
        let handle = registry.register("provision").await.unwrap();
        assert_eq!(registry.status(&handle).await, Some(JobStatus::Running));

        registry.abort(&handle).await;
        assert_eq!(registry.status(&handle).await, Some(JobStatus::Aborted));

        registry.mark_finished(&handle).await;
        registry.unregister(&handle).await;
        assert_eq!(registry.status(&handle).await, Some(JobStatus::Finished));
    }

    #[tokio::test]
    async fn stale_handle_does_not_unregister_newer_run() {
        let registry = InMemoryJobRegistry::new();
        let old = registry.register("provision").await.unwrap();
        registry.unregister(&old).await;
        let _new = registry.register("provision").await.unwrap();

        registry.unregister(&old).await;
        assert!(registry.is_active("provision").await);
    }
}
