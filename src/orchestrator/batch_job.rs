//! 批量录入作业 - 编排层
//!
//! ## 职责
//!
//! 本模块是一次运行的所有者，负责状态迁移、工作单元处理和报告汇总。
//!
//! ## 状态机
//!
//! ```text
//! Idle ──start──▶ Running ──finish──▶ Finished
//!                    │
//!                    └──release（已中止）──▶ Finished（不发报告）
//! ```
//!
//! - `start`：登记表互斥检查 → 登记 → 探活 → 读取 scope 列表
//! - `process_unit`：单元内按顺序逐个提交，已处理失败记入 `RunState`，
//!   无法识别的响应单独存档，传输错误终止本单元并向上抛出；
//!   任意两次提交之间至少间隔 `submit_delay_ms`，不论是否跨单元
//! - `finish`：生成并投递唯一一份报告

use crate::config::Config;
use crate::error::{AppResult, JobError};
use crate::infrastructure::{HttpTransport, RetryingHttpClient};
use crate::models::{Catalog, Outcome, ScopeKey};
use crate::orchestrator::job_registry::{JobHandle, JobRegistry, JobStatus};
use crate::services::{ArtifactStore, Notifier};
use crate::utils::logging;
use crate::workflow::SubmissionWorkflow;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

/// 登记表中本作业的类型名
pub const JOB_TYPE: &str = "add_state_submit";

/// 没有任何已处理失败时的报告内容
pub const EMPTY_REPORT: &str = "No handled exceptions";

/// 作业生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Finished,
}

impl JobState {
    fn name(self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Running => "Running",
            JobState::Finished => "Finished",
        }
    }
}

/// 作业依赖的外部协作方
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn HttpTransport>,
    pub registry: Arc<dyn JobRegistry>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// 一次运行内累计的已处理失败消息（按发生顺序）
#[derive(Debug, Default)]
pub struct RunState {
    handled: Vec<String>,
}

impl RunState {
    pub fn record(&mut self, scope: &ScopeKey, message: &str) {
        self.handled.push(format!(
            "region: {}, subdivision: {} — {}",
            scope.region_code(),
            scope.subdivision_code(),
            message
        ));
    }

    pub fn messages(&self) -> &[String] {
        &self.handled
    }

    /// 生成报告：为空时给出固定提示，否则按行拼接
    pub fn report(&self) -> String {
        if self.handled.is_empty() {
            EMPTY_REPORT.to_string()
        } else {
            self.handled.join("\n")
        }
    }
}

/// 运行统计（只写日志，不进报告）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub success: usize,
    pub handled: usize,
    pub unexpected: usize,
    pub failed_units: usize,
}

/// 单个工作单元的处理结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    pub processed: usize,
    pub success: usize,
    pub skipped: usize,
}

/// 批量录入作业
pub struct BatchJob {
    state: JobState,
    catalog: Catalog,
    workflow: SubmissionWorkflow,
    collaborators: Collaborators,
    chunk_size: usize,
    submit_delay: Duration,
    last_submit: Option<Instant>,
    report_delivered: Option<bool>,
    handle: Option<JobHandle>,
    scopes: Vec<ScopeKey>,
    run_state: RunState,
    stats: RunStats,
    processed: Vec<ScopeKey>,
    processed_set: HashSet<ScopeKey>,
}

impl BatchJob {
    /// 创建处于 `Idle` 状态的作业
    pub fn new(config: &Config, catalog: Catalog, collaborators: Collaborators) -> Self {
        let client = RetryingHttpClient::new(collaborators.transport.clone());
        Self {
            state: JobState::Idle,
            catalog,
            workflow: SubmissionWorkflow::new(config, client),
            collaborators,
            chunk_size: config.chunk_size.max(1),
            submit_delay: Duration::from_millis(config.submit_delay_ms),
            last_submit: None,
            report_delivered: None,
            handle: None,
            scopes: Vec::new(),
            run_state: RunState::default(),
            stats: RunStats::default(),
            processed: Vec::new(),
            processed_set: HashSet::new(),
        }
    }

    /// `Idle → Running`
    pub async fn start(&mut self) -> AppResult<JobHandle> {
        if self.state != JobState::Idle {
            return Err(JobError::NotRunning {
                state: self.state.name(),
            }
            .into());
        }

        let registry = &self.collaborators.registry;
        if registry.is_active(JOB_TYPE).await {
            return Err(JobError::AlreadyRunning {
                job_type: JOB_TYPE.to_string(),
            }
            .into());
        }
        let handle = registry.register(JOB_TYPE).await?;
        info!("✓ 作业已登记: {}", handle);

        // 探活失败时尽早退出，并释放登记
        let probe = self.workflow.probe_request();
        if let Err(e) = self.workflow.client().exchange(&probe).await {
            error!("❌ 远端系统不可达: {}", e);
            registry.unregister(&handle).await;
            return Err(JobError::Unreachable { source: e }.into());
        }

        self.scopes = self.catalog.scope_keys();
        self.stats.total = self.scopes.len();
        self.handle = Some(handle.clone());
        self.state = JobState::Running;

        logging::log_catalog_loaded(self.scopes.len(), self.units().len());
        Ok(handle)
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    /// 按 `chunk_size` 切分后的工作单元（保持目录顺序）
    pub fn units(&self) -> Vec<Vec<ScopeKey>> {
        self.scopes
            .chunks(self.chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// 处理一个工作单元
    ///
    /// 本次运行中已得出结果的 scope 会被跳过，因此调度器重跑失败单元时
    /// 不会重复提交
    pub async fn process_unit(&mut self, scopes: &[ScopeKey]) -> AppResult<UnitSummary> {
        self.ensure_running()?;

        let mut summary = UnitSummary::default();

        for scope in scopes {
            if self.processed_set.contains(scope) {
                debug!("[{}] 本次运行已处理，跳过", scope);
                summary.skipped += 1;
                continue;
            }
            let display_name = self
                .catalog
                .display_name(scope)
                .map(str::to_string)
                .ok_or_else(|| JobError::UnknownScope {
                    scope: scope.to_string(),
                })?;

            self.pace().await;
            let outcome = self.workflow.submit(scope, &display_name).await?;
            if outcome.is_success() {
                summary.success += 1;
            }
            self.apply_outcome(scope, outcome).await;

            self.processed.push(scope.clone());
            self.processed_set.insert(scope.clone());
            summary.processed += 1;
        }

        Ok(summary)
    }

    /// 距上一次提交不足 `submit_delay` 时等待
    async fn pace(&mut self) {
        if let Some(last) = self.last_submit {
            if !self.submit_delay.is_zero() {
                sleep_until(last + self.submit_delay).await;
            }
        }
        self.last_submit = Some(Instant::now());
    }

    async fn apply_outcome(&mut self, scope: &ScopeKey, outcome: Outcome) {
        match outcome {
            Outcome::Success => {
                self.stats.success += 1;
                info!("[{}] ✅ 录入成功", scope);
            }
            Outcome::HandledFailure { message } => {
                self.stats.handled += 1;
                warn!("[{}] ⚠️ 远端拒绝: {}", scope, message);
                self.run_state.record(scope, &message);
            }
            Outcome::UnexpectedFailure { raw_body } => {
                self.stats.unexpected += 1;
                match self.collaborators.artifacts.store(scope, &raw_body).await {
                    Ok(location) => warn!("[{}] ❓ 无法识别的响应，已存档: {}", scope, location),
                    Err(e) => error!("[{}] ❌ 无法识别的响应存档失败: {}", scope, e),
                }
            }
        }
    }

    /// 调度器在单元最终失败后调用
    pub fn record_failed_unit(&mut self) {
        self.stats.failed_units += 1;
    }

    /// 登记表是否已请求中止
    pub async fn is_aborted(&self) -> bool {
        match &self.handle {
            Some(handle) => {
                self.collaborators.registry.status(handle).await == Some(JobStatus::Aborted)
            }
            None => false,
        }
    }

    /// 请求中止；正在执行的单元会跑完
    pub async fn abort(&self) -> AppResult<()> {
        let handle = self.handle.as_ref().ok_or(JobError::NotRunning {
            state: self.state.name(),
        })?;
        self.collaborators.registry.abort(handle).await;
        info!("🛑 已请求中止作业 {}", handle);
        Ok(())
    }

    /// 提前结束（中止或出现不可重跑的错误）后的收尾：解除登记，不发送报告
    pub async fn release(&mut self) -> AppResult<()> {
        self.ensure_running()?;
        if let Some(handle) = &self.handle {
            self.collaborators.registry.unregister(handle).await;
        }
        self.state = JobState::Finished;
        warn!(
            "🛑 作业提前结束，已处理 {}/{} 个 scope，不发送报告",
            self.processed.len(),
            self.stats.total
        );
        Ok(())
    }

    /// `Running → Finished`：生成并投递唯一一份报告
    pub async fn finish(&mut self) -> AppResult<String> {
        self.ensure_running()?;

        let report = self.run_state.report();
        let notifier = &self.collaborators.notifier;
        let delivered = match notifier.deliver(&report).await {
            Ok(()) => true,
            Err(e) => {
                error!("❌ 报告投递失败: {}", e);
                false
            }
        };
        self.report_delivered = Some(delivered);

        if let Some(handle) = &self.handle {
            self.collaborators.registry.mark_finished(handle).await;
            self.collaborators.registry.unregister(handle).await;
        }
        self.state = JobState::Finished;

        let target = notifier.target();
        logging::print_final_stats(&self.stats, delivered.then_some(target.as_str()));
        Ok(report)
    }

    /// 报告是否投递成功；`finish` 之前为 `None`
    pub fn report_delivered(&self) -> Option<bool> {
        self.report_delivered
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// 本次运行中已得出结果的 scope（按处理顺序）
    pub fn processed(&self) -> &[ScopeKey] {
        &self.processed
    }

    fn ensure_running(&self) -> Result<(), JobError> {
        if self.state == JobState::Running {
            Ok(())
        } else {
            Err(JobError::NotRunning {
                state: self.state.name(),
            })
        }
    }
}
