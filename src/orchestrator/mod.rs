//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次批量运行的生命周期和调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `job_registry` - 作业登记表
//! - 保证同类型作业同时最多一个运行
//! - 提供中止 / 状态查询
//!
//! ### `batch_job` - 批量录入作业
//! - 状态机 `Idle → Running → Finished`
//! - 启动时探活并读取 scope 列表
//! - 逐单元处理，累计已处理失败，存档无法识别的响应
//! - 结束时投递唯一一份报告
//!
//! ### `scheduler` - 分块调度器
//! - 逐个工作单元驱动作业，按策略重跑传输失败的单元
//!
//! ### `app` - 应用入口
//! - 组装协作方并跑完一次运行
//!
//! ## 层次关系
//!
//! ```text
//! app / scheduler (处理 Vec<unit>)
//!     ↓
//! batch_job (处理 unit 内的 Vec<ScopeKey>)
//!     ↓
//! workflow::SubmissionWorkflow (处理单个 scope)
//!     ↓
//! services (能力层：extract / build / classify / store / notify)
//!     ↓
//! infrastructure (基础设施：RetryingHttpClient)
//! ```

pub mod app;
pub mod batch_job;
pub mod job_registry;
pub mod scheduler;

// 重新导出主要类型
pub use app::App;
pub use batch_job::{
    BatchJob, Collaborators, JobState, RunState, RunStats, UnitSummary, EMPTY_REPORT, JOB_TYPE,
};
pub use job_registry::{InMemoryJobRegistry, JobHandle, JobRegistry, JobStatus};
pub use scheduler::ChunkScheduler;
