//! # Add State Submit
//!
//! 通过远端管理系统的网页表单，批量录入 (地区, 子区划) 配置项
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有网络客户端，只暴露能力
//! - `RetryingHttpClient` - 一次逻辑交换，传输失败时恰好重试一次
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 scope
//! - `FormTokenExtractor` - 从表单页面提取四个状态令牌
//! - `SubmissionBuilder` - 构建提交表单
//! - `classify` - 把响应体归类为 `Outcome`
//! - `ArtifactStore` / `Notifier` - 存档与报告投递
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 scope"的完整提交流程
//! - `SubmissionWorkflow` - GET → 提取 → 构建 → POST → 分类
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_job` - 单次运行的状态机与报告汇总
//! - `orchestrator/scheduler` - 逐单元调度
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::RetryingHttpClient;
pub use models::{Catalog, Outcome, ScopeKey};
pub use orchestrator::{App, BatchJob, ChunkScheduler};
pub use workflow::SubmissionWorkflow;
