//! 分块调度器 - 编排层
//!
//! 逐个工作单元驱动已启动的作业：检查中止请求、按策略重跑失败单元，
//! 全部完成后触发 `finish`

use crate::error::AppResult;
use crate::models::ScopeKey;
use crate::orchestrator::batch_job::BatchJob;
use crate::utils::logging;
use tracing::{error, warn};

/// 分块调度器
pub struct ChunkScheduler {
    max_unit_attempts: usize,
}

impl ChunkScheduler {
    pub fn new(max_unit_attempts: usize) -> Self {
        Self {
            max_unit_attempts: max_unit_attempts.max(1),
        }
    }

    /// 跑完作业的全部工作单元
    ///
    /// # 返回
    /// 正常结束时返回报告内容；被中止时返回 `None`
    pub async fn run(&self, job: &mut BatchJob) -> AppResult<Option<String>> {
        let units = job.units();
        self.run_units(job, &units).await
    }

    /// 按给定顺序驱动工作单元
    ///
    /// # 参数
    /// - `job`: 已启动的作业
    /// - `units`: 待处理的工作单元
    ///
    /// # 返回
    /// 正常结束时返回报告内容；被中止时返回 `None`。
    /// 出现不可重跑的错误时先释放登记再返回该错误
    pub async fn run_units(
        &self,
        job: &mut BatchJob,
        units: &[Vec<ScopeKey>],
    ) -> AppResult<Option<String>> {
        let total_units = units.len();

        for (idx, unit) in units.iter().enumerate() {
            let unit_num = idx + 1;

            if job.is_aborted().await {
                warn!("🛑 收到中止请求，停止调度剩余 {} 个工作单元", total_units - idx);
                job.release().await?;
                return Ok(None);
            }

            logging::log_unit_start(unit_num, total_units, unit.len());

            let mut attempt = 0;
            loop {
                attempt += 1;
                match job.process_unit(unit).await {
                    Ok(summary) => {
                        logging::log_unit_complete(unit_num, summary.success, unit.len());
                        break;
                    }
                    Err(e) if e.is_transport() && attempt < self.max_unit_attempts => {
                        warn!(
                            "[单元 {}] ⚠️ {} (尝试 {}/{})，重新调度...",
                            unit_num, e, attempt, self.max_unit_attempts
                        );
                    }
                    Err(e) if e.is_transport() => {
                        error!("[单元 {}] ❌ 工作单元失败: {}", unit_num, e);
                        job.record_failed_unit();
                        break;
                    }
                    Err(e) => {
                        error!("[单元 {}] ❌ 不可重跑的错误，结束作业: {}", unit_num, e);
                        if let Err(release_err) = job.release().await {
                            warn!("⚠️ 释放作业失败: {}", release_err);
                        }
                        return Err(e);
                    }
                }
            }
        }

        let report = job.finish().await?;
        Ok(Some(report))
    }
}
