//! 应用入口 - 编排层
//!
//! 负责组装协作方（传输、登记表、存档、报告）并驱动一次完整运行

use crate::config::Config;
use crate::infrastructure::ReqwestTransport;
use crate::models::{load_catalog, Catalog};
use crate::orchestrator::batch_job::{BatchJob, Collaborators};
use crate::orchestrator::job_registry::InMemoryJobRegistry;
use crate::orchestrator::scheduler::ChunkScheduler;
use crate::services::{FileArtifactStore, FileNotifier};
use crate::utils::logging;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    catalog: Catalog,
    collaborators: Collaborators,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置不完整")?;

        logging::log_startup(&config.base_url, config.chunk_size);

        // 加载目录
        info!("\n📁 正在加载目录: {}", config.catalog_path);
        let mut catalog = load_catalog(Path::new(&config.catalog_path)).await?;
        if !config.region_filter.is_empty() {
            catalog.retain_regions(&config.region_filter);
            info!(
                "🔎 仅处理地区 {:?}，剩余 {} 条",
                config.region_filter,
                catalog.len()
            );
        }

        let transport = ReqwestTransport::new().context("无法创建 HTTP 客户端")?;
        let collaborators = Collaborators {
            transport: Arc::new(transport),
            registry: Arc::new(InMemoryJobRegistry::new()),
            artifacts: Arc::new(FileArtifactStore::new(&config.artifact_dir)),
            notifier: Arc::new(FileNotifier::new(&config.report_file)),
        };

        Ok(Self {
            config,
            catalog,
            collaborators,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        if self.catalog.is_empty() {
            warn!("⚠️ 目录为空，程序结束");
            return Ok(());
        }

        let mut job = BatchJob::new(&self.config, self.catalog, self.collaborators);
        job.start().await.context("作业启动失败")?;

        let scheduler = ChunkScheduler::new(self.config.max_unit_attempts);
        scheduler.run(&mut job).await?;

        Ok(())
    }
}
