//! 日志工具模块
//!
//! 提供日志初始化以及运行横幅的输出辅助函数

use crate::orchestrator::RunStats;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// 设置了 `RUST_LOG` 时以其为准，否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `base_url`: 远端系统根地址
/// - `chunk_size`: 每个工作单元包含的 scope 数
pub fn log_startup(base_url: &str, chunk_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量录入地区子区划");
    info!("🌐 目标系统: {}", base_url);
    info!("📊 每个工作单元: {} 个 scope", chunk_size);
    info!("{}", "=".repeat(60));
}

/// 记录目录加载信息
///
/// # 参数
/// - `total`: 待录入的 scope 总数
/// - `total_units`: 切分后的工作单元数
pub fn log_catalog_loaded(total: usize, total_units: usize) {
    info!("✓ 目录中共 {} 个待录入的 scope", total);
    info!("📋 划分为 {} 个工作单元", total_units);
    info!("💡 每个单元内按顺序逐个提交\n");
}

/// 记录工作单元开始信息
///
/// # 参数
/// - `unit_num`: 从 1 开始的单元序号
/// - `total_units`: 工作单元总数
/// - `scopes`: 本单元的 scope 数
pub fn log_unit_start(unit_num: usize, total_units: usize, scopes: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 个工作单元 ({} 个 scope)", unit_num, total_units, scopes);
    info!("{}", "=".repeat(60));
}

/// 记录工作单元完成信息
///
/// # 参数
/// - `unit_num`: 从 1 开始的单元序号
/// - `success`: 本单元录入成功的 scope 数
/// - `total`: 本单元的 scope 数
pub fn log_unit_complete(unit_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 个工作单元完成: 成功 {}/{}", unit_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 本次运行的统计
/// - `report_target`: 报告投递成功时为投递位置，失败时为 `None`
pub fn print_final_stats(stats: &RunStats, report_target: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("⚠️ 已处理的失败: {}", stats.handled);
    info!("❓ 无法识别的响应: {}", stats.unexpected);
    info!("❌ 失败的工作单元: {}", stats.failed_units);
    info!("{}", "=".repeat(60));
    match report_target {
        Some(target) => info!("\n报告已发送至: {}", target),
        None => error!("\n❌ 报告未能送达"),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原文
/// - `max_len`: 最多保留的字符数（按 char 计）
///
/// # 返回
/// 超长时截断并追加 `...`
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_text;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_text("伊斯坦布尔省", 3), "伊斯坦...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
