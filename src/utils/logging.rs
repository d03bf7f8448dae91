/// 日志工具模块
///
/// 提供启动信息和最终统计的输出；进度与总数同时打印到控制台
use crate::config::Config;
use crate::orchestrator::RunSummary;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 配置
/// - `timestamp`: 本次运行的时间戳
pub fn log_startup(config: &Config, timestamp: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量提取模式 (运行时间戳 {})", timestamp);
    info!("🌐 端点: {}", config.endpoint);
    info!("🤖 模型: {}", config.model);
    info!(
        "🔁 最多尝试 {} 次，退避系数 {} 秒",
        config.max_retries, config.backoff_factor
    );
    info!("{}", "=".repeat(60));
}

/// 记录输入加载信息
///
/// # 参数
/// - `iterations`: 轮数
/// - `reports`: 报告数量
/// - `prompts`: 提示词数量
pub fn log_inputs_loaded(iterations: u32, reports: usize, prompts: usize) {
    info!("✓ 共 {} 份报告，{} 条提示词", reports, prompts);
    info!(
        "📋 将执行 {} 轮，共 {} 个单元格",
        iterations,
        iterations as usize * reports * prompts
    );
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    println!("Total reports processed: {}", summary.total_processed);
    println!("Output written to: {}", summary.output_path.display());

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已处理报告: {}", summary.total_processed);
    info!("📝 写出记录: {}", summary.records_written);
    info!("❌ 跳过单元格: {}", summary.failed_cells);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", summary.output_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
