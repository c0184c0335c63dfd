//! 日志工具模块
//!
//! 提供订阅器初始化、日志文件头和格式化输出的辅助函数

use crate::config::Config;
use crate::error::LoadError;
use crate::models::DocumentHandle;
use crate::orchestrator::BatchStats;
use crate::workflow::ExtractionReport;
use anyhow::Result;
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。重复调用不会 panic。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目抽取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题目抽取");
    info!("📄 题目文档: {}", config.document_path.display());
    info!("📊 每次测验题量: {}", config.quiz_size);
    if let Some(folder) = &config.documents_folder {
        info!(
            "📁 批量目录: {} (最大并发数: {})",
            folder.display(),
            config.max_concurrent_extractions
        );
    }
    info!("{}", "=".repeat(60));
}

/// 记录单份文档的批量抽取结果
pub fn log_batch_complete(
    doc_index: usize,
    document: &DocumentHandle,
    result: &std::result::Result<ExtractionReport, LoadError>,
) {
    match result {
        Ok(report) => info!(
            "[文档 {}] ✓ {}: 有效 {}/{} 个题块",
            doc_index,
            document.display_name(),
            report.questions.len(),
            report.blocks_seen
        ),
        Err(_) => warn!("[文档 {}] ✗ {}: 无可用测验", doc_index, document.display_name()),
    }
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &BatchStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批量抽取完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.loaded, stats.documents);
    info!("❌ 失败: {}", stats.failed);
    info!("📝 题目总数: {}", stats.questions);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
