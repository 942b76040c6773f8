//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则 `verbose` 时为 debug，默认 info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `template_root`: 模板目录
/// - `output_root`: 输出目录
/// - `max_concurrent`: 最大并发数
pub fn log_startup(template_root: &str, output_root: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始生成文档 (样式保留模式)");
    info!("📂 模板目录: {}", template_root);
    info!("📂 输出目录: {}", output_root);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录模板扫描结果
pub fn log_documents_found(total: usize) {
    info!("✓ 找到 {} 个模板文件", total);
}

/// 打印最终统计信息
///
/// # 参数
/// - `injected`: 注入成功数量
/// - `skipped`: 跳过（原样复制）数量
/// - `failed`: 失败数量
/// - `report_path`: 运行报告路径
pub fn print_final_stats(injected: usize, skipped: usize, failed: usize, report_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 注入: {}", injected);
    info!("⏭️ 跳过: {}", skipped);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符）
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
