//! # 进度条工具
//!
//! 封装 `indicatif`，为下载、测试、提交等阻塞的外部调用显示 spinner。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

/// 创建 spinner（用于不确定进度的外部调用）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {elapsed_precise} {msg}") {
        pb.set_style(style.tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// 在 spinner 下运行阻塞调用，结束后清除 spinner
pub fn with_spinner<T>(message: &str, work: impl FnOnce() -> T) -> T {
    let pb = create_spinner(message);
    let result = work();
    pb.finish_and_clear();
    result
}
