//! # download 子命令 CLI 定义
//!
//! 下载课程练习到新的课程目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/download.rs`

use clap::Args;

/// download 子命令参数
#[derive(Args, Debug, Default)]
pub struct DownloadArgs {
    /// Name of the course to download
    pub course: String,

    /// Also download exercises that are already completed
    #[arg(short, long, default_value_t = false)]
    pub all: bool,
}
