//! # courses 子命令 CLI 定义
//!
//! 列出所有账户可见的课程
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/courses.rs`

use clap::Args;

/// courses 子命令参数
#[derive(Args, Debug, Default)]
pub struct CoursesArgs {
    /// Only list courses whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}
