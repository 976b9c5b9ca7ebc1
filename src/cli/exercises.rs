//! # exercises 子命令 CLI 定义
//!
//! 列出课程练习及状态
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/exercises.rs`

use clap::Args;

/// exercises 子命令参数
#[derive(Args, Debug, Default)]
pub struct ExercisesArgs {
    /// Course name [default: the course of the current directory]
    pub course: Option<String>,

    /// Fetch exercise status from the server instead of the local record
    #[arg(short, long, default_value_t = false)]
    pub internet: bool,
}
