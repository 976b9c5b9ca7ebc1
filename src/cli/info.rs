//! # info 子命令 CLI 定义
//!
//! 显示课程或练习的详细信息
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use clap::Args;

/// info 子命令参数
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// Exercise name [default: the current exercise or course]
    pub name: Option<String>,

    /// Include exercises that are not downloaded
    #[arg(short, long, default_value_t = false)]
    pub all: bool,
}
