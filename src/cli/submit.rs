//! # submit 子命令 CLI 定义
//!
//! 提交练习到服务器评测
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::Args;

/// submit 子命令参数
#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    /// Exercise names or paths [default: current exercise or whole course]
    pub exercises: Vec<String>,

    /// Show all test results, not only the failed ones
    #[arg(short, long, default_value_t = false)]
    pub all: bool,

    /// Show detailed failure messages
    #[arg(short, long, default_value_t = false)]
    pub details: bool,
}
