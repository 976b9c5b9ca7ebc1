//! # organization 子命令 CLI 定义
//!
//! 选择账户使用的组织
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/organization.rs`

use clap::Args;

/// organization 子命令参数
#[derive(Args, Debug, Default)]
pub struct OrganizationArgs {
    /// Slug of the organization; asked interactively when missing or unknown
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Server address of the account to change [default: the first account]
    #[arg(short, long)]
    pub server: Option<String>,
}
