//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。命令只做组装：解析范围、调用后端、
//! 把结果交给 `workspace/reconcile.rs`，再把摘要输出到终端。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `backend/`, `workspace/`, `models/`, `utils/`
//! - 子模块: context, courses, download, exercises, info, organization, submit, test

pub mod context;
pub mod courses;
pub mod download;
pub mod exercises;
pub mod info;
pub mod organization;
pub mod submit;

use crate::backend::mirror::MirrorBackend;
use crate::backend::runner::LocalTestRunner;
use crate::cli::{Cli, Commands};
use crate::error::{Result, TmcError};
use crate::models::AccountList;
use crate::utils::terminal::TerminalIo;

use context::CliContext;
use std::path::PathBuf;

/// 配置目录：命令行/环境变量优先，否则为系统配置目录下的 `tmc-cli`
pub fn config_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(|| dirs::config_dir().map(|dir| dir.join("tmc-cli")))
        .ok_or_else(|| TmcError::Other("Could not determine a configuration directory".into()))
}

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    let config_dir = config_dir(cli.config_dir)?;
    let accounts = AccountList::load(&config_dir)?;
    let work_dir = std::env::current_dir().map_err(|e| TmcError::FileReadError {
        path: ".".to_string(),
        source: e,
    })?;

    let backend = MirrorBackend::new(LocalTestRunner::new(cli.test_command));
    let mut io = TerminalIo::new();
    let mut ctx = CliContext::new(&mut io, &backend, accounts, config_dir, work_dir);

    match cli.command {
        Commands::Download(args) => download::execute(&mut ctx, args),
        Commands::Test(args) => test::execute(&mut ctx, args),
        Commands::Submit(args) => submit::execute(&mut ctx, args),
        Commands::Exercises(args) => exercises::execute(&mut ctx, args),
        Commands::Info(args) => info::execute(&mut ctx, args),
        Commands::Courses(args) => courses::execute(&mut ctx, args),
        Commands::Organization(args) => organization::execute(&mut ctx, args),
    }
}
