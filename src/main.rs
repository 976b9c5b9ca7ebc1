//! # tmc - 课程编程练习的命令行工作区
//!
//! 下载课程练习、在本地运行测试、提交到服务器，并在课程目录中
//! 维护每个练习的本地状态。
//!
//! ## 子命令
//! - `download`  - 下载课程练习
//! - `test`      - 本地运行测试
//! - `submit`    - 提交练习
//! - `exercises` - 列出练习及状态
//! - `info`      - 课程或练习详情
//! - `courses`   - 列出可用课程
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── workspace/ (路径解析、课程记录、账户消歧、结果合并)
//!   │     ├── backend/   (课程服务器与测试运行器)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度、终端交互)
//!   └── error.rs    (错误处理)
//! ```

mod backend;
mod cli;
mod commands;
mod error;
mod models;
mod utils;
mod workspace;

use clap::Parser;
use cli::Cli;

/// 日志环境变量
const LOG_ENV: &str = "TMC_LOG";

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        utils::output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.quiet, cli.verbose)?;

    commands::run(cli)?;
    Ok(())
}

/// 初始化日志，`TMC_LOG` 优先于 `--quiet` / `--verbose`
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))?;

    Ok(())
}
