//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `download`: 下载课程练习
//! - `test`: 本地运行测试
//! - `submit`: 提交练习到服务器
//! - `exercises`: 列出练习及状态
//! - `info`: 课程或练习详情
//! - `courses`: 列出所有账户可见的课程
//! - `organization`: 选择账户使用的组织
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: courses, download, exercises, info, organization, submit, test

pub mod courses;
pub mod download;
pub mod exercises;
pub mod info;
pub mod organization;
pub mod submit;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tmc - 课程编程练习的命令行工作区
#[derive(Parser)]
#[command(name = "tmc")]
#[command(version)]
#[command(about = "Download, test and submit programming exercises", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    // ─────────────────────────────────────────────────────────────
    // 全局配置
    // ─────────────────────────────────────────────────────────────
    /// Directory holding accounts.json [default: <config dir>/tmc-cli]
    #[arg(long, global = true, env = "TMC_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Shell command that runs the tests inside an exercise directory
    #[arg(
        long,
        global = true,
        env = "TMC_TEST_COMMAND",
        default_value = crate::backend::runner::DEFAULT_TEST_COMMAND
    )]
    pub test_command: String,

    /// Disable coloured output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show debug logs
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Only show errors in logs
    #[arg(short, long, global = true, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Download exercises of a course into a new course directory
    Download(download::DownloadArgs),

    /// Run local tests for exercises
    Test(test::TestArgs),

    /// Submit exercises to the server
    Submit(submit::SubmitArgs),

    /// List the exercises of a course and their status
    Exercises(exercises::ExercisesArgs),

    /// Show information about a course or an exercise
    Info(info::InfoArgs),

    /// List courses available on your servers
    Courses(courses::CoursesArgs),

    /// Change the organization of an account
    Organization(organization::OrganizationArgs),
}
