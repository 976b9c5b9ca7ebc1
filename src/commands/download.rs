//! # download 命令实现
//!
//! 下载课程练习到课程目录。
//!
//! ## 流程
//! 1. 在所有账户中查找课程，多个匹配时询问用户
//! 2. 过滤已完成的练习（`--all` 时不过滤）
//! 3. 创建课程目录：在某个课程目录内时放在该课程旁边，否则放在当前目录
//! 4. 已在磁盘上的练习保持原样，不重新下载
//! 5. 下载并合并结果，一个都没下载成功时回滚新建的目录
//!
//! ## 依赖关系
//! - 使用 `cli/download.rs` 定义的参数
//! - 使用 `workspace/accounts.rs`, `workspace/store.rs`, `workspace/reconcile.rs`

use super::context::CliContext;
use crate::cli::download::DownloadArgs;
use crate::error::{Result, TmcError};
use crate::models::{is_plain_name, Exercise};
use crate::utils::{output, progress};
use crate::workspace::{reconcile, resolver, store};

use std::path::PathBuf;

/// 执行 download 命令
pub fn execute(ctx: &mut CliContext, args: DownloadArgs) -> Result<()> {
    let accounts = ctx.require_accounts()?;
    let backend = ctx.backend;

    let resolution = ctx.resolver.resolve_account(
        &args.course,
        &accounts,
        |account| backend.find_course_on_server(account, &args.course),
        &mut *ctx.io,
    )?;
    let account = resolution.account;
    let course = resolution.course;

    if !is_plain_name(&course.name) {
        return Err(TmcError::InvalidName {
            name: course.name.clone(),
        });
    }

    let wanted: Vec<Exercise> = course
        .exercises
        .iter()
        .filter(|e| args.all || !e.completed)
        .cloned()
        .collect();

    if !args.all && course.completed_count() > 0 {
        ctx.println(&output::info(&format!(
            "Skipping {} completed exercises (use --all to include them)",
            course.completed_count()
        )));
    }

    let course_root = course_parent(ctx).join(&course.name);
    let creation = store::create_course_directory(&course_root, &account, &course.name)?;

    let (present, requested): (Vec<Exercise>, Vec<Exercise>) = wanted
        .into_iter()
        .partition(|e| {
            is_plain_name(&e.name) && creation.record.exercise_dir(&e.name).is_dir()
        });
    let to_fetch: Vec<Exercise> = requested
        .iter()
        .filter(|e| {
            let plain = is_plain_name(&e.name);
            if !plain {
                tracing::warn!(exercise = %e.name, "exercise name is not a plain directory name");
            }
            plain
        })
        .cloned()
        .collect();

    ctx.println(&output::info(&format!(
        "Downloading {} exercises of '{}' from {}",
        to_fetch.len(),
        course.name,
        account.server_address
    )));

    let downloaded = if to_fetch.is_empty() {
        Some(Vec::new())
    } else {
        let result = progress::with_spinner("Downloading exercises...", || {
            backend.download_exercises(&account, &course, &to_fetch, &course_root)
        });
        match result {
            Ok(list) => Some(list),
            Err(e) => {
                tracing::warn!(error = %e, "download request failed");
                ctx.errorln(&output::warning(&format!("Download failed: {}", e)));
                None
            }
        }
    };

    let (_, summary) = reconcile::apply_download(
        creation,
        course.exercises.len(),
        &present,
        &requested,
        downloaded,
    )?;

    if !summary.already_downloaded.is_empty() {
        ctx.println(&output::info(&format!(
            "Kept {} already downloaded exercises as they are: {}",
            summary.already_downloaded.len(),
            summary.already_downloaded.join(", ")
        )));
    }
    for name in &summary.failed {
        ctx.errorln(&output::failure(&format!("Failed to download {}", name)));
    }
    if summary.rolled_back {
        ctx.errorln(&output::warning(&format!(
            "Removed {} since nothing was downloaded",
            course_root.display()
        )));
    }

    let line = summary.describe();
    if summary.total_failure {
        ctx.println(&output::failure(&line));
    } else {
        ctx.println(&output::success(&line));
    }
    Ok(())
}

/// 新课程目录的父目录
fn course_parent(ctx: &CliContext) -> PathBuf {
    resolver::find_course_root(&ctx.work_dir)
        .and_then(|root| root.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| ctx.work_dir.clone())
}
