//! # info 命令实现
//!
//! 在练习目录中（或给出练习名时）显示练习详情，否则显示课程概要表格。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `workspace/resolver.rs`, `workspace/store.rs`
//! - 使用 `tabled` 输出表格

use super::context::CliContext;
use super::exercises::ExerciseStatus;
use crate::cli::info::InfoArgs;
use crate::error::{Result, TmcError};
use crate::models::{CourseRecord, ExerciseState};
use crate::utils::output;
use crate::workspace::{resolver, store};

use chrono::Utc;
use tabled::{Table, Tabled};

/// 课程概要表格行
#[derive(Debug, Clone, Tabled)]
struct ExerciseRow {
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Downloaded")]
    downloaded: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

/// 执行 info 命令
pub fn execute(ctx: &mut CliContext, args: InfoArgs) -> Result<()> {
    let root = resolver::find_course_root(&ctx.work_dir).ok_or(TmcError::NotInCourse)?;
    let record = store::load(&root)?;

    let exercise = match &args.name {
        Some(name) => Some(
            record
                .exercise(name)
                .ok_or_else(|| TmcError::UnknownExercise { name: name.clone() })?,
        ),
        None => resolver::current_exercise(&record, &ctx.work_dir)
            .and_then(|name| record.exercise(&name)),
    };

    let lines = match exercise {
        Some(state) => exercise_info(&record, state),
        None => course_info(ctx, &record, args.all),
    };
    for line in lines {
        ctx.println(&line);
    }
    Ok(())
}

fn exercise_info(record: &CourseRecord, state: &ExerciseState) -> Vec<String> {
    let mut lines = vec![
        output::header(&format!("Exercise: {}", state.name)),
        format!("Course: {}", record.course_name),
        format!("Status: {}", ExerciseStatus::of_state(state, Utc::now()).label()),
        format!("Server: {}", output::flag("completed", state.completed)),
        format!("        {}", output::flag("attempted", state.attempted)),
        format!("        {}", output::flag("reviewed", state.reviewed)),
        format!("Local:  {}", output::flag("passed", state.locally_completed)),
    ];
    if let Some(requires_review) = state.requires_review {
        lines.push(format!(
            "Review: {}",
            if requires_review { "required" } else { "not required" }
        ));
    }
    lines.push(match state.deadline {
        Some(deadline) => format!("Deadline: {}", deadline.format("%Y-%m-%d %H:%M UTC")),
        None => "Deadline: none".to_string(),
    });
    if let Some(checksum) = &state.checksum {
        lines.push(format!("Checksum: {}", checksum));
    }
    lines.push(format!("Directory: {}", record.exercise_dir(&state.name).display()));
    lines
}

fn course_info(ctx: &CliContext, record: &CourseRecord, all: bool) -> Vec<String> {
    let now = Utc::now();
    let account = ctx.account_for(record);
    let on_disk: Vec<&str> = record
        .exercises_on_disk()
        .iter()
        .map(|e| e.name.as_str())
        .collect();

    let rows: Vec<ExerciseRow> = record
        .exercises
        .iter()
        .filter(|e| all || on_disk.contains(&e.name.as_str()))
        .map(|e| ExerciseRow {
            name: e.name.clone(),
            downloaded: if on_disk.contains(&e.name.as_str()) {
                "yes".to_string()
            } else {
                "no".to_string()
            },
            status: ExerciseStatus::of_state(e, now).label().to_string(),
            deadline: e
                .deadline
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let completed = record.exercises.iter().filter(|e| e.completed).count();
    vec![
        output::header(&format!("Course: {}", record.course_name)),
        format!("Account: {}", account),
        format!(
            "Completed: {}/{} exercises ({} downloaded)",
            completed,
            record.exercises.len(),
            on_disk.len()
        ),
        Table::new(&rows).to_string(),
    ]
}
