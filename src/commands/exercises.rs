//! # exercises 命令实现
//!
//! 按截止时间分组列出课程练习及其状态。默认读取本地课程记录，
//! `--internet` 或本地没有该课程时向服务器查询。
//!
//! ## 依赖关系
//! - 使用 `cli/exercises.rs` 定义的参数
//! - 使用 `workspace/resolver.rs`, `workspace/store.rs`, `workspace/accounts.rs`

use super::context::CliContext;
use crate::cli::exercises::ExercisesArgs;
use crate::error::{Result, TmcError};
use crate::models::{CourseRecord, Exercise, ExerciseState};
use crate::utils::output;
use crate::workspace::{resolver, store};

use chrono::{DateTime, Utc};
use colored::Colorize;

/// 列表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLine {
    pub name: String,
    pub deadline: Option<DateTime<Utc>>,
    pub status: ExerciseStatus,
}

/// 练习状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStatus {
    Completed,
    RequiresReview,
    DeadlinePassed,
    LocallyCompleted,
    Attempted,
    NotCompleted,
}

impl ExerciseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseStatus::Completed => "Completed",
            ExerciseStatus::RequiresReview => "Requires review",
            ExerciseStatus::DeadlinePassed => "Deadline passed",
            ExerciseStatus::LocallyCompleted => "Locally completed",
            ExerciseStatus::Attempted => "Attempted",
            ExerciseStatus::NotCompleted => "Not completed",
        }
    }

    fn colored_label(&self) -> String {
        match self {
            ExerciseStatus::Completed => self.label().green().to_string(),
            ExerciseStatus::RequiresReview => self.label().yellow().to_string(),
            ExerciseStatus::DeadlinePassed => self.label().purple().to_string(),
            ExerciseStatus::LocallyCompleted => self.label().cyan().to_string(),
            ExerciseStatus::Attempted => self.label().red().to_string(),
            ExerciseStatus::NotCompleted => self.label().dimmed().to_string(),
        }
    }

    /// 从本地记录得出状态
    pub fn of_state(state: &ExerciseState, now: DateTime<Utc>) -> Self {
        if state.completed {
            if state.needs_review() {
                ExerciseStatus::RequiresReview
            } else {
                ExerciseStatus::Completed
            }
        } else if state.has_deadline_passed(now) {
            ExerciseStatus::DeadlinePassed
        } else if state.locally_completed {
            ExerciseStatus::LocallyCompleted
        } else if state.attempted {
            ExerciseStatus::Attempted
        } else {
            ExerciseStatus::NotCompleted
        }
    }

    /// 从服务器数据得出状态
    pub fn of_exercise(exercise: &Exercise, now: DateTime<Utc>) -> Self {
        if exercise.completed {
            if exercise.requires_review && !exercise.reviewed {
                ExerciseStatus::RequiresReview
            } else {
                ExerciseStatus::Completed
            }
        } else if exercise.has_deadline_passed(now) {
            ExerciseStatus::DeadlinePassed
        } else if exercise.attempted {
            ExerciseStatus::Attempted
        } else {
            ExerciseStatus::NotCompleted
        }
    }
}

/// 执行 exercises 命令
pub fn execute(ctx: &mut CliContext, args: ExercisesArgs) -> Result<()> {
    let now = Utc::now();
    let local = match resolver::find_course_root(&ctx.work_dir) {
        Some(root) => Some(store::load(&root)?),
        None => None,
    };

    let course_name = match (&args.course, &local) {
        (Some(name), _) => name.clone(),
        (None, Some(record)) => record.course_name.clone(),
        (None, None) => return Err(TmcError::NotInCourse),
    };

    let local = local.filter(|record| record.course_name == course_name);
    let lines = match local {
        Some(record) if !args.internet => lines_from_record(&record, now),
        Some(record) => {
            let account = ctx.account_for(&record);
            let course = ctx
                .backend
                .find_course_on_server(&account, &course_name)?
                .ok_or_else(|| TmcError::CourseNotFoundAnywhere {
                    course: course_name.clone(),
                })?;
            lines_from_exercises(&course.exercises, now)
        }
        None => {
            let accounts = ctx.require_accounts()?;
            let backend = ctx.backend;
            let resolution = ctx.resolver.resolve_account(
                &course_name,
                &accounts,
                |account| backend.find_course_on_server(account, &course_name),
                &mut *ctx.io,
            )?;
            lines_from_exercises(&resolution.course.exercises, now)
        }
    };

    ctx.println(&output::header(&format!("Exercises of {}", course_name)));
    for line in render(&lines) {
        ctx.println(&line);
    }
    Ok(())
}

fn lines_from_record(record: &CourseRecord, now: DateTime<Utc>) -> Vec<ExerciseLine> {
    record
        .exercises
        .iter()
        .map(|state| ExerciseLine {
            name: state.name.clone(),
            deadline: state.deadline,
            status: ExerciseStatus::of_state(state, now),
        })
        .collect()
}

fn lines_from_exercises(exercises: &[Exercise], now: DateTime<Utc>) -> Vec<ExerciseLine> {
    exercises
        .iter()
        .map(|exercise| ExerciseLine {
            name: exercise.name.clone(),
            deadline: exercise.deadline,
            status: ExerciseStatus::of_exercise(exercise, now),
        })
        .collect()
}

/// 按截止时间分组输出，没有截止时间的排在最后
pub fn render(lines: &[ExerciseLine]) -> Vec<String> {
    let mut sorted: Vec<&ExerciseLine> = lines.iter().collect();
    sorted.sort_by_key(|line| (line.deadline.is_none(), line.deadline));

    let mut out = Vec::new();
    let mut current: Option<Option<DateTime<Utc>>> = None;
    for line in sorted {
        if current != Some(line.deadline) {
            current = Some(line.deadline);
            out.push(match line.deadline {
                Some(deadline) => format!("Deadline: {}", deadline.format("%Y-%m-%d %H:%M UTC")),
                None => "No deadline".to_string(),
            });
        }
        out.push(format!("  {:<20} {}", line.status.colored_label(), line.name));
    }
    out
}
