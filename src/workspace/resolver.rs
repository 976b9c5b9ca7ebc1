//! # 路径解析 (PathResolver)
//!
//! 把当前目录和命令行给出的练习名解析为本次调用的练习范围。
//!
//! ## 规则
//! - 向上查找含 `.tmc.json` 的目录作为课程根目录
//! - 给出练习名时逐一校验，任何一个无效都让整个调用失败
//! - 未给出练习名时：在练习目录内则只取该练习，在课程根目录则取所有已下载练习
//! - "所有练习" 按记录中的顺序，而不是文件系统遍历顺序
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `workspace/store.rs` 读取课程记录

use crate::error::{Result, TmcError};
use crate::models::CourseRecord;
use crate::workspace::store;

use std::fs;
use std::path::{Component, Path, PathBuf};

/// 本次调用的练习范围
#[derive(Debug, Clone)]
pub struct ExerciseScope {
    /// 所在课程的记录
    pub record: CourseRecord,
    /// 按顺序排列的练习名，非空
    pub exercises: Vec<String>,
}

impl ExerciseScope {
    pub fn is_single(&self) -> bool {
        self.exercises.len() == 1
    }
}

/// 向上查找课程根目录，到文件系统根为止
pub fn find_course_root(dir: &Path) -> Option<PathBuf> {
    let dir = normalize(dir);
    dir.ancestors()
        .find(|candidate| store::has_record(candidate))
        .map(Path::to_path_buf)
}

/// 解析练习范围
pub fn resolve_scope(current_dir: &Path, explicit_names: &[String]) -> Result<ExerciseScope> {
    let current_dir = normalize(current_dir);
    let root = find_course_root(&current_dir).ok_or(TmcError::NotInCourse)?;
    let record = store::load(&root)?;

    let exercises = if explicit_names.is_empty() {
        scope_from_location(&record, &current_dir)
    } else {
        scope_from_names(&record, &current_dir, explicit_names)?
    };

    if exercises.is_empty() {
        return Err(TmcError::NotInCourse);
    }

    tracing::debug!(course = %record.course_name, ?exercises, "resolved exercise scope");
    Ok(ExerciseScope { record, exercises })
}

/// 当前目录所在的练习（不在任何练习目录内时为 `None`）
pub fn current_exercise(record: &CourseRecord, dir: &Path) -> Option<String> {
    exercise_containing(record, &normalize(dir))
}

/// 根据当前位置决定范围
fn scope_from_location(record: &CourseRecord, current_dir: &Path) -> Vec<String> {
    if let Some(name) = exercise_containing(record, current_dir) {
        return vec![name];
    }

    record
        .exercises_on_disk()
        .into_iter()
        .map(|e| e.name.clone())
        .collect()
}

/// 校验显式给出的练习名，保持给出顺序
fn scope_from_names(
    record: &CourseRecord,
    current_dir: &Path,
    names: &[String],
) -> Result<Vec<String>> {
    let mut resolved: Vec<String> = Vec::new();

    for arg in names {
        let name = resolve_name(record, current_dir, arg).ok_or_else(|| {
            TmcError::UnknownExercise {
                name: arg.to_string(),
            }
        })?;
        if !resolved.contains(&name) {
            resolved.push(name);
        }
    }

    Ok(resolved)
}

/// 单个参数：先按练习名匹配，再按相对路径匹配
fn resolve_name(record: &CourseRecord, current_dir: &Path, arg: &str) -> Option<String> {
    if let Some(state) = record.exercise(arg) {
        if record.exercise_dir(&state.name).is_dir() {
            return Some(state.name.clone());
        }
    }

    let target = normalize(&current_dir.join(arg));
    exercise_containing(record, &target)
}

/// 路径所在的练习（路径必须在练习目录内或就是练习目录）
fn exercise_containing(record: &CourseRecord, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(record.root()).ok()?;
    let first = match relative.components().next()? {
        Component::Normal(part) => part.to_str()?,
        _ => return None,
    };

    let state = record.exercise(first)?;
    if record.exercise_dir(&state.name).is_dir() {
        Some(state.name.clone())
    } else {
        None
    }
}

/// 规范化路径，不存在时退回按字面消除 `.` 和 `..`
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
