//! # 课程状态存储 (CourseStateStore)
//!
//! 读写课程根目录下的 `.tmc.json`，并负责课程目录的创建与回滚。
//!
//! ## 保证
//! - `save` 先写入同目录的临时文件再 rename 覆盖，进程中断时旧记录保持完整
//! - 损坏的记录文件只报告，从不静默覆盖
//! - `abort_course_creation` 只在尚未写入任何练习时有效
//!
//! ## 依赖关系
//! - 被 `workspace/resolver.rs`, `workspace/reconcile.rs` 和 `commands/` 使用
//! - 使用 `models/record.rs`
//! - 使用 `tempfile` 实现原子写入, `serde_json` 序列化

use crate::error::{Result, TmcError};
use crate::models::{Account, CourseRecord};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 课程记录文件名
pub const RECORD_FILE: &str = ".tmc.json";

/// 记录文件路径
pub fn record_path(course_root: &Path) -> PathBuf {
    course_root.join(RECORD_FILE)
}

/// 目录下是否有课程记录
pub fn has_record(dir: &Path) -> bool {
    record_path(dir).is_file()
}

/// 加载课程记录
pub fn load(course_root: &Path) -> Result<CourseRecord> {
    let path = record_path(course_root);
    if !path.exists() {
        return Err(TmcError::RecordNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| TmcError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut record: CourseRecord =
        serde_json::from_str(&content).map_err(|e| TmcError::RecordCorrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    record.root = course_root.to_path_buf();

    tracing::debug!(
        course = %record.course_name,
        exercises = record.exercises.len(),
        "loaded course record"
    );
    Ok(record)
}

/// 原子地保存课程记录
pub fn save(record: &CourseRecord) -> Result<()> {
    let path = record_path(&record.root);
    let write_err = |e: std::io::Error| TmcError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let json = serde_json::to_string_pretty(record)
        .map_err(|e| TmcError::Other(format!("Failed to serialize course record: {}", e)))?;

    // 临时文件与目标同目录，保证 rename 不跨文件系统
    let mut tmp = NamedTempFile::new_in(&record.root).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), "saved course record");
    Ok(())
}

/// 课程目录创建结果
#[derive(Debug)]
pub struct CourseCreation {
    pub record: CourseRecord,
    /// 目录是本次新建的（为空或不存在），失败时可以回滚
    pub created: bool,
}

/// 创建课程目录和初始空记录
///
/// 目录已存在且含有同名课程的记录时复用该记录；含有其他内容时失败。
pub fn create_course_directory(
    course_root: &Path,
    account: &Account,
    course_name: &str,
) -> Result<CourseCreation> {
    if course_root.exists() {
        if has_record(course_root) {
            let record = load(course_root)?;
            if record.course_name != course_name {
                return Err(TmcError::CourseDirectoryConflict {
                    path: course_root.display().to_string(),
                    reason: format!("it belongs to course '{}'", record.course_name),
                });
            }
            tracing::debug!(path = %course_root.display(), "reusing existing course directory");
            return Ok(CourseCreation {
                record,
                created: false,
            });
        }

        if !is_empty_dir(course_root)? {
            return Err(TmcError::CourseDirectoryConflict {
                path: course_root.display().to_string(),
                reason: "it is not an empty directory".to_string(),
            });
        }
    }

    fs::create_dir_all(course_root).map_err(|e| TmcError::FileWriteError {
        path: course_root.display().to_string(),
        source: e,
    })?;

    let record = CourseRecord::new(course_name, account.to_ref(), course_root.to_path_buf());
    save(&record)?;

    Ok(CourseCreation {
        record,
        created: true,
    })
}

/// 回滚刚创建的课程目录
pub fn abort_course_creation(course_root: &Path) -> Result<()> {
    if has_record(course_root) {
        let record = load(course_root)?;
        if !record.exercises.is_empty() {
            return Err(TmcError::CourseAlreadyPopulated {
                path: course_root.display().to_string(),
            });
        }
    }

    if course_root.exists() {
        fs::remove_dir_all(course_root).map_err(|e| TmcError::FileWriteError {
            path: course_root.display().to_string(),
            source: e,
        })?;
    }

    tracing::info!(path = %course_root.display(), "rolled back course directory");
    Ok(())
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(dir).map_err(|e| TmcError::FileReadError {
        path: dir.display().to_string(),
        source: e,
    })?;
    Ok(entries.next().is_none())
}
