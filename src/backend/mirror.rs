//! # 本地目录镜像服务器
//!
//! 把本地目录当作课程服务器使用，服务器地址为目录路径（可带 `file://` 前缀）。
//!
//! ## 目录布局
//! ```text
//! <server>/<organization 或 default>/
//!   organization.json            可选：组织名称、说明、是否置顶
//! <server>/<organization 或 default>/<course>/
//!   ├── course.json              课程与练习列表
//!   ├── exercises/<exercise>/    练习模板
//!   ├── progress/<username>.json 每个用户的服务器端状态
//!   └── submissions/<username>/<exercise>/
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 创建
//! - 使用 `backend/runner.rs` 运行测试
//! - 使用 `walkdir` 复制练习目录, `serde_json` 读写元数据

use super::runner::LocalTestRunner;
use super::Backend;
use crate::error::{Result, TmcError};
use crate::models::{
    is_plain_name, Account, Course, Exercise, Organization, RunResult, SubmissionResult,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const COURSE_FILE: &str = "course.json";
const ORGANIZATION_FILE: &str = "organization.json";
const DEFAULT_ORGANIZATION: &str = "default";

/// 单个练习的服务器端进度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ExerciseProgress {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    attempted: bool,
    #[serde(default)]
    reviewed: bool,
}

/// `progress/<username>.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Progress {
    #[serde(default)]
    exercises: BTreeMap<String, ExerciseProgress>,
}

/// 本地目录镜像后端
#[derive(Debug, Clone)]
pub struct MirrorBackend {
    runner: LocalTestRunner,
}

impl MirrorBackend {
    pub fn new(runner: LocalTestRunner) -> Self {
        MirrorBackend { runner }
    }

    /// 服务器根目录，地址不是本地目录时报错
    fn server_root(account: &Account) -> Result<PathBuf> {
        let address = account.server_address.as_str();
        let path = PathBuf::from(address.strip_prefix("file://").unwrap_or(address));
        if path.is_dir() {
            Ok(path)
        } else {
            Err(TmcError::UnsupportedServer {
                address: address.to_string(),
            })
        }
    }

    fn organization_dir(account: &Account) -> Result<PathBuf> {
        let org = account
            .organization
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION);
        Ok(Self::server_root(account)?.join(org))
    }

    fn course_dir(account: &Account, course_name: &str) -> Result<PathBuf> {
        Ok(Self::organization_dir(account)?.join(course_name))
    }

    fn progress_path(course_dir: &Path, username: &str) -> PathBuf {
        course_dir
            .join("progress")
            .join(format!("{}.json", username))
    }

    fn load_progress(path: &Path) -> Result<Progress> {
        if !path.exists() {
            return Ok(Progress::default());
        }
        let content = fs::read_to_string(path).map_err(|e| TmcError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| TmcError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save_progress(path: &Path, progress: &Progress) -> Result<()> {
        let write_err = |e: std::io::Error| TmcError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(progress)
            .map_err(|e| TmcError::Other(format!("Failed to serialize progress: {}", e)))?;
        fs::write(path, json).map_err(write_err)
    }
}

impl Backend for MirrorBackend {
    fn list_organizations(&self, account: &Account) -> Result<Vec<Organization>> {
        let root = Self::server_root(account)?;
        let entries = fs::read_dir(&root).map_err(|e| TmcError::FileReadError {
            path: root.display().to_string(),
            source: e,
        })?;

        let mut organizations = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.path().is_dir() {
                continue;
            }
            let slug = match entry.file_name().to_str() {
                Some(slug) => slug.to_string(),
                None => continue,
            };

            let meta = entry.path().join(ORGANIZATION_FILE);
            let organization = if meta.is_file() {
                let content = fs::read_to_string(&meta).map_err(|e| TmcError::FileReadError {
                    path: meta.display().to_string(),
                    source: e,
                })?;
                let mut parsed: Organization =
                    serde_json::from_str(&content).map_err(|e| TmcError::ParseError {
                        path: meta.display().to_string(),
                        reason: e.to_string(),
                    })?;
                // 目录名就是 slug
                parsed.slug = slug;
                parsed
            } else {
                Organization::new(slug.clone(), slug, false)
            };
            organizations.push(organization);
        }

        organizations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(organizations)
    }

    fn list_courses(&self, account: &Account) -> Result<Vec<Course>> {
        let org_dir = Self::organization_dir(account)?;
        if !org_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&org_dir).map_err(|e| TmcError::FileReadError {
            path: org_dir.display().to_string(),
            source: e,
        })?;

        let mut courses: Vec<Course> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().join(COURSE_FILE).is_file())
            .filter_map(|e| e.file_name().to_str().map(Course::new))
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    fn get_course_details(&self, account: &Account, course: &Course) -> Result<Course> {
        let course_dir = Self::course_dir(account, &course.name)?;
        let path = course_dir.join(COURSE_FILE);
        let content = fs::read_to_string(&path).map_err(|e| TmcError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut details: Course =
            serde_json::from_str(&content).map_err(|e| TmcError::ParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let progress = Self::load_progress(&Self::progress_path(&course_dir, &account.username))?;
        for exercise in &mut details.exercises {
            exercise.course_name = details.name.clone();
            exercise.locked = details.unlockables.contains(&exercise.name);
            if let Some(state) = progress.exercises.get(&exercise.name) {
                exercise.completed = state.completed;
                exercise.attempted = state.attempted;
                exercise.reviewed = state.reviewed;
            }
        }
        details.exercises_loaded = true;
        Ok(details)
    }

    fn download_exercises(
        &self,
        account: &Account,
        course: &Course,
        exercises: &[Exercise],
        target_dir: &Path,
    ) -> Result<Vec<Exercise>> {
        let source_root = Self::course_dir(account, &course.name)?.join("exercises");
        let mut downloaded = Vec::new();

        for exercise in exercises {
            if !is_plain_name(&exercise.name) {
                tracing::warn!(exercise = %exercise.name, "refusing exercise name outside course root");
                continue;
            }
            let source = source_root.join(&exercise.name);
            let target = target_dir.join(&exercise.name);
            if !source.is_dir() {
                tracing::warn!(exercise = %exercise.name, "exercise template missing on server");
                continue;
            }
            // 已有的练习目录属于用户，从不覆盖也从不删除
            if target.exists() {
                tracing::debug!(exercise = %exercise.name, "exercise already on disk, left untouched");
                continue;
            }
            match copy_tree(&source, &target) {
                Ok(files) => {
                    tracing::debug!(exercise = %exercise.name, files, "downloaded exercise");
                    downloaded.push(exercise.clone());
                }
                Err(e) => {
                    tracing::warn!(exercise = %exercise.name, error = %e, "download failed");
                    fs::remove_dir_all(&target).ok();
                }
            }
        }
        Ok(downloaded)
    }

    fn run_local_tests(&self, exercise_dir: &Path) -> Result<RunResult> {
        self.runner.run(exercise_dir)
    }

    fn submit(
        &self,
        account: &Account,
        course: &Course,
        exercise: &Exercise,
        exercise_dir: &Path,
    ) -> Result<SubmissionResult> {
        let course_dir = Self::course_dir(account, &course.name)?;
        let target = course_dir
            .join("submissions")
            .join(&account.username)
            .join(&exercise.name);
        if target.exists() {
            fs::remove_dir_all(&target).map_err(|e| TmcError::FileWriteError {
                path: target.display().to_string(),
                source: e,
            })?;
        }
        copy_tree(exercise_dir, &target)?;

        let run = self.runner.run(&target)?;
        let passed = run.is_passed();

        let progress_path = Self::progress_path(&course_dir, &account.username);
        let mut progress = Self::load_progress(&progress_path)?;
        let state = progress.exercises.entry(exercise.name.clone()).or_default();
        state.attempted = true;
        state.completed = state.completed || passed;
        Self::save_progress(&progress_path, &progress)?;

        let message = if passed {
            "All tests passed on the server.".to_string()
        } else {
            format!("Server tests ended with status: {}", run.status)
        };

        Ok(SubmissionResult {
            all_tests_passed: passed,
            points: if passed {
                vec![exercise.name.clone()]
            } else {
                Vec::new()
            },
            test_results: run.test_results,
            message,
        })
    }
}

/// 递归复制目录，返回复制的文件数
fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut files = 0;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| TmcError::FileReadError {
            path: source.display().to_string(),
            source: e.into(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| TmcError::Other(e.to_string()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| TmcError::FileWriteError {
                path: dest.display().to_string(),
                source: e,
            })?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| TmcError::FileWriteError {
                path: dest.display().to_string(),
                source: e,
            })?;
            files += 1;
        }
    }
    Ok(files)
}
