//! # 课程记录数据模型
//!
//! 每个课程根目录下一个 `.tmc.json`，保存课程名、来源账户和各练习的本地状态。
//! 在下一次成功同步远程结果之前，这个文件是本地状态的唯一来源。
//!
//! ## 依赖关系
//! - 被 `workspace/` 全部模块使用
//! - 使用 `models/account.rs`, `models/course.rs`

use crate::models::{AccountRef, Exercise};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// 当前记录格式版本
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// 名称能否直接作为目录名：恰好一个普通路径分量
///
/// 服务器给出的课程名和练习名都要经过这个检查，`..`、`/` 之类的名称会写到课程目录之外。
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part.to_str() == Some(name),
        _ => false,
    }
}

/// 单个练习的本地状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseState {
    pub name: String,

    /// 服务器报告的完成状态，本地从不修改
    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub attempted: bool,

    #[serde(default)]
    pub reviewed: bool,

    /// 本地测试通过（与服务器的 completed 区分）
    #[serde(default)]
    pub locally_completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_review: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ExerciseState {
    pub fn new(name: impl Into<String>) -> Self {
        ExerciseState {
            name: name.into(),
            completed: false,
            attempted: false,
            reviewed: false,
            locally_completed: false,
            requires_review: None,
            deadline: None,
            checksum: None,
        }
    }

    /// 从服务器练习创建状态
    pub fn from_exercise(exercise: &Exercise) -> Self {
        let mut state = ExerciseState::new(exercise.name.clone());
        state.refresh_from(exercise);
        state
    }

    /// 用服务器数据刷新，保留本地完成标记
    pub fn refresh_from(&mut self, exercise: &Exercise) {
        self.completed = exercise.completed;
        self.attempted = self.attempted || exercise.attempted;
        self.reviewed = exercise.reviewed;
        self.requires_review = Some(exercise.requires_review);
        self.deadline = exercise.deadline;
        self.checksum = exercise.checksum.clone();
    }

    pub fn needs_review(&self) -> bool {
        self.requires_review.unwrap_or(false) && !self.reviewed
    }

    pub fn has_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.map(|d| d < now).unwrap_or(false)
    }
}

/// 持久化的课程记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    pub course_name: String,

    pub account: AccountRef,

    /// 按下载顺序排列的练习
    #[serde(default)]
    pub exercises: Vec<ExerciseState>,

    /// 课程根目录，由加载时所在目录决定，不写入文件
    #[serde(skip)]
    pub root: PathBuf,
}

fn default_format_version() -> u32 {
    RECORD_FORMAT_VERSION
}

impl CourseRecord {
    /// 创建一个空记录
    pub fn new(course_name: impl Into<String>, account: AccountRef, root: PathBuf) -> Self {
        CourseRecord {
            format_version: RECORD_FORMAT_VERSION,
            course_name: course_name.into(),
            account,
            exercises: Vec::new(),
            root,
        }
    }

    pub fn exercise(&self, name: &str) -> Option<&ExerciseState> {
        self.exercises.iter().find(|e| e.name == name)
    }

    pub fn exercise_mut(&mut self, name: &str) -> Option<&mut ExerciseState> {
        self.exercises.iter_mut().find(|e| e.name == name)
    }

    /// 插入或刷新练习状态，新练习追加在末尾
    pub fn upsert(&mut self, exercise: &Exercise) {
        match self.exercise_mut(&exercise.name) {
            Some(state) => state.refresh_from(exercise),
            None => self.exercises.push(ExerciseState::from_exercise(exercise)),
        }
    }

    /// 练习在磁盘上的目录
    pub fn exercise_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// 目录存在于磁盘上的练习，按记录顺序
    pub fn exercises_on_disk(&self) -> Vec<&ExerciseState> {
        self.exercises
            .iter()
            .filter(|e| self.exercise_dir(&e.name).is_dir())
            .collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
