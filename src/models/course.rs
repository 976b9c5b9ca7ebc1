//! # 课程与练习数据模型
//!
//! 服务器端的课程与练习。由后端（外部协作者）创建，核心逻辑只读取。
//!
//! ## 依赖关系
//! - 被 `backend/`, `workspace/reconcile.rs` 和 `commands/` 使用
//! - 使用 `chrono` 表示截止时间

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 课程中的一个编程练习
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// 练习名称（课程内唯一）
    pub name: String,

    /// 所属课程名称
    #[serde(default)]
    pub course_name: String,

    /// 服务器标记为已完成
    #[serde(default)]
    pub completed: bool,

    /// 服务器标记为已尝试
    #[serde(default)]
    pub attempted: bool,

    /// 已通过代码审查
    #[serde(default)]
    pub reviewed: bool,

    /// 需要代码审查
    #[serde(default)]
    pub requires_review: bool,

    /// 尚未解锁
    #[serde(default)]
    pub locked: bool,

    /// 截止时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    /// 练习模板校验和
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, course_name: impl Into<String>) -> Self {
        Exercise {
            name: name.into(),
            course_name: course_name.into(),
            completed: false,
            attempted: false,
            reviewed: false,
            requires_review: false,
            locked: false,
            deadline: None,
            checksum: None,
        }
    }

    /// 截止时间是否已过
    pub fn has_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.map(|d| d < now).unwrap_or(false)
    }
}

/// 一个服务器上的课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,

    /// 尚未解锁的练习名称
    #[serde(default)]
    pub unlockables: Vec<String>,

    #[serde(default)]
    pub exercises: Vec<Exercise>,

    /// 练习列表是否已从服务器加载（课程列表只含名称）
    #[serde(default)]
    pub exercises_loaded: bool,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Course {
            name: name.into(),
            unlockables: Vec::new(),
            exercises: Vec::new(),
            exercises_loaded: false,
        }
    }

    /// 设置练习列表并标记为已加载
    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = exercises;
        self.exercises_loaded = true;
        self
    }

    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name == name)
    }

    /// 已完成的练习数量
    pub fn completed_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }
}
