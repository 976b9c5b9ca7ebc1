//! # 统一错误处理模块
//!
//! 定义 tmc-cli 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 工作区错误：不在课程目录、未知练习、课程记录损坏、非法目录名
//! - 账户错误：任何服务器上都找不到课程、没有配置账户
//! - I/O 错误：读写文件失败
//! - 外部命令错误：测试命令无法运行
//!
//! 部分下载失败不是错误，而是 `DownloadSummary` 中的统计。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// tmc-cli 统一错误类型
#[derive(Error, Debug)]
pub enum TmcError {
    // ─────────────────────────────────────────────────────────────
    // 工作区错误
    // ─────────────────────────────────────────────────────────────
    #[error("Not in a course or exercise directory")]
    NotInCourse,

    /// 命令需要在课程目录内运行
    #[error("You have to be in a course directory to {action}")]
    NotInCourseFor { action: &'static str },

    #[error("'{name}' is not a valid exercise")]
    UnknownExercise { name: String },

    #[error("Course record not found: {path}")]
    RecordNotFound { path: String },

    #[error("Course record is corrupt: {path}\nReason: {reason}")]
    RecordCorrupt { path: String, reason: String },

    #[error("Directory '{path}' already contains other content ({reason})")]
    CourseDirectoryConflict { path: String, reason: String },

    #[error("'{name}' cannot be used as a directory name")]
    InvalidName { name: String },

    #[error("Refusing to remove '{path}': exercises have already been written there")]
    CourseAlreadyPopulated { path: String },

    // ─────────────────────────────────────────────────────────────
    // 账户与服务器错误
    // ─────────────────────────────────────────────────────────────
    #[error("Course '{course}' doesn't exist on any of your servers")]
    CourseNotFoundAnywhere { course: String },

    #[error("No accounts configured in {path}")]
    NoAccounts { path: String },

    #[error("Server address '{address}' is not supported")]
    UnsupportedServer { address: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}\nReason: {reason}")]
    ParseError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' could not be started")]
    CommandNotFound { command: String },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Could not read input: {0}")]
    InputError(#[source] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl TmcError {
    /// 把 `NotInCourse` 换成带命令说明的版本，其他错误原样返回
    pub fn for_action(self, action: &'static str) -> Self {
        match self {
            TmcError::NotInCourse => TmcError::NotInCourseFor { action },
            other => other,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TmcError>;
