//! # 测试与提交结果数据模型
//!
//! 本地测试运行和服务器提交返回的结果。
//!
//! ## 依赖关系
//! - 被 `backend/runner.rs`, `backend/mirror.rs` 创建
//! - 被 `workspace/reconcile.rs` 和 `commands/` 使用

use serde::{Deserialize, Serialize};

/// 测试运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Passed,
    TestsFailed,
    CompileFailed,
    GenericError,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Passed => write!(f, "passed"),
            RunStatus::TestsFailed => write!(f, "tests failed"),
            RunStatus::CompileFailed => write!(f, "compilation failed"),
            RunStatus::GenericError => write!(f, "error"),
        }
    }
}

/// 单个测试用例结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub name: String,
    pub passed: bool,
    #[serde(default)]
    pub message: String,
}

impl TestCaseResult {
    pub fn passed(name: impl Into<String>) -> Self {
        TestCaseResult {
            name: name.into(),
            passed: true,
            message: String::new(),
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        TestCaseResult {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

/// 一次测试运行的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    #[serde(default)]
    pub test_results: Vec<TestCaseResult>,
    /// 运行器的原始输出（编译失败等情况）
    #[serde(default)]
    pub log: String,
}

impl RunResult {
    pub fn new(status: RunStatus, test_results: Vec<TestCaseResult>) -> Self {
        RunResult {
            status,
            test_results,
            log: String::new(),
        }
    }

    pub fn passed_count(&self) -> usize {
        self.test_results.iter().filter(|t| t.passed).count()
    }

    pub fn is_passed(&self) -> bool {
        self.status == RunStatus::Passed
    }
}

/// 服务器返回的提交结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub all_tests_passed: bool,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub test_results: Vec<TestCaseResult>,
    #[serde(default)]
    pub message: String,
}

impl SubmissionResult {
    pub fn passed_count(&self) -> usize {
        self.test_results.iter().filter(|t| t.passed).count()
    }
}
