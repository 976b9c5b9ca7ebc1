//! # 本地测试运行器
//!
//! 在练习目录中执行配置的 shell 命令，从输出中解析测试结果。
//!
//! ## 输出约定
//! ```text
//! PASS <test name>
//! FAIL <test name> - <message>
//! COMPILE FAILED
//! ```
//! 其他行原样保存在日志中。
//!
//! ## 依赖关系
//! - 被 `backend/mirror.rs` 使用
//! - 使用 `regex` 解析输出行

use crate::error::{Result, TmcError};
use crate::models::{RunResult, RunStatus, TestCaseResult};

use regex::Regex;
use std::path::Path;
use std::process::Command;

/// 默认测试命令
pub const DEFAULT_TEST_COMMAND: &str = "sh run-tests.sh";

/// 在练习目录中运行测试命令
#[derive(Debug, Clone)]
pub struct LocalTestRunner {
    command: String,
}

impl LocalTestRunner {
    pub fn new(command: impl Into<String>) -> Self {
        LocalTestRunner {
            command: command.into(),
        }
    }

    /// 运行测试；命令无法启动时返回错误
    pub fn run(&self, exercise_dir: &Path) -> Result<RunResult> {
        tracing::debug!(dir = %exercise_dir.display(), command = %self.command, "running tests");

        let out = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(exercise_dir)
            .output()
            .map_err(|e| {
                tracing::warn!(error = %e, "test command could not be started");
                TmcError::CommandNotFound {
                    command: self.command.clone(),
                }
            })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);
        let mut result = parse_output(&stdout, out.status.success())?;
        if !stderr.trim().is_empty() {
            result.log.push_str(&stderr);
        }
        Ok(result)
    }
}

impl Default for LocalTestRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_COMMAND)
    }
}

/// 解析测试命令的标准输出
pub fn parse_output(stdout: &str, exit_success: bool) -> Result<RunResult> {
    let test_line = Regex::new(r"^\s*(PASS|FAIL)\s+(.+?)(?:\s+-\s+(.*))?\s*$")
        .map_err(|e| TmcError::Other(format!("Invalid test output pattern: {}", e)))?;

    let mut tests = Vec::new();
    let mut compile_failed = false;
    let mut log = String::new();

    for line in stdout.lines() {
        if line.trim() == "COMPILE FAILED" {
            compile_failed = true;
            continue;
        }
        match test_line.captures(line) {
            Some(caps) => {
                let name = caps[2].to_string();
                if &caps[1] == "PASS" {
                    tests.push(TestCaseResult::passed(name));
                } else {
                    let message = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                    tests.push(TestCaseResult::failed(name, message));
                }
            }
            None => {
                log.push_str(line);
                log.push('\n');
            }
        }
    }

    let any_failed = tests.iter().any(|t| !t.passed);
    let status = if compile_failed {
        RunStatus::CompileFailed
    } else if any_failed {
        RunStatus::TestsFailed
    } else if exit_success {
        RunStatus::Passed
    } else {
        RunStatus::GenericError
    };

    let mut result = RunResult::new(status, tests);
    result.log = log;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_all_passed() {
        let result = parse_output("PASS adds\nPASS subtracts\n", true).unwrap();
        assert_eq!(result.status, RunStatus::Passed);
        assert_eq!(result.passed_count(), 2);
        assert_eq!(result.test_results[0].name, "adds");
    }

    #[test]
    fn test_parse_failure_message() {
        let out = "building...\nPASS adds\nFAIL subtracts - expected 1 but was 2\n";
        let result = parse_output(out, false).unwrap();
        assert_eq!(result.status, RunStatus::TestsFailed);
        assert_eq!(
            result.test_results[1],
            TestCaseResult::failed("subtracts", "expected 1 but was 2")
        );
        assert_eq!(result.log, "building...\n");
    }

    #[test]
    fn test_parse_compile_failure() {
        let result = parse_output("Main.java:3: error\nCOMPILE FAILED\n", false).unwrap();
        assert_eq!(result.status, RunStatus::CompileFailed);
        assert!(result.test_results.is_empty());
    }

    #[test]
    fn test_parse_nonzero_exit_without_tests() {
        let result = parse_output("something broke\n", false).unwrap();
        assert_eq!(result.status, RunStatus::GenericError);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_script_in_exercise_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("run-tests.sh"),
            "echo 'PASS first'\necho 'FAIL second - nope'\nexit 1\n",
        )
        .unwrap();

        let result = LocalTestRunner::default().run(dir.path()).unwrap();
        assert_eq!(result.status, RunStatus::TestsFailed);
        assert_eq!(result.test_results.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_script_is_generic_error() {
        let dir = TempDir::new().unwrap();
        let result = LocalTestRunner::default().run(dir.path()).unwrap();
        assert_eq!(result.status, RunStatus::GenericError);
        assert!(!result.log.is_empty());
    }
}
