//! # 结果合并 (ResultReconciler)
//!
//! 把下载、本地测试和提交的结果合并进课程记录。
//!
//! ## 规则
//! - 下载：没有任何练习落盘时回滚新建的课程目录；至少一个落盘则保留目录，
//!   只把成功的子集写入记录并报告数量。下载前已在磁盘上的练习不重新下载，
//!   只刷新服务器状态；名称不能作为目录名的练习一律算作失败
//! - 测试：无论通过与否都设置 attempted；通过且服务器未完成时设置
//!   locally_completed，否则清除；每个练习处理完立即保存
//! - 提交：服务器结果为准，只生成报告，不写入记录
//!
//! ## 依赖关系
//! - 被 `commands/download.rs`, `commands/test.rs`, `commands/submit.rs` 使用
//! - 使用 `workspace/store.rs` 持久化

use crate::error::{Result, TmcError};
use crate::models::{is_plain_name, CourseRecord, Exercise, RunResult, RunStatus, SubmissionResult};
use crate::workspace::store::{self, CourseCreation};

// ─────────────────────────────────────────────────────────────
// 下载
// ─────────────────────────────────────────────────────────────

/// 下载结果统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub course_name: String,
    /// 课程中练习总数
    pub course_exercises: usize,
    /// 请求下载的数量
    pub requested: usize,
    /// 成功落盘的练习
    pub downloaded: Vec<String>,
    /// 下载前已在磁盘上、保持原样的练习
    pub already_downloaded: Vec<String>,
    /// 失败的练习
    pub failed: Vec<String>,
    /// 整体失败（没有任何练习落盘）
    pub total_failure: bool,
    /// 整体失败时新建目录已被删除
    pub rolled_back: bool,
}

impl DownloadSummary {
    /// 面向用户的统计描述
    pub fn describe(&self) -> String {
        let mut text = format!(
            "The '{}' course has {} exercises, of which {} exercises were successfully downloaded",
            self.course_name,
            self.course_exercises,
            self.downloaded.len()
        );
        if self.failed.is_empty() {
            text.push('.');
        } else {
            text.push_str(&format!(" and of which {} failed.", self.failed.len()));
        }
        text
    }
}

/// 合并下载结果
///
/// `present` 是下载前已在磁盘上的练习，`requested` 是交给后端下载的练习，
/// `downloaded` 为 `None` 表示后端整体失败。
pub fn apply_download(
    creation: CourseCreation,
    course_exercises: usize,
    present: &[Exercise],
    requested: &[Exercise],
    downloaded: Option<Vec<Exercise>>,
) -> Result<(CourseRecord, DownloadSummary)> {
    let CourseCreation {
        mut record,
        created,
    } = creation;

    let returned = downloaded.unwrap_or_default();

    // 只有后端返回且目录确实存在的练习才算成功，保持请求顺序
    let confirmed: Vec<&Exercise> = requested
        .iter()
        .filter(|req| is_plain_name(&req.name))
        .filter(|req| returned.iter().any(|r| r.name == req.name))
        .filter(|req| record.exercise_dir(&req.name).is_dir())
        .collect();

    let failed: Vec<String> = requested
        .iter()
        .filter(|req| !confirmed.iter().any(|c| c.name == req.name))
        .map(|req| req.name.clone())
        .collect();

    let mut summary = DownloadSummary {
        course_name: record.course_name.clone(),
        course_exercises,
        requested: requested.len(),
        downloaded: confirmed.iter().map(|e| e.name.clone()).collect(),
        already_downloaded: Vec::new(),
        failed,
        total_failure: false,
        rolled_back: false,
    };

    if confirmed.is_empty() && !requested.is_empty() {
        summary.total_failure = true;
        if created {
            store::abort_course_creation(&record.root)?;
            summary.rolled_back = true;
        }
        tracing::info!(
            course = %summary.course_name,
            rolled_back = summary.rolled_back,
            "download produced no exercises"
        );
        return Ok((record, summary));
    }

    for exercise in present.iter().filter(|e| is_plain_name(&e.name)) {
        record.upsert(exercise);
        summary.already_downloaded.push(exercise.name.clone());
    }
    for exercise in &confirmed {
        record.upsert(exercise);
    }
    store::save(&record)?;

    tracing::debug!(
        course = %summary.course_name,
        requested = summary.requested,
        downloaded = summary.downloaded.len(),
        already = summary.already_downloaded.len(),
        failed = summary.failed.len(),
        "download reconciled"
    );
    Ok((record, summary))
}

// ─────────────────────────────────────────────────────────────
// 本地测试
// ─────────────────────────────────────────────────────────────

/// 单个练习的测试统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunSummary {
    pub exercise: String,
    pub status: RunStatus,
    pub passed_tests: usize,
    pub total_tests: usize,
    /// 服务器已标记完成
    pub server_completed: bool,
    pub locally_completed: bool,
}

/// 合并一次本地测试结果并立即保存
pub fn apply_test_run(
    record: &mut CourseRecord,
    exercise: &str,
    run_result: &RunResult,
) -> Result<TestRunSummary> {
    // 在副本上修改，保存成功后才替换调用方的记录
    let mut updated = record.clone();
    let state = updated
        .exercise_mut(exercise)
        .ok_or_else(|| TmcError::UnknownExercise {
            name: exercise.to_string(),
        })?;

    state.attempted = true;
    state.locally_completed = run_result.is_passed() && !state.completed;

    let summary = TestRunSummary {
        exercise: exercise.to_string(),
        status: run_result.status,
        passed_tests: run_result.passed_count(),
        total_tests: run_result.test_results.len(),
        server_completed: state.completed,
        locally_completed: state.locally_completed,
    };

    store::save(&updated)?;
    *record = updated;
    tracing::debug!(
        exercise = %summary.exercise,
        status = %summary.status,
        server_completed = summary.server_completed,
        locally_completed = summary.locally_completed,
        "test run recorded"
    );
    Ok(summary)
}

// ─────────────────────────────────────────────────────────────
// 提交
// ─────────────────────────────────────────────────────────────

/// 提交结果报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub exercise: String,
    /// 提交是否到达服务器
    pub delivered: bool,
    pub all_tests_passed: bool,
    pub points: Vec<String>,
    pub passed_tests: usize,
    pub total_tests: usize,
    pub failed_tests: Vec<String>,
    pub message: String,
}

/// 生成提交报告，记录保持不变
pub fn apply_submission(
    record: &CourseRecord,
    exercise: &str,
    submission: Option<&SubmissionResult>,
) -> Result<SubmissionSummary> {
    if record.exercise(exercise).is_none() {
        return Err(TmcError::UnknownExercise {
            name: exercise.to_string(),
        });
    }

    let summary = match submission {
        None => SubmissionSummary {
            exercise: exercise.to_string(),
            delivered: false,
            all_tests_passed: false,
            points: Vec::new(),
            passed_tests: 0,
            total_tests: 0,
            failed_tests: Vec::new(),
            message: "Submission failed.".to_string(),
        },
        Some(result) => SubmissionSummary {
            exercise: exercise.to_string(),
            delivered: true,
            all_tests_passed: result.all_tests_passed,
            points: result.points.clone(),
            passed_tests: result.passed_count(),
            total_tests: result.test_results.len(),
            failed_tests: result
                .test_results
                .iter()
                .filter(|t| !t.passed)
                .map(|t| t.name.clone())
                .collect(),
            message: result.message.clone(),
        },
    };
    tracing::debug!(
        exercise = %summary.exercise,
        delivered = summary.delivered,
        failed = ?summary.failed_tests,
        "submission reported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, ExerciseState, TestCaseResult};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn account() -> Account {
        Account::new("user", "http://test.test", None)
    }

    fn exercises(names: &[&str]) -> Vec<Exercise> {
        names.iter().map(|n| Exercise::new(*n, "course1")).collect()
    }

    fn write_exercise(root: &Path, name: &str) {
        fs::create_dir_all(root.join(name)).unwrap();
        fs::write(root.join(name).join("Main.java"), "class Main {}").unwrap();
    }

    #[test]
    fn test_null_download_removes_new_course() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();

        let requested = exercises(&["ex1", "ex2"]);
        let (_, summary) = apply_download(creation, 2, &[], &requested, None).unwrap();

        assert!(summary.total_failure);
        assert!(summary.rolled_back);
        assert!(!root.exists());
    }

    #[test]
    fn test_empty_download_removes_new_course() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();

        let requested = exercises(&["ex1"]);
        let (_, summary) = apply_download(creation, 1, &[], &requested, Some(vec![])).unwrap();

        assert!(summary.rolled_back);
        assert!(!root.exists());
    }

    #[test]
    fn test_failed_download_into_existing_course_keeps_it() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex1");
        let (before, _) =
            apply_download(creation, 2, &[], &exercises(&["ex1"]), Some(exercises(&["ex1"]))).unwrap();

        let again = store::create_course_directory(&root, &account(), "course1").unwrap();
        let (_, summary) = apply_download(again, 2, &[], &exercises(&["ex2"]), None).unwrap();

        assert!(summary.total_failure);
        assert!(!summary.rolled_back);
        assert_eq!(store::load(&root).unwrap(), before);
    }

    #[test]
    fn test_partial_download_keeps_successful_subset() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex1");
        write_exercise(&root, "ex3");

        let requested = exercises(&["ex1", "ex2", "ex3"]);
        let returned = exercises(&["ex1", "ex3"]);
        let (record, summary) = apply_download(creation, 3, &[], &requested, Some(returned)).unwrap();

        assert_eq!(summary.downloaded, vec!["ex1".to_string(), "ex3".to_string()]);
        assert_eq!(summary.failed, vec!["ex2".to_string()]);
        assert!(!summary.total_failure);
        assert!(root.exists());

        let loaded = store::load(&root).unwrap();
        assert_eq!(loaded, record);
        let names: Vec<&str> = loaded.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ex1", "ex3"]);

        let text = summary.describe();
        assert!(text.contains("The 'course1' course has 3 exercises"));
        assert!(text.contains("of which 2 exercises were successfully downloaded"));
        assert!(text.contains("and of which 1 failed."));
    }

    #[test]
    fn test_returned_but_missing_on_disk_is_failed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex1");

        let requested = exercises(&["ex1", "ex2"]);
        let (_, summary) =
            apply_download(creation, 2, &[], &requested, Some(exercises(&["ex1", "ex2"]))).unwrap();

        assert_eq!(summary.failed, vec!["ex2".to_string()]);
    }

    #[test]
    fn test_nothing_requested_keeps_course() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();

        let (_, summary) = apply_download(creation, 3, &[], &[], Some(vec![])).unwrap();
        assert!(!summary.total_failure);
        assert!(root.exists());
        assert_eq!(
            summary.describe(),
            "The 'course1' course has 3 exercises, of which 0 exercises were successfully downloaded."
        );
    }

    #[test]
    fn test_present_exercises_are_kept_not_failed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex1");
        apply_download(creation, 2, &[], &exercises(&["ex1"]), Some(exercises(&["ex1"]))).unwrap();
        fs::write(root.join("ex1").join("Main.java"), "my solution").unwrap();

        let again = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex2");
        let (record, summary) = apply_download(
            again,
            2,
            &exercises(&["ex1"]),
            &exercises(&["ex2"]),
            Some(exercises(&["ex2"])),
        )
        .unwrap();

        assert_eq!(summary.already_downloaded, vec!["ex1".to_string()]);
        assert_eq!(summary.downloaded, vec!["ex2".to_string()]);
        assert!(summary.failed.is_empty());
        assert_eq!(record.exercises.len(), 2);
        assert_eq!(
            fs::read_to_string(root.join("ex1").join("Main.java")).unwrap(),
            "my solution"
        );
    }

    #[test]
    fn test_names_outside_course_root_are_failed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("course1");
        let creation = store::create_course_directory(&root, &account(), "course1").unwrap();
        write_exercise(&root, "ex1");
        fs::create_dir_all(dir.path().join("outside")).unwrap();

        let requested = exercises(&["ex1", "../outside"]);
        let (record, summary) =
            apply_download(creation, 2, &[], &requested, Some(requested.clone())).unwrap();

        assert_eq!(summary.failed, vec!["../outside".to_string()]);
        assert!(record.exercise("../outside").is_none());
    }

    fn tested_record(dir: &TempDir) -> CourseRecord {
        let root = dir.path().join("course1");
        let mut record = store::create_course_directory(&root, &account(), "course1")
            .unwrap()
            .record;
        record.exercises.push(ExerciseState::new("ex1"));
        let mut done = ExerciseState::new("done");
        done.completed = true;
        record.exercises.push(done);
        store::save(&record).unwrap();
        record
    }

    fn run(status: RunStatus) -> RunResult {
        let tests = match status {
            RunStatus::Passed => vec![TestCaseResult::passed("a"), TestCaseResult::passed("b")],
            _ => vec![
                TestCaseResult::passed("a"),
                TestCaseResult::failed("b", "expected 1"),
            ],
        };
        RunResult::new(status, tests)
    }

    #[test]
    fn test_pass_then_fail_transitions() {
        let dir = TempDir::new().unwrap();
        let mut record = tested_record(&dir);

        let summary = apply_test_run(&mut record, "ex1", &run(RunStatus::Passed)).unwrap();
        assert!(summary.locally_completed);
        assert_eq!(summary.passed_tests, 2);
        let stored = store::load(record.root()).unwrap();
        assert!(stored.exercise("ex1").unwrap().locally_completed);
        assert!(stored.exercise("ex1").unwrap().attempted);

        let summary = apply_test_run(&mut record, "ex1", &run(RunStatus::TestsFailed)).unwrap();
        assert!(!summary.locally_completed);
        assert_eq!(summary.passed_tests, 1);
        let stored = store::load(record.root()).unwrap();
        let state = stored.exercise("ex1").unwrap();
        assert!(!state.locally_completed);
        assert!(state.attempted);
        assert!(!state.completed);
    }

    #[test]
    fn test_failed_run_marks_attempted() {
        let dir = TempDir::new().unwrap();
        let mut record = tested_record(&dir);

        apply_test_run(&mut record, "ex1", &run(RunStatus::CompileFailed)).unwrap();
        let state = store::load(record.root()).unwrap();
        assert!(state.exercise("ex1").unwrap().attempted);
        assert!(!state.exercise("ex1").unwrap().locally_completed);
    }

    #[test]
    fn test_server_completed_is_never_touched() {
        let dir = TempDir::new().unwrap();
        let mut record = tested_record(&dir);

        let summary = apply_test_run(&mut record, "done", &run(RunStatus::Passed)).unwrap();
        assert!(!summary.locally_completed);
        assert!(summary.server_completed);

        apply_test_run(&mut record, "done", &run(RunStatus::TestsFailed)).unwrap();
        assert!(store::load(record.root()).unwrap().exercise("done").unwrap().completed);
    }

    #[test]
    fn test_failed_save_leaves_record_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut record = tested_record(&dir);
        record.root = dir.path().join("gone");
        let before = record.clone();

        assert!(apply_test_run(&mut record, "ex1", &run(RunStatus::Passed)).is_err());
        assert_eq!(record, before);
        assert!(!record.exercise("ex1").unwrap().attempted);
    }

    #[test]
    fn test_unknown_exercise_in_test_run() {
        let dir = TempDir::new().unwrap();
        let mut record = tested_record(&dir);
        assert!(matches!(
            apply_test_run(&mut record, "ghost", &run(RunStatus::Passed)),
            Err(TmcError::UnknownExercise { .. })
        ));
    }

    #[test]
    fn test_submission_does_not_touch_record() {
        let dir = TempDir::new().unwrap();
        let record = tested_record(&dir);
        let before = store::load(record.root()).unwrap();

        let result = SubmissionResult {
            all_tests_passed: false,
            points: vec!["1.1".to_string()],
            test_results: vec![
                TestCaseResult::passed("a"),
                TestCaseResult::failed("b", "nope"),
            ],
            message: String::new(),
        };
        let summary = apply_submission(&record, "ex1", Some(&result)).unwrap();
        assert!(summary.delivered);
        assert_eq!(summary.failed_tests, vec!["b".to_string()]);
        assert_eq!(summary.passed_tests, 1);

        let failed = apply_submission(&record, "ex1", None).unwrap();
        assert!(!failed.delivered);
        assert_eq!(failed.message, "Submission failed.");

        assert_eq!(store::load(record.root()).unwrap(), before);
    }
}
