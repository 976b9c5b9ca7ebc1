//! # 外部协作者接口
//!
//! 课程服务器与本地测试运行器的抽象。核心逻辑只依赖这个 trait，
//! 命令层在运行时选择实现，测试中使用内存替身。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`
//! - 子模块: mirror (本地目录镜像服务器), runner (本地测试运行器)

pub mod mirror;
pub mod runner;

use crate::error::Result;
use crate::models::{Account, Course, Exercise, Organization, RunResult, SubmissionResult};

use std::path::Path;

/// 课程服务器与测试运行器
pub trait Backend {
    /// 账户所在服务器上的组织
    fn list_organizations(&self, account: &Account) -> Result<Vec<Organization>>;

    /// 账户可见的课程（只含名称，练习未加载）
    fn list_courses(&self, account: &Account) -> Result<Vec<Course>>;

    /// 加载课程的练习列表和该账户的进度
    fn get_course_details(&self, account: &Account, course: &Course) -> Result<Course>;

    /// 把练习下载到 `target_dir/<exercise>`，返回实际下载成功的练习
    fn download_exercises(
        &self,
        account: &Account,
        course: &Course,
        exercises: &[Exercise],
        target_dir: &Path,
    ) -> Result<Vec<Exercise>>;

    /// 在练习目录中运行本地测试
    fn run_local_tests(&self, exercise_dir: &Path) -> Result<RunResult>;

    /// 提交练习，返回服务器评测结果
    fn submit(
        &self,
        account: &Account,
        course: &Course,
        exercise: &Exercise,
        exercise_dir: &Path,
    ) -> Result<SubmissionResult>;

    /// 按名称在账户的服务器上查找课程（含练习详情）
    fn find_course_on_server(&self, account: &Account, name: &str) -> Result<Option<Course>> {
        let listed = self.list_courses(account)?;
        match listed.into_iter().find(|c| c.name == name) {
            Some(course) => Ok(Some(self.get_course_details(account, &course)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! 内存中的后端替身

    use super::*;
    use crate::error::TmcError;
    use crate::models::{RunStatus, TestCaseResult};

    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    /// 按服务器地址保存课程，下载时只写出 `downloadable` 中的练习
    #[derive(Default)]
    pub struct FakeBackend {
        pub courses: HashMap<String, Vec<Course>>,
        /// 按服务器地址保存的组织，不存在的地址视为连接失败
        pub organizations: HashMap<String, Vec<Organization>>,
        pub downloadable: Vec<String>,
        /// 下载整体失败
        pub download_error: bool,
        /// 按练习名返回的测试结果，缺省为通过
        pub runs: HashMap<String, RunStatus>,
        pub submissions: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_course(mut self, server: &str, course: Course) -> Self {
            self.downloadable
                .extend(course.exercises.iter().map(|e| e.name.clone()));
            self.courses
                .entry(server.to_string())
                .or_default()
                .push(course);
            self
        }
    }

    impl Backend for FakeBackend {
        fn list_organizations(&self, account: &Account) -> Result<Vec<Organization>> {
            self.organizations
                .get(&account.server_address)
                .cloned()
                .ok_or_else(|| TmcError::UnsupportedServer {
                    address: account.server_address.clone(),
                })
        }

        fn list_courses(&self, account: &Account) -> Result<Vec<Course>> {
            Ok(self
                .courses
                .get(&account.server_address)
                .map(|list| list.iter().map(|c| Course::new(c.name.clone())).collect())
                .unwrap_or_default())
        }

        fn get_course_details(&self, account: &Account, course: &Course) -> Result<Course> {
            self.courses
                .get(&account.server_address)
                .and_then(|list| list.iter().find(|c| c.name == course.name))
                .cloned()
                .ok_or_else(|| TmcError::Other(format!("no course {}", course.name)))
        }

        fn download_exercises(
            &self,
            _account: &Account,
            _course: &Course,
            exercises: &[Exercise],
            target_dir: &Path,
        ) -> Result<Vec<Exercise>> {
            if self.download_error {
                return Err(TmcError::Other("connection reset".to_string()));
            }
            let mut done = Vec::new();
            for exercise in exercises {
                if !self.downloadable.contains(&exercise.name) {
                    continue;
                }
                let dir = target_dir.join(&exercise.name);
                fs::create_dir_all(&dir).map_err(|e| TmcError::FileWriteError {
                    path: dir.display().to_string(),
                    source: e,
                })?;
                done.push(exercise.clone());
            }
            Ok(done)
        }

        fn run_local_tests(&self, exercise_dir: &Path) -> Result<RunResult> {
            let name = exercise_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let status = self.runs.get(name).copied().unwrap_or(RunStatus::Passed);
            let tests = match status {
                RunStatus::Passed => vec![TestCaseResult::passed("first")],
                _ => vec![
                    TestCaseResult::passed("first"),
                    TestCaseResult::failed("second", "expected true"),
                ],
            };
            Ok(RunResult::new(status, tests))
        }

        fn submit(
            &self,
            _account: &Account,
            _course: &Course,
            exercise: &Exercise,
            _exercise_dir: &Path,
        ) -> Result<SubmissionResult> {
            self.submissions.borrow_mut().push(exercise.name.clone());
            Ok(SubmissionResult {
                all_tests_passed: true,
                points: vec![exercise.name.clone()],
                test_results: vec![TestCaseResult::passed("first")],
                message: String::new(),
            })
        }
    }
}
