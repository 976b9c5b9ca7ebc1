//! # 数据模型模块
//!
//! 定义账户、组织、课程、练习、课程记录和运行结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `workspace/`, `backend/` 和 `commands/` 使用
//! - 子模块: account, course, organization, record, result

pub mod account;
pub mod course;
pub mod organization;
pub mod record;
pub mod result;

pub use account::{Account, AccountList, AccountRef};
pub use course::{Course, Exercise};
pub use organization::Organization;
pub use record::{is_plain_name, CourseRecord, ExerciseState};
pub use result::{RunResult, RunStatus, SubmissionResult, TestCaseResult};
