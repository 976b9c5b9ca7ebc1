//! # 账户消歧 (AccountResolver)
//!
//! 课程名在多个服务器/账户上都能找到时，决定使用哪一个账户。
//!
//! ## 协议
//! 1. 按账户注册顺序逐个询问后端该账户能否找到课程（出错视为找不到）
//! 2. 没有匹配：`CourseNotFoundAnywhere`
//! 3. 恰好一个匹配：直接使用，不提问
//! 4. 多个匹配：依次询问 "Download course from X with 'Y' account"，默认为否；
//!    回答是则立即选定，全部回答否则使用最后一个匹配，并提示
//!    "The previous course was last that matched."
//! 5. 同一次调用中对同一课程名的选择被记住，不再提问；不同课程名重新走 1-4
//!
//! ## 依赖关系
//! - 被 `commands/download.rs`, `commands/exercises.rs` 使用
//! - 使用 `utils/terminal.rs` 的 `Io` 提问

use crate::error::{Result, TmcError};
use crate::models::{Account, Course};
use crate::utils::terminal::Io;

/// 选择是如何得出的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ambiguity {
    /// 只有一个账户匹配
    Unique,
    /// 用户在提问中确认
    Confirmed,
    /// 全部回答否，使用最后一个匹配
    FellBack,
    /// 沿用本次调用中之前的选择
    Remembered,
}

/// 账户解析结果
#[derive(Debug, Clone)]
pub struct AccountResolution {
    pub account: Account,
    /// 在该账户服务器上找到的课程
    pub course: Course,
    pub ambiguity: Ambiguity,
}

/// 本次调用中之前的选择：(课程名, 账户)
#[derive(Debug, Clone, Default)]
pub struct DisambiguationChoice {
    previous: Option<(String, Account)>,
}

impl DisambiguationChoice {
    pub fn remembered(&self, course_name: &str) -> Option<&Account> {
        match &self.previous {
            Some((name, account)) if name == course_name => Some(account),
            _ => None,
        }
    }

    fn remember(&mut self, course_name: &str, account: &Account) {
        self.previous = Some((course_name.to_string(), account.clone()));
    }
}

/// 多个匹配时的提问状态机
enum Step {
    /// 询问第 n 个候选
    Prompt(usize),
    /// 选定第 n 个候选
    Selected(usize),
    /// 候选已全部回答否
    Exhausted,
}

/// 账户解析器，持有本次调用的选择记忆
#[derive(Debug, Default)]
pub struct AccountResolver {
    choice: DisambiguationChoice,
}

impl AccountResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为课程名选择账户
    ///
    /// `find_course` 是后端提供的匹配谓词：找到返回 `Ok(Some(course))`，
    /// 找不到返回 `Ok(None)`，失败返回 `Err`（按找不到处理）。
    pub fn resolve_account<F>(
        &mut self,
        course_name: &str,
        accounts: &[Account],
        mut find_course: F,
        io: &mut dyn Io,
    ) -> Result<AccountResolution>
    where
        F: FnMut(&Account) -> Result<Option<Course>>,
    {
        if let Some(account) = self.choice.remembered(course_name).cloned() {
            match lookup(&mut find_course, &account, course_name) {
                Some(course) => {
                    tracing::debug!(course = course_name, account = %account, "reusing previous choice");
                    return Ok(AccountResolution {
                        account,
                        course,
                        ambiguity: Ambiguity::Remembered,
                    });
                }
                None => tracing::debug!(
                    course = course_name,
                    "previously chosen account no longer matches"
                ),
            }
        }

        let matches: Vec<(Account, Course)> = accounts
            .iter()
            .filter_map(|account| {
                lookup(&mut find_course, account, course_name).map(|c| (account.clone(), c))
            })
            .collect();

        let (index, ambiguity) = match matches.len() {
            0 => {
                return Err(TmcError::CourseNotFoundAnywhere {
                    course: course_name.to_string(),
                })
            }
            1 => (0, Ambiguity::Unique),
            _ => choose_between(&matches, io)?,
        };

        let (account, course) = matches.into_iter().nth(index).ok_or_else(|| {
            TmcError::Other(format!("No account left for course '{}'", course_name))
        })?;
        self.choice.remember(course_name, &account);

        tracing::debug!(course = course_name, account = %account, ?ambiguity, "resolved account");
        Ok(AccountResolution {
            account,
            course,
            ambiguity,
        })
    }
}

/// 询问单个账户，错误记录日志后视为不匹配
fn lookup<F>(find_course: &mut F, account: &Account, course_name: &str) -> Option<Course>
where
    F: FnMut(&Account) -> Result<Option<Course>>,
{
    match find_course(account) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(account = %account, course = course_name, error = %e, "course lookup failed");
            None
        }
    }
}

/// 多个匹配时逐个提问
fn choose_between(matches: &[(Account, Course)], io: &mut dyn Io) -> Result<(usize, Ambiguity)> {
    io.println(&format!(
        "There is {} courses with same name at different servers",
        matches.len()
    ));

    let mut step = Step::Prompt(0);
    loop {
        step = match step {
            Step::Prompt(i) if i < matches.len() => {
                let account = &matches[i].0;
                let prompt = format!(
                    "Download course from {} with '{}' account",
                    account.server_address, account.username
                );
                if io.confirm(&prompt, false)? {
                    Step::Selected(i)
                } else {
                    Step::Prompt(i + 1)
                }
            }
            Step::Prompt(_) => Step::Exhausted,
            Step::Selected(i) => return Ok((i, Ambiguity::Confirmed)),
            Step::Exhausted => {
                io.println("The previous course was last that matched.");
                return Ok((matches.len() - 1, Ambiguity::FellBack));
            }
        };
    }
}
