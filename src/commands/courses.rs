//! # courses 命令实现
//!
//! 列出每个账户在其服务器上可见的课程。某个服务器查询失败时只给出警告，
//! 继续查询其余账户。
//!
//! ## 依赖关系
//! - 使用 `cli/courses.rs` 定义的参数
//! - 使用 `backend/` 的 `list_courses`

use super::context::CliContext;
use crate::cli::courses::CoursesArgs;
use crate::error::Result;
use crate::utils::output;

/// 执行 courses 命令
pub fn execute(ctx: &mut CliContext, args: CoursesArgs) -> Result<()> {
    let accounts = ctx.require_accounts()?;
    let backend = ctx.backend;

    for account in &accounts {
        ctx.println(&output::header(&account.to_string()));
        match backend.list_courses(account) {
            Ok(courses) => {
                let names: Vec<&str> = courses
                    .iter()
                    .map(|c| c.name.as_str())
                    .filter(|name| args.filter.as_deref().map_or(true, |f| name.contains(f)))
                    .collect();
                if names.is_empty() {
                    ctx.println(&output::info("No courses found"));
                }
                for name in names {
                    ctx.println(&format!("  {}", name));
                }
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "listing courses failed");
                ctx.errorln(&output::warning(&format!(
                    "Could not list courses of {}: {}",
                    account, e
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::error::TmcError;
    use crate::models::{Account, AccountList, Course};
    use crate::utils::terminal::testing::ScriptedIo;
    use std::path::PathBuf;

    #[test]
    fn test_lists_courses_per_account() {
        let backend = FakeBackend::new()
            .with_course("http://test.test", Course::new("java-2026"))
            .with_course("http://test.test", Course::new("python-2026"))
            .with_course("http://hello.test", Course::new("rust-2026"));
        let accounts = AccountList {
            accounts: vec![
                Account::new("abc", "http://test.test", None),
                Account::new("def", "http://hello.test", None),
            ],
        };
        let mut io = ScriptedIo::new();
        let mut ctx = CliContext::new(
            &mut io,
            &backend,
            accounts,
            PathBuf::from("/config"),
            PathBuf::from("/"),
        );

        execute(
            &mut ctx,
            CoursesArgs {
                filter: Some("2026".to_string()),
            },
        )
        .unwrap();

        io.assert_contains("java-2026");
        io.assert_contains("python-2026");
        io.assert_contains("rust-2026");
    }

    #[test]
    fn test_requires_accounts() {
        let backend = FakeBackend::new();
        let mut io = ScriptedIo::new();
        let mut ctx = CliContext::new(
            &mut io,
            &backend,
            AccountList::default(),
            PathBuf::from("/config"),
            PathBuf::from("/"),
        );
        assert!(matches!(
            execute(&mut ctx, CoursesArgs::default()),
            Err(TmcError::NoAccounts { .. })
        ));
    }
}
