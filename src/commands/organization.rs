//! # organization 命令实现
//!
//! 列出账户服务器上的组织，让用户按 slug 选择一个，并写回账户列表。
//!
//! ## 流程
//! 1. 选择账户：`--server` 给出时取该服务器上的第一个账户，否则取第一个账户
//! 2. 给出 `-o` 时直接使用；slug 无效时列出所有组织并改为交互询问
//! 3. 未给出 `-o` 时列出组织（置顶的在前，各自按名称排序）并询问，直到 slug 匹配
//! 4. 原子地保存 `accounts.json`
//!
//! ## 依赖关系
//! - 使用 `cli/organization.rs` 定义的参数
//! - 使用 `backend/` 的 `list_organizations`, `models/account.rs` 的 `AccountList::save`

use super::context::CliContext;
use crate::cli::organization::OrganizationArgs;
use crate::error::{Result, TmcError};
use crate::models::Organization;
use crate::utils::output;

const SLUG_PROMPT: &str = "Choose organization by writing its slug: ";

/// 执行 organization 命令
pub fn execute(ctx: &mut CliContext, args: OrganizationArgs) -> Result<()> {
    ctx.require_accounts()?;
    let index = account_index(ctx, args.server.as_deref())?;
    let account = ctx.accounts.accounts[index].clone();

    let organizations = match ctx.backend.list_organizations(&account) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(account = %account, error = %e, "listing organizations failed");
            return Err(TmcError::Other(
                "Failed to fetch organizations from server.".to_string(),
            ));
        }
    };
    if organizations.is_empty() {
        ctx.println(&output::info("No organizations found."));
        return Ok(());
    }

    let chosen = choose(ctx, &organizations, args.organization)?;
    ctx.println(&format!("Choosing organization {}", chosen.name));

    ctx.accounts.accounts[index].organization = Some(chosen.slug.clone());
    ctx.accounts.save(&ctx.config_dir)?;
    tracing::info!(account = %account, organization = %chosen.slug, "organization changed");
    Ok(())
}

/// 要修改的账户在列表中的位置
fn account_index(ctx: &CliContext, server: Option<&str>) -> Result<usize> {
    match server {
        None => Ok(0),
        Some(address) => ctx
            .accounts
            .accounts
            .iter()
            .position(|a| a.server_address == address)
            .ok_or_else(|| TmcError::Other(format!("No account on server '{}'", address))),
    }
}

/// 询问直到 slug 匹配某个组织
fn choose(
    ctx: &mut CliContext,
    organizations: &[Organization],
    from_args: Option<String>,
) -> Result<Organization> {
    let mut pending = from_args;
    let mut show_list = pending.is_none();

    loop {
        let given = pending.is_some();
        if show_list {
            print_organizations(ctx, organizations);
            show_list = false;
        }

        let slug = match pending.take() {
            Some(slug) => slug,
            None => ctx.io.read_line(SLUG_PROMPT)?.ok_or_else(|| {
                TmcError::InputError(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no organization chosen",
                ))
            })?,
        };

        let slug = slug.trim().to_lowercase();
        if let Some(found) = organizations.iter().find(|o| o.slug == slug) {
            return Ok(found.clone());
        }

        ctx.errorln("Slug doesn't match any organization.");
        // 命令行给出的 slug 无效时改为列出全部再询问
        if given {
            show_list = true;
        }
    }
}

/// 置顶的组织在前，分隔线之后是其余组织，各自按名称排序
fn print_organizations(ctx: &mut CliContext, organizations: &[Organization]) {
    let mut sorted: Vec<&Organization> = organizations.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let (pinned, others): (Vec<&Organization>, Vec<&Organization>) =
        sorted.into_iter().partition(|o| o.pinned);

    ctx.println("Available Organizations:");
    ctx.println("");
    for organization in pinned {
        ctx.println(&organization.to_string());
    }
    ctx.println("----------");
    for organization in others {
        ctx.println(&organization.to_string());
    }
    ctx.println("");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::models::{Account, AccountList};
    use crate::utils::terminal::testing::ScriptedIo;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn backend() -> FakeBackend {
        let mut backend = FakeBackend::new();
        backend.organizations.insert(
            "http://test.test".to_string(),
            vec![
                Organization::new("E", "e", false),
                Organization::new("C", "c", false),
                Organization::new("B", "b", true),
                Organization::new("D", "d", false),
                Organization::new("A", "a", true),
            ],
        );
        backend.organizations.insert(
            "http://hello.test".to_string(),
            vec![Organization::new("Test", "test", false)],
        );
        backend
    }

    fn accounts() -> AccountList {
        AccountList {
            accounts: vec![
                Account::new("abc", "http://test.test", None),
                Account::new("def", "http://hello.test", None),
            ],
        }
    }

    fn run(
        config: &Path,
        backend: &FakeBackend,
        io: &mut ScriptedIo,
        args: OrganizationArgs,
    ) -> Result<()> {
        let mut ctx = CliContext::new(
            io,
            backend,
            accounts(),
            config.to_path_buf(),
            config.to_path_buf(),
        );
        execute(&mut ctx, args)
    }

    #[test]
    fn test_prints_pinned_organizations_first() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();
        io.add_line_prompt("a");

        run(config.path(), &backend(), &mut io, OrganizationArgs::default()).unwrap();

        io.assert_contains("A (slug: a)\nB (slug: b)\n----------\nC (slug: c)\nD (slug: d)\nE (slug: e)");
        io.assert_contains("Choosing organization A");
        io.assert_all_prompts_used();
    }

    #[test]
    fn test_asks_until_slug_matches() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();
        io.add_line_prompt("unmatched slug");
        io.add_line_prompt(" C \n");

        run(config.path(), &backend(), &mut io, OrganizationArgs::default()).unwrap();

        io.assert_contains("Slug doesn't match any organization.");
        assert_eq!(io.prompts.len(), 2);
        let saved = AccountList::load(config.path()).unwrap();
        assert_eq!(saved.accounts[0].organization.as_deref(), Some("c"));
    }

    #[test]
    fn test_slug_from_arguments_saves_account_list() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();
        let args = OrganizationArgs {
            organization: Some("test".to_string()),
            server: Some("http://hello.test".to_string()),
        };

        run(config.path(), &backend(), &mut io, args).unwrap();

        io.assert_contains("Choosing organization Test");
        io.assert_not_contains("Available Organizations:");
        assert!(io.prompts.is_empty());

        let saved = AccountList::load(config.path()).unwrap();
        assert_eq!(saved.accounts[0].organization, None);
        assert_eq!(saved.accounts[1].organization.as_deref(), Some("test"));
    }

    #[test]
    fn test_invalid_slug_argument_lists_and_asks() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();
        io.add_line_prompt("b");
        let args = OrganizationArgs {
            organization: Some("invalid".to_string()),
            server: None,
        };

        run(config.path(), &backend(), &mut io, args).unwrap();

        io.assert_contains("Slug doesn't match any organization.");
        io.assert_contains("Available Organizations:");
        io.assert_contains("Choosing organization B");
        io.assert_all_prompts_used();
    }

    #[test]
    fn test_end_of_input_saves_nothing() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();

        let result = run(config.path(), &backend(), &mut io, OrganizationArgs::default());

        assert!(matches!(result, Err(TmcError::InputError(_))));
        assert!(AccountList::load(config.path()).unwrap().is_empty());
    }

    #[test]
    fn test_server_failure_keeps_accounts() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();

        let result = run(config.path(), &FakeBackend::new(), &mut io, OrganizationArgs::default());

        match result {
            Err(TmcError::Other(msg)) => assert_eq!(msg, "Failed to fetch organizations from server."),
            other => panic!("unexpected {:?}", other),
        }
        assert!(AccountList::load(config.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_server_is_rejected() {
        let config = TempDir::new().unwrap();
        let mut io = ScriptedIo::new();
        let args = OrganizationArgs {
            organization: Some("a".to_string()),
            server: Some("http://nowhere.test".to_string()),
        };

        assert!(run(config.path(), &backend(), &mut io, args).is_err());
    }
}
