//! # 命令执行上下文
//!
//! 一次调用内共享的状态：终端、后端、账户列表、工作目录以及账户消歧的记忆。
//! 显式地传给每个命令，不使用全局变量。
//!
//! ## 依赖关系
//! - 被 `commands/` 全部命令使用
//! - 使用 `backend/`, `workspace/accounts.rs`, `utils/terminal.rs`

use crate::backend::Backend;
use crate::error::{Result, TmcError};
use crate::models::{Account, AccountList, CourseRecord};
use crate::utils::terminal::Io;
use crate::workspace::accounts::AccountResolver;

use std::path::PathBuf;

/// 每次调用的上下文
pub struct CliContext<'a> {
    pub io: &'a mut dyn Io,
    pub backend: &'a dyn Backend,
    pub accounts: AccountList,
    /// 账户列表所在目录
    pub config_dir: PathBuf,
    /// 调用时的当前目录
    pub work_dir: PathBuf,
    pub resolver: AccountResolver,
}

impl<'a> CliContext<'a> {
    pub fn new(
        io: &'a mut dyn Io,
        backend: &'a dyn Backend,
        accounts: AccountList,
        config_dir: PathBuf,
        work_dir: PathBuf,
    ) -> Self {
        CliContext {
            io,
            backend,
            accounts,
            config_dir,
            work_dir,
            resolver: AccountResolver::new(),
        }
    }

    /// 至少需要一个账户
    pub fn require_accounts(&self) -> Result<Vec<Account>> {
        if self.accounts.is_empty() {
            return Err(TmcError::NoAccounts {
                path: self.config_dir.display().to_string(),
            });
        }
        Ok(self.accounts.accounts.clone())
    }

    /// 课程记录对应的账户；账户已从列表删除时按记录还原
    pub fn account_for(&self, record: &CourseRecord) -> Account {
        self.accounts
            .find(&record.account)
            .cloned()
            .unwrap_or_else(|| record.account.to_account())
    }

    pub fn println(&mut self, line: &str) {
        self.io.println(line);
    }

    pub fn errorln(&mut self, line: &str) {
        self.io.errorln(line);
    }
}
