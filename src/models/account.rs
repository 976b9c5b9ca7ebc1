//! # 账户数据模型
//!
//! 用户曾经登录过的 (服务器, 用户名, 组织) 三元组，以及按注册顺序保存的账户列表。
//!
//! ## 依赖关系
//! - 被 `workspace/accounts.rs`, `backend/` 和 `commands/` 使用
//! - 使用 `serde_json` 读写 `accounts.json`, `tempfile` 原子写入

use crate::error::{Result, TmcError};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 账户列表文件名
pub const ACCOUNTS_FILE: &str = "accounts.json";

/// 一个已登录的账户，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub server_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        server_address: impl Into<String>,
        organization: Option<&str>,
    ) -> Self {
        Account {
            username: username.into(),
            server_address: server_address.into(),
            organization: organization.map(str::to_string),
        }
    }

    /// 账户是否与课程记录中引用的 (服务器, 用户名) 相同
    pub fn matches(&self, reference: &AccountRef) -> bool {
        self.server_address == reference.server_address && self.username == reference.username
    }

    pub fn to_ref(&self) -> AccountRef {
        AccountRef {
            server_address: self.server_address.clone(),
            username: self.username.clone(),
            organization: self.organization.clone(),
        }
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.username, self.server_address)
    }
}

/// 课程记录中保存的账户引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub server_address: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl AccountRef {
    /// 还原成账户（账户列表中已删除该账户时使用）
    pub fn to_account(&self) -> Account {
        Account {
            username: self.username.clone(),
            server_address: self.server_address.clone(),
            organization: self.organization.clone(),
        }
    }
}

/// 账户列表，顺序即注册顺序（最早的在前）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountList {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl AccountList {
    /// 从配置目录加载账户列表，文件不存在时返回空列表
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(ACCOUNTS_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no account list, starting empty");
            return Ok(AccountList::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| TmcError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| TmcError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 原子地保存账户列表，配置目录不存在时创建
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let path = config_dir.join(ACCOUNTS_FILE);
        let write_err = |e: std::io::Error| TmcError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        };

        fs::create_dir_all(config_dir).map_err(write_err)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TmcError::Other(format!("Failed to serialize account list: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(config_dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path.display(), accounts = self.accounts.len(), "saved account list");
        Ok(())
    }

    /// 按 (服务器, 用户名) 查找账户
    pub fn find(&self, reference: &AccountRef) -> Option<&Account> {
        self.accounts.iter().find(|a| a.matches(reference))
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
