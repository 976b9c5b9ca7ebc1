//! # 组织数据模型
//!
//! 服务器上的组织。账户的 `organization` 字段保存所选组织的 slug，
//! 课程按组织划分。
//!
//! ## 依赖关系
//! - 被 `backend/` 和 `commands/organization.rs` 使用

use serde::{Deserialize, Serialize};

/// 服务器上的一个组织
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    #[serde(default)]
    pub information: String,
    pub slug: String,
    /// 置顶的组织在列表中排在前面
    #[serde(default)]
    pub pinned: bool,
}

impl Organization {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, pinned: bool) -> Self {
        Organization {
            name: name.into(),
            information: String::new(),
            slug: slug.into(),
            pinned,
        }
    }
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (slug: {})", self.name, self.slug)
    }
}
