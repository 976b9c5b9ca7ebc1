//! # 本地工作区核心
//!
//! 课程目录、课程记录、账户消歧以及结果合并。这里的逻辑与终端和服务器无关，
//! 交互通过 `utils::terminal::Io`，服务器通过调用方传入的闭包或结果值。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `utils/terminal.rs`
//! - 子模块: accounts, reconcile, resolver, store

pub mod accounts;
pub mod reconcile;
pub mod resolver;
pub mod store;
