//! # 工具函数模块
//!
//! 提供美化输出、进度 spinner 和终端交互。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `workspace/` 模块使用
//! - 子模块: output, progress, terminal

pub mod output;
pub mod progress;
pub mod terminal;
