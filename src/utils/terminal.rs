//! # 终端交互
//!
//! 命令输出与交互式提问的统一接口。核心逻辑只通过 `Io` 与用户交流，
//! 测试中用脚本化实现替换终端。
//!
//! ## 依赖关系
//! - 被 `workspace/accounts.rs` 和所有 `commands/` 使用
//! - 使用 `console` 读取标准输入

use crate::error::{Result, TmcError};

use console::Term;

/// 用户交互接口
pub trait Io {
    /// 输出一行到标准输出
    fn println(&mut self, line: &str);

    /// 输出一行到标准错误
    fn errorln(&mut self, line: &str);

    /// 询问是/否，空输入或输入结束时返回默认值
    fn confirm(&mut self, prompt: &str, default_yes: bool) -> Result<bool>;

    /// 读取一行输入，输入结束时返回 `None`
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// 真实终端
pub struct TerminalIo {
    out: Term,
    err: Term,
}

impl TerminalIo {
    pub fn new() -> Self {
        TerminalIo {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }
}

impl Default for TerminalIo {
    fn default() -> Self {
        Self::new()
    }
}

impl Io for TerminalIo {
    fn println(&mut self, line: &str) {
        self.out.write_line(line).ok();
    }

    fn errorln(&mut self, line: &str) {
        self.err.write_line(line).ok();
    }

    fn confirm(&mut self, prompt: &str, default_yes: bool) -> Result<bool> {
        let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
        self.out
            .write_str(&format!("{} {} ", prompt, suffix))
            .map_err(TmcError::InputError)?;

        let answer = match self.out.read_line() {
            Ok(line) => line,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => String::new(),
            Err(e) => return Err(TmcError::InputError(e)),
        };

        Ok(parse_confirmation(&answer, default_yes))
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.out.write_str(prompt).map_err(TmcError::InputError)?;
        match self.out.read_line() {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(TmcError::InputError(e)),
        }
    }
}

/// 解析是/否回答，只看首字母
pub fn parse_confirmation(answer: &str, default_yes: bool) -> bool {
    match answer.trim().to_lowercase().chars().next() {
        Some('y') => true,
        Some('n') => false,
        _ => default_yes,
    }
}
