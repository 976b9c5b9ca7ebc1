//! # 美化输出工具
//!
//! 生成统一样式的终端输出行。各函数返回字符串，由调用方经 `Io` 输出，
//! 这样命令的输出在测试中同样可以检查。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 成功消息
pub fn success(msg: &str) -> String {
    format!("{} {}", "[OK]".green().bold(), msg)
}

/// 失败消息
pub fn failure(msg: &str) -> String {
    format!("{} {}", "[FAIL]".red().bold(), msg)
}

/// 警告消息
pub fn warning(msg: &str) -> String {
    format!("{} {}", "[WARN]".yellow().bold(), msg)
}

/// 信息消息
pub fn info(msg: &str) -> String {
    format!("{} {}", "[*]".blue().bold(), msg)
}

/// 正在处理某个练习
pub fn working_on(action: &str, exercise: &str) -> String {
    format!("{}: {}", action, exercise).yellow().to_string()
}

/// 打印最终错误消息（main 使用）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 标题栏
pub fn header(title: &str) -> String {
    let line = "─".repeat(60);
    format!("{}\n  {}\n{}", line.dimmed(), title.bold(), line.dimmed())
}

/// 测试通过比例条，例如 `[████████░░░░] 66%`
pub fn passed_tests_bar(passed: usize, total: usize) -> String {
    const WIDTH: usize = 40;
    if total == 0 {
        return format!("[{}] 0%", "░".repeat(WIDTH).dimmed());
    }

    let filled = passed * WIDTH / total;
    let percent = passed * 100 / total;
    format!(
        "[{}{}] {}%",
        "█".repeat(filled).green(),
        "░".repeat(WIDTH - filled).red(),
        percent
    )
}

/// 是/否标记，例如 `completed` / `not completed`
pub fn flag(label: &str, value: bool) -> String {
    if value {
        label.green().to_string()
    } else {
        format!("not {}", label).red().to_string()
    }
}
