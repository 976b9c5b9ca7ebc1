//! # submit 命令实现
//!
//! 把练习提交到课程记录所属的服务器并显示评测结果。
//! 服务器是提交结果的权威来源，本地记录不做修改。
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `workspace/resolver.rs`, `workspace/reconcile.rs`
//! - 使用 `commands/test.rs` 的测试用例输出

use super::context::CliContext;
use super::test::print_test_cases;
use crate::cli::submit::SubmitArgs;
use crate::error::{Result, TmcError};
use crate::models::Exercise;
use crate::utils::{output, progress};
use crate::workspace::{reconcile, resolver};

/// 执行 submit 命令
pub fn execute(ctx: &mut CliContext, args: SubmitArgs) -> Result<()> {
    let scope = resolver::resolve_scope(&ctx.work_dir, &args.exercises)
        .map_err(|e| e.for_action("submit"))?;

    let record = &scope.record;
    let account = ctx.account_for(record);
    let backend = ctx.backend;

    let course = match backend.find_course_on_server(&account, &record.course_name) {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(TmcError::Other(
                "Could not fetch course info from server.".to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!(course = %record.course_name, error = %e, "course lookup failed");
            return Err(TmcError::Other(
                "Could not fetch course info from server.".to_string(),
            ));
        }
    };

    let mut passed_total = 0;
    let mut tests_total = 0;

    for name in &scope.exercises {
        ctx.println(&output::working_on("Submitting", name));
        let exercise = course
            .exercise(name)
            .cloned()
            .unwrap_or_else(|| Exercise::new(name.as_str(), course.name.as_str()));
        let dir = record.exercise_dir(name);

        let result = progress::with_spinner("Waiting for results...", || {
            backend.submit(&account, &course, &exercise, &dir)
        });
        let result = match result {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(exercise = %name, error = %e, "submission failed");
                None
            }
        };

        let summary = reconcile::apply_submission(record, name, result.as_ref())?;
        passed_total += summary.passed_tests;
        tests_total += summary.total_tests;

        if !summary.delivered {
            ctx.errorln(&output::failure(&summary.message));
            continue;
        }

        if let Some(result) = &result {
            print_test_cases(&mut *ctx.io, &result.test_results, args.all, args.details);
        }
        if summary.all_tests_passed {
            ctx.println(&output::success("All tests passed on server!"));
            if !summary.points.is_empty() {
                ctx.println(&format!(
                    "Points permanently awarded: [{}]",
                    summary.points.join(", ")
                ));
            }
        } else {
            ctx.println(&output::failure(&format!(
                "{}/{} tests passed on server",
                summary.passed_tests, summary.total_tests
            )));
        }
        if !summary.message.is_empty() {
            ctx.println(&summary.message);
        }
        ctx.println("");
    }

    if !scope.is_single() {
        ctx.println(&format!(
            "Total tests passed: {}/{}",
            passed_total, tests_total
        ));
        ctx.println(&output::passed_tests_bar(passed_total, tests_total));
    }
    Ok(())
}
