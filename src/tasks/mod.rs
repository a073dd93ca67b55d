//! Named, dependency-ordered tasks that orchestrate resource changes.
pub mod context;
pub mod graph;
pub mod packages;
mod processing;
pub mod shell_profile;
pub mod symlinks;
pub mod tools;

/// Implement [`Task::dependencies`] by expanding to the required
/// `fn dependencies(&self) -> &[TypeId]` method body.
///
/// The `const DEPS` intermediate gives the slice the `'static` lifetime the
/// return type requires.
///
/// # Examples
///
/// ```ignore
/// task_deps![super::tools::InstallTools]
/// // expands to:
/// //   fn dependencies(&self) -> &[std::any::TypeId] {
/// //       const DEPS: &[std::any::TypeId] = &[
/// //           std::any::TypeId::of::<super::tools::InstallTools>(),
/// //       ];
/// //       DEPS
/// //   }
/// ```
macro_rules! task_deps {
    [$($dep:ty),+ $(,)?] => {
        fn dependencies(&self) -> &[std::any::TypeId] {
            const DEPS: &[std::any::TypeId] = &[$(std::any::TypeId::of::<$dep>()),+];
            DEPS
        }
    };
}

pub(crate) use task_deps;

pub use context::Context;
pub use processing::{ProcessOpts, TaskResult, TaskStats, process_resources};

use std::any::TypeId;

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
///
/// The `'static` bound gives each task struct a stable [`TypeId`], which the
/// scheduler uses to match dependency declarations.
pub trait Task: Send + Sync + 'static {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// The concrete `TypeId` of this task, used as a dependency identifier.
    fn task_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Tasks that must complete before this task starts.
    ///
    /// Dependencies on tasks that are not part of the current run are
    /// ignored. The default implementation returns an empty slice.
    fn dependencies(&self) -> &[TypeId] {
        &[]
    }

    /// Whether this task should run in the current mode and on this system.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if an external command fails, a file operation is not
    /// permitted, or a resource cannot be brought into its desired state.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in run order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::RefreshPackageIndex),
        Box::new(tools::InstallTools),
        Box::new(shell_profile::ConfigureShellProfile),
        Box::new(symlinks::InstallSymlinks),
    ]
}

/// The tasks run by the link command.
#[must_use]
pub fn link_tasks() -> Vec<Box<dyn Task>> {
    vec![Box::new(symlinks::InstallSymlinks)]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error, with the task name as context, after recording
/// it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            return Err(e.context(format!("task '{}' failed", task.name())));
        }
    }
    Ok(())
}
