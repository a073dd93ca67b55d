//! Summary types shared by loggers: task entries, statuses, and the [`Log`] trait.

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown to the user.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Skip reason, change counts, or the error.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran to completion.
    Ok,
    /// Not relevant in this mode (e.g. the profile under `--docker-only`).
    NotApplicable,
    /// Ran but had nothing it could do, such as a missing block source.
    Skipped,
    /// Previewed only.
    DryRun,
    /// Stopped the run.
    Failed,
}

impl TaskStatus {
    /// Summary icon and its ANSI colour.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// Per-status counts for the summary footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskTally {
    /// Tasks that finished.
    pub ok: usize,
    /// Tasks not relevant in this mode.
    pub not_applicable: usize,
    /// Tasks that had nothing to do.
    pub skipped: usize,
    /// Tasks only previewed.
    pub dry_run: usize,
    /// Tasks that failed.
    pub failed: usize,
}

impl TaskTally {
    /// Count every entry.
    #[must_use]
    pub fn of(entries: &[TaskEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut tally, entry| {
            match entry.status {
                TaskStatus::Ok => tally.ok += 1,
                TaskStatus::NotApplicable => tally.not_applicable += 1,
                TaskStatus::Skipped => tally.skipped += 1,
                TaskStatus::DryRun => tally.dry_run += 1,
                TaskStatus::Failed => tally.failed += 1,
            }
            tally
        })
    }

    /// Number of tasks counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.not_applicable + self.skipped + self.dry_run + self.failed
    }

    /// Coloured footer line, e.g. `4 tasks: 3 ok, 1 n/a, 0 skipped, ...`.
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "{} tasks: \x1b[32m{} ok\x1b[0m, \x1b[2m{} n/a\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            self.total(),
            self.ok,
            self.not_applicable,
            self.skipped,
            self.dry_run,
            self.failed
        )
    }
}

/// Sink for task output.
///
/// Tasks only see this trait; [`Logger`](super::Logger) forwards to
/// `tracing` and keeps the summary.
pub trait Log: Send + Sync {
    /// Stage header (`==>`).
    fn stage(&self, msg: &str);
    /// Normal progress line.
    fn info(&self, msg: &str);
    /// Shown on the console only with `--verbose`; always in the log file.
    fn debug(&self, msg: &str);
    /// Warning.
    fn warn(&self, msg: &str);
    /// Error.
    fn error(&self, msg: &str);
    /// What a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Add a summary line.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
