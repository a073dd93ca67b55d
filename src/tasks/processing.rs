//! Generic resource processing loop: check state, apply, collect stats.
use anyhow::Result;

use super::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use devsetup_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no profile block".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (nothing configured for it).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use devsetup_cli::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// When items are skipped, the summary includes the count:
///
/// ```
/// use devsetup_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped as invalid or inapplicable.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// Configuration for the generic resource processing loop.
///
/// # Examples
///
/// ```
/// use devsetup_cli::tasks::ProcessOpts;
///
/// let opts = ProcessOpts::apply_all("link");
/// assert_eq!(opts.verb, "link");
/// assert!(opts.correct_note.is_none());
///
/// let opts = ProcessOpts::apply_all("install").report_correct("already installed");
/// assert_eq!(opts.correct_note, Some("already installed"));
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g., "install", "link").
    pub verb: &'a str,
    /// When set, resources that are already correct are reported at info
    /// level with this note instead of only at debug level.
    pub correct_note: Option<&'a str>,
}

impl<'a> ProcessOpts<'a> {
    /// Fix both missing and incorrect resources.
    #[must_use]
    pub const fn apply_all(verb: &'a str) -> Self {
        Self {
            verb,
            correct_note: None,
        }
    }

    /// Report already-correct resources at info level.
    #[must_use]
    pub const fn report_correct(mut self, note: &'a str) -> Self {
        self.correct_note = Some(note);
        self
    }
}

/// Process resources by checking each one's current state and applying as needed.
///
/// Resources are handled strictly in order and the first failure stops the
/// loop.
///
/// # Errors
///
/// Returns an error if any resource fails to check its state or to apply.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats.finish(ctx))
}

/// Process a single resource given its current state, returning a stats delta.
fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            match opts.correct_note {
                Some(note) => ctx.log.info(&format!("{desc}: {note}")),
                None => ctx.log.debug(&format!("ok: {desc}")),
            }
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        resource_state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = resource_state {
                    format!("would {} {desc} (currently {current})", opts.verb)
                } else {
                    format!("would {}: {desc}", opts.verb)
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, opts)?;
        }
    }
    Ok(delta)
}

/// Apply a single resource change, returning a stats delta.
fn apply_resource<R: Resource>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    ctx.log.info(&format!("{} {desc}", opts.verb));
    let mut delta = TaskStats::new();
    match resource.apply()? {
        ResourceChange::Applied => {
            ctx.log.debug(&format!("{} done: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => {
            delta.already_ok += 1;
        }
        ResourceChange::Skipped { reason } => {
            ctx.log.warn(&format!("skipped {desc}: {reason}"));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
