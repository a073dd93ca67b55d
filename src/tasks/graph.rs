//! Task dependency graph utilities.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use super::Task;
use crate::error::TaskError;

/// Order `tasks` so every task follows the tasks it depends on.
///
/// Uses Kahn's algorithm, always taking the ready task that was declared
/// first, so independent tasks keep their declaration order. Dependencies on
/// tasks absent from the list are ignored.
///
/// # Errors
///
/// Returns [`TaskError::DependencyCycle`] naming the tasks left on a cycle.
pub fn execution_order<'a>(tasks: &[&'a dyn Task]) -> Result<Vec<&'a dyn Task>, TaskError> {
    let type_to_idx: HashMap<TypeId, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.task_id(), i))
        .collect();

    let mut in_degree: Vec<usize> = tasks
        .iter()
        .map(|t| {
            t.dependencies()
                .iter()
                .filter(|d| type_to_idx.contains_key(d))
                .count()
        })
        .collect();

    let mut reverse_deps: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (i, t) in tasks.iter().enumerate() {
        for dep in t.dependencies() {
            if let Some(&dep_idx) = type_to_idx.get(dep)
                && let Some(rd) = reverse_deps.get_mut(dep_idx)
            {
                rd.push(i);
            }
        }
    }

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| (d == 0).then_some(i))
        .collect();
    let mut order = Vec::with_capacity(tasks.len());

    while let Some(idx) = ready.pop_first() {
        if let Some(&task) = tasks.get(idx) {
            order.push(task);
        }
        if let Some(dependents) = reverse_deps.get(idx) {
            for &dep in dependents {
                if let Some(count) = in_degree.get_mut(dep) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dep);
                    }
                }
            }
        }
    }

    if order.len() != tasks.len() {
        let stuck: Vec<&str> = tasks
            .iter()
            .zip(&in_degree)
            .filter(|(_, d)| **d > 0)
            .map(|(t, _)| t.name())
            .collect();
        return Err(TaskError::DependencyCycle(stuck.join(", ")));
    }
    Ok(order)
}
