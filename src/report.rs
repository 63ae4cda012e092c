use std::collections::BTreeMap;

use crate::jira::issue::{Issue, WONT_FIX_STATUS};

/// Group label for issues without an assignee.
pub const UNASSIGNED: &str = "Not assigned";

/// How Won't Fix issues enter the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WontFixPolicy {
    /// Drop them from planned and completed (the default).
    Exclude,
    /// Keep them and count them as done.
    CountAsDone,
    /// Keep them but count them only toward planned.
    CountAsNotDone,
}

impl WontFixPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exclude" => Some(WontFixPolicy::Exclude),
            "count-as-done" => Some(WontFixPolicy::CountAsDone),
            "count-as-not-done" => Some(WontFixPolicy::CountAsNotDone),
            _ => None,
        }
    }
}

/// Drop the issues the policy removes from the report entirely.
pub fn retained_issues(issues: Vec<Issue>, policy: WontFixPolicy) -> Vec<Issue> {
    match policy {
        WontFixPolicy::Exclude => issues
            .into_iter()
            .filter(|issue| issue.status != WONT_FIX_STATUS)
            .collect(),
        WontFixPolicy::CountAsDone | WontFixPolicy::CountAsNotDone => issues,
    }
}

/// Whether an issue counts toward the completed total. For Won't Fix
/// issues the policy overrides the status category.
pub fn is_done(issue: &Issue, policy: WontFixPolicy) -> bool {
    if issue.status == WONT_FIX_STATUS {
        return policy == WontFixPolicy::CountAsDone;
    }
    issue.is_complete()
}

/// Story-point totals for one epic. Values are truncated toward zero for
/// display; the deltas may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpicTotals {
    pub estimated: i64,
    pub planned: i64,
    pub completed: i64,
}

impl EpicTotals {
    pub fn delta_est_pla(&self) -> i64 {
        self.estimated - self.planned
    }

    pub fn delta_pla_cmp(&self) -> i64 {
        self.planned - self.completed
    }
}

/// Reduce an epic's retained issue set to totals. A missing points value
/// contributes zero; an empty set yields zero everywhere.
pub fn epic_totals(estimate: Option<f64>, issues: &[Issue], policy: WontFixPolicy) -> EpicTotals {
    let planned: f64 = issues.iter().map(Issue::points_or_zero).sum();
    let completed: f64 = issues
        .iter()
        .filter(|issue| is_done(issue, policy))
        .map(Issue::points_or_zero)
        .sum();
    EpicTotals {
        estimated: estimate.unwrap_or(0.0) as i64,
        planned: planned as i64,
        completed: completed as i64,
    }
}

/// Per-assignee point shares within one epic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssigneePoints {
    pub estimated: i64,
    pub assigned: i64,
    pub done: i64,
}

/// Estimated share for one assignee, rounding half away from zero.
pub fn estimated_share(estimate: i64, fraction: f64) -> i64 {
    (estimate as f64 * fraction).round() as i64
}

/// Group the issue set by assignee and merge in estimated shares from the
/// breakdown map. Keys are the union of both sources; unassigned issues
/// land under [`UNASSIGNED`]. The map iterates in name order.
pub fn assignee_rollup(
    issues: &[Issue],
    policy: WontFixPolicy,
    shares: &BTreeMap<String, f64>,
    estimate: i64,
) -> BTreeMap<String, AssigneePoints> {
    let mut assigned: BTreeMap<String, f64> = BTreeMap::new();
    let mut done: BTreeMap<String, f64> = BTreeMap::new();
    for issue in issues {
        let name = issue.assignee.as_deref().unwrap_or(UNASSIGNED);
        *assigned.entry(name.to_string()).or_insert(0.0) += issue.points_or_zero();
        if is_done(issue, policy) {
            *done.entry(name.to_string()).or_insert(0.0) += issue.points_or_zero();
        }
    }

    let mut rollup: BTreeMap<String, AssigneePoints> = BTreeMap::new();
    for (name, points) in &assigned {
        rollup.entry(name.clone()).or_default().assigned = *points as i64;
    }
    for (name, points) in &done {
        rollup.entry(name.clone()).or_default().done = *points as i64;
    }
    for (name, fraction) in shares {
        rollup.entry(name.clone()).or_default().estimated = estimated_share(estimate, *fraction);
    }
    rollup
}

/// Keep epics whose cycle matches the requested one. Without a requested
/// cycle every epic matches; an epic without a cycle value never matches
/// a requested one.
pub fn filter_epics_by_cycle(epics: Vec<Issue>, cycle: Option<&str>) -> Vec<Issue> {
    match cycle {
        None => epics,
        Some(wanted) => epics
            .into_iter()
            .filter(|epic| epic.cycle.as_deref() == Some(wanted))
            .collect(),
    }
}
