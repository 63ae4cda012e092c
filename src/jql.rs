//! JQL query assembly. Every user-supplied value goes through [`quote`] so
//! that quote and backslash characters cannot break out of the literal.

/// Issue types counted toward an epic when only stories are wanted.
pub const STORY_TYPES: &[&str] = &["story"];

/// Issue types counted toward an epic when bugs and improvements are included.
pub const ALL_ISSUE_TYPES: &[&str] = &["story", "bug", "improvement"];

/// Quote a value as a JQL string literal, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '\\' || c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Exact-match lookup of a single issue.
pub fn by_id(id: &str) -> String {
    format!("id = {}", quote(id))
}

/// All issues linked to an epic whose type is in `types`.
///
/// Completed and planned totals are both derived from this one result set
/// client-side, so no status clause is included.
pub fn issues_in_epic(id: &str, types: &[&str]) -> String {
    format!(
        "\"Epic Link\" = {} AND issuetype IN ({})",
        quote(id),
        types.join(", ")
    )
}

/// All epics whose WBS code starts with `prefix`, in ascending id order.
///
/// Cycle filtering happens client-side: the cycle field may be absent on
/// some epics and a remote clause would reject those records outright.
pub fn epics_by_wbs(prefix: &str) -> String {
    let mut pattern = String::from(prefix);
    pattern.push('*');
    format!("issuetype = Epic AND WBS ~ {} ORDER BY id", quote(&pattern))
}

/// The eligible type set for the include-non-stories flag.
pub fn eligible_types(all_issues: bool) -> &'static [&'static str] {
    if all_issues { ALL_ISSUE_TYPES } else { STORY_TYPES }
}
