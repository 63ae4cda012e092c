use serde_json::Value;

use crate::config::ReportConfig;
use crate::error::ReportError;

/// Status-category name marking an issue as done.
pub const COMPLETE_CATEGORY: &str = "Complete";

/// Status name subject to the Won't-Fix policy.
pub const WONT_FIX_STATUS: &str = "Won't Fix";

/// One issue record decoded from a search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    /// Story points. `None` means the field was null; it counts as zero.
    pub points: Option<f64>,
    pub status: String,
    pub status_category: String,
    pub issue_type: String,
    pub assignee: Option<String>,
    pub description: Option<String>,
    /// Cycle classification, set on epics only.
    pub cycle: Option<String>,
    /// Epic summary text, set on epics only.
    pub epic_summary: Option<String>,
}

impl Issue {
    pub fn points_or_zero(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.status_category == COMPLETE_CATEGORY
    }
}

/// Decode one element of the search response's `issues` array.
///
/// A null points field is an issue without an estimate. The field missing
/// from `fields` entirely means the tracker is not the one this report was
/// configured for, so that is a malformed response rather than a zero.
pub fn parse_issue(config: &ReportConfig, record: &Value) -> Result<Issue, ReportError> {
    let key = record
        .get("key")
        .and_then(Value::as_str)
        .ok_or_else(|| ReportError::malformed("issue record has no key"))?;
    let fields = record
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| ReportError::malformed(format!("issue {key} has no fields object")))?;

    let points = match fields.get(config.story_points_field.as_str()) {
        None => {
            return Err(ReportError::malformed(format!(
                "issue {key} has no {} field",
                config.story_points_field
            )));
        }
        Some(Value::Null) => None,
        Some(value) => Some(value.as_f64().ok_or_else(|| {
            ReportError::malformed(format!(
                "issue {key} has a non-numeric {} field",
                config.story_points_field
            ))
        })?),
    };

    let status = fields
        .get("status")
        .and_then(|status| status.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| ReportError::malformed(format!("issue {key} has no status name")))?;
    let status_category = fields
        .get("status")
        .and_then(|status| status.get("statusCategory"))
        .and_then(|category| category.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| ReportError::malformed(format!("issue {key} has no status category")))?;
    let issue_type = fields
        .get("issuetype")
        .and_then(|issue_type| issue_type.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| ReportError::malformed(format!("issue {key} has no issue type")))?;

    // Older tracker versions expose `assignee.name` instead of displayName.
    let assignee = match fields.get("assignee") {
        None | Some(Value::Null) => None,
        Some(assignee) => Some(
            assignee
                .get("displayName")
                .and_then(Value::as_str)
                .or_else(|| assignee.get("name").and_then(Value::as_str))
                .ok_or_else(|| {
                    ReportError::malformed(format!("issue {key} has an assignee without a name"))
                })?
                .to_string(),
        ),
    };

    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    // Option fields arrive as {"value": ...}; accept a bare string too.
    let cycle = match fields.get(config.cycle_field.as_str()) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(option) => option
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    let epic_summary = fields
        .get(config.epic_summary_field.as_str())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Issue {
        key: key.to_string(),
        points,
        status: status.to_string(),
        status_category: status_category.to_string(),
        issue_type: issue_type.to_string(),
        assignee,
        description,
        cycle,
        epic_summary,
    })
}
