use serde::Deserialize;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::jira::issue::{self, Issue};
use crate::jql;

mod endpoints {
    pub const SEARCH_PATH: &str = "/rest/api/2/search";
}

/// Envelope of the search endpoint's response.
#[derive(Deserialize, Debug)]
struct SearchResponse {
    issues: Vec<serde_json::Value>,
    total: Option<u64>,
}

/// Run one JQL search and decode the single result page.
///
/// Only one page of `maxResults` issues is ever fetched. When the match
/// count exceeds the page a warning is printed, since the report will
/// undercount.
pub async fn run_search(
    client: &reqwest::Client,
    config: &ReportConfig,
    jql: &str,
) -> Result<Vec<Issue>, ReportError> {
    let url = format!("{}{}", config.base_url, endpoints::SEARCH_PATH);
    let response = client
        .get(&url)
        .query(&[
            ("maxResults", config.max_results.to_string()),
            ("jql", jql.to_string()),
        ])
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|err| ReportError::fetch(jql, err))?;

    if !response.status().is_success() {
        return Err(ReportError::fetch(
            jql,
            format!("HTTP {}", response.status()),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|err| ReportError::fetch(jql, err))?;
    parse_search_response(config, jql, &body)
}

/// Decode a search response body into issue records.
pub fn parse_search_response(
    config: &ReportConfig,
    jql: &str,
    body: &str,
) -> Result<Vec<Issue>, ReportError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|err| ReportError::malformed(format!("for `{jql}`: {err}")))?;

    if let Some(total) = response.total {
        if total > response.issues.len() as u64 {
            eprintln!(
                "Warning: query matched {total} issues but only {} were fetched; totals will undercount",
                response.issues.len()
            );
        }
    }

    response
        .issues
        .iter()
        .map(|record| issue::parse_issue(config, record))
        .collect()
}

/// Look up a single issue by id.
pub async fn fetch_by_id(
    client: &reqwest::Client,
    config: &ReportConfig,
    id: &str,
) -> Result<Issue, ReportError> {
    let issues = run_search(client, config, &jql::by_id(id)).await?;
    single_issue(id, issues)
}

/// The sole issue of an id lookup. Zero results is an error so that a
/// missing epic never turns into a silent zero estimate.
pub fn single_issue(id: &str, issues: Vec<Issue>) -> Result<Issue, ReportError> {
    issues
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::NotFound { id: id.to_string() })
}
