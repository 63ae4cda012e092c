use crate::ReportWorld;
use cucumber::{given, then, when};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const SP_FIELD: &str = "customfield_10202";
const CYCLE_FIELD: &str = "customfield_10900";
const SUMMARY_FIELD: &str = "customfield_10207";

/// Routes search requests by their jql parameter against the scenario's
/// fixture records, the way the real endpoint would.
struct FakeTracker {
    records: Vec<Value>,
    children: HashMap<String, Vec<String>>,
    wbs: HashMap<String, String>,
    failing: HashSet<String>,
}

impl Respond for FakeTracker {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let jql = request
            .url
            .query_pairs()
            .find(|(name, _)| name == "jql")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        if let Some(rest) = jql.strip_prefix("id = ") {
            let id = unquote(rest);
            let issues: Vec<&Value> = self
                .records
                .iter()
                .filter(|record| record["key"] == id.as_str())
                .collect();
            return search_page(&issues);
        }

        if let Some(rest) = jql.strip_prefix("\"Epic Link\" = ") {
            let id = unquote(rest.split(" AND ").next().unwrap_or(rest));
            if self.failing.contains(&id) {
                return ResponseTemplate::new(500);
            }
            let types: Vec<String> = rest
                .split_once("issuetype IN (")
                .and_then(|(_, tail)| tail.split_once(')'))
                .map(|(list, _)| list.split(", ").map(str::to_string).collect())
                .unwrap_or_default();
            let no_children = Vec::new();
            let child_keys = self.children.get(&id).unwrap_or(&no_children);
            let issues: Vec<&Value> = self
                .records
                .iter()
                .filter(|record| {
                    child_keys
                        .iter()
                        .any(|key| record["key"] == key.as_str())
                })
                .filter(|record| {
                    let issue_type = record["fields"]["issuetype"]["name"]
                        .as_str()
                        .unwrap_or_default();
                    types
                        .iter()
                        .any(|wanted| issue_type.eq_ignore_ascii_case(wanted))
                })
                .collect();
            return search_page(&issues);
        }

        if jql.starts_with("issuetype = Epic AND WBS ~ ") {
            let pattern = jql.split('"').nth(1).unwrap_or_default();
            let prefix = pattern.trim_end_matches('*');
            let mut issues: Vec<&Value> = self
                .records
                .iter()
                .filter(|record| {
                    let key = record["key"].as_str().unwrap_or_default();
                    self.wbs
                        .get(key)
                        .is_some_and(|wbs| wbs.starts_with(prefix))
                })
                .collect();
            issues.sort_by_key(|record| record["key"].as_str().unwrap_or_default().to_string());
            return search_page(&issues);
        }

        ResponseTemplate::new(400)
    }
}

fn unquote(text: &str) -> String {
    text.trim().trim_matches('"').to_string()
}

fn search_page(issues: &[&Value]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "issues": issues,
        "total": issues.len(),
    }))
}

fn issue_json(
    key: &str,
    issue_type: &str,
    points: Option<f64>,
    status: &str,
    category: &str,
    assignee: Option<&str>,
) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert(
        SP_FIELD.to_string(),
        points.map_or(Value::Null, |value| json!(value)),
    );
    fields.insert(
        "status".to_string(),
        json!({"name": status, "statusCategory": {"name": category}}),
    );
    fields.insert("issuetype".to_string(), json!({"name": issue_type}));
    fields.insert(
        "assignee".to_string(),
        assignee.map_or(Value::Null, |name| json!({"displayName": name})),
    );
    fields.insert("description".to_string(), Value::Null);
    fields.insert(CYCLE_FIELD.to_string(), Value::Null);
    fields.insert(SUMMARY_FIELD.to_string(), Value::Null);
    json!({"key": key, "fields": fields})
}

fn record_mut<'a>(world: &'a mut ReportWorld, key: &str) -> &'a mut Value {
    world
        .records
        .iter_mut()
        .find(|record| record["key"] == key)
        .expect("scenario references an unknown issue key")
}

fn status_for(kind: &str) -> (&'static str, &'static str) {
    match kind {
        "complete" => ("Done", "Complete"),
        _ => ("In Progress", "In Progress"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[given(regex = r#"^the tracker has epic "([^"]+)" with (\d+) estimated points$"#)]
async fn tracker_has_epic(world: &mut ReportWorld, key: String, points: f64) {
    world.records.push(issue_json(
        &key,
        "Epic",
        Some(points),
        "In Progress",
        "In Progress",
        None,
    ));
}

#[given(regex = r#"^the tracker has epic "([^"]+)" with no estimate$"#)]
async fn tracker_has_epic_without_estimate(world: &mut ReportWorld, key: String) {
    world.records.push(issue_json(
        &key,
        "Epic",
        None,
        "In Progress",
        "In Progress",
        None,
    ));
}

#[given(regex = r#"^epic "([^"]+)" has summary "([^"]+)"$"#)]
async fn epic_has_summary(world: &mut ReportWorld, key: String, summary: String) {
    record_mut(world, &key)["fields"][SUMMARY_FIELD] = json!(summary);
}

#[given(regex = r#"^epic "([^"]+)" has description "([^"]+)"$"#)]
async fn epic_has_description(world: &mut ReportWorld, key: String, description: String) {
    record_mut(world, &key)["fields"]["description"] = json!(description);
}

#[given(regex = r#"^epic "([^"]+)" is under WBS "([^"]+)" in cycle "([^"]+)"$"#)]
async fn epic_under_wbs_in_cycle(world: &mut ReportWorld, key: String, wbs: String, cycle: String) {
    record_mut(world, &key)["fields"][CYCLE_FIELD] = json!({"value": cycle});
    world.wbs.insert(key, wbs);
}

#[given(regex = r#"^epic "([^"]+)" is under WBS "([^"]+)" with no cycle$"#)]
async fn epic_under_wbs_without_cycle(world: &mut ReportWorld, key: String, wbs: String) {
    world.wbs.insert(key, wbs);
}

#[given(
    regex = r#"^epic "([^"]+)" has an? (complete|open) (story|bug|improvement) "([^"]+)" worth (\d+) points$"#
)]
async fn epic_has_child(
    world: &mut ReportWorld,
    epic: String,
    state: String,
    issue_type: String,
    key: String,
    points: f64,
) {
    let (status, category) = status_for(&state);
    world.records.push(issue_json(
        &key,
        &capitalize(&issue_type),
        Some(points),
        status,
        category,
        None,
    ));
    world.children.entry(epic).or_default().push(key);
}

#[given(
    regex = r#"^epic "([^"]+)" has an? (complete|open) (story|bug|improvement) "([^"]+)" worth (\d+) points assigned to "([^"]+)"$"#
)]
async fn epic_has_assigned_child(
    world: &mut ReportWorld,
    epic: String,
    state: String,
    issue_type: String,
    key: String,
    points: f64,
    assignee: String,
) {
    let (status, category) = status_for(&state);
    world.records.push(issue_json(
        &key,
        &capitalize(&issue_type),
        Some(points),
        status,
        category,
        Some(&assignee),
    ));
    world.children.entry(epic).or_default().push(key);
}

#[given(regex = r#"^epic "([^"]+)" has a "Won't Fix" story "([^"]+)" worth (\d+) points$"#)]
async fn epic_has_wont_fix_child(world: &mut ReportWorld, epic: String, key: String, points: f64) {
    world.records.push(issue_json(
        &key,
        "Story",
        Some(points),
        "Won't Fix",
        "Complete",
        None,
    ));
    world.children.entry(epic).or_default().push(key);
}

#[given(regex = r#"^epic "([^"]+)" has a story "([^"]+)" with no points$"#)]
async fn epic_has_unestimated_child(world: &mut ReportWorld, epic: String, key: String) {
    world.records.push(issue_json(
        &key,
        "Story",
        None,
        "In Progress",
        "In Progress",
        None,
    ));
    world.children.entry(epic).or_default().push(key);
}

#[given(regex = r#"^the tracker fails child queries for epic "([^"]+)"$"#)]
async fn tracker_fails_children(world: &mut ReportWorld, key: String) {
    world.failing.insert(key);
}

#[when(regex = r#"^I run "(.*)"$"#)]
async fn i_run(world: &mut ReportWorld, command: String) {
    let server = MockServer::start().await;
    let tracker = FakeTracker {
        records: world.records.clone(),
        children: world.children.clone(),
        wbs: world.wbs.clone(),
        failing: world.failing.clone(),
    };
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(tracker)
        .mount(&server)
        .await;

    let config_dir = std::path::Path::new(".epicpoints");
    std::fs::create_dir_all(config_dir).expect("Failed to create config dir for test setup");
    std::fs::write(
        config_dir.join("config.json"),
        json!({"base_url": server.uri()}).to_string(),
    )
    .expect("Failed to write config file for test setup");

    let mut args = vec!["epicpoints".to_string()];
    args.extend(command.split_whitespace().map(str::to_string));

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);
    let result = epicpoints::run::run(args, writer_option).await;

    world.captured_output = buffer;
    world.run_error = result.err().map(|err| format!("{err:#}"));
    world.server = Some(server);
}

#[then("the command succeeds")]
async fn command_succeeds(world: &mut ReportWorld) {
    assert!(
        world.run_error.is_none(),
        "command failed: {:?}",
        world.run_error
    );
}

#[then(regex = r#"^the command fails mentioning "(.*)"$"#)]
async fn command_fails_mentioning(world: &mut ReportWorld, expected: String) {
    let error = world
        .run_error
        .as_ref()
        .expect("command unexpectedly succeeded");
    assert!(error.contains(&expected), "error was: {error}");
}

#[then(regex = r#"^the output contains "(.*)"$"#)]
async fn output_contains(world: &mut ReportWorld, expected: String) {
    let output = String::from_utf8_lossy(&world.captured_output);
    assert!(output.contains(&expected), "output was:\n{output}");
}

#[then(regex = r#"^the output does not contain "(.*)"$"#)]
async fn output_does_not_contain(world: &mut ReportWorld, rejected: String) {
    let output = String::from_utf8_lossy(&world.captured_output);
    assert!(!output.contains(&rejected), "output was:\n{output}");
}
