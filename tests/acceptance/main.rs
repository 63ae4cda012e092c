use cucumber::World;
use std::collections::{HashMap, HashSet};
use wiremock::MockServer;

/// Scenario state: the fixture tracker contents, the mock server backing
/// them, and the captured command outcome.
#[derive(Default, World)]
pub struct ReportWorld {
    /// Every issue record the fake tracker knows, epics and children alike.
    pub records: Vec<serde_json::Value>,
    /// Epic key -> child issue keys.
    pub children: HashMap<String, Vec<String>>,
    /// Epic key -> WBS code.
    pub wbs: HashMap<String, String>,
    /// Epics whose child queries answer HTTP 500.
    pub failing: HashSet<String>,
    pub server: Option<MockServer>,
    pub captured_output: Vec<u8>,
    pub run_error: Option<String>,
}

impl std::fmt::Debug for ReportWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWorld")
            .field("records", &self.records.len())
            .field(
                "captured_output",
                &String::from_utf8_lossy(&self.captured_output),
            )
            .field("run_error", &self.run_error)
            .finish_non_exhaustive()
    }
}

#[tokio::main]
async fn main() {
    // Scenarios share the working directory's config file, so they must
    // not interleave.
    ReportWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit("features")
        .await;
}

mod steps;
