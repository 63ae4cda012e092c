use std::collections::BTreeMap;

use crate::breakdown;
use crate::cli;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::format;
use crate::jira::issue::Issue;
use crate::jira::search;
use crate::jql;
use crate::output;
use crate::report;
use crate::report::WontFixPolicy;

const USAGE: &str = "\
Usage: epicpoints <command> [flags]

Commands:
  epic <id>          Print one epic's story-point rollup with an assignee breakdown
  summary <wbs>      Print rollups for every epic under a WBS prefix
  help               Show this message

Flags:
  --all-issues       Count bugs and improvements as well as stories
  --include-bugs     Alias for --all-issues
  --wontfix-is-done  Count Won't Fix issues as done instead of dropping them
  --cycle <value>    Restrict summary to epics in the given cycle";

pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Epic { id, flags } => {
            let (config, client) = setup()?;
            epic_command(&client, &config, &id, flags, &mut stdout_additional).await
        }
        cli::parser::Command::Summary { wbs, cycle, flags } => {
            let (config, client) = setup()?;
            summary_command(
                &client,
                &config,
                &wbs,
                cycle.as_deref(),
                flags,
                &mut stdout_additional,
            )
            .await
        }
        cli::parser::Command::Help => {
            output::println(USAGE, &mut stdout_additional)?;
            Ok(())
        }
        cli::parser::Command::Unknown(message) => Err(anyhow::Error::msg(message)),
    }
}

fn setup() -> anyhow::Result<(ReportConfig, reqwest::Client)> {
    let config = anyhow::Context::context(ReportConfig::load(), "Failed to load configuration")?;

    let client = anyhow::Context::context(
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build(),
        "Failed to create HTTP client",
    )?;

    Ok((config, client))
}

fn effective_policy(config: &ReportConfig, flags: cli::parser::ReportFlags) -> WontFixPolicy {
    if flags.wontfix_is_done {
        WontFixPolicy::CountAsDone
    } else {
        config.wontfix_policy
    }
}

async fn epic_command(
    client: &reqwest::Client,
    config: &ReportConfig,
    id: &str,
    flags: cli::parser::ReportFlags,
    writer: &mut Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    let widths = format::column_widths();
    for line in format::header_lines() {
        output::println(&line, writer)?;
    }

    let epic = search::fetch_by_id(client, config, id).await?;
    let policy = effective_policy(config, flags);
    let (totals, issues) = rollup_epic(client, config, &epic, flags.all_issues, policy).await?;
    output::println(
        &format::epic_row(
            &epic.key,
            &totals,
            epic.epic_summary.as_deref().unwrap_or(""),
            &widths,
        ),
        writer,
    )?;

    let shares = breakdown::parse(epic.description.as_deref().unwrap_or(""));
    let rollup = report::assignee_rollup(&issues, policy, &shares, totals.estimated);
    for (name, points) in &rollup {
        output::println(&format::assignee_row(points, name, &widths), writer)?;
    }
    Ok(())
}

async fn summary_command(
    client: &reqwest::Client,
    config: &ReportConfig,
    wbs: &str,
    cycle: Option<&str>,
    flags: cli::parser::ReportFlags,
    writer: &mut Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    let widths = format::column_widths();
    for line in format::header_lines() {
        output::println(&line, writer)?;
    }

    let epics = search::run_search(client, config, &jql::epics_by_wbs(wbs)).await?;
    let epics = report::filter_epics_by_cycle(epics, cycle);
    let policy = effective_policy(config, flags);

    let mut estimated: BTreeMap<String, i64> = BTreeMap::new();
    for epic in &epics {
        // One failing epic should not take the whole report down.
        match rollup_epic(client, config, epic, flags.all_issues, policy).await {
            Ok((totals, _)) => {
                output::println(
                    &format::epic_row(
                        &epic.key,
                        &totals,
                        epic.epic_summary.as_deref().unwrap_or(""),
                        &widths,
                    ),
                    writer,
                )?;
                for (name, fraction) in breakdown::parse(epic.description.as_deref().unwrap_or(""))
                {
                    *estimated.entry(name).or_insert(0) +=
                        report::estimated_share(totals.estimated, fraction);
                }
            }
            Err(err) => eprintln!("Skipping {}: {err}", epic.key),
        }
    }

    output::println("", writer)?;
    for (name, points) in &estimated {
        output::println(&format::estimate_row(name, *points, &widths), writer)?;
    }
    Ok(())
}

/// Fetch an epic's linked issues and reduce them to totals plus the
/// retained issue set.
async fn rollup_epic(
    client: &reqwest::Client,
    config: &ReportConfig,
    epic: &Issue,
    all_issues: bool,
    policy: WontFixPolicy,
) -> Result<(report::EpicTotals, Vec<Issue>), ReportError> {
    let query = jql::issues_in_epic(&epic.key, jql::eligible_types(all_issues));
    let fetched = search::run_search(client, config, &query).await?;
    let issues = report::retained_issues(fetched, policy);
    let totals = report::epic_totals(epic.points, &issues, policy);
    Ok((totals, issues))
}
