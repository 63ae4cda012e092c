/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Epic {
        id: String,
        flags: ReportFlags,
    },
    Summary {
        wbs: String,
        cycle: Option<String>,
        flags: ReportFlags,
    },
    Help,
    Unknown(String),
}

/// Report flags shared by both subcommands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportFlags {
    /// Count bugs and improvements as well as stories.
    pub all_issues: bool,
    /// Count Won't Fix issues as done instead of dropping them.
    pub wontfix_is_done: bool,
}

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    let mut flags = ReportFlags::default();
    let mut cycle: Option<String> = None;
    let mut positionals: Vec<&str> = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--all-issues" | "--include-bugs" => flags.all_issues = true,
            "--wontfix-is-done" => flags.wontfix_is_done = true,
            "--cycle" => match iter.next() {
                Some(value) => cycle = Some(value.clone()),
                None => {
                    return Command::Unknown(
                        "Missing value for --cycle. Usage: epicpoints summary <wbs> --cycle <value>"
                            .to_string(),
                    );
                }
            },
            arg if arg.starts_with("--cycle=") => {
                cycle = Some(arg["--cycle=".len()..].to_string());
            }
            arg if arg.starts_with("--") => {
                return Command::Unknown(format!("Unknown flag {arg}"));
            }
            arg => positionals.push(arg),
        }
    }

    match positionals.as_slice() {
        [] | ["help"] => Command::Help,
        ["epic", id] => {
            if cycle.is_some() {
                return Command::Unknown(
                    "--cycle is only valid with the summary command".to_string(),
                );
            }
            Command::Epic {
                id: (*id).to_string(),
                flags,
            }
        }
        ["epic"] => Command::Unknown("Missing epic id. Usage: epicpoints epic <id>".to_string()),
        ["summary", wbs] => Command::Summary {
            wbs: (*wbs).to_string(),
            cycle,
            flags,
        },
        ["summary"] => Command::Unknown(
            "Missing WBS prefix. Usage: epicpoints summary <wbs> [--cycle <value>]".to_string(),
        ),
        [cmd, ..] => Command::Unknown((*cmd).to_string()),
    }
}
