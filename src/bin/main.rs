use authorship::config::{self, ClaimPolicy};
use authorship::replay;
use authorship::{AuthorshipResult, RangeOwnershipTracker};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Track which collaborator last wrote each span of a document
#[derive(Parser)]
#[command(name = "authorship")]
#[command(version)]
#[command(about = "Track which collaborator last wrote each span of a document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines event log and print the final partition
    Replay {
        /// Event log, one JSON event per line
        events: PathBuf,

        /// Settings file (default: user config, if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured claim policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Replace,
    Compatible,
}

impl From<PolicyArg> for ClaimPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Replace => ClaimPolicy::Replace,
            PolicyArg::Compatible => ClaimPolicy::Compatible,
        }
    }
}

fn run_replay(
    events: PathBuf,
    config_path: Option<PathBuf>,
    policy: Option<PolicyArg>,
) -> AuthorshipResult<()> {
    let mut settings = match config_path {
        Some(path) => config::load_settings(&path)?,
        None => config::load_user_settings(),
    };
    if let Some(policy) = policy {
        settings.claim_policy = policy.into();
    }

    let events = replay::parse_events(BufReader::new(File::open(&events)?))?;
    let mut tracker = RangeOwnershipTracker::with_settings(settings);
    let stats = replay::replay(&mut tracker, &events);

    log::info!(
        target: "authorship::replay",
        "Applied {} edits and {} claims ({} rejected) with {:?} policy",
        stats.edits,
        stats.claims,
        stats.rejected,
        tracker.settings().claim_policy
    );
    println!("{}", serde_json::to_string_pretty(&tracker.snapshot())?);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            events,
            config,
            policy,
        } => run_replay(events, config, policy),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
