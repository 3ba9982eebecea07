//! `slotmatch` CLI — register participants and availability, then match
//! interview slots, against a JSON ledger file.
//!
//! ## Usage
//!
//! ```sh
//! # Register participants
//! slotmatch participant add --id cand-1 --role candidate --name "Dana"
//! slotmatch participant add --id int-1 --role interviewer
//!
//! # Register availability (candidates: exactly one hour)
//! slotmatch availability add --participant cand-1 --date 2025-05-03 --start 09:00 --end 10:00
//! slotmatch availability add --participant int-1 --date 2025-05-03 --start 09:00 --end 16:00
//!
//! # Find slots where the candidate and every interviewer are free
//! slotmatch match --candidate cand-1 --interviewers int-1,int-2
//!
//! # Use another ledger file
//! slotmatch --data team.json participant list
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    InMemoryIntervalStore, Ledger, LedgerFile, NewInterval, Participant, ParticipantDirectory, ParticipantId,
    Role, Scheduler, TracingObserver,
};
use tracing_subscriber::EnvFilter;

type LedgerScheduler = Scheduler<InMemoryIntervalStore, ParticipantDirectory>;

#[derive(Parser)]
#[command(
    name = "slotmatch",
    version,
    about = "Interview availability registration and slot matching"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ledger file holding participants and availability
    #[arg(long, global = true, env = "SLOTMATCH_DATA", default_value = "slotmatch.json")]
    data: PathBuf,

    /// Log matching decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage participants
    Participant {
        #[command(subcommand)]
        action: ParticipantAction,
    },
    /// Manage availability windows
    Availability {
        #[command(subcommand)]
        action: AvailabilityAction,
    },
    /// Find slots where the candidate and all interviewers are free
    Match {
        /// Candidate id
        #[arg(long)]
        candidate: String,
        /// Comma-separated interviewer ids
        #[arg(long, value_delimiter = ',', required = true)]
        interviewers: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ParticipantAction {
    /// Register a participant
    Add {
        #[arg(long)]
        id: String,
        /// candidate or interviewer
        #[arg(long)]
        role: Role,
        #[arg(long)]
        name: Option<String>,
    },
    /// List registered participants
    List,
}

#[derive(Subcommand)]
enum AvailabilityAction {
    /// Register a free window
    Add {
        #[arg(long)]
        participant: String,
        /// Day as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Start as HH:00
        #[arg(long)]
        start: String,
        /// End as HH:00
        #[arg(long)]
        end: String,
    },
    /// List a participant's windows
    List {
        #[arg(long)]
        participant: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Held until exit so the load, the change and the save form one unit.
    let file = LedgerFile::open(&cli.data)
        .with_context(|| format!("Failed to lock ledger: {}", cli.data.display()))?;
    let ledger = file
        .load()
        .with_context(|| format!("Failed to read ledger: {}", cli.data.display()))?;
    let (directory, store) = ledger
        .restore()
        .with_context(|| format!("Ledger is inconsistent: {}", cli.data.display()))?;
    let scheduler: LedgerScheduler = Scheduler::with_observer(store, directory, TracingObserver);

    match cli.command {
        Commands::Participant { action } => match action {
            ParticipantAction::Add { id, role, name } => {
                let mut participant = Participant::new(id, role);
                participant.name = name;
                let registered = scheduler
                    .lookup()
                    .register(participant)
                    .context("Failed to register participant")?;
                save(&scheduler, &file)?;
                print_json(&registered)?;
            }
            ParticipantAction::List => {
                print_json(&scheduler.lookup().list()?)?;
            }
        },
        Commands::Availability { action } => match action {
            AvailabilityAction::Add {
                participant,
                date,
                start,
                end,
            } => {
                let window = NewInterval::parse(&date, &start, &end)
                    .context("Failed to add availability")?;
                let stored = scheduler
                    .add_availability(&ParticipantId::new(participant), window)
                    .context("Failed to add availability")?;
                save(&scheduler, &file)?;
                print_json(&stored)?;
            }
            AvailabilityAction::List { participant } => {
                let listed = scheduler
                    .list_availability(&ParticipantId::new(participant))
                    .context("Failed to list availability")?;
                print_json(&listed)?;
            }
        },
        Commands::Match {
            candidate,
            interviewers,
        } => {
            let reviewers: Vec<ParticipantId> = interviewers
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .map(ParticipantId::from)
                .collect();
            let slots = scheduler
                .find_available_slots(&ParticipantId::new(candidate), &reviewers)
                .context("Failed to match slots")?;
            print_json(&slots)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "slot_engine=debug,slotmatch=debug"
    } else {
        "slot_engine=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn save(scheduler: &LedgerScheduler, file: &LedgerFile) -> Result<()> {
    let ledger = Ledger::capture(scheduler.lookup(), scheduler.store())?;
    file.commit(&ledger)
        .with_context(|| format!("Failed to write ledger: {}", file.path().display()))?;
    tracing::debug!(
        path = %file.path().display(),
        participants = ledger.participants.len(),
        intervals = ledger.intervals.len(),
        "ledger saved"
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
