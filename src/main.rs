use crate::config::{Scenario, TowerConfig};
use crate::time::Time;
use crate::tower::{AllocationOutcome, ScheduleOutcome, SharedTower, Tower, UndoOutcome};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::Tabled;
use tabled::settings::{Alignment, Style};
use tracing_subscriber::EnvFilter;

mod airport;
mod config;
mod error;
mod flight;
mod runway;
mod scheduler;
mod time;
mod tower;

#[derive(Parser)]
struct Args {
    /// Path to a JSON scenario file with routes and flights to preload
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Number of runways
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    runways: u16,

    /// Airport that unknown destinations are connected to
    #[arg(long, default_value = "JFK")]
    hub: String,

    /// Distance used for routes synthesized from the hub
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    hub_distance: u64,

    /// Start with an empty route network
    #[arg(long)]
    no_sample_routes: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match pager {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<T: Tabled>(rows: &[T], empty: &str) {
    if rows.is_empty() {
        println!("{}", empty);
        return;
    }
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_runways(tower: &Tower) {
    print_table(&tower.runways().rows(tower.history()), "No runways.");
}

fn allocate(tower: &mut Tower) {
    let report = tower.allocate_runways(Time::now());
    for departure in &report.departed {
        println!(
            "Flight {} has departed. Clearing runway {}.",
            departure.number, departure.runway
        );
    }
    match report.outcome {
        AllocationOutcome::Assigned(assignments) => {
            for a in &assignments {
                println!("{} -> Runway {}", a.number.to_string().green(), a.runway);
            }
            print_runways(tower);
        }
        AllocationOutcome::FullyOccupied { wait_minutes } => println!(
            "{}",
            format!(
                "All runways are currently occupied. Next available in ~{:.2} minutes.",
                wait_minutes
            )
            .yellow()
        ),
        AllocationOutcome::NothingWaiting => println!("No flights waiting for runways."),
    }
}

/// Commands that change the tower.
fn apply(tower: &mut Tower, parts: &[&str]) {
    match parts[0] {
        "add" => {
            if let (Some(number), Some(dest), Some(time)) = (parts.get(1), parts.get(2), parts.get(3)) {
                let emergency = parts
                    .get(4)
                    .is_some_and(|f| matches!(f.to_lowercase().as_str(), "e" | "y" | "emergency"));
                match tower.add_flight(number, &dest.to_uppercase(), time, emergency, Time::now()) {
                    Ok(flight) => println!("Added: {}", flight),
                    Err(err) => println!("{}", err.to_string().red()),
                }
            } else {
                println!("Usage: add <flight_no> <destination> <HH:MM> [e]");
            }
        },
        "schedule" => match tower.schedule_flights() {
            ScheduleOutcome::Scheduled(n) => println!("Scheduled {} flights.", n),
            ScheduleOutcome::NothingToSchedule => println!("No flights to schedule."),
        },
        "allocate" => allocate(tower),
        "cancel" => {
            if let Some(number) = parts.get(1) {
                match tower.cancel_flight(number) {
                    Ok(flight) => println!("Cancelled: {}", flight.number),
                    Err(err) => println!("{}", err.to_string().red()),
                }
            } else {
                println!("Usage: cancel <flight_no>");
            }
        },
        "undo" => match tower.undo_cancellation() {
            UndoOutcome::Restored(key) => {
                if let Some(flight) = tower.flight(key) {
                    println!("Restored: {}", flight);
                }
            }
            UndoOutcome::Empty => println!("No cancelled flights to restore."),
        },
        "link" => {
            if let (Some(from), Some(to), Some(dist)) = (parts.get(1), parts.get(2), parts.get(3)) {
                match dist.parse::<u64>() {
                    Ok(d) => match tower.add_route(&from.to_uppercase(), &to.to_uppercase(), d) {
                        Ok(()) => println!("Route added: {} <-> {} (distance: {})", from.to_uppercase(), to.to_uppercase(), d),
                        Err(err) => println!("{}", err.to_string().red()),
                    },
                    Err(_) => println!("Distance must be a positive whole number."),
                }
            } else {
                println!("Usage: link <from> <to> <distance>");
            }
        },
        _ => println!("Unknown command: {}", parts[0]),
    }
}

/// Read-only commands.
fn show(tower: &Tower, parts: &[&str]) {
    match parts[0] {
        "route" => {
            if let (Some(from), Some(to)) = (parts.get(1), parts.get(2)) {
                match tower.find_route(&from.to_uppercase(), &to.to_uppercase()) {
                    Some(route) => println!("Route: {}", route),
                    None => println!("No route found."),
                }
            } else {
                println!("Usage: route <from> <to>");
            }
        },
        "ls" => {
            let sub = parts.get(1).map(|s| *s).unwrap_or("a");
            match sub {
                "s" | "scheduled" => print_table(
                    &tower.scheduled().map(|f| f.row()).collect::<Vec<_>>(),
                    "No scheduled flights.",
                ),
                "c" | "cancelled" => print_table(
                    &tower.cancelled().rev().map(|f| f.row()).collect::<Vec<_>>(),
                    "No cancelled flights.",
                ),
                "p" | "pending" => print_table(
                    &tower.pending().map(|f| f.row()).collect::<Vec<_>>(),
                    "No pending flights.",
                ),
                "r" | "runways" => print_runways(tower),
                "n" | "network" => print_table(&tower.graph().rows(), "No routes."),
                _ => print_table(
                    &tower.history().iter().map(|f| f.row()).collect::<Vec<_>>(),
                    "No flights found.",
                ),
            }
        },
        "status" => {
            let s = tower.summary();
            println!("\n=== Airport System Status ===");
            println!(" Pending flights:   {}", s.pending);
            println!(" Scheduled flights: {}", s.scheduled);
            println!(" Cancelled flights: {}", s.cancelled);
            println!(" Free runways:      {}/{}", s.free_runways, s.total_runways);
            println!(" Known airports:    {}", tower.graph().airports().len());
        },
        _ => {
            println!("\nAvailable Commands:");
            println!("  add <no> <dest> <HH:MM> [e] - Admit a flight, 'e' marks an emergency");
            println!("  schedule                    - Move pending flights to the scheduled list in priority order");
            println!("  allocate                    - Clear departed flights and assign free runways");
            println!("  cancel <no>                 - Cancel a scheduled or runway-assigned flight");
            println!("  undo                        - Restore the most recently cancelled flight");
            println!("  route <from> <to>           - Find the shortest route between two airports");
            println!("  link <from> <to> <d>        - Add a two-way route of distance <d>");
            println!("  ls [kind]                   - List flights: a - all, p - pending, s - scheduled, c - cancelled,");
            println!("                                r - runways, n - route network");
            println!("  status                      - Show a summary");
            println!("  help / ?                    - Show this help menu");
            println!("  exit / quit                 - Exit the tower\n");
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = TowerConfig {
        runways: args.runways,
        hub: Arc::from(args.hub.to_uppercase()),
        hub_distance: args.hub_distance,
        sample_routes: !args.no_sample_routes,
    };

    let tower = match &args.scenario {
        Some(path) => {
            let scenario = Scenario::load_from_file(path)?;
            let tower = Tower::with_scenario(config, &scenario, Time::now())?;
            println!("Tower online. Loaded {} flights from {}", scenario.flights.len(), path.display());
            tower
        }
        None => {
            println!("Tower online.");
            Tower::new(config)
        }
    };
    let tower = SharedTower::new(tower);

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "add", "schedule", "allocate", "cancel", "undo", "route", "link", "ls", "status",
            "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "exit" | "quit" => break,
                    "route" | "ls" | "status" | "help" | "?" => tower.read(|t| show(t, &parts)),
                    _ => tower.write(|t| apply(t, &parts)),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
