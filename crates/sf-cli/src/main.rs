//! SiteFence CLI
//!
//! Manages a JSON rules file and evaluates URLs against it, standing in for
//! the browser host that would normally drive the rules layer.

use chrono::Timelike;
use clap::{Parser, Subcommand};

use sf_core::pattern::{classify, generate_pattern, strip_wildcard, MatchMode};
use sf_core::schedule::{TimeOfDay, TimeWindow};
use sf_core::types::{BlockDecision, BlockReason};
use sf_rules::{Evaluation, JsonFileStore, RuleStore};

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "SiteFence block rule manager and evaluator")]
struct Cli {
    /// Rules file
    #[arg(short, long, default_value = "rules.json", global = true)]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a block rule for a URL
    Add {
        /// URL to block
        url: String,

        /// Pattern mode: exact, domain, path, or query
        #[arg(short, long, default_value = "exact")]
        mode: String,

        /// Daily window during which the site stays reachable (HH:MM-HH:MM)
        #[arg(short, long)]
        schedule: Option<String>,

        /// Block only inside incognito windows
        #[arg(short, long)]
        incognito: bool,
    },

    /// Remove a block rule by its stored pattern
    Remove {
        pattern: String,

        #[arg(short, long)]
        incognito: bool,
    },

    /// List stored rules and focus groups
    List,

    /// Generate and classify a pattern without storing it
    Pattern {
        url: String,

        /// Pattern mode: exact, domain, path, or query
        #[arg(short, long, default_value = "domain")]
        mode: String,
    },

    /// Evaluate a URL against the stored rules (exit status 2 when blocked)
    Check {
        url: String,

        /// Wall-clock time to evaluate at (HH:MM), default now
        #[arg(long)]
        at: Option<String>,

        /// Evaluate as an incognito navigation
        #[arg(short, long)]
        incognito: bool,
    },

    /// Manage focus groups
    Focus {
        #[command(subcommand)]
        command: FocusCommands,
    },
}

#[derive(Subcommand)]
enum FocusCommands {
    /// Create an empty focus group
    New { name: String },
    /// Add a URL pattern to a group (creates the group if needed)
    AddLink { name: String, pattern: String },
    /// Start focusing a group (stops any other session)
    Start { name: String },
    /// Stop all focus sessions
    Stop,
    /// Delete a group
    Remove { name: String },
    /// List groups and their links
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // Needs no rules file
        Commands::Pattern { url, mode } => cmd_pattern(&url, &mode),
        command => run_with_store(&cli.file, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_with_store(path: &str, command: Commands) -> Result<(), String> {
    let mut store = open_store(path)?;
    match command {
        Commands::Add {
            url,
            mode,
            schedule,
            incognito,
        } => cmd_add(&mut store, &url, &mode, schedule.as_deref(), incognito),
        Commands::Remove { pattern, incognito } => cmd_remove(&mut store, &pattern, incognito),
        Commands::List => cmd_list(&store),
        Commands::Check { url, at, incognito } => cmd_check(&store, &url, at.as_deref(), incognito),
        Commands::Focus { command } => cmd_focus(&mut store, command),
        // dispatched before the store is opened
        Commands::Pattern { .. } => Ok(()),
    }
}

fn open_store(path: &str) -> Result<RuleStore<JsonFileStore>, String> {
    let port = JsonFileStore::open(path)
        .map_err(|e| format!("Failed to open rules file '{}': {}", path, e))?;
    Ok(RuleStore::new(port))
}

fn parse_mode(mode: &str) -> Result<MatchMode, String> {
    MatchMode::parse(mode)
        .ok_or_else(|| format!("Unknown mode '{}' (expected exact, domain, path, or query)", mode))
}

fn parse_window(spec: &str) -> Result<TimeWindow, String> {
    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| format!("Invalid schedule '{}' (expected HH:MM-HH:MM)", spec))?;
    Ok(TimeWindow::new(
        TimeOfDay::parse(start).map_err(|e| e.to_string())?,
        TimeOfDay::parse(end).map_err(|e| e.to_string())?,
    ))
}

fn time_now() -> Result<TimeOfDay, String> {
    let now = chrono::Local::now();
    TimeOfDay::new(now.hour() as u8, now.minute() as u8).map_err(|e| e.to_string())
}

fn cmd_add(
    store: &mut RuleStore<JsonFileStore>,
    url: &str,
    mode: &str,
    schedule: Option<&str>,
    incognito: bool,
) -> Result<(), String> {
    let mode = parse_mode(mode)?;
    let pattern = generate_pattern(url, mode).map_err(|e| e.to_string())?;

    match (schedule, incognito) {
        (Some(spec), false) => {
            let window = parse_window(spec)?;
            store
                .add_scheduled(&pattern, window)
                .map_err(|e| e.to_string())?;
            println!("Added scheduled rule {} (open {})", pattern, window);
        }
        (None, true) => {
            store.add_incognito(&pattern).map_err(|e| e.to_string())?;
            println!("Added incognito rule {}", pattern);
        }
        (Some(_), true) => {
            return Err("Incognito rules do not take a schedule".to_string());
        }
        (None, false) => {
            store.add_permanent(&pattern).map_err(|e| e.to_string())?;
            println!("Added rule {}", pattern);
        }
    }
    Ok(())
}

fn cmd_remove(
    store: &mut RuleStore<JsonFileStore>,
    pattern: &str,
    incognito: bool,
) -> Result<(), String> {
    if incognito {
        store.remove_incognito(pattern).map_err(|e| e.to_string())?;
    } else {
        store.remove_rule(pattern).map_err(|e| e.to_string())?;
    }
    println!("Removed {}", pattern);
    Ok(())
}

fn cmd_list(store: &RuleStore<JsonFileStore>) -> Result<(), String> {
    let rules = store.block_rules().map_err(|e| e.to_string())?;
    let incognito = store.incognito_rules().map_err(|e| e.to_string())?;
    let groups = store.groups().map_err(|e| e.to_string())?;

    println!("Block rules ({}):", rules.len());
    for rule in &rules {
        match rule.schedule {
            Some(window) => println!("  {} [open {}]", rule.pattern, window),
            None => println!("  {}", rule.pattern),
        }
    }

    if !incognito.is_empty() {
        println!("Incognito rules ({}):", incognito.len());
        for rule in &incognito {
            println!("  {}", rule.pattern);
        }
    }

    if !groups.is_empty() {
        println!("Focus groups ({}):", groups.len());
        for group in &groups {
            let marker = if group.is_focusing { " [focusing]" } else { "" };
            println!("  {}{}", group.name, marker);
            for link in &group.links {
                println!("    {}", link);
            }
        }
    }
    Ok(())
}

fn cmd_pattern(url: &str, mode: &str) -> Result<(), String> {
    let mode = parse_mode(mode)?;
    let pattern = generate_pattern(url, mode).map_err(|e| e.to_string())?;
    println!("Pattern:    {}", pattern);
    println!("Classified: {}", classify(&pattern).as_str());
    println!("Example:    {}", strip_wildcard(&pattern));
    Ok(())
}

fn cmd_check(
    store: &RuleStore<JsonFileStore>,
    url: &str,
    at: Option<&str>,
    incognito: bool,
) -> Result<(), String> {
    let now = match at {
        Some(spec) => TimeOfDay::parse(spec).map_err(|e| e.to_string())?,
        None => time_now()?,
    };

    let decision = store
        .evaluate(Evaluation { url, now, incognito })
        .map_err(|e| e.to_string())?;

    match decision {
        BlockDecision::Allow => {
            println!("{} allowed at {}", url, now);
        }
        BlockDecision::Block(reason) => {
            let label = match reason {
                BlockReason::Permanent => "blocked permanently",
                BlockReason::Schedule => "blocked by schedule",
                BlockReason::FocusMode => "blocked by focus mode",
                BlockReason::Incognito => "blocked in incognito",
            };
            println!("{} {} at {}", url, label, now);
            std::process::exit(2);
        }
    }
    Ok(())
}

fn cmd_focus(
    store: &mut RuleStore<JsonFileStore>,
    command: FocusCommands,
) -> Result<(), String> {
    match command {
        FocusCommands::New { name } => {
            store.add_group(&name).map_err(|e| e.to_string())?;
            println!("Created focus group {}", name);
        }
        FocusCommands::AddLink { name, pattern } => {
            store.add_link(&name, &pattern).map_err(|e| e.to_string())?;
            println!("Added {} to {}", pattern, name);
        }
        FocusCommands::Start { name } => {
            store.set_focus(&name, true).map_err(|e| e.to_string())?;
            println!("Focusing {}", name);
        }
        FocusCommands::Stop => {
            store.reset_all_focus().map_err(|e| e.to_string())?;
            println!("All focus sessions stopped");
        }
        FocusCommands::Remove { name } => {
            store.remove_group(&name).map_err(|e| e.to_string())?;
            println!("Removed focus group {}", name);
        }
        FocusCommands::List => {
            let groups = store.groups().map_err(|e| e.to_string())?;
            if groups.is_empty() {
                println!("No focus groups");
            }
            for group in &groups {
                let marker = if group.is_focusing { " [focusing]" } else { "" };
                println!("{} ({} links){}", group.name, group.links.len(), marker);
                for link in &group.links {
                    println!("  {}", link);
                }
            }
        }
    }
    Ok(())
}
