use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use deskreport::api::{AssetClient, ServiceDeskClient};
use deskreport::config::Config;
use deskreport::pipeline::{run_agent_count, run_notes_report, FailureLog, TimeWindow};
use deskreport::{env_vars, export, logging};

#[derive(Parser)]
#[command(name = "deskreport")]
#[command(about = "Ticket-notes and agent-inventory reports for helpdesk/RMM APIs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Prompt on stdin for credentials missing from config and environment
    #[arg(long, global = true)]
    prompt: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export notes created in the recent-activity window to CSV
    Notes {
        /// Output CSV path (default: filtered_notes.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Days of activity to include (default: 30)
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Tickets per search page (default: 100)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Count computer agents and dump the raw asset list to JSON
    Agents {
        /// Output JSON path (default: response.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Assets per page, sent as $top (default: 100)
        #[arg(long)]
        top: Option<u32>,
    },

    /// List the environment variables deskreport reads
    Env,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Notes {
            output,
            lookback_days,
            page_size,
        } => {
            let mut config = load_config(cli.config.as_deref(), cli.debug)?;
            if let Some(output) = output {
                config.notes.output = output.to_string_lossy().into_owned();
            }
            if let Some(days) = lookback_days {
                config.notes.lookback_days = days;
            }
            if let Some(size) = page_size {
                config.notes.page_size = size;
            }
            cmd_notes(config, cli.prompt).await?;
        }
        Commands::Agents { output, top } => {
            let mut config = load_config(cli.config.as_deref(), cli.debug)?;
            if let Some(output) = output {
                config.agents.output = output.to_string_lossy().into_owned();
            }
            if let Some(top) = top {
                config.agents.page_size = top;
            }
            cmd_agents(config, cli.prompt).await?;
        }
        // Needs neither configuration nor logging
        Commands::Env => print!("{}", env_vars::render_table()),
    }

    Ok(())
}

/// Load layered configuration and start logging from it
fn load_config(path: Option<&str>, debug: bool) -> Result<Config> {
    let config = Config::load(path)?;
    logging::init_logging(&config, debug);
    Ok(config)
}

/// Read one line from stdin after printing `label` to stderr
fn prompt_line(label: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn cmd_notes(mut config: Config, prompt: bool) -> Result<()> {
    if prompt {
        config
            .notes
            .fill_missing(prompt_line)
            .context("Failed to read credentials from stdin")?;
    }
    let access = config.notes.access()?;

    // Fixed for the whole run so paging and filtering agree on the boundary
    let window = TimeWindow::last_days(config.notes.lookback_days);
    info!("Collecting notes created since {}", window.start());

    let mut client = ServiceDeskClient::new(access.server_url);
    let mut failures = FailureLog::new();
    let records = match run_notes_report(
        &mut client,
        &access.credentials,
        &window,
        config.notes.page_size,
        &mut failures,
    )
    .await
    {
        Ok(records) => records,
        Err(e) => {
            error!("{}", e);
            anyhow::bail!("Exiting due to failed authentication.");
        }
    };

    export::export_notes_csv(Path::new(&config.notes.output), &records)?;
    if !failures.is_empty() {
        warn!("Completed with errors. {}", failures.summary());
    }
    Ok(())
}

async fn cmd_agents(mut config: Config, prompt: bool) -> Result<()> {
    if prompt {
        config
            .agents
            .fill_missing(prompt_line)
            .context("Failed to read API token from stdin")?;
    }
    let access = config.agents.access()?;

    let client = AssetClient::new(access.server_url, access.port, access.token);
    let mut failures = FailureLog::new();
    let result = run_agent_count(&client, u64::from(config.agents.page_size), &mut failures).await;

    export::export_assets_json(Path::new(&config.agents.output), &result.assets)?;
    export::report_agent_count(io::stdout().lock(), result.computer_agents)
        .context("Failed to print agent count")?;
    if !failures.is_empty() {
        warn!("Completed with errors. {}", failures.summary());
    }
    Ok(())
}
