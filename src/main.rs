use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use grace_tester::{parser, report, runner, utils::config::Config};

#[derive(Parser)]
#[command(name = "grace-tester")]
#[command(version = "0.1.0")]
#[command(about = "Conversation smoke test for the Grace agent service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the scripted conversation and report routing results
    Run {
        /// YAML script to run instead of the built-in conversation
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Save a JSON report of the run
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Agent service URL (default: $GRACE_BASE_URL or http://localhost:5005)
        #[arg(long)]
        base_url: Option<String>,

        /// Bearer credential (default: $GRACE_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Per-request timeout in seconds (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,

        /// Pause between steps in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Create the conversation before the first message
        #[arg(long, default_value = "false")]
        create_conversation: bool,
    },

    /// List the steps of a script without contacting the service
    Steps {
        /// YAML script (built-in conversation if omitted)
        #[arg(short, long)]
        script: Option<PathBuf>,
    },

    /// Show the summary of a saved JSON report
    Report {
        /// Path to the report file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let code = runner::guarded_exit_code(execute(cli)).await;
    std::process::exit(code);
}

async fn execute(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Run {
            script,
            report,
            base_url,
            api_key,
            timeout_secs,
            delay_ms,
            create_conversation,
        } => {
            let mut config = Config::from_env();
            if let Some(url) = base_url {
                config = config.with_base_url(&url);
            }
            if let Some(key) = api_key {
                config.api_key = key;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout = Duration::from_secs(secs);
            }
            if let Some(ms) = delay_ms {
                config.step_delay = Duration::from_millis(ms);
            }
            config.create_conversation = create_conversation;

            let script = parser::load_script(script.as_deref())?;
            log::info!(
                "Running '{}' ({} steps) against {}",
                script.name,
                script.len(),
                config.base_url
            );

            let summary = runner::run_conversation(&config, &script, report.as_deref()).await?;
            Ok(summary.exit_code())
        }

        Commands::Steps { script } => {
            let script = parser::load_script(script.as_deref())?;
            println!(
                "{} {} ({} steps)",
                "▶".green().bold(),
                script.name.white().bold(),
                script.len()
            );
            for step in &script.steps {
                println!(
                    "  {} {} [{}]",
                    format!("{}.", step.step).cyan(),
                    step.message,
                    step.expected_routing.yellow()
                );
                if !step.description.is_empty() {
                    println!("     {}", step.description.dimmed());
                }
            }
            Ok(0)
        }

        Commands::Report { path } => {
            println!(
                "{} Loading report: {}",
                "📊".to_string().blue(),
                path.display()
            );
            report::show_report(&path)
        }
    }
}
