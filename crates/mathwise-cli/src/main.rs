mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mathwise_core::{classify, normalize, wants_steps, ResultEnvelope};
use mathwise_solver::{run_server, NewtonClient, Router, ServerOptions, SolverMode};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "mathwise",
    version,
    about = "Solve natural-language and symbolic math problems"
)]
struct Cli {
    /// Override the configured solver mode
    #[arg(long, global = true)]
    mode: Option<CliMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem ("x^2 - 4 = 0", "what is five times three", ...)
    Solve {
        /// Problem text; several words are joined with spaces
        #[arg(required = true)]
        input: Vec<String>,

        /// Include the step-by-step trace
        #[arg(long, conflicts_with = "no_steps")]
        steps: bool,

        /// Never include steps, even when the input asks for them
        #[arg(long)]
        no_steps: bool,

        /// Print the full result envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the normalized form of an input
    Normalize {
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Show the problem type an input is classified as
    Classify {
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Derivative, critical points and intercepts of a function
    Analyze {
        #[arg(required = true)]
        input: Vec<String>,
    },

    /// Serve JSON-lines requests on stdio
    Serve,

    /// Show the active configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    Local,
    Hybrid,
}

impl From<CliMode> for SolverMode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Local => Self::Local,
            CliMode::Hybrid => Self::Hybrid,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let mode = cli.mode.map(SolverMode::from).unwrap_or(cfg.solver.mode);

    match cli.command {
        Commands::Solve {
            input,
            steps,
            no_steps,
            json,
        } => cmd_solve(&cfg, mode, &input.join(" "), steps, no_steps, json),
        Commands::Normalize { input } => {
            println!("{}", normalize(&input.join(" ")));
            Ok(())
        }
        Commands::Classify { input } => {
            let raw = input.join(" ");
            println!("{}", classify(&raw, &normalize(&raw)));
            Ok(())
        }
        Commands::Analyze { input } => {
            let router = build_router(&cfg, mode);
            let analysis = router.analyze(&input.join(" "));
            print_json(&analysis, cfg.output.pretty)
        }
        Commands::Serve => {
            let router = build_router(&cfg, mode);
            let options = ServerOptions {
                steps_by_keyword: cfg.solver.steps_by_keyword,
            };
            run_server(&router, options)
        }
        Commands::Config => cmd_config(&cfg),
    }
}

fn build_router(cfg: &Config, mode: SolverMode) -> Router {
    let router = Router::default().with_mode(mode);
    match mode {
        SolverMode::Hybrid => {
            let client = NewtonClient::new(
                cfg.remote.base_url.clone(),
                Duration::from_secs(cfg.remote.timeout_secs),
            );
            router.with_remote(Arc::new(client))
        }
        SolverMode::Local => router,
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serializing output")?;
    println!("{text}");
    Ok(())
}

fn cmd_solve(
    cfg: &Config,
    mode: SolverMode,
    input: &str,
    steps: bool,
    no_steps: bool,
    json: bool,
) -> Result<()> {
    let input = input.trim();
    if input.is_empty() {
        bail!("no input provided");
    }
    let want_steps = if steps {
        true
    } else if no_steps {
        false
    } else {
        cfg.solver.steps_by_keyword && wants_steps(input)
    };

    let router = build_router(cfg, mode);
    let env = router.solve(input, want_steps);
    if json {
        return print_json(&env, cfg.output.pretty);
    }
    print_envelope(&env);
    Ok(())
}

fn print_envelope(env: &ResultEnvelope) {
    println!("Type:     {}", env.problem_type);
    println!("Solution: {}", env.solution);
    if let Some(forms) = &env.forms {
        println!("  simplified: {}", forms.simplified);
        println!("  expanded:   {}", forms.expanded);
        println!("  factored:   {}", forms.factored);
    }
    if let Some(err) = &env.error {
        println!("Error:    {err}");
    }
    if !env.detailed_steps.is_empty() {
        println!();
        for (i, step) in env.detailed_steps.iter().enumerate() {
            println!("{:>3}. {}", i + 1, step.step);
            if !step.explanation.is_empty() {
                println!("     {}", step.explanation);
            }
        }
    }
}

fn cmd_config(cfg: &Config) -> Result<()> {
    println!("Config: {}", config::show_config_path());
    println!();
    println!("[solver]");
    println!("  mode = {}", cfg.solver.mode);
    println!("  steps_by_keyword = {}", cfg.solver.steps_by_keyword);
    println!();
    println!("[remote]");
    println!("  base_url = {}", cfg.remote.base_url);
    println!("  timeout_secs = {}", cfg.remote.timeout_secs);
    println!();
    println!("[output]");
    println!("  pretty = {}", cfg.output.pretty);
    Ok(())
}
