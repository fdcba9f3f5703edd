use clap::{Parser, Subcommand};
use colored::Colorize;
use design_patterns::catalog::{self, Category};
use design_patterns::chain::Chain;
use design_patterns::config::ChainConfig;
use design_patterns::handler::{LabelHandler, Matcher, Node, Outcome};
use design_patterns::report::DispatchReport;
use design_patterns::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Command line
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "complete_30_chain_dispatcher", about = "Chain of Responsibility walkthrough")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through linking, dispatch, re-linking and truncation
    Demo,
    /// Send requests through a chain and report who handled them
    Dispatch {
        /// TOML chain definition; the built-in support-desk chain when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        requests: Vec<String>,
    },
    /// Print the learning map of principles and patterns
    Catalog {
        #[arg(short = 'C', long)]
        category: Option<Category>,
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// Milestone 1-4: Guided walkthrough
// =============================================================================

fn section(title: &str, use_colors: bool) -> String {
    let title = format!("=== {title} ===");
    if use_colors {
        title.bold().to_string()
    } else {
        title
    }
}

fn describe(request: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Handled(reply) => format!("{request} -> {reply}"),
        Outcome::Unhandled => format!("{request} -> unhandled"),
    }
}

fn demo_lines(use_colors: bool) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(section("Milestone 1: Linking nodes", use_colors));
    let mut head: Node<str> = Node::new(LabelHandler::exact("NodeA", "Handler1"));
    head.set_next(Node::new(LabelHandler::exact("NodeB", "Handler2")));
    let mut chain = Chain::from_head(head);
    lines.push(format!("Chain: {chain}"));

    lines.push(String::new());
    lines.push(section("Milestone 2: Dispatching requests", use_colors));
    for request in ["Handler1", "Handler2", "Handler3"] {
        let (outcome, visited) = chain.dispatch_traced(request);
        lines.push(describe(request, &outcome));
        lines.push(format!("  consulted: {}", visited.join(", ")));
    }

    lines.push(String::new());
    lines.push(section("Milestone 3: Re-linking the tail", use_colors));
    if let Some(tail) = chain.node_mut("NodeB") {
        tail.set_next(Node::new(LabelHandler::new(
            "Fallback",
            Matcher::prefix("Handler"),
        )));
    }
    lines.push(format!("Chain: {chain}"));
    lines.push(describe("Handler3", &chain.dispatch("Handler3")));

    lines.push(String::new());
    lines.push(section("Milestone 4: Truncating the chain", use_colors));
    let detached = chain.truncate_after("NodeA");
    lines.push(format!("Chain: {chain}"));
    if let Some(detached) = detached {
        lines.push(format!("Detached: {detached}"));
    }
    lines.push(describe("Handler2", &chain.dispatch("Handler2")));

    lines
}

// =============================================================================
// Dispatch and catalog commands
// =============================================================================

fn dispatch(config: Option<PathBuf>, json: bool, requests: &[String]) -> Result<String> {
    let config = match config {
        Some(path) => ChainConfig::from_file(path)?,
        None => ChainConfig::support_desk(),
    };
    let chain = config.build()?;

    let mut report = DispatchReport::new(chain.to_string());
    for request in requests {
        report.record(request.as_str(), chain.dispatch(request));
    }

    if json {
        report.to_json()
    } else {
        Ok(report.render(DispatchReport::should_use_colors()))
    }
}

fn catalog_text(category: Option<Category>, json: bool) -> Result<String> {
    let categories: Vec<Category> = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    if json {
        let topics: Vec<_> = categories
            .iter()
            .flat_map(|category| catalog::by_category(*category))
            .collect();
        return Ok(serde_json::to_string_pretty(&topics)?);
    }

    let use_colors = DispatchReport::should_use_colors();
    let mut output = String::new();
    for category in categories {
        output.push_str(&format!("{}\n", section(category.title(), use_colors)));
        for topic in catalog::by_category(category) {
            let marker = if topic.runnable { " [runnable]" } else { "" };
            output.push_str(&format!("  {}{marker}: {}\n", topic.name, topic.intent));
        }
    }
    Ok(output)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Demo => {
            for line in demo_lines(DispatchReport::should_use_colors()) {
                println!("{line}");
            }
        }
        Command::Dispatch {
            config,
            json,
            requests,
        } => print!("{}", dispatch(config, json, &requests)?),
        Command::Catalog { category, json } => print!("{}", catalog_text(category, json)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed command line");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
