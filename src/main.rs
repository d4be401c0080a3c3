// Command-line entry point for calldrawer.

use anyhow::Result;
use calldrawer::application::GraphSession;
use calldrawer::domain::settings_store::{GraphViewSettingsStore, SledSettingsStore};
use calldrawer::infrastructure::{HttpGraphSource, LogNotifier};
use calldrawer::ports::dot_exporter::DotExporter;
use calldrawer::ports::mermaid_exporter::MermaidExporter;
use calldrawer::ports::GraphExporter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the static-analysis service
    #[arg(long, default_value = "http://localhost:8080/")]
    base_url: Url,

    /// Directory holding the persisted view settings
    #[arg(long, default_value = ".calldrawer")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the method index used for selection
    List,
    /// Fetch the call graph for a root method and export it as a flowchart
    Draw {
        /// Root method id, e.g. "com.example.Foo#bar(int)"
        #[arg(short, long)]
        method: String,

        /// Output file path; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (dot, mermaid)
        #[arg(short, long, default_value = "dot")]
        format: String,
    },
    /// Show or change the persisted view settings
    Config {
        /// Layout direction (TB, BT, LR, RL)
        #[arg(long)]
        rankdir: Option<String>,

        /// Render backend (canvas, svg)
        #[arg(long)]
        render_type: Option<String>,

        /// Flip dependency-type label visibility
        #[arg(long)]
        toggle_dependency_type: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings =
        GraphViewSettingsStore::open(Box::new(SledSettingsStore::new(&cli.state_dir)?));

    match cli.command {
        Command::List => {
            let session = build_session(&cli.base_url)?;
            let items = match session.method_list().await {
                Some(items) => items,
                None => anyhow::bail!("could not load the method list"),
            };
            for item in &items {
                let mark = if item.deprecated { " (deprecated)" } else { "" };
                println!(
                    "{} / {} / {}{}  [{}]",
                    item.group_name, item.sub_group_name, item.name, mark, item.method_id
                );
            }
            log::info!("{} methods listed", items.len());
        }
        Command::Draw {
            method,
            output,
            format,
        } => {
            let session = build_session(&cli.base_url)?;
            let graph = match session.select_root(&method).await? {
                Some(graph) => graph,
                None => anyhow::bail!("no call graph available for {}", method),
            };

            let snapshot = settings.current();
            let rendered = match format.as_str() {
                "dot" => DotExporter.render(&graph, &snapshot),
                "mermaid" => MermaidExporter.render(&graph, &snapshot),
                other => anyhow::bail!("unsupported output format: {}", other),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!(
                        "Graph for {} written to {} (format: {})",
                        method,
                        path.display(),
                        format
                    );
                }
                None => println!("{}", rendered),
            }
        }
        Command::Config {
            rankdir,
            render_type,
            toggle_dependency_type,
        } => {
            if let Some(value) = rankdir {
                settings.set_rankdir(&value)?;
            }
            if let Some(value) = render_type {
                settings.set_render_type(&value)?;
            }
            if toggle_dependency_type {
                settings.toggle_dependency_type()?;
            }
            let current = settings.current();
            println!("showDependencyType: {}", current.show_dependency_type);
            println!("rankdir: {}", current.rankdir);
            println!("renderType: {}", current.render_type);
        }
    }

    Ok(())
}

fn build_session(base_url: &Url) -> Result<GraphSession> {
    let source = Arc::new(HttpGraphSource::new(base_url)?);
    Ok(GraphSession::new(source, Arc::new(LogNotifier)))
}
