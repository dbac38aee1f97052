//! regions-cli - drive the region graph editor from the command line.
//!
//! Load a hierarchy snapshot, print its seeded layout, replay scripted
//! pointer sessions against it, and apply committed reassignments.

mod logger;
mod store;

use anyhow::{Context, Result};
use api::{
    execute_command, execute_query, Command, EditorSession, GroupInfo, HierarchySource, NodeInfo,
    Query,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use logger::CliLogger;
use org_canvas::{CommitBatch, Editor, EditorConfig};
use org_graph::{Edge, HierarchySnapshot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use store::{apply_batches, read_json, BatchFile, SnapshotFile};

/// Inspect and script the region graph editor
#[derive(Parser)]
#[command(name = "regions-cli")]
#[command(about = "Command-line harness for the region graph editor")]
struct Cli {
    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Editor configuration (JSON); missing fields use defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the seeded graph for a hierarchy snapshot
    Layout {
        /// Hierarchy snapshot (JSON)
        snapshot: PathBuf,
    },

    /// Replay a script of commands and queries against a snapshot
    Replay {
        /// Hierarchy snapshot (JSON)
        snapshot: PathBuf,

        /// JSON array of commands and queries
        script: PathBuf,

        /// Commit pending reassignments to this file when the script ends
        #[arg(long)]
        commit_to: Option<PathBuf>,
    },

    /// Apply committed reassignments to a snapshot
    Commit {
        /// Hierarchy snapshot (JSON)
        snapshot: PathBuf,

        /// Commit batches written by `replay --commit-to`
        batches: PathBuf,

        /// Where to write the updated snapshot (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// One line of a replay script.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Command(Command),
    Query(Query),
}

/// Seeded graph as printed by `layout`.
#[derive(Serialize)]
struct LayoutReport {
    nodes: Vec<NodeInfo>,
    edges: Vec<Edge>,
    groups: Vec<GroupInfo>,
}

impl LayoutReport {
    fn from_editor(editor: &Editor) -> Self {
        let graph = editor.graph();
        Self {
            nodes: graph.nodes.iter().map(NodeInfo::from).collect(),
            edges: graph.edges.clone(),
            groups: graph.groups.iter().map(GroupInfo::from).collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::init(cli.log_level.into(), cli.log_file.as_deref())?;

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Layout { snapshot } => layout(&snapshot, config),
        Commands::Replay {
            snapshot,
            script,
            commit_to,
        } => replay(&snapshot, &script, commit_to, config),
        Commands::Commit {
            snapshot,
            batches,
            output,
        } => commit(&snapshot, &batches, output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let config: EditorConfig = read_json(path).context("Failed to load editor config")?;
    config
        .validate()
        .with_context(|| format!("Invalid editor config in {}", path.display()))?;
    Ok(config)
}

/// Print nodes, edges and group circles as seeded.
fn layout(snapshot: &Path, config: EditorConfig) -> Result<()> {
    let snapshot = SnapshotFile::new(snapshot).load()?;
    let editor = Editor::new(snapshot, config);
    let report = LayoutReport::from_editor(&editor);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Run each script step, printing one JSON result per line.
fn replay(snapshot: &Path, script: &Path, commit_to: Option<PathBuf>, config: EditorConfig) -> Result<()> {
    let steps: Vec<Step> = read_json(script).context("Failed to load replay script")?;
    log::info!("replaying {} step(s) from {}", steps.len(), script.display());

    match commit_to {
        Some(path) => {
            let mut session = EditorSession::open(SnapshotFile::new(snapshot), BatchFile::new(path), config)?;
            run_steps(&mut session.editor, steps)?;
            let report = session.commit()?;
            log::info!(
                "committed {} reassignment(s), {} still pending",
                report.committed,
                report.pending
            );
        }
        None => {
            let snapshot = SnapshotFile::new(snapshot).load()?;
            let mut editor = Editor::new(snapshot, config);
            run_steps(&mut editor, steps)?;
            let pending = editor.intents().len();
            if pending > 0 {
                log::info!("{pending} reassignment(s) left uncommitted");
            }
        }
    }
    Ok(())
}

fn run_steps(editor: &mut Editor, steps: Vec<Step>) -> Result<()> {
    for (i, step) in steps.into_iter().enumerate() {
        let line = match step {
            Step::Command(command) => {
                log::debug!("step {i}: {command:?}");
                let result = execute_command(editor, command);
                if !result.is_success() {
                    log::warn!("step {i} failed: {result:?}");
                }
                serde_json::to_string(&result)?
            }
            Step::Query(query) => serde_json::to_string(&execute_query(editor, query))?,
        };
        for event in editor.take_events() {
            log::trace!("step {i}: {event:?}");
        }
        println!("{line}");
    }
    Ok(())
}

/// Apply batches to a snapshot and write the result.
fn commit(snapshot: &Path, batches: &Path, output: Option<&Path>) -> Result<()> {
    let original: HierarchySnapshot = read_json(snapshot)?;
    let batches: Vec<CommitBatch> = read_json(batches)?;
    let updated = apply_batches(&original, &batches)?;
    let json = serde_json::to_string_pretty(&updated)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote updated snapshot to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
