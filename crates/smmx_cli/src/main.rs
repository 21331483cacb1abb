//! Command-line entry point.
//!
//! # Responsibility
//! - Map each mind map tool to a subcommand.
//! - Configure logging from flags or the `SMMX_LOG_DIR` environment variable.

use clap::{Args, Parser, Subcommand};
use smmx_api::ToolResponse;
use std::process::ExitCode;

/// Inspect and edit SimpleMind `.smmx` mind maps
#[derive(Parser, Debug)]
#[command(name = "smmx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, default_value = smmx_core::default_log_level())]
    log_level: String,

    /// Absolute directory for log files; logging is off when unset
    #[arg(long, global = true, env = "SMMX_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List .smmx files under a directory
    List {
        /// Directory or single file
        path: String,
    },

    /// Read a mind map as structured JSON, markdown, json or summary
    Read {
        filepath: String,
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show one node with its children
    Node { filepath: String, node_id: String },

    /// Search node text and notes
    Search {
        filepath: String,
        query: String,
        /// Match node text only
        #[arg(long)]
        titles_only: bool,
    },

    /// Export to markdown or json
    Export {
        filepath: String,
        /// markdown or json
        format: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Add a child node
    Add {
        filepath: String,
        parent_id: String,
        text: String,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Update node text and/or notes
    Update {
        filepath: String,
        node_id: String,
        #[arg(long)]
        text: Option<String>,
        /// Pass an empty value to clear notes
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a node and all of its descendants
    Delete {
        filepath: String,
        node_id: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the path from the root to a node
    Path { filepath: String, node_id: String },

    /// List nodes that have no notes
    MissingNotes { filepath: String },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the result here instead of the source file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir {
        let error = smmx_api::init_logging(cli.log_level, log_dir);
        if !error.is_empty() {
            eprintln!("warning: logging disabled: {error}");
        }
    }

    let response = run(cli.command);
    if response.ok {
        println!("{}", response.text);
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", response.text);
        ExitCode::FAILURE
    }
}

fn run(command: Command) -> ToolResponse {
    match command {
        Command::List { path } => smmx_api::list_mindmaps(path),
        Command::Read { filepath, format } => smmx_api::read_mindmap(filepath, format),
        Command::Node { filepath, node_id } => smmx_api::get_node(filepath, node_id),
        Command::Search {
            filepath,
            query,
            titles_only,
        } => smmx_api::search_nodes(filepath, query, Some(!titles_only)),
        Command::Export {
            filepath,
            format,
            output,
        } => smmx_api::export_mindmap(filepath, format, output.output),
        Command::Add {
            filepath,
            parent_id,
            text,
            notes,
            output,
        } => smmx_api::add_node(filepath, parent_id, text, notes, output.output),
        Command::Update {
            filepath,
            node_id,
            text,
            notes,
            output,
        } => smmx_api::update_node(filepath, node_id, text, notes, output.output),
        Command::Delete {
            filepath,
            node_id,
            output,
        } => smmx_api::delete_node(filepath, node_id, output.output),
        Command::Path { filepath, node_id } => smmx_api::get_node_path(filepath, node_id),
        Command::MissingNotes { filepath } => smmx_api::find_nodes_without_notes(filepath),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_keeps_empty_notes_distinct_from_absent() {
        let cli = Cli::parse_from(["smmx", "update", "map.smmx", "3", "--notes", ""]);
        match cli.command {
            Command::Update { notes, text, .. } => {
                assert_eq!(notes.as_deref(), Some(""));
                assert!(text.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
