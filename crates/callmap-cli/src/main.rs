use anyhow::{Context, Result};
use callmap_core::{EntityMapping, GraphEdge, GraphNode};
use callmap_graph::{
    CallIndex, DetailContent, MenuTree, NO_CALLS, NO_DOCUMENTATION, Parameters, build_graph,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_ENTRY: &str = "_main";

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a folder/function mapping", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print node, edge, folder and function counts
    Summary { file: PathBuf },
    /// Print the built graph as `{nodes, edges}` JSON
    Export {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the parsed documentation and calls of one function
    Doc {
        file: PathBuf,
        folder: String,
        function: String,
    },
    /// Print menu labels matching a case-insensitive query
    Search { file: PathBuf, query: String },
    /// Print the call subgraph reachable from an entry function
    Calls {
        file: PathBuf,
        #[arg(long, default_value = DEFAULT_ENTRY)]
        from: String,
    },
}

#[derive(Serialize)]
struct GraphExport<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args.command, &mut out)
}

fn load(file: &Path) -> Result<EntityMapping> {
    let mapping = EntityMapping::from_path(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    tracing::debug!("Loaded {} folder keys from {}", mapping.len(), file.display());
    Ok(mapping)
}

fn run(command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Summary { file } => summary(&load(&file)?, out),
        Command::Export { file, pretty } => export(&load(&file)?, pretty, out),
        Command::Doc {
            file,
            folder,
            function,
        } => doc(&load(&file)?, &folder, &function, out),
        Command::Search { file, query } => search(&load(&file)?, &query, out),
        Command::Calls { file, from } => calls(&load(&file)?, &from, out),
    }
}

fn summary(mapping: &EntityMapping, out: &mut impl Write) -> Result<()> {
    let graph = build_graph(mapping);
    writeln!(out, "roots:           {}", mapping.root_folders().join(", "))?;
    writeln!(out, "folder keys:     {}", mapping.len())?;
    writeln!(out, "records:         {}", mapping.function_record_count())?;
    writeln!(out, "nodes:           {}", graph.node_count())?;
    writeln!(out, "  folders:       {}", graph.folder_count())?;
    writeln!(out, "  functions:     {}", graph.function_count())?;
    writeln!(out, "edges:           {}", graph.edge_count())?;
    writeln!(out, "duplicate edges: {}", graph.duplicate_edge_count())?;
    Ok(())
}

fn export(mapping: &EntityMapping, pretty: bool, out: &mut impl Write) -> Result<()> {
    let graph = build_graph(mapping);
    let export = GraphExport {
        nodes: graph.nodes(),
        edges: graph.edges(),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &export)?;
    } else {
        serde_json::to_writer(&mut *out, &export)?;
    }
    writeln!(out)?;
    Ok(())
}

fn doc(mapping: &EntityMapping, folder: &str, function: &str, out: &mut impl Write) -> Result<()> {
    let record = mapping
        .record(folder, function)
        .with_context(|| format!("No function `{function}` under `{folder}`"))?;
    let content = DetailContent::from_record(function, record);

    writeln!(out, "# {}", content.function_name)?;
    match &content.documentation {
        None => writeln!(out, "{NO_DOCUMENTATION}")?,
        Some(doc) => {
            writeln!(out, "\n## Description\n{}", doc.description)?;
            writeln!(out, "\n## Parameters")?;
            match &doc.parameters {
                Parameters::Listed(items) => {
                    for item in items {
                        writeln!(out, "- {item}")?;
                    }
                }
                Parameters::Missing => writeln!(out, "{}", Parameters::placeholder())?,
            }
            writeln!(out, "\n## Return Value\n{}", doc.return_value)?;
            writeln!(out, "\n## Pseudocode\n{}", doc.pseudocode)?;
        }
    }

    writeln!(out, "\n## Calls")?;
    if content.calls.is_empty() {
        writeln!(out, "{NO_CALLS}")?;
    }
    for call in &content.calls {
        writeln!(out, "- {call}")?;
    }
    Ok(())
}

fn search(mapping: &EntityMapping, query: &str, out: &mut impl Write) -> Result<()> {
    let mut menu = MenuTree::build(mapping);
    menu.apply_filter(query);
    for (_, entry) in menu.iter().filter(|(_, entry)| entry.visible) {
        writeln!(out, "{}{}", "  ".repeat(entry.depth), entry.label)?;
    }
    Ok(())
}

fn calls(mapping: &EntityMapping, entry: &str, out: &mut impl Write) -> Result<()> {
    let index = CallIndex::build(mapping);
    let reachable = index.reachable_from(entry);
    if reachable.is_empty() {
        tracing::info!("`{}` is not a known caller", entry);
    }
    for (caller, callee) in reachable.edges() {
        writeln!(out, "F: {caller} -----> C: {callee}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r###"{
        "src": {
            "_main": {"documentation": "## Description\nEntry point.\n\n## Parameters\nargc\nargv\n", "calls": ["parse", "run", "parse"]},
            "parse": {"calls": ["lex"]}
        },
        "src/util": {
            "run": {"calls": ["log"]},
            "lex": {}
        },
        "tools": {
            "log": {}
        }
    }"###;

    fn mapping() -> EntityMapping {
        EntityMapping::from_json_str(SAMPLE).unwrap()
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let text = output(|out| summary(&mapping(), out));
        assert!(text.contains("roots:           src, tools"), "{text}");
        assert!(text.contains("folder keys:     3"));
        assert!(text.contains("records:         5"));
        assert!(text.contains("nodes:           8"));
        assert!(text.contains("  folders:       3"));
        assert!(text.contains("  functions:     5"));
        assert!(text.contains("edges:           6"));
        assert!(text.contains("duplicate edges: 0"));
    }

    #[test]
    fn test_export_is_nodes_and_edges_json() {
        let text = output(|out| export(&mapping(), false, out));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 8);
        assert_eq!(value["edges"].as_array().unwrap().len(), 6);
        assert_eq!(value["nodes"][0]["id"], "src");
        assert_eq!(value["nodes"][0]["type"], "folder");
    }

    #[test]
    fn test_doc_prints_sections_and_unique_calls() {
        let text = output(|out| doc(&mapping(), "src", "_main", out));
        assert!(text.contains("Entry point."));
        assert!(text.contains("- argc\n- argv"));
        assert!(text.contains("No return value specified."));
        assert_eq!(text.matches("- parse").count(), 1);
    }

    #[test]
    fn test_doc_without_documentation_or_calls() {
        let text = output(|out| doc(&mapping(), "tools", "log", out));
        assert!(text.contains(NO_DOCUMENTATION));
        assert!(text.contains(NO_CALLS));
    }

    #[test]
    fn test_doc_unknown_function_errors() {
        let mut buf = Vec::new();
        assert!(doc(&mapping(), "src", "missing", &mut buf).is_err());
    }

    #[test]
    fn test_search_matches_any_depth() {
        let text = output(|out| search(&mapping(), "UT", out));
        assert_eq!(text.lines().map(str::trim).collect::<Vec<_>>(), vec!["util"]);
    }

    #[test]
    fn test_calls_walks_from_entry() {
        let text = output(|out| calls(&mapping(), "_main", out));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "F: _main -----> C: parse",
                "F: _main -----> C: run",
                "F: parse -----> C: lex",
                "F: run -----> C: log",
            ]
        );
    }

    #[test]
    fn test_calls_unknown_entry_prints_nothing() {
        assert!(output(|out| calls(&mapping(), "nope", out)).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Summary {
            file: dir.path().join("functions.json"),
        };
        let mut buf = Vec::new();
        let err = run(command, &mut buf).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load"));
    }

    #[test]
    fn test_run_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("functions.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let text = output(|out| run(Command::Search { file: path, query: "parse".into() }, out));
        assert_eq!(text.trim(), "parse");
    }
}
