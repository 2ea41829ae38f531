//! docstitch - client-side include engine for static documentation sites.
//!
//! Loads a docs page, resolves its navigation menu's include entries, and
//! stitches fetched fragments into the page the way the site's original
//! in-browser include script did.

mod dom;
mod fetch;
mod include;
mod menu;
mod parse;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::fetch::{resolve_uri, Fetcher};
use crate::include::{include_into, IncludeOutcome};

#[derive(Parser)]
#[command(
    name = "docstitch",
    version,
    about = "Stitch include fragments into static documentation pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page, run the include for one menu entry, print the result
    View {
        /// URL or local file path of the page
        source: String,

        /// Menu entry to activate: a label or a 1-based index (default: first)
        #[arg(long)]
        entry: Option<String>,

        /// Write the stitched HTML to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Resolve every menu entry's include and report loaded/fallback
    Check {
        /// URL or local file path of the page
        source: String,

        /// Output format: table (default) or json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::View {
            source,
            entry,
            output,
        } => run_view(&source, entry.as_deref(), output.as_deref()),
        Commands::Check { source, format } => run_check(&source, &format),
    };
    if let Err(e) = result {
        eprintln!("docstitch: {}", e);
        std::process::exit(1);
    }
}

/// Fetch and parse the page, returning the document and discovered entries.
fn load_page(source: &str, fetcher: &Fetcher) -> Result<(dom::Document, Vec<menu::MenuEntry>), String> {
    let page = fetcher.fetch(source)?;
    eprintln!("[stitch] fetched {} in {}ms", page.uri, page.elapsed_ms);
    let doc = parse::parse_page(&page.body, &page.uri);
    let (entries, skipped) = menu::discover(&doc);
    for label in &skipped {
        eprintln!("[stitch] menu entry without include target: {}", label);
    }
    Ok((doc, entries))
}

fn run_view(source: &str, entry: Option<&str>, output: Option<&str>) -> Result<(), String> {
    let fetcher = Fetcher::detect();
    let (mut doc, entries) = load_page(source, &fetcher)?;
    if entries.is_empty() {
        return Err(format!("no include entries found in {}", source));
    }

    let chosen = match entry {
        Some(wanted) => select_entry(&entries, wanted)
            .ok_or_else(|| format!("no menu entry matching '{}'", wanted))?,
        None => &entries[0],
    };

    let uri = resolve_uri(&doc.base_uri, &chosen.uri);
    let outcome = include_into(&mut doc, &chosen.target_id, &uri, chosen.node, &fetcher)?;
    if outcome == IncludeOutcome::Fallback {
        eprintln!("[stitch] {} unreachable, injected fallback", uri);
    }

    let html = doc.to_html();
    match output {
        Some(path) => std::fs::write(path, html)
            .map_err(|e| format!("write error: {}: {}", path, e))?,
        None => println!("{}", html),
    }
    Ok(())
}

/// Match an entry by exact label (case-insensitive) or 1-based index.
fn select_entry<'a>(entries: &'a [menu::MenuEntry], wanted: &str) -> Option<&'a menu::MenuEntry> {
    if let Ok(idx) = wanted.parse::<usize>() {
        if idx >= 1 && idx <= entries.len() {
            return Some(&entries[idx - 1]);
        }
    }
    entries.iter().find(|e| e.label.eq_ignore_ascii_case(wanted))
}

#[derive(Serialize)]
struct CheckRow {
    label: String,
    target_id: String,
    uri: String,
    outcome: String,
}

fn run_check(source: &str, format: &str) -> Result<(), String> {
    let fetcher = Fetcher::detect();
    let (doc, entries) = load_page(source, &fetcher)?;

    let mut rows = Vec::new();
    for entry in &entries {
        let uri = resolve_uri(&doc.base_uri, &entry.uri);
        // Each entry is checked against a scratch copy; check never mutates
        // the loaded page.
        let mut scratch = doc.clone();
        let outcome = include_into(&mut scratch, &entry.target_id, &uri, entry.node, &fetcher)?;
        rows.push(CheckRow {
            label: entry.label.clone(),
            target_id: entry.target_id.clone(),
            uri,
            outcome: match outcome {
                IncludeOutcome::Loaded => "loaded".to_string(),
                IncludeOutcome::Fallback => "fallback".to_string(),
            },
        });
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| format!("json error: {}", e))?;
            println!("{}", json);
        }
        "table" => print_table(&rows),
        other => return Err(format!("unknown format: {}", other)),
    }

    if rows.iter().any(|r| r.outcome == "fallback") {
        std::process::exit(2);
    }
    Ok(())
}

fn print_table(rows: &[CheckRow]) {
    let label_w = rows.iter().map(|r| r.label.len()).max().unwrap_or(5).max(5);
    let uri_w = rows.iter().map(|r| r.uri.len()).max().unwrap_or(3).max(3);
    println!("{:<label_w$}  {:<uri_w$}  OUTCOME", "ENTRY", "URI");
    for row in rows {
        println!("{:<label_w$}  {:<uri_w$}  {}", row.label, row.uri, row.outcome);
    }
}
