//! rsense binary.
//!
//! Opens one R file in a fresh document manager, runs a single query and
//! prints the result as JSON:
//! - `complete`, `signature` and `hover` print the protocol payload (or `null`)
//! - `parse` prints the tree shape, diagnostics and string/comment index

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lsp_types as lsp;
use rsense_config::Config;
use rsense_intellisense::{DocumentId, FunctionIndex, SymbolIndex};
use rsense_session::DocumentManager;
use rsense_syntax::SyntaxTree;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "rsense")]
#[command(about = "R completion, signature help and hover from the command line")]
struct Cli {
	#[command(subcommand)]
	command: Command,

	/// Configuration file (KDL)
	#[arg(long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Function signature index (JSON)
	#[arg(long, value_name = "PATH", global = true)]
	index: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Completion items at a position
	Complete(Query),
	/// Signature help for the call around a position
	Signature(Query),
	/// Hover text for the identifier at a position
	Hover(Query),
	/// Syntax tree of the whole file
	Parse {
		/// R source file
		file: PathBuf,
	},
}

#[derive(Args, Debug)]
struct Query {
	/// R source file
	file: PathBuf,

	/// Zero-based line
	#[arg(long, default_value_t = 0)]
	line: u32,

	/// Zero-based column in the configured position encoding
	#[arg(long, default_value_t = 0)]
	column: u32,
}

impl Query {
	fn position(&self) -> lsp::Position {
		lsp::Position::new(self.line, self.column)
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = Config::load_or_default(cli.config.as_deref()).context("loading configuration")?;
	for warning in &config.warnings {
		warn!(%warning, "config.warning");
	}
	let index = load_index(cli.index.as_deref())?;
	let manager = DocumentManager::new(index, &config);
	let cancel = CancellationToken::new();

	let output = match &cli.command {
		Command::Complete(query) => {
			let id = open(&manager, &query.file)?;
			serde_json::to_value(manager.completions(&id, query.position(), &cancel).await?)?
		}
		Command::Signature(query) => {
			let id = open(&manager, &query.file)?;
			serde_json::to_value(manager.signature_help(&id, query.position(), &cancel).await?)?
		}
		Command::Hover(query) => {
			let id = open(&manager, &query.file)?;
			serde_json::to_value(manager.hover(&id, query.position(), &cancel).await?)?
		}
		Command::Parse { file } => {
			let id = open(&manager, file)?;
			let tree = manager.session(&id)?.tree()?;
			tree_json(&tree)
		}
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}

fn load_index(path: Option<&Path>) -> anyhow::Result<Arc<dyn FunctionIndex>> {
	let index = match path {
		Some(path) => SymbolIndex::load_json_file(path).with_context(|| format!("loading index {}", path.display()))?,
		None => SymbolIndex::new(),
	};
	info!(functions = index.len(), "index ready");
	Ok(Arc::new(index))
}

fn open(manager: &DocumentManager, path: &Path) -> anyhow::Result<DocumentId> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	let id = DocumentId::new(path.display().to_string());
	manager.open(id.clone(), &text)?;
	debug!(document = %id, "cli.opened");
	Ok(id)
}

fn tree_json(tree: &SyntaxTree) -> Value {
	let nodes: Vec<Value> = tree
		.preorder()
		.map(|node| {
			json!({
				"kind": format!("{:?}", node.kind()),
				"start": node.range().start(),
				"end": node.range().end(),
			})
		})
		.collect();
	let diagnostics: Vec<Value> = tree
		.diagnostics()
		.iter()
		.map(|d| json!({ "message": d.message, "start": d.range.start(), "end": d.range.end() }))
		.collect();
	let strings: Vec<Value> = tree
		.strings()
		.iter()
		.map(|s| json!({ "start": s.range.start(), "end": s.range.end(), "terminated": s.terminated }))
		.collect();
	let comments: Vec<Value> = tree
		.comments()
		.iter()
		.map(|c| json!({ "start": c.range.start(), "end": c.range.end() }))
		.collect();

	json!({
		"version": tree.version(),
		"nodes": nodes,
		"diagnostics": diagnostics,
		"strings": strings,
		"comments": comments,
	})
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	// RSENSE_LOG_DIR keeps stdout clean for the JSON output.
	if let Some(log_dir) = std::env::var("RSENSE_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("rsense.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
				if verbose {
					EnvFilter::new("rsense=trace,debug")
				} else {
					EnvFilter::new("rsense=debug,info")
				}
			});

			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(if verbose { "debug" } else { "warn" })
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
