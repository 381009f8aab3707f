use crate::codec::encode_with;
use crate::config::{load_config, Config};
use crate::session::load;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tsk", version, about = "Check, format and project table sketches")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config JSON file (layout and codec settings)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a sketch and report every error
    Check {
        /// Input file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// Print the canonical text of a sketch
    Fmt {
        /// Input file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// Print the node/edge projection of a sketch as JSON
    Graph {
        /// Input file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
}

impl Command {
    fn input(&self) -> Option<&Path> {
        match self {
            Command::Check { input } | Command::Fmt { input } | Command::Graph { input } => {
                input.as_deref()
            }
        }
    }
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.command.input())?;
    let output = execute(&args.command, &input, &config)?;
    print!("{output}");
    Ok(())
}

fn execute(command: &Command, input: &str, config: &Config) -> Result<String> {
    let (document, graph) = load(input, &config.layout)?;
    let dangling = document.dangling_refs();
    for (idx, r) in &dangling {
        warn!(
            ref_index = *idx,
            source = %r.source.table,
            target = %r.target.table,
            "ref names a table that is not declared"
        );
    }
    let output = match command {
        Command::Check { .. } => {
            let mut out = format!(
                "ok: {} tables, {} refs\n",
                document.tables.len(),
                document.refs.len()
            );
            for (idx, r) in &dangling {
                out.push_str(&format!(
                    "warning: /refs/{idx}: {} -> {} names an undeclared table\n",
                    r.source.table, r.target.table
                ));
            }
            out
        }
        Command::Fmt { .. } => encode_with(&document, &config.codec),
        Command::Graph { .. } => {
            let mut json = serde_json::to_string_pretty(&graph)?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
