//! Print the OpenAPI document as JSON, or write it to `--output`.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use marketplace_api::ApiDoc;
use utoipa::OpenApi;

/// Export the marketplace API OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", version, about)]
struct Args {
    /// Write the document here instead of standard output.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(io::Error::other)?;
    match args.output {
        Some(path) => fs::write(path, format!("{json}\n")),
        None => writeln!(io::stdout().lock(), "{json}"),
    }
}
