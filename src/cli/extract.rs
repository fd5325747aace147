//! Extract command: show the version found in an issue body without
//! contacting GitHub

use crate::extractor::VersionExtractor;
use crate::labels::target_label;
use crate::parser::parse_sections;
use crate::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// File holding the issue body (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Output in JSON format, including the parsed sections
    #[arg(short, long)]
    json: bool,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let body = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read issue body from stdin")?;
            body
        }
    };

    let sections = parse_sections(&body);
    let version = VersionExtractor::new()?.extract(&sections);
    let label = target_label(version.as_deref());

    if args.json {
        let output = serde_json::json!({
            "version": version.as_deref().unwrap_or(""),
            "label": label,
            "sections": sections,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", version.as_deref().unwrap_or(""));
        println!("{label}");
    }

    Ok(())
}
