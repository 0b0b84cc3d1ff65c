//! Input and output streams. `-` or an absent path means stdin/stdout.

use crate::Result;

use anyhow::Context;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn is_std(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p == Path::new("-"))
}

/// Human-readable name for diagnostics.
pub fn display_name(path: Option<&Path>, std_name: &str) -> String {
    match path {
        Some(p) if !is_std(path) => p.display().to_string(),
        _ => std_name.to_string(),
    }
}

pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if !is_std(path) => {
            let file = File::open(p).with_context(|| format!("open build log {}", p.display()))?;
            tracing::debug!(path = %p.display(), "reading build log");
            Ok(Box::new(BufReader::new(file)))
        }
        _ => {
            tracing::debug!("reading build log from stdin");
            Ok(Box::new(io::stdin().lock()))
        }
    }
}

/// The file is created or truncated.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_std(path) => {
            let file =
                File::create(p).with_context(|| format!("create report {}", p.display()))?;
            tracing::debug!(path = %p.display(), "writing report");
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
