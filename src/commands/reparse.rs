use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ReparseArgs;
use crate::outputs::read_chunks;
use crate::register::{RegisterParser, RegisterPatterns};

use super::{log_stats, write_entry_outputs};

pub fn run(args: ReparseArgs) -> Result<()> {
    let patterns = RegisterPatterns::new()?;
    let chunks = read_chunks(&args.chunks)?;
    info!(
        count = chunks.len(),
        path = %args.chunks.display(),
        "loaded archived chunks"
    );

    let parser = RegisterParser::new(&patterns)?;
    let mut entries = parser.parse_chunks(&chunks);

    if entries.is_empty() {
        warn!("archived chunks parsed to zero entries");
    }

    if args.drop_voided {
        entries.retain(|entry| !entry.voided);
    }

    write_entry_outputs(
        &entries,
        args.csv.as_deref(),
        args.json.as_deref(),
        args.quadtree.as_deref(),
    )?;
    log_stats(&entries);

    Ok(())
}
