use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::outputs::write_chunks;
use crate::register::{RegisterParser, RegisterPatterns, chunk_lines};

use super::{load_register_pages, log_stats, write_entry_outputs};

pub fn run(args: ExtractArgs) -> Result<()> {
    let patterns = RegisterPatterns::new()?;

    let loaded = load_register_pages(&patterns, &args.pdf, args.geometry)?;
    info!(
        page_start = loaded.page_start,
        page_end = loaded.page_end,
        pdf = %args.pdf.display(),
        "located check register pages"
    );

    let outcome = chunk_lines(&patterns, &loaded.pages);
    if !outcome.saw_section {
        bail!(
            "pages {}-{} of {} contained no register headers",
            loaded.page_start,
            loaded.page_end,
            args.pdf.display()
        );
    }

    let parser = RegisterParser::new(&patterns)?;
    let mut entries = parser.parse_chunks(&outcome.chunks);

    if entries.is_empty() {
        warn!("register section parsed to zero entries");
    }

    if let Some(path) = &args.chunks {
        write_chunks(&outcome.chunks, path)?;
        info!(path = %path.display(), count = outcome.chunks.len(), "wrote raw chunks");
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
