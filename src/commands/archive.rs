use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ArchiveArgs;
use crate::model::ArchiveManifest;
use crate::outputs::{write_chunks, write_csv};
use crate::pages::{default_register_stem, earliest_year};
use crate::pdf;
use crate::register::{RegisterParser, RegisterPatterns, chunk_lines};
use crate::util::{ensure_directory, now_utc_string, sha256_file, write_json_pretty};

use super::{load_register_pages, log_stats};

pub fn run(args: ArchiveArgs) -> Result<()> {
    let patterns = RegisterPatterns::new()?;

    let loaded = load_register_pages(&patterns, &args.pdf, args.geometry)?;
    let outcome = chunk_lines(&patterns, &loaded.pages);
    let parser = RegisterParser::new(&patterns)?;
    let entries = parser.parse_chunks(&outcome.chunks);

    let stem = default_register_stem(&entries)
        .context("no register entries parsed; cannot derive an archive name")?;
    let year = earliest_year(&entries)
        .context("no register entries parsed; cannot derive an archive year")?;

    let year_dir = args.archive_dir.join(format!("{year:04}"));
    ensure_directory(&year_dir)?;

    let register_pdf = year_dir.join(format!("{stem}-register.pdf"));
    pdf::extract_register_pdf(&args.pdf, loaded.page_start, loaded.page_end, &register_pdf)?;

    let chunks_path = year_dir.join("chunks").join(format!("{stem}.json"));
    let csv_path = year_dir.join("csv").join(format!("{stem}.csv"));
    write_chunks(&outcome.chunks, &chunks_path)?;
    write_csv(&entries, &csv_path)?;

    let manifest = ArchiveManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_pdf: args.pdf.display().to_string(),
        source_sha256: sha256_file(&args.pdf)?,
        page_start: loaded.page_start,
        page_end: loaded.page_end,
        chunk_count: outcome.chunks.len(),
        entry_count: entries.len(),
        register_pdf: register_pdf.display().to_string(),
        chunks_path: chunks_path.display().to_string(),
        csv_path: csv_path.display().to_string(),
    };
    let manifest_path = year_dir.join("manifest").join(format!("{stem}.json"));
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        register_pdf = %register_pdf.display(),
        manifest = %manifest_path.display(),
        "archive updated"
    );
    log_stats(&entries);

    Ok(())
}
