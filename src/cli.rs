use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "checkreg",
    version,
    about = "Municipal check register extraction and reporting tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a packet PDF and write the requested outputs.
    Extract(ExtractArgs),
    /// Slice the register pages and archive pdf/chunks/csv artifacts.
    Archive(ArchiveArgs),
    /// Re-run parsing from an archived chunks file, without the PDF.
    Reparse(ReparseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Agenda packet PDF containing a check register section.
    pub pdf: PathBuf,

    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[arg(long)]
    pub json: Option<PathBuf>,

    #[arg(long)]
    pub quadtree: Option<PathBuf>,

    /// Also archive the raw row chunks for reproducible reprocessing.
    #[arg(long)]
    pub chunks: Option<PathBuf>,

    /// Capture per-word positions and prefer the geometry-based split.
    #[arg(long, default_value_t = false)]
    pub geometry: bool,

    /// Drop voided rows from the outputs instead of keeping them flagged.
    #[arg(long, default_value_t = false)]
    pub drop_voided: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ArchiveArgs {
    /// Agenda packet PDF containing a check register section.
    pub pdf: PathBuf,

    #[arg(long, default_value = "CheckRegisterArchive")]
    pub archive_dir: PathBuf,

    /// Capture per-word positions and prefer the geometry-based split.
    #[arg(long, default_value_t = false)]
    pub geometry: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReparseArgs {
    /// Chunks JSON produced by `extract --chunks` or `archive`.
    #[arg(long)]
    pub chunks: PathBuf,

    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[arg(long)]
    pub json: Option<PathBuf>,

    #[arg(long)]
    pub quadtree: Option<PathBuf>,

    /// Drop voided rows from the outputs instead of keeping them flagged.
    #[arg(long, default_value_t = false)]
    pub drop_voided: bool,
}
