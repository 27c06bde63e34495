//! sheetdigest CLI - workbook-to-JSON extraction tool

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetdigest::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetdigest")]
#[command(
    author,
    version,
    about = "Extract structured, retrieval-ready JSON from Excel workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook to the full JSON document
    Convert {
        /// Input workbook file (xlsx, xlsm)
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        switches: ExtractSwitches,
    },

    /// Emit the document's chunks as NDJSON, one chunk per line
    Chunks {
        /// Input workbook file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        switches: ExtractSwitches,
    },

    /// Show a summary of a workbook's extractable content
    Info {
        /// Input workbook file
        input: PathBuf,
    },
}

#[derive(Args)]
struct ExtractSwitches {
    /// Skip formula text and dependency extraction
    #[arg(long)]
    no_formulas: bool,

    /// Skip the per-sheet cells map
    #[arg(long)]
    no_cells: bool,

    /// Skip hyperlinks and comments
    #[arg(long)]
    no_comments: bool,

    /// Skip the named-ranges table
    #[arg(long)]
    no_named_ranges: bool,

    /// Skip declared table harvesting
    #[arg(long)]
    no_tables: bool,

    /// Skip text section detection
    #[arg(long)]
    no_sections: bool,

    /// Maximum cell addresses listed per chunk
    #[arg(long, default_value_t = sheetdigest::core::DEFAULT_CHUNK_MAX_CELLS)]
    chunk_max_cells: usize,
}

impl ExtractSwitches {
    fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            include_formulas: !self.no_formulas,
            include_cells: !self.no_cells,
            include_comments: !self.no_comments,
            include_named_ranges: !self.no_named_ranges,
            include_excel_tables: !self.no_tables,
            include_inferred_sections: !self.no_sections,
            chunk_max_cells: self.chunk_max_cells,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            compact,
            switches,
        } => convert(&input, output.as_deref(), compact, &switches.to_options()),
        Commands::Chunks {
            input,
            output,
            switches,
        } => chunks(&input, output.as_deref(), &switches.to_options()),
        Commands::Info { input } => show_info(&input),
    }
}

fn load_document(input: &Path, opts: &ExtractOptions) -> Result<Document> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let title = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    extract_workbook(&bytes, &title, opts)
        .with_context(|| format!("Failed to convert '{}'", input.display()))
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
    } else {
        io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn convert(input: &Path, output: Option<&Path>, compact: bool, opts: &ExtractOptions) -> Result<()> {
    let document = load_document(input, opts)?;

    let mut json = if compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    }
    .context("Failed to serialize document")?;
    json.push('\n');

    write_output(&json, output)
}

fn chunks(input: &Path, output: Option<&Path>, opts: &ExtractOptions) -> Result<()> {
    let document = load_document(input, opts)?;
    let lines = chunk_lines(&document).context("Failed to serialize chunks")?;

    let mut ndjson = lines.join("\n");
    if !ndjson.is_empty() {
        ndjson.push('\n');
    }
    write_output(&ndjson, output)
}

fn show_info(input: &Path) -> Result<()> {
    let document = load_document(input, &ExtractOptions::default())?;

    println!("File: {}", document.workbook.title);
    if let Some(created) = &document.workbook.created {
        println!("Created: {}", created);
    }
    if let Some(modified) = &document.workbook.modified {
        println!("Modified: {}", modified);
    }
    println!("Sheets: {}", document.workbook.sheets.len());

    for (name, sheet) in document.sheets.iter() {
        println!();
        println!("  Sheet \"{}\"", name);
        println!("    Used range: {}", sheet.dims);
        println!(
            "    Cells: {}",
            sheet.cells.as_ref().map(|c| c.len()).unwrap_or(0)
        );
        let formula_count = sheet
            .lineage
            .as_ref()
            .map(|l| l.nodes.len())
            .unwrap_or(0);
        println!("    Formulas: {}", formula_count);
        println!("    Tables: {}", sheet.tables.len());
        println!("    Sections: {}", sheet.sections.len());
        println!("    Chunks: {}", sheet.chunks.len());
    }

    if let Some(named_ranges) = &document.named_ranges {
        println!();
        println!("Named ranges: {}", named_ranges.len());
    }

    Ok(())
}
