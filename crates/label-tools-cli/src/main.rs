mod logger;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use label_sheet::layout::sheet_geometry;
use label_sheet::{
    Color, ComposeError, ComposeOptions, OutputSummary, SlotIndex, build_template_with,
    calculate_statistics, compose_documents, compose_with, decode_assignments, encode_page,
    encode_png, generate_preview, load_multiple_documents, save_document,
};
use logger::StderrLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lblt", about = "Four-up label sheet tools", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place up to four labels onto an A4 sheet
    Compose {
        /// Input label file(s), PDF or image - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Slot (1-4) for each input, in input order [default: 1, 2, 3, 4, 1, ...]
        #[arg(short, long, num_args = 1..)]
        slot: Vec<usize>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,

        /// Also write a PNG preview of the sheet
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Preview width in pixels
        #[arg(long, default_value_t = label_sheet::DEFAULT_PREVIEW_WIDTH)]
        preview_width: u32,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Write the blank template (PDF, or PNG for a .png output)
    Template {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// Print the sheet geometry in pixels
    Layout {
        #[command(flatten)]
        sheet: SheetArgs,
    },
}

#[derive(clap::Args)]
struct SheetArgs {
    /// Resolution in dots per inch, 1-1200 [default: 300]
    #[arg(long)]
    dpi: Option<u32>,

    /// Background color as hex, e.g. ffffff [default: ffffff]
    #[arg(long, value_parser = parse_color)]
    background: Option<Color>,

    /// JSON options file; --dpi and --background override it
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SheetArgs {
    async fn resolve(&self) -> Result<ComposeOptions> {
        let mut options = match &self.config {
            Some(path) => ComposeOptions::load(path).await?,
            None => ComposeOptions::default(),
        };
        if let Some(dpi) = self.dpi {
            options.dpi = dpi;
        }
        if let Some(background) = self.background {
            options.background = background;
        }
        options.validate()?;
        Ok(options)
    }
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    s.parse().map_err(|e: ComposeError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::Compose {
            input,
            slot,
            output,
            sheet,
            preview,
            preview_width,
            stats_only,
        } => {
            let options = sheet.resolve().await?;

            let slots: Vec<usize> = if slot.is_empty() {
                (0..input.len())
                    .map(|i| SlotIndex::default_for(i).get())
                    .collect()
            } else if slot.len() != input.len() {
                bail!(
                    "Got {} --slot value(s) for {} input(s); give one per input or none",
                    slot.len(),
                    input.len()
                );
            } else {
                slot
            };

            // Calculate and show statistics
            let stats = calculate_statistics(&slots)?;
            println!("Composition Statistics:");
            println!("  Labels: {}", stats.labels);
            for (path, slot) in input.iter().zip(&slots) {
                println!("    {} → slot {}", path.display(), slot);
            }
            println!("  Occupied slots: {}", join_slots(&stats.occupied_slots));
            println!("  Empty slots: {}", join_slots(&stats.empty_slots));
            if !stats.overwritten_slots.is_empty() {
                println!(
                    "  Overwritten slots: {} (last label wins)",
                    join_slots(&stats.overwritten_slots)
                );
            }

            if stats_only {
                return Ok(());
            }

            let documents = load_multiple_documents(&input).await?;
            let inputs: Vec<(Vec<u8>, usize)> = documents.into_iter().zip(slots).collect();

            let dpi = options.dpi;
            let (pdf, preview_png) = match &preview {
                None => (compose_documents(inputs, &options).await?, None),
                Some(_) => {
                    let (pdf, png) = tokio::task::spawn_blocking(move || {
                        render_with_preview(&inputs, &options, preview_width)
                    })
                    .await??;
                    (pdf, Some(png))
                }
            };

            save_document(&pdf, &output).await?;
            println!("{}", OutputSummary::new(pdf.len(), dpi));
            println!("Composed → {}", output.display());

            if let (Some(path), Some(png)) = (preview, preview_png) {
                save_document(&png, &path).await?;
                println!("Preview → {}", path.display());
            }
        }

        Commands::Template { output, sheet } => {
            let options = sheet.resolve().await?;
            let template = build_template_with(&options.layout, options.dpi, options.background);

            let bytes = if has_extension(&output, "png") {
                encode_png(&template.canvas)?
            } else {
                encode_page(&template.canvas, options.dpi)?
            };
            save_document(&bytes, &output).await?;
            println!("Template → {}", output.display());
        }

        Commands::Layout { sheet } => {
            let options = sheet.resolve().await?;
            let geometry = sheet_geometry(&options.layout, options.dpi);

            println!("Sheet Layout at {} DPI:", geometry.dpi);
            println!(
                "  Page: {}x{} px",
                geometry.page_width, geometry.page_height
            );
            println!(
                "  Slot: {}x{} px",
                geometry.slot_width, geometry.slot_height
            );
            println!("  Margins: {}x{} px", geometry.margin_x, geometry.margin_y);
            println!("  Gaps: {}x{} px", geometry.gap_x, geometry.gap_y);
            for slot in SlotIndex::ALL {
                let (x, y) = geometry.slot_origin(slot);
                println!("  Slot {} ({}): ({}, {})", slot, slot.name(), x, y);
            }

            let (overflow_x, overflow_y) = geometry.overflow();
            if overflow_x > 0 || overflow_y > 0 {
                println!(
                    "  Overflow: {} px right, {} px below the page",
                    overflow_x, overflow_y
                );
            }
        }
    }

    Ok(())
}

/// Decode, compose and encode, keeping the canvas for a PNG preview
fn render_with_preview(
    inputs: &[(Vec<u8>, usize)],
    options: &ComposeOptions,
    preview_width: u32,
) -> label_sheet::Result<(Vec<u8>, Vec<u8>)> {
    let assignments = decode_assignments(inputs, options.dpi)?;
    let canvas = compose_with(options, &assignments)?;
    let pdf = encode_page(&canvas, options.dpi)?;
    let png = encode_png(&generate_preview(&canvas, preview_width))?;

    Ok((pdf, png))
}

fn join_slots(slots: &[SlotIndex]) -> String {
    if slots.is_empty() {
        return "none".to_string();
    }
    slots
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
