//! CLI binary for pdf2scorm.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PackagingConfig` and writes the archive.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2scorm::{
    inspect, package_to_file, PackagingConfig, PackagingProgressCallback, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif]. Pages may complete out-of-order because
/// compression is concurrent.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of pages that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_packaging_start` (called once the page count is known).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_packaging_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Packaging");
    }
}

impl PackagingProgressCallback for CliProgressCallback {
    fn on_packaging_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Packaging {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, jpeg_bytes: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{jpeg_bytes:>7} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_packaging_complete(&self, total_pages: usize, archive_bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages packaged  {}",
            green("✔"),
            bold(&total_pages.to_string()),
            dim(&format!("({archive_bytes} bytes archive)")),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic packaging (writes scorm_package.zip)
  pdf2scorm handbook.pdf

  # Name the output archive
  pdf2scorm handbook.pdf -o induction.zip

  # Course title shown by the LMS
  pdf2scorm --title "Safety Induction 2026" handbook.pdf

  # Smaller package: lower DPI and quality
  pdf2scorm --dpi 96 --quality 40 slides.pdf

  # Package from a URL
  pdf2scorm https://example.com/manual.pdf -o manual.zip

  # Inspect PDF metadata without packaging
  pdf2scorm --inspect-only handbook.pdf

  # Reproducible archive bytes (fixed identifier)
  pdf2scorm --package-id build-2026-08 handbook.pdf

THE GENERATED PACKAGE:
  imsmanifest.xml   SCORM 1.2 manifest referencing every page image
  index.html        paginated viewer (restores the learner's last page)
  scorm.js          runtime bridge: bookmarking + completion via the LMS API
  page1.jpg …       one JPEG per PDF page, in reading order

  Upload the zip to any SCORM 1.2 LMS (Moodle, SCORM Cloud, Litmos, …).
  Opened standalone in a browser, the viewer still works — the bridge
  degrades to no-ops when no LMS runtime is present.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium — overrides the default
                    lookup (working directory, then system loader paths).
"#;

/// Package PDF files and URLs as SCORM 1.2 content packages.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2scorm",
    version,
    about = "Package PDF files and URLs as SCORM 1.2 content packages",
    long_about = "Convert a PDF document (local file or URL) into a SCORM 1.2 content package: \
page images, manifest, viewer, and runtime bridge in a single uploadable zip.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the archive to this file.
    #[arg(short, long, env = "PDF2SCORM_OUTPUT", default_value = "scorm_package.zip")]
    output: PathBuf,

    /// Rendering DPI (72–400).
    #[arg(long, env = "PDF2SCORM_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// JPEG quality for page images (1–100).
    #[arg(short, long, env = "PDF2SCORM_QUALITY", default_value_t = 60,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Number of pages compressed concurrently.
    #[arg(short, long, env = "PDF2SCORM_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Course title embedded in the manifest and viewer.
    #[arg(short, long, env = "PDF2SCORM_TITLE", default_value = "PDF Content")]
    title: String,

    /// Fixed package identifier (default: random per run).
    #[arg(long, env = "PDF2SCORM_PACKAGE_ID")]
    package_id: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2SCORM_PASSWORD")]
    password: Option<String>,

    /// Print packaging summary and stats as JSON to stdout.
    #[arg(long, env = "PDF2SCORM_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2SCORM_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no packaging.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2SCORM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "PDF2SCORM_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2SCORM_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn PackagingProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run packaging ────────────────────────────────────────────────────
    let stats = package_to_file(&cli.input, &cli.output, &config)
        .await
        .context("Packaging failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            stats.page_count,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   {} image bytes  /  {} archive bytes",
            dim(&stats.image_bytes.to_string()),
            dim(&stats.archive_bytes.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `PackagingConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PackagingConfig> {
    let mut builder = PackagingConfig::builder()
        .dpi(cli.dpi)
        .jpeg_quality(cli.quality)
        .concurrency(cli.concurrency)
        .title(&cli.title)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref id) = cli.package_id {
        builder = builder.package_id(id);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
