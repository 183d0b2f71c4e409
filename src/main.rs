use clap::{Parser, Subcommand};
use row_gal::config::{self, GalleryOptions};
use row_gal::dom::Element;
use row_gal::gallery::{Gallery, GalleryEvent, GalleryStatus};
use row_gal::resolve::FsLoader;
use row_gal::scan::{self, ScanResult};
use row_gal::{output, render};
use std::path::{Path, PathBuf};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "row-gal")]
#[command(about = "Lay out images in aspect-ratio-weighted rows")]
#[command(long_about = "\
Lay out images in aspect-ratio-weighted rows

Every image is measured first; once all sizes are known the images are placed
in rows of a fixed count, each taking a share of the row width proportional to
its aspect ratio. The result is written as a standalone HTML page.

Image sources (pick one):

  --source DIR       every supported image below DIR, in path order
  --manifest FILE    a JSON array of {\"src\", \"srcset\", \"sizes\", \"alt\"}
  --html FILE        the <img> elements of an existing page, in document order

Relative image paths resolve against the directory they were found in.

Settings are layered: built-in defaults, then gallery.toml in that directory,
then --per-row and --gap. Set RUST_LOG=debug for load-by-load tracing.

Run 'row-gal gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where the image list comes from.
#[derive(clap::Args, Clone)]
#[group(required = false, multiple = false)]
struct InputArgs {
    /// Directory of images
    #[arg(long)]
    source: Option<PathBuf>,

    /// HTML file whose <img> elements form the gallery
    #[arg(long)]
    html: Option<PathBuf>,

    /// JSON manifest of image descriptors
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Measure images and write the laid-out gallery as HTML
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output HTML file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "Gallery")]
        title: String,

        /// Images per row (overrides gallery.toml)
        #[arg(long)]
        per_row: Option<usize>,

        /// Gap between cells in pixels (overrides gallery.toml)
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Print the image descriptors found in an HTML file as JSON
    Extract {
        /// HTML file to read
        file: PathBuf,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            input,
            output,
            title,
            per_row,
            gap,
        } => {
            let scanned = read_input(&input)?;
            let gallery_config = config::resolve_config(
                config::stock_defaults_value(),
                config::load_raw_config(&scanned.base)?
                    .into_iter()
                    .chain(cli_overrides(per_row, gap)),
            )?;
            eprintln!(
                "==> Measuring {} from {}",
                plural(scanned.images.len()),
                scanned.base.display()
            );
            let page = render_gallery(scanned, gallery_config, &title)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, page)?;
                    eprintln!("==> Wrote {}", path.display());
                }
                None => print!("{page}"),
            }
        }
        Command::Extract { file } => {
            let scanned = scan::load_html(&file)?;
            println!("{}", serde_json::to_string_pretty(&scanned.images)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn plural(n: usize) -> String {
    if n == 1 {
        "1 image".to_string()
    } else {
        format!("{n} images")
    }
}

/// Read the image list from whichever input flag was given.
///
/// Defaults to the current directory when none is.
fn read_input(input: &InputArgs) -> Result<ScanResult, scan::ScanError> {
    if let Some(path) = &input.manifest {
        scan::load_manifest(path)
    } else if let Some(path) = &input.html {
        scan::load_html(path)
    } else {
        let dir = input.source.as_deref().unwrap_or(Path::new("."));
        scan::scan_directory(dir)
    }
}

/// Command-line settings as a TOML overlay.
fn cli_overrides(per_row: Option<usize>, gap: Option<f64>) -> Option<toml::Value> {
    let mut table = toml::value::Table::new();
    if let Some(n) = per_row {
        table.insert("per_row_count".into(), toml::Value::Integer(n as i64));
    }
    if let Some(px) = gap {
        table.insert("gap".into(), toml::Value::Float(px));
    }
    (!table.is_empty()).then_some(toml::Value::Table(table))
}

/// Run the gallery to completion on a single-threaded runtime and return the page.
fn render_gallery(
    scanned: ScanResult,
    gallery_config: config::GalleryConfig,
    title: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (tx, rx) = std::sync::mpsc::channel::<GalleryEvent>();
    let printer = std::thread::spawn(move || {
        for event in rx {
            if matches!(event, GalleryEvent::Materialized { .. }) {
                continue;
            }
            for line in output::format_event(&event) {
                eprintln!("{}", line);
            }
        }
    });

    let loader = FsLoader::new(scanned.base);
    let container = Element::new("div");
    container.set_attribute("class", "gallery");

    let result = LocalSet::new().block_on(&runtime, async {
        let options = GalleryOptions::new(gallery_config).events(tx);
        let mut gallery = Gallery::new(scanned.images, container.clone(), options, &loader)?;
        gallery.settled().await;
        let layout = output::format_layout(&gallery);
        let status = gallery.status();
        let failures = gallery.failures().len();
        Ok::<_, Box<dyn std::error::Error>>((layout, status, failures))
    });
    // The gallery (and its event sender) is gone, so the printer drains and exits.
    printer.join().map_err(|_| "event printer panicked")?;
    let (layout, status, failures) = result?;

    if let GalleryStatus::Pending { resolved, expected } = status {
        return Err(format!(
            "layout stalled: {resolved}/{expected} images resolved, {failures} failed to load"
        )
        .into());
    }

    for line in layout {
        eprintln!("{}", line);
    }
    Ok(render::render_page(title, &container).into_string())
}
