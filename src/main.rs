use clap::{Parser, Subcommand};
use pagehead::social::{SocialImageGenerator, generate_all};
use pagehead::{config, explorer, head::HeadRenderer, output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagehead")]
#[command(about = "Render page <head> markup and social preview images for a static site")]
#[command(long_about = "\
Render page <head> markup and social preview images for a static site

The site build hands over a JSON page manifest; pagehead writes one head
fragment per page and, when enabled, a WebP social preview image per page.

  public/
  ├── index.head.html
  ├── notes/
  │   └── rust.head.html
  └── static/
      ├── explorer.js              # Collapsible explorer panel script
      └── social-images/
          ├── index.webp
          └── notes-rust.webp

Social image source (first available wins):
  Frontmatter: socialImage → image → cover → socialImageUrl
  Fallback:    generated image, or static/og-image.png when generation is
               off or the page has no source file

Run 'pagehead gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Log diagnostics at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that read the page manifest.
#[derive(clap::Args, Clone)]
struct ManifestArgs {
    /// Page manifest (JSON)
    #[arg(long, default_value = "pages.json")]
    manifest: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page head and generate social images
    Render {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Render heads only; skip social image generation
        #[arg(long)]
        no_images: bool,
    },
    /// Validate config and manifest without writing anything
    Check(ManifestArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the explorer panel script
    ExplorerScript,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render {
            manifest,
            no_images,
        } => {
            let site_config = config::load_config(&cli.config_dir)?;
            let manifest = pipeline::load_manifest(&manifest.manifest)?;

            println!("==> Rendering heads \u{2192} {}", cli.output.display());
            let renderer = HeadRenderer::for_config(&site_config, &cli.config_dir, &cli.output);
            let site = pipeline::render_site(&site_config, &manifest, &renderer, &cli.output)?;
            output::print_render_output(&site, &cli.output);

            if no_images || site.jobs.is_empty() {
                return Ok(());
            }

            println!("==> Generating social images");
            init_thread_pool(&site_config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let output_dir = cli.output.clone();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_social_event(&event, &output_dir) {
                        println!("{}", line);
                    }
                }
            });
            let generator = SocialImageGenerator::new();
            let outcomes = generate_all(&generator, &site.jobs, Some(tx));
            printer.join().unwrap();
            println!("{}", output::format_social_summary(&outcomes));
        }
        Command::Check(manifest) => {
            println!("==> Checking {}", cli.config_dir.join("config.toml").display());
            config::load_config(&cli.config_dir)?;
            println!("==> Checking {}", manifest.manifest.display());
            let manifest = pipeline::load_manifest(&manifest.manifest)?;
            let issues = pipeline::check_manifest(&manifest);
            output::print_check_output(&manifest, &issues);
            if issues.is_empty() {
                println!("==> Site is valid");
            } else {
                return Err(format!("{} problem(s) found", issues.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::ExplorerScript => {
            print!("{}", explorer::SCRIPT);
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so they never interleave with command output.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
