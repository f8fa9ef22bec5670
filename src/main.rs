use clap::{Parser, Subcommand};
use respix::{config, generate};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "respix")]
#[command(about = "Responsive image derivative generator")]
#[command(long_about = "\
Responsive image derivative generator

Walks a source directory and produces, for every image, the complete set of
resized derivatives a responsive page can request: one file per viewport
tier (mobile/tablet/desktop/wide), pixel density (1x/2x), and format
(original + WebP).

Naming contract:

  assets/
  ├── hero.jpg                 # Source (you provide this)
  ├── hero-mobile.jpg          # ≤480px viewports
  ├── hero-mobile.webp
  ├── hero-mobile@2x.jpg       # ≤480px at 2x density
  ├── hero-mobile@2x.webp
  ├── hero-tablet.jpg          # ≤768px viewports
  ├── ...                      # desktop (≤1024px), wide (>1024px)
  └── respix.toml              # Config (optional)

GIF sources are copied as-is (no resize, no WebP) so animations survive.
Derivatives are resized to fit, never upscaled, and regenerated only when
the source content or settings change.

Run 'respix gen-config' to generate a documented respix.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory containing the images
    #[arg(long, default_value = "assets", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate derivative images for every source in the directory
    Generate {
        /// Regenerate everything, ignoring the build manifest
        #[arg(long)]
        force: bool,
    },
    /// Verify every source has a complete derivative set, without writing
    Check,
    /// Print a stock respix.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { force } => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);

            let gen_config = generate::GenerateConfig {
                quality: respix::imaging::Quality::new(config.images.quality),
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", format_generate_event(&event));
                }
            });
            let summary = generate::generate(&cli.source, &gen_config, force, Some(tx))?;
            printer.join().unwrap();
            println!("Done: {summary}");
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let missing = check_sources(&cli.source)?;
            if !missing.is_empty() {
                for name in &missing {
                    eprintln!("  missing: {name}");
                }
                return Err(format!(
                    "{} derivative(s) missing — run 'respix generate'",
                    missing.len()
                )
                .into());
            }
            println!("==> All derivative sets are complete");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Derivative files that should exist but don't, across all sources.
fn check_sources(source: &PathBuf) -> Result<Vec<String>, generate::GenerateError> {
    let sources = generate::discover_sources(source)?;
    println!("    {} source image(s)", sources.len());

    let mut missing = Vec::new();
    for img in &sources {
        for name in generate::planned_derivative_names(&img.base, &img.ext) {
            if !source.join(&name).exists() {
                missing.push(name);
            }
        }
    }
    Ok(missing)
}

fn format_generate_event(event: &generate::GenerateEvent) -> String {
    match event {
        generate::GenerateEvent::Processed {
            source,
            derivatives,
        } => format!("  {source} -> {derivatives} derivative(s)"),
        generate::GenerateEvent::Skipped { source } => format!("  {source} (unchanged)"),
    }
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
