use clap::Parser;
use skel2vec::output::{self, Format};
use skel2vec::{LoadConfig, ThresholdMethod, VectorizeConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skel2vec", about = "Binary skeleton image to vector polylines")]
struct Cli {
    /// Input skeleton image (PNG, JPEG, BMP)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Output format (guessed from the output extension if omitted)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// JSON preset with vectorization parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Douglas-Peucker tolerance in pixels (0 = keep every point)
    #[arg(long)]
    smoothness: Option<f64>,

    /// Turning angle, in degrees, above which a loop pixel is a corner.
    /// Only used on closed loops with no endpoint or branch.
    #[arg(long)]
    corner_sensitivity: Option<f64>,

    /// Minimum loop pixels between two corners
    #[arg(long)]
    corner_separation: Option<usize>,

    /// Node expansions allowed per edge in the exact path search
    #[arg(long)]
    search_steps: Option<u64>,

    /// Wall-clock limit per edge for the exact path search, in milliseconds
    #[arg(long)]
    search_millis: Option<u64>,

    /// Fixed brightness threshold (0-255). Brighter pixels are foreground.
    #[arg(long, conflicts_with = "otsu")]
    threshold: Option<u8>,

    /// Pick the threshold with Otsu's method
    #[arg(long)]
    otsu: bool,

    /// Treat dark pixels as foreground
    #[arg(long)]
    invert: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => VectorizeConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => VectorizeConfig::default(),
    };
    if let Some(s) = cli.smoothness {
        config.smoothness = s;
    }
    if let Some(deg) = cli.corner_sensitivity {
        config.corner.sensitivity = deg.to_radians();
    }
    if let Some(sep) = cli.corner_separation {
        config.corner.min_separation = sep;
    }
    if let Some(steps) = cli.search_steps {
        config.search.max_steps = steps;
    }
    if let Some(ms) = cli.search_millis {
        config.search.max_millis = ms;
    }
    config.validate()?;

    let load = LoadConfig {
        threshold: match (cli.threshold, cli.otsu) {
            (Some(t), _) => ThresholdMethod::Fixed(t),
            (None, true) => ThresholdMethod::Otsu,
            (None, false) => LoadConfig::default().threshold,
        },
        invert: cli.invert,
    };
    let format = cli.format.unwrap_or_else(|| Format::from_path(&cli.output));

    // Header
    eprintln!();
    eprintln!("  skel2vec \u{00b7} {}", cli.input.display());
    eprintln!();

    // Pipeline (lib logs step-by-step progress to stderr)
    let result = skel2vec::trace(&cli.input, &load, &config)?;
    output::write(&result, format, &cli.output)?;

    // Footer
    eprintln!();
    eprintln!("  \u{2713} {}", cli.output.display());

    Ok(())
}

/// Progress goes to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
