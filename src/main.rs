use anyhow::{Context, Result};
use clap::Parser;
use drape::pose::{self, PoseEstimator, StaticPose};
use drape::{CompositingMode, Interpolation, TryOnConfig, TryOnEngine};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo of the person (any decodable format)
    #[arg(short, long)]
    base: String,

    /// Garment image with transparency (e.g. PNG)
    #[arg(short, long)]
    garment: String,

    /// Where to save the result; format follows the extension
    #[arg(short, long)]
    output: String,

    /// Path to a MoveNet single-pose model (ONNX file)
    #[arg(long, required_unless_present = "torso", conflicts_with = "torso")]
    model: Option<String>,

    /// Fixed normalized torso instead of a model:
    /// lsx,lsy,rsx,rsy,rhx,rhy,lhx,lhy
    #[arg(long)]
    torso: Option<String>,

    /// How the garment is combined with the photo
    #[arg(long, value_enum, default_value_t = CompositingMode::HardCutout)]
    compositing: CompositingMode,

    /// Coverage a garment pixel must exceed to be drawn, in [0, 1)
    #[arg(long, default_value_t = 0.0)]
    alpha_threshold: f32,

    /// Garment resampling
    #[arg(long, value_enum, default_value_t = Interpolation::Bilinear)]
    interpolation: Interpolation,

    /// Minimum keypoint score accepted from the pose model
    #[arg(long, default_value_t = 0.3)]
    min_confidence: f32,

    /// Square input resolution of the pose model
    #[arg(long, default_value_t = 192)]
    input_size: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Drape starting");

    let config = TryOnConfig {
        compositing: args.compositing,
        alpha_threshold: args.alpha_threshold,
        interpolation: args.interpolation,
    };
    config.validate().context("Invalid configuration")?;

    let estimator: Box<dyn PoseEstimator> = if let Some(model_path) = &args.model {
        pose::create_default_estimator(model_path, args.input_size, args.min_confidence)
            .context("Failed to load pose model")?
    } else if let Some(torso) = &args.torso {
        tracing::info!("Using fixed torso landmarks");
        Box::new(StaticPose::parse(torso).context("Invalid --torso value")?)
    } else {
        anyhow::bail!("either --model or --torso is required");
    };

    let mut engine = TryOnEngine::new(estimator, config).context("Invalid configuration")?;
    let result = engine.apply(&args.base, &args.garment, &args.output);
    engine.shutdown();

    if let Err(err) = &result {
        tracing::error!("Try-on failed ({:?}): {}", err.kind(), err);
    }
    result.context("Try-on failed")?;

    Ok(())
}
