use clap::{Parser, Subcommand};
use cli::RecognitionConfig;
use color_eyre::eyre::{Result, eyre};
use signature::{
    DigitRecognizer, Recognition, SignatureError, StageRecorder,
    algorithms::SignatureReader,
    io::{ColorSettings, SamplingLinePlotter, load_image, render},
};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the digit in an image
    Identify {
        /// Path to the input image
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Compute the signature of an image and save it as PNG
    Signature {
        /// Path to the input image
        #[arg(short, long)]
        image: PathBuf,
        /// Path of the signature image to write
        #[arg(short, long)]
        output: PathBuf,
        /// Number of sampling lines (overrides the configuration)
        #[arg(long)]
        sampling_rate: Option<u32>,
        /// Also write the skeleton with its sampling lines drawn in
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
    /// Identify several images concurrently
    Batch {
        /// Paths to the input images
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration
    InitConfig {
        /// Path to save the configuration (.toml)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Identify { image } => {
            let config = load_config(cli.config.as_deref())?;
            identify(&config, image).await?;
        }
        Commands::Signature {
            image,
            output,
            sampling_rate,
            overlay,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(rate) = sampling_rate {
                config.signature_sampling_rate = *rate;
            }
            write_signature(&config, image, output, overlay.as_deref()).await?;
        }
        Commands::Batch { images, json } => {
            let config = load_config(cli.config.as_deref())?;
            batch(&config, images, *json).await?;
        }
        Commands::InitConfig { output } => {
            RecognitionConfig::default().to_toml_file(output)?;
            info!("Wrote default configuration to {:?}", output);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&RecognitionConfig::schema())?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RecognitionConfig> {
    let config = match path {
        Some(path) => RecognitionConfig::from_file(path)?,
        None => RecognitionConfig::default(),
    };
    config.validate()?;
    info!(
        "Using {} sampling lines, templates from {:?}",
        config.signature_sampling_rate, config.templates_dir
    );
    Ok(config)
}

fn image_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

async fn identify(config: &RecognitionConfig, image_path: &Path) -> Result<()> {
    let recognizer = config.build_recognizer()?;
    let writer = config.debug_writer(&image_stem(image_path))?;
    let raw = load_image(image_path)?;

    let recognition = tokio::task::spawn_blocking(move || match writer {
        Some(mut writer) => {
            let result = recognizer.identify_observed(&raw, &mut writer);
            info!("Processed images written to {:?}", writer.dir());
            result
        }
        None => recognizer.identify(&raw),
    })
    .await??;

    println!("{}", recognition.label);
    Ok(())
}

async fn write_signature(
    config: &RecognitionConfig,
    image_path: &Path,
    output: &Path,
    overlay: Option<&Path>,
) -> Result<()> {
    let pipeline = config.build_pipeline()?;
    let sampling_rate = pipeline.sampling_rate();
    let raw = load_image(image_path)?;

    let (processed, recorder) = tokio::task::spawn_blocking(move || {
        let mut recorder = StageRecorder::default();
        let processed = pipeline.process_observed(&raw, &mut recorder)?;
        Ok::<_, SignatureError>((processed, recorder))
    })
    .await??;

    render(&processed.image, &ColorSettings::default()).save(output)?;
    info!(
        "Signature with {} hits written to {:?}",
        processed.signature.hit_count(),
        output
    );

    if let Some(overlay) = overlay {
        let skeleton = recorder
            .stages()
            .iter()
            .rev()
            .find(|(name, _)| name.starts_with("thinned_itr"))
            .map(|(_, image)| image)
            .ok_or_else(|| eyre!("Pipeline produced no thinned image"))?;
        let lines = SignatureReader::new(sampling_rate)?.sampling_lines(skeleton);
        SamplingLinePlotter::default().plot(skeleton, &lines).save(overlay)?;
        info!("Sampling lines written to {:?}", overlay);
    }

    println!("{}", processed.signature.to_json()?);
    Ok(())
}

async fn batch(config: &RecognitionConfig, images: &[PathBuf], json: bool) -> Result<()> {
    let recognizer = config.build_recognizer()?;
    let mut tasks = JoinSet::new();

    for (index, path) in images.iter().enumerate() {
        let recognizer: DigitRecognizer = recognizer.clone();
        let path = path.clone();
        tasks.spawn_blocking(move || {
            let result = recognizer.identify_file(&path);
            (index, path, result)
        });
    }

    let mut results: Vec<(usize, PathBuf, signature::Result<Recognition>)> = Vec::with_capacity(images.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _, _)| *index);

    let mut failures = 0;
    for (_, path, result) in results {
        match result {
            Ok(recognition) if json => {
                let line = serde_json::json!({ "path": path, "recognition": recognition });
                println!("{line}");
            }
            Ok(recognition) => println!("{}\t{}", path.display(), recognition.label),
            Err(e) => {
                failures += 1;
                error!("Failed to identify {:?}: {}", path, e);
            }
        }
    }

    if failures > 0 {
        return Err(eyre!("{} of {} images could not be identified", failures, images.len()));
    }
    info!("✅ Identified {} images", images.len());
    Ok(())
}
