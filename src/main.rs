use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{error, info, warn};

use yt_slides::config::Config;
use yt_slides::pipeline::Pipeline;

fn cli() -> Command {
    Command::new("yt-slides")
        .version("0.1.0")
        .about("Convert YouTube videos into AI-generated infographic slide decks")
        .arg(
            Arg::new("url")
                .value_name("URL")
                .help("YouTube video URL or bare video ID")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for slides and the run record"),
        )
        .arg(
            Arg::new("aspect-ratio")
                .long("ar")
                .value_name("RATIO")
                .help("Aspect ratio: 16:9, 4:3, 1:1, 9:16"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .value_name("STYLE")
                .help("Style: davinci, magazine, comic, geek, chalkboard, collage, newspaper")
                .default_value("davinci"),
        )
        .arg(
            Arg::new("max-sections")
                .long("max-sections")
                .value_name("NUM")
                .help("Maximum slides in the deck (0 = unlimited)"),
        )
        .arg(
            Arg::new("gemini-key")
                .long("gemini-key")
                .value_name("KEY")
                .help("Gemini API key (overrides GEMINI_API_KEY)"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Show prompts without generating images")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    // Initialize logging; --verbose raises the default filter to debug
    let default_filter = if matches.get_flag("verbose") {
        "yt_slides=debug,info"
    } else {
        "yt_slides=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let url = matches.get_one::<String>("url").expect("url is required");
    let style = matches.get_one::<String>("style").expect("style has a default");
    let dry_run = matches.get_flag("dry-run");

    // Load configuration, then apply CLI overrides
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(dir) = matches.get_one::<String>("output") {
        config.output.base_dir = PathBuf::from(dir);
    }
    if let Some(ratio) = matches.get_one::<String>("aspect-ratio") {
        config.image.aspect_ratio = ratio.clone();
    }
    if let Some(max) = matches.get_one::<String>("max-sections") {
        config.sections.max_sections = max.parse()?;
    }
    if let Some(key) = matches.get_one::<String>("gemini-key") {
        config.api.gemini_api_key = key.clone();
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e);
    }

    info!("🚀 yt-slides starting");
    info!("📂 Output directory: {}", config.output.base_dir.display());
    info!("🎨 Style: {}", style);

    let pipeline = Pipeline::new(config);
    let start_time = std::time::Instant::now();

    match pipeline.run(url, style, dry_run).await {
        Ok(results) => {
            let duration = start_time.elapsed();
            if dry_run {
                info!(
                    "🎉 Dry run complete in {:.1}s, built {} prompts",
                    duration.as_secs_f64(),
                    results.len()
                );
            } else {
                info!(
                    "🎉 Done in {:.1}s, generated {} infographic slides",
                    duration.as_secs_f64(),
                    results.len()
                );
                if let Some(first) = results.first() {
                    if let Some(dir) = first.image_path.parent() {
                        info!("🖼️ Output: {}", dir.display());
                    }
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("❌ Pipeline failed: {:#}", e);
            Err(e)
        }
    }
}
