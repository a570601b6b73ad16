use clap::{Parser, Subcommand};
use inline_imaging::imaging::{OutputFormat, sniff_mime};
use inline_imaging::output::{self, AttachmentSummary, ImageSummary, ProcessSummary};
use inline_imaging::{Pipeline, PipelineSettings, ProcessError, Purpose, RawImage, config};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "inline-imaging")]
#[command(about = "Normalize images for avatars, icons, banners, attachments, emoji and stickers")]
#[command(long_about = "\
Normalize images for avatars, icons, banners, attachments, emoji and stickers

Every image is processed for a purpose, which fixes its target box, crop
policy, quality and GIF handling:

  avatar, space-icon     123x123 crop-to-fill, no GIF
  space-banner           450x253 fit, no GIF
  message-attachment     1200x1200 fit, GIF up to 2MB, 300x300 thumbnail
  emoji                  36x36 crop-to-fill, GIF up to 100KB
  sticker                400x600 fit, GIF up to 750KB

Animated GIFs are passed through untouched. Small images already inside
their box are returned as-is.

Run 'inline-imaging purposes' for the full table and
'inline-imaging gen-config' for a documented settings file.")]
#[command(version = env!("INLINE_IMAGING_VERSION"))]
struct Cli {
    /// Pipeline settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one image for a purpose
    Process {
        /// Target purpose (avatar, space-icon, space-banner, message-attachment, emoji, sticker)
        #[arg(long)]
        purpose: Purpose,
        /// Declared MIME type; detected from the file contents when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Input image
        input: PathBuf,
        /// Write the processed bytes here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Process a message attachment (full size plus optional thumbnail)
    Attachment {
        /// Declared MIME type; detected from the file contents when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Input image
        input: PathBuf,
        /// Write full.* and thumb.* into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List every purpose and its configuration
    Purposes,
    /// Print a stock settings file with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<ProcessError>() {
            Some(process_err) => {
                for line in output::format_error(process_err) {
                    eprintln!("{}", line);
                }
            }
            None => eprintln!("error: {}", err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Process {
            purpose,
            mime,
            input,
            out,
        } => {
            let pipeline = build_pipeline(cli.config.as_deref())?;
            let raw = read_input(&input, mime)?;
            let processed = pipeline.process_image(&raw, purpose)?;

            if let Some(out) = &out {
                std::fs::write(out, &processed.bytes)?;
            }
            if cli.json {
                let summary = ProcessSummary {
                    purpose,
                    input_bytes: raw.size_bytes(),
                    output: ImageSummary::from(&processed),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_processed(purpose, &display_name(&input), &raw, &processed);
            }
        }
        Command::Attachment {
            mime,
            input,
            out_dir,
        } => {
            let pipeline = build_pipeline(cli.config.as_deref())?;
            let raw = read_input(&input, mime)?;
            let result = pipeline.process_attachment_image(&raw)?;

            if let Some(dir) = &out_dir {
                std::fs::create_dir_all(dir)?;
                let full_ext = extension_for(&result.full.mime_type);
                std::fs::write(dir.join(format!("full.{full_ext}")), &result.full.bytes)?;
                if let Some(thumb) = &result.thumbnail {
                    let thumb_ext = extension_for(&thumb.mime_type);
                    std::fs::write(dir.join(format!("thumb.{thumb_ext}")), &thumb.bytes)?;
                }
            }
            if cli.json {
                let summary = AttachmentSummary::new(&raw, &result);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_attachment(&display_name(&input), &raw, &result);
            }
        }
        Command::Purposes => {
            if cli.json {
                let table: Vec<_> = Purpose::ALL
                    .iter()
                    .map(|&p| {
                        serde_json::json!({ "purpose": p, "config": inline_imaging::lookup(p) })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                output::print_purposes();
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_pipeline(config_path: Option<&Path>) -> Result<Pipeline, config::ConfigError> {
    let settings = match config_path {
        Some(path) => PipelineSettings::load(path)?,
        None => PipelineSettings::default(),
    };
    Ok(Pipeline::with_settings(settings))
}

fn read_input(path: &Path, mime: Option<String>) -> Result<RawImage, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let mime_type = match mime {
        Some(mime) => mime,
        None => sniff_mime(&bytes)
            .ok_or_else(|| format!("cannot detect image type of {}; pass --mime", path.display()))?
            .to_string(),
    };
    tracing::debug!(path = %path.display(), %mime_type, size_bytes = bytes.len(), "read input");
    Ok(RawImage::new(bytes, mime_type))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension_for(mime_type: &str) -> &'static str {
    if mime_type.eq_ignore_ascii_case("image/gif") {
        "gif"
    } else {
        OutputFormat::for_mime(mime_type).extension()
    }
}
