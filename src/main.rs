use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tryon_studio::app::App;
use tryon_studio::image::Adjustments;
use tryon_studio::models::{Slot, ValidationOutcome};
use tryon_studio::prompts::{self, DEFAULT_STYLE_ID};

#[derive(Debug, Parser)]
#[command(name = "tryon-studio")]
#[command(about = "Virtual try-on and scene composition with Gemini")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the stored Gemini API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Remember an image for a slot (model, clothing, background).
    Upload {
        #[arg(value_parser = parse_slot_arg)]
        slot: Slot,
        path: PathBuf,
    },
    /// Dress the model in the garment.
    Look {
        #[arg(long, default_value = DEFAULT_STYLE_ID)]
        style: String,
        #[arg(long)]
        model: Option<PathBuf>,
        #[arg(long)]
        clothing: Option<PathBuf>,
        #[arg(long, short, default_value = "look.png")]
        out: PathBuf,
    },
    /// Place a dressed model into the background scene.
    Scene {
        /// Image produced by `look`.
        look: PathBuf,
        #[arg(long, default_value = DEFAULT_STYLE_ID)]
        style: String,
        #[arg(long)]
        background: Option<PathBuf>,
        #[arg(long, short, default_value = "scene.png")]
        out: PathBuf,
    },
    /// Apply a free-text edit to a finished image.
    Refine {
        image: PathBuf,
        instruction: String,
        #[arg(long, short, default_value = "refined.png")]
        out: PathBuf,
    },
    /// Export an image with brightness/contrast/saturation baked in.
    Export {
        image: PathBuf,
        #[arg(long, default_value_t = 100)]
        brightness: u16,
        #[arg(long, default_value_t = 100)]
        contrast: u16,
        #[arg(long, default_value_t = 100)]
        saturation: u16,
    },
    /// List the available style presets.
    Styles,
    /// Forget all saved slot images.
    Reset,
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    /// Validate a key and store it if accepted.
    Set { key: String },
    /// Validate the configured key.
    Check,
    /// Remove the stored key.
    Clear,
}

fn parse_slot_arg(input: &str) -> std::result::Result<Slot, String> {
    input.parse()
}

fn ensure_valid(outcome: ValidationOutcome) -> Result<()> {
    if outcome.valid {
        return Ok(());
    }
    let message = outcome
        .message
        .unwrap_or_else(|| "The API key was rejected.".to_string());
    anyhow::bail!(message)
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Key { action } => match action {
            KeyAction::Set { key } => {
                ensure_valid(app.set_api_key(&key).await?)?;
                info!("API key saved");
            }
            KeyAction::Check => {
                ensure_valid(app.check_api_key().await?)?;
                info!("API key is valid");
            }
            KeyAction::Clear => {
                app.clear_api_key().await?;
                info!("API key removed");
            }
        },
        Command::Upload { slot, path } => {
            app.upload(slot, &path).await?;
        }
        Command::Look {
            style,
            model,
            clothing,
            out,
        } => {
            let data = app
                .generate_look(&style, model.as_deref(), clothing.as_deref())
                .await?;
            app.write_result(&data, &out).await?;
        }
        Command::Scene {
            look,
            style,
            background,
            out,
        } => {
            let data = app
                .create_scene(&style, &look, background.as_deref())
                .await?;
            app.write_result(&data, &out).await?;
        }
        Command::Refine {
            image,
            instruction,
            out,
        } => {
            let data = app.refine(&image, &instruction).await?;
            app.write_result(&data, &out).await?;
        }
        Command::Export {
            image,
            brightness,
            contrast,
            saturation,
        } => {
            let adjustments = Adjustments::new(brightness, contrast, saturation)?;
            let path = app.export(&image, &adjustments).await?;
            println!("{}", path.display());
        }
        Command::Styles => {
            for style in prompts::styles() {
                println!("{:<12} {:<14} {}", style.id, style.name, style.description);
            }
        }
        Command::Reset => app.reset().await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tryon_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match App::new() {
        Ok(app) => match run(&app, args.command).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
