mod args;
mod compose;
mod config;
mod error;
mod font;
mod layout;
mod payload;
mod qr;

use anyhow::{Context, Result};
use args::{Args, Mode};
use clap::{CommandFactory, Parser};
use compose::{MemeComposer, MemeSources, QrPair};
use config::Config;
use tracing::{info, Level};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let Some(mode) = args.mode() else {
        Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "When --template is not used, --no-image, --yes-image, --upper-text, and --lower-text are required.",
            )
            .exit();
    };

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    let composer = MemeComposer::new(config, args.error_correction.map(Into::into));
    let qr = QrPair::from_args(&args.upper_qr, &args.lower_qr);

    match mode {
        Mode::Template(template) => {
            info!("Adding QR codes to template {}", template.display());
            composer
                .compose_from_template(template, &qr, &args.output)
                .context("Failed to add QR codes to template")?;
            println!("QR codes added and meme saved to {}", args.output.display());
        }
        Mode::Images {
            no_image,
            yes_image,
            upper_text,
            lower_text,
        } => {
            let sources = MemeSources {
                no_image,
                yes_image,
                upper_text,
                lower_text,
            };
            info!(
                "Composing meme from {} and {}",
                no_image.display(),
                yes_image.display()
            );
            composer
                .compose_from_images(&sources, &qr, &args.output)
                .context("Failed to create meme")?;
            println!("Final meme created and saved to {}", args.output.display());
        }
    }

    Ok(())
}
