use clap::builder::{NonEmptyStringValueParser, TypedValueParser};
use clap::{Parser, ValueEnum};
use qrcode::EcLevel;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPER")]
pub enum EcArg {
    L,
    M,
    Q,
    H,
}

impl From<EcArg> for EcLevel {
    fn from(v: EcArg) -> Self {
        match v {
            EcArg::L => EcLevel::L,
            EcArg::M => EcLevel::M,
            EcArg::Q => EcLevel::Q,
            EcArg::H => EcLevel::H,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "qr-meme", version)]
#[command(about = "Generate a meme with QR codes.")]
pub struct Args {
    /// Path to the 'no' image for the upper left quadrant
    #[arg(
        long,
        required_unless_present = "template",
        value_parser = NonEmptyStringValueParser::new().map(PathBuf::from)
    )]
    pub no_image: Option<PathBuf>,

    /// Path to the 'yes' image for the lower left quadrant
    #[arg(
        long,
        required_unless_present = "template",
        value_parser = NonEmptyStringValueParser::new().map(PathBuf::from)
    )]
    pub yes_image: Option<PathBuf>,

    /// Text for the upper right quadrant
    #[arg(
        long,
        required_unless_present = "template",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub upper_text: Option<String>,

    /// Text for the lower right quadrant
    #[arg(
        long,
        required_unless_present = "template",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub lower_text: Option<String>,

    /// Text or file path for the upper right QR code
    #[arg(long)]
    pub upper_qr: String,

    /// Text or file path for the lower right QR code
    #[arg(long)]
    pub lower_qr: String,

    /// Path to save the final meme image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pre-existing template image; images and text options are ignored
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Settings file (TOML) for fonts, QR rendering and layout offsets
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// QR code error correction level (L, M, Q, H); encoder default if omitted
    #[arg(short = 'e', long)]
    pub error_correction: Option<EcArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What to build, decided once from the parsed flags.
#[derive(Debug, PartialEq, Eq)]
pub enum Mode<'a> {
    Template(&'a PathBuf),
    Images {
        no_image: &'a PathBuf,
        yes_image: &'a PathBuf,
        upper_text: &'a str,
        lower_text: &'a str,
    },
}

impl Args {
    /// `None` only if clap's `required_unless_present` checks were bypassed.
    pub fn mode(&self) -> Option<Mode<'_>> {
        if let Some(template) = &self.template {
            return Some(Mode::Template(template));
        }
        Some(Mode::Images {
            no_image: self.no_image.as_ref()?,
            yes_image: self.yes_image.as_ref()?,
            upper_text: self.upper_text.as_deref()?,
            lower_text: self.lower_text.as_deref()?,
        })
    }
}
