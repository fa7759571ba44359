use clap::Parser;

use u440_static::EnvVars;
use u440_version::MaskScheme;

#[derive(Parser)]
#[command(name = "u440", author, version, about)]
pub(crate) struct Cli {
    /// The versions to pack, e.g. `1.0.dev1 1.0a1 1.0`.
    #[arg(required = true, value_name = "VERSION")]
    pub(crate) versions: Vec<String>,

    /// The bit layout to pack versions with.
    #[arg(long, alias = "mask", value_enum, default_value_t, env = EnvVars::U440_SCHEME)]
    pub(crate) scheme: MaskScheme,

    /// The format in which to print the packed versions.
    #[arg(long, value_enum, default_value_t, env = EnvVars::U440_OUTPUT_FORMAT)]
    pub(crate) output_format: OutputFormat,

    /// Only print the ordering, not the table of packed values.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    pub(crate) quiet: bool,

    /// Use verbose output.
    ///
    /// You can configure fine-grained logging using the `RUST_LOG` environment variable.
    /// (<https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives>)
    #[arg(global = true, action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub(crate) verbose: u8,

    /// Disable colors.
    #[arg(global = true, long, hide = true, conflicts_with = "color")]
    pub(crate) no_color: bool,

    /// Control colors in output.
    #[arg(
        global = true,
        long,
        value_enum,
        default_value = "auto",
        conflicts_with = "no_color",
        value_name = "COLOR_CHOICE"
    )]
    pub(crate) color: ColorChoice,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// One line per version with its packed bits, followed by the ordering.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub(crate) enum ColorChoice {
    /// Enables colored output only when the output is going to a terminal or TTY with support.
    Auto,

    /// Enables colored output regardless of the detected environment.
    Always,

    /// Disables colored output.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}
