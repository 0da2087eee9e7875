//! CLI argument parsing.
//!
//! Every setting that used to come from the environment is a flag with an
//! `env` fallback, so one clap layer is the whole configuration surface.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Pack formats built when none are requested (1.20 - 1.20.1 and 1.20.2).
pub const DEFAULT_FORMATS: [&str; 2] = ["15", "18"];

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "rss2jext",
    version,
    about = "Listen to the latest episode of a podcast in Minecraft",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Data dir containing templates/, tmp/, out/ and an optional pack.png
    #[arg(long, value_name = "DIR", env = "RSS2JEXT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Pack(PackArgs),
    Discs(DiscsArgs),
    Run(RunArgs),
    Panel(PanelArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Create the data-dir layout and install default templates")]
pub struct InitArgs {
    /// Overwrite template files that already exist
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Build resource packs from tmp/<basename>.ogg")]
pub struct PackArgs {
    /// Basename of the transcoded episode under tmp/
    #[arg(long, default_value = crate::paths::EPISODE_BASENAME)]
    pub basename: String,

    /// Description written into pack.mcmeta
    #[arg(long)]
    pub description: String,

    /// Archive name; written as out/<NAME>_<FORMAT>.zip
    #[arg(long, value_name = "NAME", env = "RESOURCE_PACK_NAME")]
    pub output_name: String,

    /// Pack format to build (repeatable)
    #[arg(long = "format", value_name = "FORMAT", default_values_t = DEFAULT_FORMATS.map(String::from))]
    pub formats: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Write out/discs.json from templates/discs.json")]
pub struct DiscsArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    /// Episode length in seconds
    #[arg(long)]
    pub duration: u64,

    /// Tooltip line for the disc (at most 2)
    #[arg(long = "lore", value_name = "TEXT")]
    pub lores: Vec<String>,
}

/// Encoder knobs shared by `run`.
#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Vorbis quality passed to ffmpeg as -qscale:a
    #[arg(long, env = "AUDIO_QUALITY", default_value_t = 2)]
    pub audio_quality: u8,

    /// Output sample rate in Hz
    #[arg(long, env = "AUDIO_SAMPLERATE", default_value_t = 44_100)]
    pub audio_samplerate: u32,

    /// Apply loudness normalization
    #[arg(long, env = "AUDIO_NORMALIZE", value_parser = clap::builder::FalseyValueParser::new())]
    pub audio_normalize: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Fetch the latest episode and build packs plus discs.json")]
pub struct RunArgs {
    /// Podcast RSS feed
    #[arg(long, value_name = "URL", env = "RSS_URL")]
    pub rss_url: String,

    /// Archive name; written as out/<NAME>_<FORMAT>.zip
    #[arg(long, value_name = "NAME", env = "RESOURCE_PACK_NAME")]
    pub pack_name: String,

    /// Pack format to build (repeatable)
    #[arg(long = "format", value_name = "FORMAT", default_values_t = DEFAULT_FORMATS.map(String::from))]
    pub formats: Vec<String>,

    /// Text placed before the episode title in the pack description
    #[arg(long, env = "PACK_DESCRIPTION_PREFIX", default_value = "")]
    pub description_prefix: String,

    /// Episodes whose title matches this regex are never picked
    #[arg(long, value_name = "REGEX", default_value = crate::feed::DEFAULT_SKIP_TITLE_PATTERN)]
    pub skip_title_pattern: String,

    /// Reuse tmp/episode.mp3 instead of downloading
    #[arg(long)]
    pub skip_download: bool,

    /// Reuse tmp/episode.ogg instead of running ffmpeg
    #[arg(long)]
    pub skip_encode: bool,

    /// HTTP timeout in seconds for the feed and download
    #[arg(long, value_name = "SECS", default_value_t = 1000)]
    pub timeout: u64,

    #[command(flatten)]
    pub audio: AudioArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Query or control a server on a Pterodactyl panel")]
pub struct PanelArgs {
    /// Panel base URL
    #[arg(long, value_name = "URL", env = "PTERODACTYL_URL")]
    pub url: String,

    /// Client API key
    #[arg(long, value_name = "KEY", env = "PTERODACTYL_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[command(subcommand)]
    pub action: PanelAction,
}

#[derive(Subcommand, Debug)]
pub enum PanelAction {
    /// Print the server details JSON
    Details { server: String },
    /// Check whether the API key holds a permission node
    Permission { server: String, node: String },
    /// Report whether the server is running
    Online { server: String },
    /// Send a console command
    Command { server: String, command: String },
}
