//! Subcommand drivers.
//!
//! Each `run_*` function wires one CLI command to the domain modules and owns
//! its progress logging; failures bubble up with the step and path attached.
use crate::cli::{DiscsArgs, InitArgs, PackArgs, PanelAction, PanelArgs, RunArgs};
use crate::discs::{build_discs, write_discs};
use crate::feed::{episode_audio_url, select_latest_episode, FeedClient};
use crate::media::{self, AudioSettings};
use crate::panel::{PanelClient, DEFAULT_TIMEOUT};
use crate::paths::{DataDirPaths, EPISODE_BASENAME};
use crate::resource_pack::build_all;
use crate::templates;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("rss2jext/", env!("CARGO_PKG_VERSION"));

/// Resolve `--data-dir`, falling back to the platform data directory.
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<DataDirPaths> {
    let root = match data_dir {
        Some(root) => root,
        None => dirs::data_dir()
            .map(|dir| dir.join("rss2jext"))
            .ok_or_else(|| anyhow!("no platform data dir; pass --data-dir"))?,
    };
    Ok(DataDirPaths::new(root))
}

pub fn run_init(paths: &DataDirPaths, args: InitArgs) -> Result<()> {
    let written = install_layout(paths, args.force)?;
    for path in &written {
        println!("{}", path.display());
    }
    tracing::info!(
        root = %paths.root().display(),
        written = written.len(),
        "data dir ready"
    );
    Ok(())
}

/// Install defaults when any layout directory is missing.
fn ensure_layout(paths: &DataDirPaths) -> Result<()> {
    if paths.layout_dirs().iter().all(|dir| dir.is_dir()) {
        return Ok(());
    }
    tracing::info!(root = %paths.root().display(), "first run: installing default templates");
    install_layout(paths, false)?;
    Ok(())
}

fn install_layout(paths: &DataDirPaths, force: bool) -> Result<Vec<PathBuf>> {
    for dir in paths.layout_dirs() {
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let defaults = [
        (paths.pack_mcmeta_template_path(), templates::PACK_MCMETA_JSON),
        (
            paths
                .resource_pack_template_dir()
                .join("assets/minecraft/sounds.json"),
            templates::SOUNDS_JSON,
        ),
        (paths.discs_template_path(), templates::DISCS_JSON),
    ];
    let mut written = Vec::new();
    for (path, contents) in defaults {
        if path.is_file() && !force {
            tracing::debug!(path = %path.display(), "keeping existing template");
            continue;
        }
        write_file(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents.as_bytes()).with_context(|| format!("write {}", path.display()))
}

pub fn run_pack(paths: &DataDirPaths, args: PackArgs) -> Result<()> {
    let archives = build_all(
        &args.formats,
        &args.description,
        paths.root(),
        &args.output_name,
        &args.basename,
    )
    .context("build resource packs")?;
    for archive in archives {
        println!("{}", archive.display());
    }
    Ok(())
}

pub fn run_discs(paths: &DataDirPaths, args: DiscsArgs) -> Result<()> {
    let out = write_discs_config(paths, &args.title, &args.author, args.duration, &args.lores)?;
    println!("{}", out.display());
    Ok(())
}

fn write_discs_config(
    paths: &DataDirPaths,
    title: &str,
    author: &str,
    duration: u64,
    lores: &[String],
) -> Result<PathBuf> {
    let discs = build_discs(&paths.discs_template_path(), title, author, duration, lores)
        .context("build discs.json")?;
    let out = paths.discs_output_path();
    write_discs(&out, &discs).context("write discs.json")?;
    tracing::info!(path = %out.display(), duration, "discs.json written");
    Ok(out)
}

/// Full pipeline: feed, download, transcode, packs, then discs.json.
pub fn run_episode(paths: &DataDirPaths, args: RunArgs) -> Result<()> {
    ensure_layout(paths)?;
    let skip = Regex::new(&args.skip_title_pattern)
        .with_context(|| format!("compile skip pattern {:?}", args.skip_title_pattern))?;

    let client = FeedClient::new(USER_AGENT, Duration::from_secs(args.timeout));
    let feed = client.fetch(&args.rss_url)?;
    let episode = select_latest_episode(&feed.episodes, &skip)?;
    let audio_url = episode_audio_url(episode)?;
    tracing::info!(
        title = %episode.title,
        guid = episode.guid.as_deref().unwrap_or("none"),
        url = audio_url,
        "latest episode"
    );

    let mp3 = paths.download_path(EPISODE_BASENAME);
    if args.skip_download {
        tracing::info!(path = %mp3.display(), "skipping download");
    } else {
        media::download(client.agent(), client.user_agent(), audio_url, &mp3)?;
    }

    let ogg = paths.media_path(EPISODE_BASENAME);
    if args.skip_encode {
        tracing::info!(path = %ogg.display(), "skipping encode");
    } else {
        let settings = AudioSettings {
            quality: args.audio.audio_quality,
            sample_rate: args.audio.audio_samplerate,
            normalize: args.audio.audio_normalize,
            ..AudioSettings::default()
        };
        media::transcode(&mp3, &ogg, &settings)?;
    }

    let description = pack_description(&args.description_prefix, &episode.title);
    let archives = build_all(
        &args.formats,
        &description,
        paths.root(),
        &args.pack_name,
        EPISODE_BASENAME,
    )
    .context("build resource packs")?;
    for archive in &archives {
        println!("{}", archive.display());
    }

    let duration = media::probe_duration(&ogg)?;
    tracing::info!(duration, "episode duration");
    let out = write_discs_config(paths, &episode.title, &feed.title, duration, &[])?;
    println!("{}", out.display());
    Ok(())
}

fn pack_description(prefix: &str, title: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        title.to_string()
    } else {
        format!("{prefix} {title}")
    }
}

pub fn run_panel(args: PanelArgs) -> Result<()> {
    let client = PanelClient::new(&args.url, &args.api_key, USER_AGENT, DEFAULT_TIMEOUT);
    match args.action {
        PanelAction::Details { server } => {
            let details = client.server_details(&server)?;
            let text = serde_json::to_string_pretty(&details).context("render server details")?;
            println!("{text}");
        }
        PanelAction::Permission { server, node } => {
            println!("{}", client.has_permission(&server, &node)?);
        }
        PanelAction::Online { server } => {
            println!("{}", client.is_online(&server)?);
        }
        PanelAction::Command { server, command } => {
            if !client.send_command(&server, &command)? {
                return Err(anyhow!("server {server} is offline"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_prefix_is_optional() {
        assert_eq!(pack_description("", "Ep 7"), "Ep 7");
        assert_eq!(
            pack_description("Podcast About List ", "Ep 7"),
            "Podcast About List Ep 7"
        );
    }

    #[test]
    fn install_layout_keeps_existing_templates_unless_forced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = DataDirPaths::new(dir.path().join("data"));

        let written = install_layout(&paths, false).expect("install");
        assert_eq!(written.len(), 3);
        for dir in paths.layout_dirs() {
            assert!(dir.is_dir(), "missing {}", dir.display());
        }

        fs::write(paths.discs_template_path(), "[{}]").expect("edit template");
        assert!(install_layout(&paths, false).expect("reinstall").is_empty());
        assert_eq!(
            fs::read_to_string(paths.discs_template_path()).expect("read"),
            "[{}]"
        );

        assert_eq!(install_layout(&paths, true).expect("force").len(), 3);
        assert_eq!(
            fs::read_to_string(paths.discs_template_path()).expect("read"),
            templates::DISCS_JSON
        );
    }

    #[test]
    fn default_templates_are_valid_inputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = DataDirPaths::new(dir.path().to_path_buf());
        install_layout(&paths, false).expect("install");

        build_discs(&paths.discs_template_path(), "t", "a", 1, &[]).expect("discs template");
        let mcmeta: serde_json::Value =
            serde_json::from_str(templates::PACK_MCMETA_JSON).expect("mcmeta template");
        assert!(mcmeta["pack"].is_object());
    }
}
