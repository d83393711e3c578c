//! Parses the run plan
//!
//! The plan is `icons.toml` at the crate root, baked into the binary. Edit it and rebuild to
//! convert other icons.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    err,
    modules::gif2header::{
        gif2header, ConversionReport, FrameCap, Gif2HeaderOptions, TransparentFill, WriteMode,
    },
    utils::{
        constants::{DEFAULT_HEADER_NAME, DEFAULT_ICONS_DIR, DEFAULT_ICON_EXTENSION},
        misc::{maybe_add_extension_to_string, relative_to_less_relative},
    },
};

pub static BUILTIN_PLAN: &str = include_str!("../icons.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_header")]
    pub header: String,
    #[serde(default = "default_icons_dir")]
    pub icons_dir: String,
    #[serde(rename = "icon", default)]
    pub icons: Vec<IconConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IconConfig {
    /// File stem inside the icons folder, also the symbol name.
    pub name: String,
    /// Overrides `<name>.gif`.
    pub file: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Every frame when left out.
    pub max_frames: Option<usize>,
    #[serde(default)]
    pub mode: WriteMode,
    #[serde(default)]
    pub fill: TransparentFill,
    /// Overrides the plan wide header.
    pub header: Option<String>,
}

fn default_header() -> String {
    DEFAULT_HEADER_NAME.to_string()
}

fn default_icons_dir() -> String {
    DEFAULT_ICONS_DIR.to_string()
}

pub fn parse_builtin_config() -> eyre::Result<Config> {
    parse_config_from_str(BUILTIN_PLAN)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(s)?;

    if config.header.is_empty() {
        return err!("No header file name");
    }

    for icon in &config.icons {
        if icon.name.is_empty() {
            return err!("Icon without a name");
        }

        if icon.width == 0 || icon.height == 0 {
            return err!(
                "Icon `{}` has an empty target size {}x{}",
                icon.name,
                icon.width,
                icon.height
            );
        }
    }

    Ok(config)
}

impl Config {
    /// Options for every icon, with paths resolved against `run_dir`.
    ///
    /// Creates the icons folder if it is not there yet.
    pub fn prepare(&self, run_dir: &Path) -> eyre::Result<Vec<Gif2HeaderOptions>> {
        let icons_dir = relative_to_less_relative(run_dir, Path::new(&self.icons_dir));

        if !icons_dir.exists() {
            log::info!("Creating {}", icons_dir.display());
            fs::create_dir_all(&icons_dir)?;
        }

        let res = self
            .icons
            .iter()
            .map(|icon| {
                let file = icon.file.clone().unwrap_or_else(|| {
                    maybe_add_extension_to_string(&icon.name, DEFAULT_ICON_EXTENSION)
                });
                let header = icon.header.as_deref().unwrap_or(&self.header);

                Gif2HeaderOptions {
                    source_path: icons_dir.join(file),
                    target_width: icon.width,
                    target_height: icon.height,
                    max_frames: FrameCap::from(icon.max_frames),
                    symbol_name: icon.name.clone(),
                    write_mode: icon.mode,
                    transparent_fill: icon.fill,
                    output_path: relative_to_less_relative(run_dir, &PathBuf::from(header)),
                }
            })
            .collect();

        Ok(res)
    }

    /// Converts every icon in order. Stops at the first failure.
    pub fn run(&self, run_dir: &Path) -> eyre::Result<Vec<ConversionReport>> {
        let jobs = self.prepare(run_dir)?;

        if jobs.is_empty() {
            log::warn!("Nothing to convert");
        }

        let mut reports = vec![];

        for job in jobs {
            let report = gif2header(&job)?;
            reports.push(report);
        }

        Ok(reports)
    }
}
