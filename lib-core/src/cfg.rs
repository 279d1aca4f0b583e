use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    color::ColorMap,
    errors::{Error, Result},
};

/// A mod or modpack descriptor from the build config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModEntry {
    /// Source registry type. Only `modrinth` entries are fetchable.
    #[serde(rename = "type")]
    pub kind: String,
    /// Project identifier or slug on the source registry.
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// Version identifier on the source registry.
    #[serde(rename = "fileID")]
    pub file_id: String,
    /// Optional display name used in the contents manifest.
    #[serde(default)]
    pub name: Option<String>,
}

impl ModEntry {
    /// Returns the display name, falling back to the project identifier.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.project_id)
    }
}

/// A build configuration, usually read from `config.json`.
///
/// The `modpacks`, `mods` and `colors` keys are required. Directory keys
/// are optional and default to `src`, `dist` and `out`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Modpacks whose bundled mods contribute textures.
    pub modpacks: Vec<ModEntry>,
    /// Individual mods that contribute textures.
    pub mods: Vec<ModEntry>,
    /// Color replacement rules in declaration order, source to replacement.
    pub colors: Map<String, Value>,
    /// Static pack files copied into the destination before any textures.
    #[serde(default = "default_src_dir", rename = "srcDir")]
    pub src_dir: PathBuf,
    /// Destination directory the pack is assembled in.
    #[serde(default = "default_dist_dir", rename = "distDir")]
    pub dist_dir: PathBuf,
    /// Directory the final archive is written to.
    #[serde(default = "default_out_dir", rename = "outDir")]
    pub out_dir: PathBuf,
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}
fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

impl BuildConfig {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON
    /// matching this structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let f = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&f)?)
    }

    /// Resolves the configured color rules into a [`ColorMap`].
    ///
    /// # Errors
    ///
    /// Returns an error if a replacement value is not a string or any
    /// color cannot be resolved.
    pub fn color_map(&self) -> Result<ColorMap> {
        let mut pairs = Vec::with_capacity(self.colors.len());
        for (src, dst) in &self.colors {
            let dst = dst
                .as_str()
                .ok_or_else(|| Error::Color(format!("replacement for '{src}' is not a string")))?;
            pairs.push((src.as_str(), dst));
        }
        ColorMap::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    const SAMPLE: &str = r##"{
        "modpacks": [
            {"type": "modrinth", "projectID": "1KVo5zza", "fileID": "xldzprjQ", "name": "Fabulously Optimized"}
        ],
        "mods": [
            {"type": "modrinth", "projectID": "AANobbMI", "fileID": "ZP5xaSWM"}
        ],
        "colors": {
            "#c6c6c6": "#343434",
            "white": "#202020"
        }
    }"##;

    #[test]
    fn parses_renamed_keys_and_defaults() {
        let cfg: BuildConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.modpacks[0].kind, "modrinth");
        assert_eq!(cfg.modpacks[0].project_id, "1KVo5zza");
        assert_eq!(cfg.mods[0].file_id, "ZP5xaSWM");
        assert_eq!(cfg.src_dir, PathBuf::from("src"));
        assert_eq!(cfg.dist_dir, PathBuf::from("dist"));
        assert_eq!(cfg.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn label_falls_back_to_project_id() {
        let cfg: BuildConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.modpacks[0].label(), "Fabulously Optimized");
        assert_eq!(cfg.mods[0].label(), "AANobbMI");
    }

    #[test]
    fn color_map_keeps_config_order() {
        let cfg: BuildConfig = serde_json::from_str(SAMPLE).unwrap();
        let map = cfg.color_map().unwrap();
        assert_eq!(map.rules()[0].0, Rgba::opaque(0xc6, 0xc6, 0xc6));
        assert_eq!(map.rules()[1].0, Rgba::opaque(255, 255, 255));
        assert_eq!(
            map.swap(Rgba::opaque(255, 255, 255)),
            Some(Rgba::opaque(0x20, 0x20, 0x20))
        );
    }

    #[test]
    fn missing_required_key_is_an_error() {
        assert!(serde_json::from_str::<BuildConfig>(r#"{"modpacks": [], "mods": []}"#).is_err());
    }

    #[test]
    fn non_string_replacement_is_an_error() {
        let cfg: BuildConfig =
            serde_json::from_str(r##"{"modpacks": [], "mods": [], "colors": {"#fff": 7}}"##)
                .unwrap();
        assert!(cfg.color_map().is_err());
    }

    #[test]
    fn custom_directories_override_defaults() {
        let cfg: BuildConfig = serde_json::from_str(
            r#"{"modpacks": [], "mods": [], "colors": {}, "srcDir": "base", "distDir": "build", "outDir": "release"}"#,
        )
        .unwrap();
        assert_eq!(cfg.src_dir, PathBuf::from("base"));
        assert_eq!(cfg.dist_dir, PathBuf::from("build"));
        assert_eq!(cfg.out_dir, PathBuf::from("release"));
    }
}
