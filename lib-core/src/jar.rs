use std::io::{Cursor, Read};

use glob::Pattern;
use log::warn;
use zip::ZipArchive;

use crate::errors::Result;

/// The glob a texture path must match to be considered for recoloring.
pub const TEXTURE_GLOB: &str = "assets/**/*.png";

/// A texture entry read from a mod archive.
#[derive(Debug, Clone)]
pub struct TextureEntry {
    /// Path inside the archive, reused as the destination pack path.
    pub path: String,
    /// Raw PNG bytes.
    pub data: Vec<u8>,
}

/// A path filter selecting recolorable texture entries.
///
/// A path is selected when it matches [`TEXTURE_GLOB`] and contains
/// neither `gui` nor `ui` anywhere in it. The substring check is
/// case-sensitive and not segment-aware, so `assets/m/builder.png`
/// is excluded too.
pub struct TextureFilter {
    pattern: Pattern,
}

impl TextureFilter {
    /// Compiles the filter pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Pattern::new(TEXTURE_GLOB).expect("valid glob pattern"),
        }
    }

    /// Checks if an archive entry path should be recolored.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches(path) && !path.contains("gui") && !path.contains("ui")
    }
}

impl Default for TextureFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a mod archive and returns its recolorable texture entries in
/// archive order.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid ZIP archive.
/// Individual entries that cannot be read are logged and skipped.
pub fn select_texture_entries(data: &[u8], filter: &TextureFilter) -> Result<Vec<TextureEntry>> {
    let mut za = ZipArchive::new(Cursor::new(data))?;
    let mut picks = Vec::new();
    for idx in 0..za.len() {
        if let Some(name) = za.name_for_index(idx) {
            if filter.matches(name) {
                picks.push((idx, name.to_string()));
            }
        }
    }
    let mut entries = Vec::with_capacity(picks.len());
    for (idx, path) in picks {
        let mut data = Vec::new();
        match za.by_index(idx) {
            Ok(mut f) => {
                data.reserve_exact(f.size() as usize);
                if let Err(e) = f.read_to_end(&mut data) {
                    warn!("Unreadable entry '{path}': {e}");
                    continue;
                }
            }
            Err(e) => {
                warn!("Unreadable entry '{path}': {e}");
                continue;
            }
        }
        entries.push(TextureEntry { path, data });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::{ZipWriter, write::SimpleFileOptions};

    use super::*;

    fn mem_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        for (name, data) in entries {
            zw.start_file(*name, opts).unwrap();
            zw.write_all(data).unwrap();
        }
        zw.finish().unwrap().into_inner()
    }

    #[test]
    fn filter_selects_nested_asset_textures() {
        let f = TextureFilter::new();
        assert!(f.matches("assets/mymod/textures/block/stone.png"));
        assert!(f.matches("assets/mymod/top.png"));
        assert!(!f.matches("textures/block/stone.png"));
        assert!(!f.matches("assets/mymod/textures/block/stone.jpg"));
    }

    #[test]
    fn filter_excludes_interface_paths() {
        let f = TextureFilter::new();
        assert!(!f.matches("assets/mymod/textures/gui/window.png"));
        assert!(!f.matches("assets/mymod/ui/button.png"));
        assert!(!f.matches("assets/mymod/textures/builder.png"));
    }

    #[test]
    fn scanner_keeps_archive_order_and_content() {
        let data = mem_zip(&[
            ("assets/a/z.png", b"zzz"),
            ("assets/a/gui/skip.png", b"nope"),
            ("assets/a/a.png", b"aaa"),
            ("pack.mcmeta", b"{}"),
        ]);
        let got = select_texture_entries(&data, &TextureFilter::new()).unwrap();
        let names: Vec<&str> = got.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(names, ["assets/a/z.png", "assets/a/a.png"]);
        assert_eq!(got[0].data, b"zzz");
        assert_eq!(got[1].data, b"aaa");
    }

    #[test]
    fn scanner_rejects_non_zip_data() {
        assert!(select_texture_entries(b"not an archive", &TextureFilter::new()).is_err());
    }
}
