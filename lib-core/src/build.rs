use std::path::PathBuf;

use log::{debug, warn};

use crate::{
    cfg::BuildConfig,
    errors::Result,
    fetch::Registry,
    jar::{self, TextureFilter},
    pack, recolor,
};

/// Counters and outputs reported after a finished build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Modpacks that contributed at least one mod.
    pub modpacks: usize,
    /// Mods fetched on their own.
    pub mods: usize,
    /// Recolored textures written into the destination.
    pub added: usize,
    /// Recolored textures skipped because the destination already had them.
    pub skipped: usize,
    /// Mods, modpacks or entries dropped after a logged failure.
    pub failures: usize,
    /// Path of the final archive.
    pub archive: PathBuf,
}

/// Runs a whole build: seeds the destination from the static tree,
/// fetches configured modpacks and mods in order, recolors matching
/// textures, then writes the manifest and archives the destination.
///
/// Fetch failures and unusable entries are logged and skipped, the
/// build continues with whatever remains. Color rules, the manifest,
/// pack metadata and the final archive are not skippable.
///
/// # Errors
///
/// Returns an error if the color rules are invalid, the destination
/// cannot be seeded, or the manifest, metadata or archive steps fail.
pub fn run(cfg: &BuildConfig, registry: &dyn Registry) -> Result<BuildSummary> {
    let colors = cfg.color_map()?;
    pack::init_destination(&cfg.src_dir, &cfg.dist_dir)?;

    let mut modpack_lines = Vec::new();
    let mut mod_lines = Vec::new();
    let mut files: Vec<Vec<u8>> = Vec::new();
    let mut failures = 0usize;

    for modpack in &cfg.modpacks {
        match registry.fetch_modpack_files(modpack) {
            Ok(pmods) if pmods.is_empty() => {
                debug!("Modpack '{}' has no files", modpack.label());
            }
            Ok(pmods) => {
                modpack_lines.push(format!("- (modpack) {}", modpack.label()));
                files.extend(pmods);
            }
            Err(e) => {
                warn!("Modpack '{}' dropped: {e}", modpack.label());
                failures += 1;
            }
        }
    }
    for m in &cfg.mods {
        match registry.fetch_mod_file(m) {
            Ok(file) => {
                mod_lines.push(format!("- (mod) {}", m.label()));
                files.push(file);
            }
            Err(e) => {
                warn!("Mod '{}' dropped: {e}", m.label());
                failures += 1;
            }
        }
    }

    let filter = TextureFilter::new();
    let (mut added, mut skipped) = (0usize, 0usize);
    for data in &files {
        let entries = match jar::select_texture_entries(data, &filter) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("InvalidArchive - {e}");
                failures += 1;
                continue;
            }
        };
        for entry in entries {
            let img = match recolor::recolor(&colors, &entry.data) {
                Ok(Some(img)) => img,
                Ok(None) => continue,
                Err(e) => {
                    warn!("InvalidImage - '{}' {e}", entry.path);
                    failures += 1;
                    continue;
                }
            };
            match pack::write_texture(&cfg.dist_dir, &entry.path, &img) {
                Ok(true) => added += 1,
                Ok(false) => skipped += 1,
                Err(e) => {
                    warn!("WriteFailed - '{}' {e}", entry.path);
                    failures += 1;
                }
            }
        }
    }

    pack::write_manifest(&cfg.dist_dir, &modpack_lines, &mod_lines)?;
    let version = pack::pack_version(&cfg.dist_dir)?;
    let archive = pack::finalize_archive(&cfg.dist_dir, &cfg.out_dir, &version)?;

    Ok(BuildSummary {
        modpacks: modpack_lines.len(),
        mods: mod_lines.len(),
        added,
        skipped,
        failures,
        archive,
    })
}
