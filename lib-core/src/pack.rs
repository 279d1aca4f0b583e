use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

use image::{ImageFormat, RgbaImage};
use log::info;
use serde::Deserialize;
use walkdir::WalkDir;
use zip::{
    write::{FileOptions, SimpleFileOptions},
    CompressionMethod, ZipWriter,
};

use crate::errors::{Error, Result};

/// Name of the manifest file written into the destination pack.
pub const MANIFEST_NAME: &str = "contents.txt";

/// Name of the pack metadata file the archive version is read from.
pub const PACK_META_NAME: &str = "pack.mcmeta";

/// Base name the final archive is built from.
pub const ARCHIVE_BASE: &str = "darkpack";

const MAX_LEVEL: i64 = 9;
const COMPRESS_MIN: usize = 24;

/// Copies the static pack tree into the destination, creating it when
/// absent. Existing destination files are overwritten, files that only
/// exist in the destination are left alone.
///
/// # Errors
///
/// Returns an error if the source tree cannot be walked or a file
/// cannot be copied.
pub fn init_destination(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Writes a recolored texture into the destination pack under its
/// archive path. An existing file is never overwritten, so the first
/// written version wins across all scanned archives and across runs.
///
/// Returns `true` when the file was written and `false` when it
/// already existed.
///
/// # Errors
///
/// Returns an error if the path would escape the destination, a parent
/// directory cannot be created, or encoding fails.
pub fn write_texture(dst: &Path, rel: &str, img: &RgbaImage) -> Result<bool> {
    let rel_path = Path::new(rel);
    if rel_path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(Error::Io(io::Error::other(format!(
            "refusing to write outside the pack: '{rel}'"
        ))));
    }
    let target = dst.join(rel_path);
    if target.is_file() {
        info!("- (skipped) '{}'", target.display());
        return Ok(false);
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    img.save_with_format(&target, ImageFormat::Png)?;
    info!("- (added) '{}'", target.display());
    Ok(true)
}

/// Writes the contents manifest listing fetched modpacks and mods.
/// Both section headers are always present, even when empty.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_manifest(dst: &Path, modpacks: &[String], mods: &[String]) -> Result<()> {
    let contents = format!(
        "Modpacks:\n{}\nMods:\n{}\n",
        modpacks.join("\n"),
        mods.join("\n")
    );
    fs::write(dst.join(MANIFEST_NAME), contents)?;
    Ok(())
}

#[derive(Deserialize)]
struct PackMeta {
    pack: PackSection,
}

#[derive(Deserialize)]
struct PackSection {
    version: Vec<u32>,
}

/// Reads the pack version from the destination's metadata file and
/// joins its numeric components with dots.
///
/// # Errors
///
/// Returns an error if the file is missing or does not carry a
/// `pack.version` list of integers.
pub fn pack_version(dst: &Path) -> Result<String> {
    let path = dst.join(PACK_META_NAME);
    let raw = fs::read_to_string(&path)
        .map_err(|e| Error::PackMeta(format!("'{}': {e}", path.display())))?;
    let meta: PackMeta = serde_json::from_str(&raw)
        .map_err(|e| Error::PackMeta(format!("'{}': {e}", path.display())))?;
    Ok(meta
        .pack
        .version
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("."))
}

/// Archives the whole destination tree into
/// `<out_dir>/<base>-<version>.zip` and returns the archive path.
/// Entries are stored in sorted order. Each file is deflated only when
/// a trial compression actually shrinks it.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or the archive cannot
/// be written.
pub fn finalize_archive(dst: &Path, out_dir: &Path, version: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let target = out_dir.join(format!("{ARCHIVE_BASE}-{version}.zip"));
    let opts_deflated = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(MAX_LEVEL));
    let opts_stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut zw = ZipWriter::new(BufWriter::new(File::create(&target)?));
    for entry in WalkDir::new(dst).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dst) else {
            continue;
        };
        let name = rel
            .iter()
            .map(|c| c.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let data = fs::read(entry.path())?;
        zw.start_file(
            name,
            if compress_check(&data, COMPRESS_MIN) {
                opts_deflated
            } else {
                opts_stored
            },
        )?;
        zw.write_all(&data)?;
    }
    zw.finish()?.flush()?;
    info!("Packed '{}'", target.display());
    Ok(target)
}

/// Check if data should be compressed. If the compressed size is smaller
/// than the original, then the compression should be chosen.
fn compress_check(b: &[u8], compress_min: usize) -> bool {
    let lb = b.len();
    if lb > compress_min {
        let mut d = flate2::write::DeflateEncoder::new(io::sink(), flate2::Compression::best());
        if d.write_all(b).and_then(|_| d.try_finish()).is_ok() && d.total_out() as usize + 8 < lb {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use tempfile::tempdir;
    use zip::ZipArchive;

    use super::*;

    #[test]
    fn init_copies_and_overwrites() {
        let dir = tempdir().unwrap();
        let (src, dst) = (dir.path().join("src"), dir.path().join("dist"));
        fs::create_dir_all(src.join("assets")).unwrap();
        fs::write(src.join("pack.mcmeta"), b"{}").unwrap();
        fs::write(src.join("assets/icon.png"), b"new").unwrap();
        fs::create_dir_all(dst.join("assets")).unwrap();
        fs::write(dst.join("assets/icon.png"), b"old").unwrap();
        fs::write(dst.join("assets/extra.png"), b"keep").unwrap();

        init_destination(&src, &dst).unwrap();
        assert_eq!(fs::read(dst.join("pack.mcmeta")).unwrap(), b"{}");
        assert_eq!(fs::read(dst.join("assets/icon.png")).unwrap(), b"new");
        assert_eq!(fs::read(dst.join("assets/extra.png")).unwrap(), b"keep");
    }

    #[test]
    fn texture_writes_once_then_skips() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let rel = "assets/m/textures/block/a.png";

        assert!(write_texture(dir.path(), rel, &img).unwrap());
        let first = fs::read(dir.path().join(rel)).unwrap();

        let other = RgbaImage::from_pixel(2, 2, image::Rgba([1, 1, 1, 255]));
        assert!(!write_texture(dir.path(), rel, &other).unwrap());
        assert_eq!(fs::read(dir.path().join(rel)).unwrap(), first);
    }

    #[test]
    fn texture_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        assert!(write_texture(dir.path(), "assets/../../evil.png", &img).is_err());
    }

    #[test]
    fn manifest_has_exact_layout() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            &["- (modpack) Packed".to_string()],
            &["- (mod) Sodium".to_string(), "- (mod) Lithium".to_string()],
        )
        .unwrap();
        let got = fs::read_to_string(dir.path().join(MANIFEST_NAME)).unwrap();
        assert_eq!(
            got,
            "Modpacks:\n- (modpack) Packed\nMods:\n- (mod) Sodium\n- (mod) Lithium\n"
        );
    }

    #[test]
    fn manifest_keeps_headers_when_empty() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), &[], &[]).unwrap();
        let got = fs::read_to_string(dir.path().join(MANIFEST_NAME)).unwrap();
        assert_eq!(got, "Modpacks:\n\nMods:\n\n");
    }

    #[test]
    fn version_joins_numeric_components() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PACK_META_NAME),
            br#"{"pack": {"pack_format": 15, "version": [1, 20, 1]}}"#,
        )
        .unwrap();
        assert_eq!(pack_version(dir.path()).unwrap(), "1.20.1");
    }

    #[test]
    fn missing_metadata_is_reported() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            pack_version(dir.path()),
            Err(Error::PackMeta(_))
        ));
    }

    #[test]
    fn archive_contains_the_whole_tree() {
        let dir = tempdir().unwrap();
        let (dst, out) = (dir.path().join("dist"), dir.path().join("out"));
        fs::create_dir_all(dst.join("assets/m")).unwrap();
        fs::write(dst.join("pack.mcmeta"), b"{}").unwrap();
        fs::write(dst.join("assets/m/a.png"), vec![7; 512]).unwrap();

        let target = finalize_archive(&dst, &out, "1.2.3").unwrap();
        assert_eq!(target, out.join("darkpack-1.2.3.zip"));

        let mut za = ZipArchive::new(Cursor::new(fs::read(&target).unwrap())).unwrap();
        let mut names: Vec<String> = (0..za.len())
            .filter_map(|i| za.name_for_index(i).map(str::to_string))
            .collect();
        names.sort();
        assert_eq!(names, ["assets/m/a.png", "pack.mcmeta"]);

        let mut buf = Vec::new();
        za.by_name("assets/m/a.png")
            .unwrap()
            .read_to_end(&mut buf)
            .unwrap();
        assert_eq!(buf, vec![7; 512]);
    }

    #[test]
    fn compress_check_picks_sensible_methods() {
        assert!(compress_check(&[7; 512], COMPRESS_MIN));
        assert!(!compress_check(b"tiny", COMPRESS_MIN));
    }
}
