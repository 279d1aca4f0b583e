//! Darkpack builds a dark-themed Minecraft resource pack. It fetches mods
//! and modpacks from Modrinth, scans their archives for texture entries,
//! swaps configured colors pixel by pixel and assembles a distributable
//! pack with a contents manifest.
//!
//! The `build` module drives the whole pipeline in one blocking pass.
//! Every step also works on its own: parsing colors, selecting texture
//! entries from archive bytes, recoloring and writing the destination
//! tree take plain inputs and carry no global state.

/// The build driver connecting all steps.
pub mod build;
/// Build configuration and mod descriptors.
pub mod cfg;
/// Color parsing and replacement rules.
pub mod color;
/// Errors thrown by build operations.
pub mod errors;
/// Registry clients fetching mod and modpack files.
pub mod fetch;
/// Texture entry selection from mod archives.
pub mod jar;
/// Destination tree assembly, manifest and final archive.
pub mod pack;
/// Pixel recoloring of decoded textures.
pub mod recolor;

pub use errors::{Error, Result};
