//! Save-game discovery and serialization (§4.10, §6 Snapshot format, §7
//! Save/load failure handling).
//!
//! `World` already derives `Serialize`/`Deserialize` over its full state, so
//! a snapshot is just that `World` plus the small save-slot envelope
//! (format version, display name, timestamp) the original engine wrapped
//! saves in. On-disk layout and naming follow the same `<slot>-<engine>-
//! <version>.ron` convention the save browser used before this rework.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::slug::sanitize_slug;
use crate::world::{ENGINE_VERSION, World};

pub const SAVE_DIR: &str = "saved_games";
pub const SAVE_FORMAT_VERSION: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub save_format_version: u32,
    pub save_name: String,
    pub timestamp: String,
    pub engine_version: String,
    pub world: World,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub slot: String,
    pub engine_version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    VersionMismatch { save_version: String, current_version: String },
    Corrupted { message: String },
}

/// The directory a given world's saves live under, namespaced by world slug
/// so two different worlds never collide in `saved_games/`.
pub fn save_dir_for_slug(raw: &str) -> PathBuf {
    PathBuf::from(SAVE_DIR).join(sanitize_slug(raw))
}

fn save_file_name(save_name: &str) -> String {
    format!("{}-emberreach-{}.ron", sanitize_slug(save_name), ENGINE_VERSION)
}

/// Write `world` to `dir/<save_name>-emberreach-<version>.ron` (§6 Snapshot
/// format). The write goes to a temp file first and is renamed into place so
/// a crash mid-write never leaves a half-written save on disk.
///
/// # Errors
/// Returns an error if the directory cannot be created, the world cannot be
/// serialized, or the file cannot be written.
pub fn save(world: &World, dir: &Path, save_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating save directory {}", dir.display()))?;

    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    let snapshot = Snapshot {
        save_format_version: SAVE_FORMAT_VERSION,
        save_name: save_name.to_string(),
        timestamp,
        engine_version: ENGINE_VERSION.to_string(),
        world: world.clone(),
    };

    let serialized = ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())
        .context("serializing world snapshot")?;

    let path = dir.join(save_file_name(save_name));
    let tmp_path = path.with_extension("ron.tmp");
    fs::write(&tmp_path, &serialized).with_context(|| format!("writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path).with_context(|| format!("finalizing save file {}", path.display()))?;
    Ok(path)
}

/// Load a snapshot from `path` and return its `World` (§7: surface a
/// single-line error on failure; the caller falls back to a fresh world).
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse as a
/// snapshot. A save-format-version mismatch is logged but not treated as
/// fatal: unrecognized fields default via `#[serde(default)]` on `World`.
pub fn load(path: &Path) -> Result<World> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading save file {}", path.display()))?;
    let snapshot: Snapshot = ron::from_str(&raw).with_context(|| format!("parsing save file {}", path.display()))?;
    if snapshot.save_format_version != SAVE_FORMAT_VERSION {
        warn!(
            "save '{}' was written with format version {} (current is {})",
            snapshot.save_name, snapshot.save_format_version, SAVE_FORMAT_VERSION
        );
    }
    Ok(snapshot.world)
}

/// Discover save slot files stored directly under `dir`.
///
/// # Errors
/// Returns an error if the directory contents cannot be read or enumerated.
pub fn collect_save_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| a.slot.cmp(&b.slot).then(a.engine_version.cmp(&b.engine_version)));
    Ok(slots)
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("ron") {
        return None;
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?.to_string();
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let (slot, engine_version) = stem.rsplit_once("-emberreach-")?;
    if slot.is_empty() {
        return None;
    }
    let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
    Some(SaveSlot { slot: slot.to_string(), engine_version: engine_version.to_string(), path, file_name, modified })
}

/// Status of a discovered save slot, resolved by attempting to parse it.
pub fn status_of(slot: &SaveSlot) -> SaveFileStatus {
    match fs::read_to_string(&slot.path) {
        Ok(raw) => match ron::from_str::<Snapshot>(&raw) {
            Ok(snapshot) if snapshot.engine_version == ENGINE_VERSION => SaveFileStatus::Ready,
            Ok(snapshot) => {
                SaveFileStatus::VersionMismatch { save_version: snapshot.engine_version, current_version: ENGINE_VERSION.to_string() }
            },
            Err(err) => SaveFileStatus::Corrupted { message: trim_error(&err) },
        },
        Err(err) => SaveFileStatus::Corrupted { message: trim_error(&err) },
    }
}

fn trim_error(err: &impl ToString) -> String {
    let message = err.to_string();
    if message.chars().count() <= 120 {
        return message;
    }
    let mut trimmed: String = message.chars().take(117).collect();
    trimmed.push_str("...");
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;
    use crate::player::Player;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_world() -> World {
        let player = Player::new(Uuid::new_v4(), "Tester", "warrior", Uuid::new_v4(), Uuid::new_v4(), Stats::default());
        World::new("sample-world", player, 42)
    }

    #[test]
    fn save_then_load_round_trips_the_world() -> Result<()> {
        let dir = tempdir()?;
        let world = sample_world();
        let path = save(&world, dir.path(), "slot1")?;
        let loaded = load(&path)?;
        assert_eq!(loaded.world_slug, world.world_slug);
        assert_eq!(loaded.player.core.name, world.player.core.name);
        Ok(())
    }

    #[test]
    fn collect_save_slots_skips_non_ron_files() -> Result<()> {
        let dir = tempdir()?;
        let world = sample_world();
        save(&world, dir.path(), "slot1")?;
        fs::write(dir.path().join("notes.txt"), "ignore me")?;

        let slots = collect_save_slots(dir.path())?;
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot, "slot1");
        Ok(())
    }

    #[test]
    fn loading_a_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope-emberreach-0.1.0.ron");
        assert!(load(&missing).is_err());
    }

    #[test]
    fn corrupted_save_reports_corrupted_status() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("bad-emberreach-0.1.0.ron"), "not valid ron at all {{{")?;
        let slots = collect_save_slots(dir.path())?;
        let slot = slots.into_iter().find(|s| s.slot == "bad").unwrap();
        assert!(matches!(status_of(&slot), SaveFileStatus::Corrupted { .. }));
        Ok(())
    }
}
