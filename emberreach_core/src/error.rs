//! Core error taxonomy.
//!
//! Per the engine's error handling design, every failure mode a player
//! action or tick step can hit falls into one of a small number of kinds.
//! Precondition failures and resource-missing errors are not propagated as
//! hard failures -- callers turn them into a descriptive message and leave
//! the world untouched. [`GameError`] exists so that distinction (and the
//! message) survives past the point where it's generated.

use thiserror::Error;
use uuid::Uuid;

/// A recoverable, locally-handled error produced by a core operation.
///
/// None of these ever propagate across a tick boundary (§7): the per-NPC
/// behavior step and player action handlers catch and log them instead of
/// unwinding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Not enough mana, on cooldown, target invalid, stunned, silenced,
    /// inventory full, locked exit, no path, etc. Mutates nothing.
    #[error("{0}")]
    Precondition(String),

    /// Unknown template id, missing region/room, missing NPC id. The world
    /// stays intact; callers should log and return a neutral message.
    #[error("missing {kind}: {id}")]
    ResourceMissing { kind: &'static str, id: String },

    /// Save/load I/O or (de)serialization failure.
    #[error("save/load failure: {0}")]
    SaveLoad(String),

    /// A content/procedural-generation call could not produce a result
    /// (e.g. an instance template with an empty target pool). The caller
    /// retries or skips; this is not a hard failure.
    #[error("content generation aborted: {0}")]
    ContentViolation(String),

    /// An attempted mutation would have violated a data-model invariant
    /// (negative gold, impossible stat, etc). Rejected at the boundary.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

impl GameError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn missing_room(id: Uuid) -> Self {
        Self::ResourceMissing { kind: "room", id: id.to_string() }
    }

    pub fn missing_npc(id: Uuid) -> Self {
        Self::ResourceMissing { kind: "npc", id: id.to_string() }
    }

    pub fn missing_item(id: Uuid) -> Self {
        Self::ResourceMissing { kind: "item", id: id.to_string() }
    }

    pub fn missing_region(id: Uuid) -> Self {
        Self::ResourceMissing { kind: "region", id: id.to_string() }
    }
}

pub type GameResult<T> = Result<T, GameError>;
