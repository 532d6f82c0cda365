//! World events (§9 redesign flag: stringly-typed events become a closed enum).

use uuid::Uuid;

/// Events the world dispatches synchronously as part of resolving a command
/// or tick step. The quest tracker is the only present subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    NpcKilled { player_id: Uuid, npc_id: Uuid, npc_template_id: Uuid },
}
