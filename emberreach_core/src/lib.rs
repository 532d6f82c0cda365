#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

// Core modules
pub mod actions;
pub mod behavior;
pub mod clock;
pub mod combat;
pub mod config;
pub mod economy;
pub mod effect;
pub mod entity;
pub mod error;
pub mod event;
pub mod faction;
pub mod helpers;
pub mod idgen;
pub mod instance;
pub mod item;
pub mod magic;
pub mod npc;
pub mod pathfinder;
pub mod player;
pub mod quest;
pub mod region;
pub mod rng;
pub mod room;
pub mod scheduler;
pub mod skill;
pub mod slug;
pub mod snapshot;
pub mod spawner;
pub mod world;

// Re-exports for convenience
pub use entity::{CombatantCore, Stats};
pub use error::{GameError, GameResult};
pub use item::Item;
pub use npc::Npc;
pub use player::Player;
pub use room::Room;
pub use world::{ENGINE_VERSION, World};
