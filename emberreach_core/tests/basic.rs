use uuid::Uuid;

use emberreach_core::entity::Stats;
use emberreach_core::pathfinder::{self, RoomGraph};
use emberreach_core::player::Player;
use emberreach_core::region::Region;
use emberreach_core::room::Room;
use emberreach_core::snapshot;
use emberreach_core::world::World;

fn two_room_world() -> (World, Uuid, Uuid, Uuid) {
    let region_id = Uuid::new_v4();
    let start = Uuid::new_v4();
    let end = Uuid::new_v4();

    let mut region = Region::new(region_id, "Hollow", "");
    let mut start_room = Room::new(start, "Start", "");
    start_room.exits.insert("north".to_string(), end.to_string());
    region.rooms.insert(start, start_room);
    region.rooms.insert(end, Room::new(end, "End", ""));

    let player = Player::new(Uuid::new_v4(), "Ash", "warrior", region_id, start, Stats::default());
    let mut world = World::new("hollow", player, 7);
    world.regions.insert(region_id, region);
    (world, region_id, start, end)
}

#[test]
fn world_new_seeds_a_deterministic_rng() {
    let player_a = Player::new(Uuid::new_v4(), "Ash", "warrior", Uuid::new_v4(), Uuid::new_v4(), Stats::default());
    let player_b = Player::new(Uuid::new_v4(), "Ash", "warrior", Uuid::new_v4(), Uuid::new_v4(), Stats::default());
    let world_a = World::new("seed-test", player_a, 99);
    let world_b = World::new("seed-test", player_b, 99);
    assert_eq!(world_a.rng.seed(), world_b.rng.seed());
}

#[test]
fn tick_advances_the_game_clock() {
    let (mut world, _region_id, _start, _end) = two_room_world();
    let before = world.now();
    world.tick(30.0);
    assert!(world.now() > before);
}

#[test]
fn move_player_uses_an_unlocked_exit() {
    let (mut world, region_id, _start, end) = two_room_world();
    let msg = world.move_player("north").unwrap();
    assert!(msg.contains("End"));
    assert_eq!(world.player.core.room_id, end);
    assert!(world.room(region_id, end).unwrap().visited);
}

#[test]
fn move_player_rejects_an_unknown_direction() {
    let (mut world, _region_id, _start, _end) = two_room_world();
    assert!(world.move_player("south").is_err());
}

#[test]
fn pathfinder_finds_the_single_hop_route() {
    let (world, region_id, start, end) = two_room_world();
    let path = pathfinder::find_path(&world, (region_id, start), (region_id, end));
    assert_eq!(path, Some(vec!["north".to_string()]));
}

#[test]
fn room_graph_exits_resolve_within_the_region() {
    let (world, region_id, start, end) = two_room_world();
    let exits = world.exits_of(region_id, start);
    assert_eq!(exits, vec![("north".to_string(), region_id, end)]);
}

#[test]
fn save_and_load_round_trips_world_state() {
    let (mut world, _region_id, _start, end) = two_room_world();
    world.move_player("north").unwrap();
    assert_eq!(world.player.core.room_id, end);

    let dir = tempfile::tempdir().unwrap();
    let path = snapshot::save(&world, dir.path(), "slot-a").unwrap();
    let reloaded = snapshot::load(&path).unwrap();
    assert_eq!(reloaded.player.core.room_id, end);
    assert_eq!(reloaded.world_slug, world.world_slug);
}
