use bevy_ecs::event::Events;
use bevy_ecs::system::RunSystemOnce;
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use typing_survivors::constants::{mechanics::COLLISION_DISTANCE, PLAYER_POSITION};
use typing_survivors::events::RunEnded;
use typing_survivors::highscore::HighScoreStorage;
use typing_survivors::systems::{collision_system, GameStage, ScoreResource};

mod common;

fn run_ended(world: &mut bevy_ecs::world::World) -> Vec<RunEnded> {
    world.resource_mut::<Events<RunEnded>>().drain().collect()
}

#[test]
fn test_distant_enemy_keeps_playing() {
    let mut world = common::create_test_world();
    common::spawn_enemy(&mut world, "bat", PLAYER_POSITION + Vec2::new(COLLISION_DISTANCE, 0.0));

    world.run_system_once(collision_system).expect("System should run successfully");

    assert_eq!(*world.resource::<GameStage>(), GameStage::Playing);
    assert_that(&run_ended(&mut world)).is_empty();
}

#[test]
fn test_contact_ends_run_and_records_high_score() {
    let mut world = common::create_test_world();
    world.insert_resource(ScoreResource { score: 9, high_score: 4 });
    common::spawn_enemy(&mut world, "bat", PLAYER_POSITION + Vec2::new(0.0, 10.0));
    common::spawn_enemy(&mut world, "fang", PLAYER_POSITION - Vec2::new(5.0, 0.0));

    world.run_system_once(collision_system).unwrap();

    assert_eq!(*world.resource::<GameStage>(), GameStage::GameOver);
    assert_eq!(world.resource::<ScoreResource>().high_score, 9);
    assert_that(&world.resource::<HighScoreStorage>().is_dirty()).is_false();
    assert_eq!(run_ended(&mut world), vec![RunEnded { score: 9, high_score: 9 }]);

    // Enemies stay where they were; the run is already over.
    assert_eq!(common::enemy_count(&mut world), 2);
    world.run_system_once(collision_system).unwrap();
    assert_that(&run_ended(&mut world)).is_empty();
}
