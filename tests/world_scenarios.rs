//! End-to-end scenarios through the public API

use glam::Vec2;

use sky_raid::Settings;
use sky_raid::audio::{RecordingSoundPlayer, SoundEffect};
use sky_raid::consts::TIME_PER_FRAME;
use sky_raid::sim::aircraft::{Aircraft, attach_aircraft};
use sky_raid::sim::command::{Action, AircraftAction, Command, ProjectileAction};
use sky_raid::sim::spawn::{LevelSpawns, SpawnRecord};
use sky_raid::sim::{
    AircraftKind, Category, CommandQueue, Dispatch, GameProgress, Layer, LevelTable, NodeId, PlayerAction,
    PlayerLoadout, ProjectileKind, SceneGraph, SceneNode, Spawn, Transform, World, handle_collisions,
};

fn run(world: &mut World<RecordingSoundPlayer>, frames: usize, actions: &[PlayerAction]) {
    for _ in 0..frames {
        for action in actions {
            world.command_queue().push(action.command());
        }
        world.update(TIME_PER_FRAME);
    }
}

/// Attach a missile through the layer spawn command, as aircraft do
fn spawn_missile(graph: &mut SceneGraph, layer: NodeId) -> NodeId {
    graph.on_command(
        &Command::spawn(vec![Spawn::Projectile {
            kind: ProjectileKind::Missile,
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(0.0, -150.0),
        }]),
        &mut Dispatch::default(),
    );
    *graph.get(layer).unwrap().children().last().unwrap()
}

fn single_enemy_level(kind: AircraftKind, x: f32, y: f32) -> LevelTable {
    LevelTable {
        levels: vec![LevelSpawns {
            level: 1,
            enemies: vec![SpawnRecord { kind, x, y }],
        }],
    }
}

#[test]
fn test_player_ramming_raptor_costs_ten_hitpoints() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let player = attach_aircraft(
        &mut graph,
        root,
        Aircraft::new(AircraftKind::Eagle, &PlayerLoadout::default()),
        Transform::at(Vec2::new(400.0, 400.0)),
    );
    let raptor = attach_aircraft(
        &mut graph,
        root,
        Aircraft::new(AircraftKind::Raptor, &PlayerLoadout::default()),
        Transform::at(Vec2::new(400.0, 380.0)),
    );
    let mut progress = GameProgress::new();

    handle_collisions(&mut graph, &mut progress, &mut CommandQueue::new(), &Default::default());

    assert_eq!(graph.get(player).and_then(SceneNode::as_aircraft).unwrap().hitpoints(), 190);
    assert!(graph.get(raptor).unwrap().is_destroyed());
    assert_eq!(progress.score(), 10);
}

#[test]
fn test_progress_bonus_after_reset() {
    let mut progress = GameProgress::new();
    progress.add_score(1234);
    progress.reset();

    // Build level 1, clear it; build level 2, clear it
    let levels = LevelTable::default();
    for _ in 0..2 {
        let world = World::new(&Settings::default(), &levels, progress, RecordingSoundPlayer::new());
        progress = world.into_progress();
        progress.increase_score_on_level_complete();
    }

    assert_eq!(progress.level(), 3);
    assert_eq!(progress.score(), 3_000);
}

#[test]
fn test_guidance_without_enemies_keeps_heading() {
    let mut graph = SceneGraph::new();
    let layer = graph.attach_child(graph.root(), SceneNode::group(Category::SCENE_AIR_LAYER));
    let missile = spawn_missile(&mut graph, layer);
    let mut dispatch = Dispatch::default();

    graph.on_command(
        &Command::new(Category::ENEMY_AIRCRAFT, Action::Aircraft(AircraftAction::CollectIfAlive)),
        &mut dispatch,
    );
    graph.on_command(
        &Command::new(
            Category::ALLIED_PROJECTILE,
            Action::Projectile(ProjectileAction::GuideTowardsNearestEnemy),
        ),
        &mut dispatch,
    );

    let projectile = graph.get(missile).and_then(SceneNode::as_projectile).unwrap();
    assert!(dispatch.active_enemies.is_empty());
    assert_eq!(projectile.target_direction(), Vec2::ZERO);
    assert_eq!(projectile.entity().velocity, Vec2::new(0.0, -150.0));
}

#[test]
fn test_missile_homes_on_enemy() {
    let levels = single_enemy_level(AircraftKind::C83, 300.0, 300.0);
    let mut world = World::new(&Settings::default(), &levels, GameProgress::new(), RecordingSoundPlayer::new());

    // Let the C83 scroll into range, then launch
    run(&mut world, 1, &[PlayerAction::LaunchMissile]);
    run(&mut world, 30, &[]);

    let enemy = world
        .graph()
        .preorder()
        .into_iter()
        .find(|id| world.graph().category_of(*id) == Some(Category::ENEMY_AIRCRAFT))
        .unwrap();
    let missile = world
        .graph()
        .preorder()
        .into_iter()
        .find(|id| {
            world
                .graph()
                .get(*id)
                .and_then(SceneNode::as_projectile)
                .is_some_and(|p| p.kind() == ProjectileKind::Missile)
        })
        .unwrap();

    let velocity = world.graph().get(missile).unwrap().as_projectile().unwrap().entity().velocity;
    let to_enemy = world.graph().world_position(enemy).unwrap() - world.graph().world_position(missile).unwrap();
    assert!(velocity.x > 0.0);
    assert!(velocity.normalize().dot(to_enemy.normalize()) > 0.5);
}

#[test]
fn test_spawned_enemies_enter_in_descending_y_order() {
    let levels = LevelTable {
        levels: vec![LevelSpawns {
            level: 1,
            enemies: vec![
                SpawnRecord {
                    kind: AircraftKind::Raptor,
                    x: -300.0,
                    y: 200.0,
                },
                SpawnRecord {
                    kind: AircraftKind::Avenger,
                    x: 300.0,
                    y: 100.0,
                },
                SpawnRecord {
                    kind: AircraftKind::C83,
                    x: 0.0,
                    y: 2000.0,
                },
            ],
        }],
    };
    let mut world = World::new(&Settings::default(), &levels, GameProgress::new(), RecordingSoundPlayer::new());
    world.update(TIME_PER_FRAME);

    let upper = world.graph().get(world.layer(Layer::UpperAir)).unwrap();
    let kinds: Vec<AircraftKind> = upper
        .children()
        .iter()
        .filter_map(|id| world.graph().get(*id).and_then(SceneNode::as_aircraft))
        .map(Aircraft::kind)
        .collect();

    assert_eq!(kinds, vec![AircraftKind::Eagle, AircraftKind::Avenger, AircraftKind::Raptor]);
    assert_eq!(world.schedule().len(), 1);
    assert_eq!(world.schedule().next().unwrap().kind, AircraftKind::C83);
}

#[test]
fn test_shooting_down_raptor_scores_and_explodes() {
    let levels = single_enemy_level(AircraftKind::Raptor, 0.0, 400.0);
    let mut world = World::new(&Settings::default(), &levels, GameProgress::new(), RecordingSoundPlayer::new());

    run(&mut world, 240, &[PlayerAction::Fire]);

    assert!(world.progress().score() >= 10);
    let explosions =
        world.sounds().count(SoundEffect::Explosion1) + world.sounds().count(SoundEffect::Explosion2);
    assert_eq!(explosions, 1);
    assert!(world.sounds().count(SoundEffect::AlliedGunfire) > 0);
    assert!(world.has_alive_player());
}

#[test]
fn test_same_seed_same_session() {
    let levels = LevelTable::builtin().unwrap();
    let play = || {
        let mut world = World::new(&Settings::default(), &levels, GameProgress::new(), RecordingSoundPlayer::new());
        run(&mut world, 1200, &[PlayerAction::Fire, PlayerAction::MoveLeft]);
        (world.progress().score(), world.graph().len(), world.sounds().total())
    };
    assert_eq!(play(), play());
}
