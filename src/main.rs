//! Sky Raid headless driver
//!
//! Plays a scripted session at a fixed 60 Hz timestep: loads the level table
//! on a worker thread, flies each level with an autopilot until the player
//! dies or the campaign is won, then records the high score.
//!
//! Usage: `sky-raid [settings.json]`

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use sky_raid::audio::RecordingSoundPlayer;
use sky_raid::consts::{MAX_SUBSTEPS, TIME_PER_FRAME};
use sky_raid::renderer::DrawRecorder;
use sky_raid::sim::{GameProgress, LevelTable, PlayerAction, World};
use sky_raid::task::ParallelTask;
use sky_raid::{HighScore, Settings};

/// Seconds between autopilot missile launches
const MISSILE_INTERVAL: f32 = 5.0;

/// Recent sounds kept per level for debugging
const SOUND_HISTORY: usize = 32;

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Cleared,
    PlayerDied,
}

/// Scripted input: constant fire, a slow weave, and periodic missiles
struct Autopilot {
    elapsed: f32,
    next_missile: f32,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            elapsed: 0.0,
            next_missile: MISSILE_INTERVAL,
        }
    }

    fn actions(&mut self, dt: f32) -> Vec<PlayerAction> {
        self.elapsed += dt;
        let mut actions = vec![PlayerAction::Fire];
        // Weave with a 4 second period
        if (self.elapsed / 2.0) as u32 % 2 == 0 {
            actions.push(PlayerAction::MoveLeft);
        } else {
            actions.push(PlayerAction::MoveRight);
        }
        if self.elapsed >= self.next_missile {
            self.next_missile += MISSILE_INTERVAL;
            actions.push(PlayerAction::LaunchMissile);
        }
        actions
    }
}

fn play_level(world: &mut World<RecordingSoundPlayer>) -> Outcome {
    let mut autopilot = Autopilot::new();
    let mut frame = DrawRecorder::default();
    let mut accumulator = 0.0;
    let mut last_time = Instant::now();

    loop {
        let now = Instant::now();
        accumulator += now.duration_since(last_time).as_secs_f32().min(0.1);
        last_time = now;

        let mut substeps = 0;
        while accumulator >= TIME_PER_FRAME && substeps < MAX_SUBSTEPS {
            for action in autopilot.actions(TIME_PER_FRAME) {
                world.command_queue().push(action.command());
            }
            world.update(TIME_PER_FRAME);
            accumulator -= TIME_PER_FRAME;
            substeps += 1;

            if !world.has_alive_player() {
                return Outcome::PlayerDied;
            }
            if world.has_player_reached_end() {
                return Outcome::Cleared;
            }
        }

        frame.clear();
        world.draw(&mut frame);
        thread::sleep(Duration::from_secs_f32(TIME_PER_FRAME / 2.0));
    }
}

fn load_levels() -> Result<LevelTable> {
    let mut loader = ParallelTask::new(Duration::from_millis(200));
    loader.execute(LevelTable::builtin);
    while !loader.is_finished() {
        log::info!("Loading levels... {:.0}%", loader.completion() * 100.0);
        thread::sleep(Duration::from_millis(20));
    }
    loader.take_result().context("Level loader finished without a result")?
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sky Raid (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);
    let levels = load_levels()?;
    let mut high_score = HighScore::load(&settings.high_score_path);

    let mut progress = GameProgress::new();
    loop {
        let sounds = RecordingSoundPlayer::with_history_limit(SOUND_HISTORY);
        let mut world = World::new(&settings, &levels, progress, sounds);
        let outcome = play_level(&mut world);
        let level = world.level();
        log::info!(
            "Level {} {:?}, {} sounds played",
            level,
            outcome,
            world.sounds().total()
        );
        log::debug!("Last sounds: {:?}", world.sounds().history);
        progress = world.into_progress();

        if outcome == Outcome::PlayerDied {
            log::info!("Game over with score {}", progress.score());
            break;
        }
        progress.increase_score_on_level_complete();
        if progress.is_campaign_complete() {
            log::info!("Campaign complete with score {}", progress.score());
            break;
        }
    }

    if high_score.submit(progress.score())? {
        log::info!("New high score!");
    } else {
        log::info!("High score remains {}", high_score.best());
    }
    Ok(())
}
