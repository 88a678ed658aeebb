//! Candy Rope headless runner
//!
//! Plays a catalog with a simple bot (tap the candy, wait, advance) and
//! prints the result. Useful for checking level files without a renderer.
//!
//! Usage: candy-rope [levels.json] [tuning.json]

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use glam::Vec2;

use candy_rope::view::{FrameSink, FrameView};
use candy_rope::{Advance, GameLoop, HighScores, LevelCatalog, LoopHooks, LoopStatus, RunSummary, Tuning};

const CANVAS: Vec2 = Vec2::new(800.0, 600.0);
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up on a run after this many frames (10 minutes at 60 Hz)
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Logs a line every second of simulated time
#[derive(Default)]
struct TraceSink {
    frames: u32,
}

impl FrameSink for TraceSink {
    fn draw(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        if self.frames % 60 == 0 {
            log::debug!(
                "level {} candy ({:.0}, {:.0}) ropes {} mouth {}",
                frame.level_index + 1,
                frame.candy.pos.x,
                frame.candy.pos.y,
                frame.visible_ropes().count(),
                if frame.monster.mouth_open { "open" } else { "closed" }
            );
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Candy Rope (headless) starting...");

    let mut args = std::env::args().skip(1);
    let catalog = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| LevelCatalog::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Failed to load levels from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => LevelCatalog::builtin(),
    };
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                eprintln!("Failed to load tuning from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let finished: Rc<RefCell<Option<RunSummary>>> = Rc::new(RefCell::new(None));
    let hooks = LoopHooks {
        on_score: Some(Box::new(|points| println!("  +{} points", points))),
        on_level_complete: Some(Box::new(|index| println!("Level {} cleared", index + 1))),
        on_run_end: Some(Box::new({
            let finished = finished.clone();
            move |summary| *finished.borrow_mut() = Some(summary)
        })),
    };

    let mut game = GameLoop::new(catalog, tuning, CANVAS).with_hooks(hooks);
    let pointer = game.pointer_handle();
    let mut sink = TraceSink::default();
    let mut frame = 0u32;

    while frame < MAX_FRAMES {
        let status = game.frame_and_draw(frame as f64 * FRAME_MS, &mut sink);
        frame += 1;
        if status != LoopStatus::Running {
            break;
        }

        if game.level_completed() {
            pointer.release();
            if let Advance::Level(index) = game.advance() {
                println!("Starting level {}", index + 1);
            }
            continue;
        }

        // Tap the candy: every rope ends at or near it
        let Some(sim) = game.sim() else { break };
        if sim.candy.is_attached() {
            if frame % 2 == 0 {
                pointer.press(sim.candy.pos.x, sim.candy.pos.y);
            } else {
                pointer.release();
            }
        }
    }

    let summary = *finished.borrow();
    let Some(summary) = summary else {
        println!("Run did not finish within {} frames", MAX_FRAMES);
        game.cancel();
        return ExitCode::FAILURE;
    };

    println!(
        "Run {:?}: score {}, {} levels cleared",
        summary.outcome, summary.score, summary.levels_cleared
    );

    let path = PathBuf::from("candy_rope_highscores.json");
    let mut scores = HighScores::load(&path).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable high scores: {}", e);
        HighScores::new()
    });
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = scores.record_run(&summary, now) {
        println!("New high score, rank {}", rank);
        if let Err(e) = scores.save(&path) {
            log::warn!("Could not save high scores: {}", e);
        }
    }

    ExitCode::SUCCESS
}
