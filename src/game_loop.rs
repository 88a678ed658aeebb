//! Frame-driven game loop
//!
//! The host calls `frame` from its display-refresh callback. The loop owns
//! the simulation state outright; platform input handlers only ever touch
//! the pointer record through a `PointerHandle`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use crate::levels::LevelCatalog;
use crate::progress::{Advance, Progress, RunSummary};
use crate::sim::{GameEvent, PointerState, PressEdge, SimState, TickInput, tick};
use crate::tuning::Tuning;
use crate::view::{FrameSink, FrameView};

/// Where the loop is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// Waiting for a usable canvas size
    Idle,
    Running,
    Paused,
    /// The run ended (won or lost); no more ticks
    Ended,
    /// Torn down by the host; no more ticks, input detached
    Cancelled,
}

/// Host callbacks
#[derive(Default)]
pub struct LoopHooks {
    /// Fixed points for each candy eaten
    pub on_score: Option<Box<dyn FnMut(u32)>>,
    /// Level index just completed
    pub on_level_complete: Option<Box<dyn FnMut(usize)>>,
    /// Fired exactly once per run
    pub on_run_end: Option<Box<dyn FnMut(RunSummary)>>,
}

/// Write access to the pointer record for platform input handlers.
///
/// Once the loop is cancelled or its run ends, writes are silently dropped.
#[derive(Debug, Clone)]
pub struct PointerHandle {
    inner: Weak<RefCell<PointerState>>,
}

impl PointerHandle {
    pub fn move_to(&self, x: f32, y: f32) {
        self.with(|p| p.pos = Vec2::new(x, y));
    }

    pub fn press(&self, x: f32, y: f32) {
        self.with(|p| {
            p.pos = Vec2::new(x, y);
            p.pressing = true;
        });
    }

    pub fn release(&self) {
        self.with(|p| p.pressing = false);
    }

    /// Whether writes still reach a live loop
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn with(&self, f: impl FnOnce(&mut PointerState)) {
        if let Some(cell) = self.inner.upgrade() {
            f(&mut cell.borrow_mut());
        }
    }
}

/// Orchestrates per-frame simulation and level progression
pub struct GameLoop {
    progress: Progress,
    tuning: Tuning,
    canvas: Vec2,
    sim: Option<SimState>,
    pointer: Option<Rc<RefCell<PointerState>>>,
    press: PressEdge,
    last_timestamp: Option<f64>,
    status: LoopStatus,
    hooks: LoopHooks,
    /// Events from the most recent tick
    events: Vec<GameEvent>,
}

impl GameLoop {
    pub fn new(catalog: LevelCatalog, tuning: Tuning, canvas: Vec2) -> Self {
        let progress = Progress::new(catalog);
        let sim = progress.init_current(canvas, &tuning);
        let status = if sim.is_some() {
            LoopStatus::Running
        } else {
            LoopStatus::Idle
        };
        Self {
            progress,
            tuning,
            canvas,
            sim,
            pointer: Some(Rc::new(RefCell::new(PointerState::default()))),
            press: PressEdge::default(),
            last_timestamp: None,
            status,
            hooks: LoopHooks::default(),
            events: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: LoopHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Handle for the platform's pointer/touch listeners
    pub fn pointer_handle(&self) -> PointerHandle {
        PointerHandle {
            inner: self.pointer.as_ref().map(Rc::downgrade).unwrap_or_default(),
        }
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn sim(&self) -> Option<&SimState> {
        self.sim.as_ref()
    }

    pub fn level_completed(&self) -> bool {
        self.progress.level_completed()
    }

    pub fn lost(&self) -> bool {
        self.progress.lost()
    }

    pub fn score(&self) -> u64 {
        self.progress.score()
    }

    /// Events produced by the last ticked frame
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Run one display-refresh callback. `timestamp_ms` is monotonic.
    pub fn frame(&mut self, timestamp_ms: f64) -> LoopStatus {
        if self.status != LoopStatus::Running {
            return self.status;
        }

        let dt = match self.last_timestamp {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32)
                .max(0.0)
                .min(self.tuning.max_frame_dt.max(0.0)),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        let pointer = self
            .pointer
            .as_ref()
            .map(|p| *p.borrow())
            .unwrap_or_default();
        let cut = self.press.update(pointer.pressing);

        self.events.clear();
        if self.progress.level_completed() {
            return self.status;
        }
        let Some(sim) = self.sim.as_mut() else {
            return self.status;
        };

        let input = TickInput {
            pointer: pointer.pos,
            cut,
        };
        tick(sim, &input, dt, &self.tuning, &mut self.events);
        self.handle_events();
        self.status
    }

    /// Run a frame and hand the result to a renderer
    pub fn frame_and_draw(&mut self, timestamp_ms: f64, sink: &mut dyn FrameSink) -> LoopStatus {
        let status = self.frame(timestamp_ms);
        if let Some(view) = self.view() {
            sink.draw(&view);
        }
        status
    }

    /// Current geometry for the rendering collaborator
    pub fn view(&self) -> Option<FrameView<'_>> {
        self.sim.as_ref().map(|sim| {
            FrameView::new(
                sim,
                self.progress.level_completed(),
                self.progress.lost(),
                self.progress.score(),
            )
        })
    }

    fn handle_events(&mut self) {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            match event {
                GameEvent::CandyEaten => {
                    let points = self.tuning.score_per_candy;
                    if self.progress.on_eaten(points) {
                        if let Some(cb) = self.hooks.on_score.as_mut() {
                            cb(points);
                        }
                        let index = self.progress.current_index();
                        if let Some(cb) = self.hooks.on_level_complete.as_mut() {
                            cb(index);
                        }
                    }
                }
                GameEvent::CandyLost => {
                    if self.progress.on_lost() {
                        self.end_run();
                    }
                }
                _ => {}
            }
        }
        self.events = events;
    }

    /// Move to the next level after a completion
    pub fn advance(&mut self) -> Advance {
        if self.status == LoopStatus::Cancelled {
            return Advance::NotReady;
        }
        let result = self.progress.advance();
        match result {
            Advance::Level(index) => {
                log::info!("Advancing to level {}", index + 1);
                self.reinit();
            }
            Advance::RunComplete => self.end_run(),
            Advance::NotReady => {}
        }
        result
    }

    /// Begin a new run from level one (not after `cancel`)
    pub fn restart(&mut self) {
        if self.status == LoopStatus::Cancelled {
            return;
        }
        self.progress.restart();
        if self.pointer.is_none() {
            self.pointer = Some(Rc::new(RefCell::new(PointerState::default())));
        }
        self.reinit();
    }

    /// Canvas size changed. Starts an idle loop; a running level keeps its
    /// layout but its bounds follow the new size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width, height);
        match self.status {
            LoopStatus::Idle => self.reinit(),
            _ => {
                if let Some(sim) = self.sim.as_mut() {
                    if width > 0.0 && height > 0.0 {
                        sim.canvas = self.canvas;
                    }
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.status == LoopStatus::Running {
            self.status = LoopStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == LoopStatus::Paused {
            self.status = LoopStatus::Running;
            self.last_timestamp = None;
        }
    }

    /// Stop for good and detach input
    pub fn cancel(&mut self) {
        if self.status != LoopStatus::Cancelled {
            log::info!("Game loop cancelled");
        }
        self.status = LoopStatus::Cancelled;
        self.pointer = None;
    }

    fn reinit(&mut self) {
        self.sim = self.progress.init_current(self.canvas, &self.tuning);
        self.last_timestamp = None;
        self.events.clear();
        self.status = match (self.sim.is_some(), self.status) {
            (false, _) => LoopStatus::Idle,
            (true, LoopStatus::Paused) => LoopStatus::Paused,
            (true, _) => LoopStatus::Running,
        };
    }

    fn end_run(&mut self) {
        self.status = LoopStatus::Ended;
        self.pointer = None;
        if let Some(summary) = self.progress.summary() {
            if let Some(cb) = self.hooks.on_run_end.as_mut() {
                cb(summary);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{FractionPoint, Level, RopeAnchor};
    use crate::progress::RunOutcome;
    use std::cell::Cell;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn drop_level() -> Level {
        Level {
            name: "drop".into(),
            rope_anchors: vec![RopeAnchor::new(0.5, 0.1, 150.0)],
            monster_position: FractionPoint::new(0.5, 0.6),
            candy_start_position: FractionPoint::new(0.5, 0.3),
        }
    }

    fn game(levels: usize) -> GameLoop {
        let catalog = LevelCatalog::new(vec![drop_level(); levels]).unwrap();
        GameLoop::new(catalog, Tuning::default(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_zero_canvas_waits_for_resize() {
        let mut g = GameLoop::new(LevelCatalog::builtin(), Tuning::default(), Vec2::ZERO);
        assert_eq!(g.status(), LoopStatus::Idle);
        assert!(g.view().is_none());
        assert_eq!(g.frame(0.0), LoopStatus::Idle);

        g.resize(800.0, 600.0);
        assert_eq!(g.status(), LoopStatus::Running);
        assert!(g.view().is_some());
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut g = game(1);
        let start = g.sim().unwrap().candy.pos;
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        g.frame(5000.0);
        let sim = g.sim().unwrap();
        assert!(sim.ropes[0].cut);
        // Released but no time has passed yet
        assert_eq!(sim.candy.pos, start);
    }

    #[test]
    fn test_pause_resume_does_not_jump() {
        let mut g = game(1);
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        g.frame(0.0);
        g.frame(FRAME_MS);
        g.pause();
        let y = g.sim().unwrap().candy.pos.y;
        assert_eq!(g.frame(2.0 * FRAME_MS), LoopStatus::Paused);
        assert_eq!(g.sim().unwrap().candy.pos.y, y);

        g.resume();
        g.frame(60_000.0);
        assert_eq!(g.sim().unwrap().candy.pos.y, y);
        g.frame(60_000.0 + FRAME_MS);
        assert!(g.sim().unwrap().candy.pos.y > y);
    }

    #[test]
    fn test_held_press_cuts_once() {
        let catalog = LevelCatalog::builtin();
        let mut g = GameLoop::new(catalog, Tuning::default(), Vec2::new(800.0, 600.0));
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        g.frame(0.0);
        assert_eq!(g.events(), &[GameEvent::RopeCut { rope: 0 }, GameEvent::CandyReleased]);
        for i in 1..10 {
            g.frame(i as f64 * FRAME_MS);
            assert!(!g.events().iter().any(|e| matches!(e, GameEvent::RopeCut { .. })));
        }
    }

    #[test]
    fn test_eaten_scores_once_and_advances() {
        let score = Rc::new(Cell::new(0u32));
        let completed = Rc::new(Cell::new(0usize));
        let hooks = LoopHooks {
            on_score: Some(Box::new({
                let score = score.clone();
                move |points| score.set(score.get() + points)
            })),
            on_level_complete: Some(Box::new({
                let completed = completed.clone();
                move |_| completed.set(completed.get() + 1)
            })),
            on_run_end: None,
        };
        let mut g = game(2).with_hooks(hooks);
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);

        let mut t = 0.0;
        while !g.level_completed() && t < 10_000.0 {
            g.frame(t);
            t += FRAME_MS;
        }
        assert!(g.level_completed());
        assert_eq!(score.get(), 100);
        assert_eq!(completed.get(), 1);

        let frozen = g.sim().unwrap().candy.pos;
        for _ in 0..20 {
            g.frame(t);
            t += FRAME_MS;
        }
        assert_eq!(g.sim().unwrap().candy.pos, frozen);
        assert_eq!(score.get(), 100);

        handle.release();
        assert_eq!(g.advance(), Advance::Level(1));
        assert!(!g.level_completed());
        let sim = g.sim().unwrap();
        assert!(sim.ropes.iter().all(|r| !r.cut));
        assert!(sim.candy.is_attached());
        assert!(!sim.monster.happy);
    }

    #[test]
    fn test_run_end_fires_once_on_win() {
        let ends = Rc::new(RefCell::new(Vec::new()));
        let hooks = LoopHooks {
            on_run_end: Some(Box::new({
                let ends = ends.clone();
                move |summary| ends.borrow_mut().push(summary)
            })),
            ..LoopHooks::default()
        };
        let mut g = game(1).with_hooks(hooks);
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        let mut t = 0.0;
        while !g.level_completed() && t < 10_000.0 {
            g.frame(t);
            t += FRAME_MS;
        }
        assert_eq!(g.advance(), Advance::RunComplete);
        assert_eq!(g.status(), LoopStatus::Ended);
        assert_eq!(g.advance(), Advance::NotReady);
        assert!(!handle.is_attached());

        let ends = ends.borrow();
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].outcome, RunOutcome::Won);
        assert_eq!(ends[0].score, 100);
    }

    #[test]
    fn test_cancel_detaches_pointer() {
        let mut g = game(1);
        let handle = g.pointer_handle();
        assert!(handle.is_attached());
        g.cancel();
        assert!(!handle.is_attached());

        // Late writes are dropped and no ticks run
        handle.press(400.0, 100.0);
        assert_eq!(g.frame(0.0), LoopStatus::Cancelled);
        assert!(!g.sim().unwrap().ropes[0].cut);
        assert!(!g.pointer_handle().is_attached());

        g.restart();
        assert_eq!(g.status(), LoopStatus::Cancelled);
    }

    #[test]
    fn test_falling_out_of_canvas_ends_run() {
        let lost = Rc::new(Cell::new(0u32));
        let hooks = LoopHooks {
            on_run_end: Some(Box::new({
                let lost = lost.clone();
                move |summary| {
                    assert_eq!(summary.outcome, RunOutcome::Lost);
                    lost.set(lost.get() + 1);
                }
            })),
            ..LoopHooks::default()
        };
        // Monster tucked in a corner so the candy never reaches it
        let level = Level {
            monster_position: FractionPoint::new(0.05, 0.05),
            ..drop_level()
        };
        let tuning = Tuning {
            floor_enabled: false,
            ..Tuning::default()
        };
        let catalog = LevelCatalog::new(vec![level]).unwrap();
        let mut g = GameLoop::new(catalog, tuning, Vec2::new(800.0, 600.0)).with_hooks(hooks);
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);

        let mut t = 0.0;
        while g.status() == LoopStatus::Running && t < 10_000.0 {
            g.frame(t);
            t += FRAME_MS;
        }
        assert_eq!(g.status(), LoopStatus::Ended);
        assert!(g.lost());
        assert!(g.sim().unwrap().candy.pos.y > 650.0);
        assert!(!handle.is_attached());

        let pos = g.sim().unwrap().candy.pos;
        assert_eq!(g.frame(t), LoopStatus::Ended);
        assert_eq!(g.sim().unwrap().candy.pos, pos);
        assert_eq!(lost.get(), 1);
    }

    #[test]
    fn test_non_positive_max_frame_dt_freezes_time() {
        let tuning = Tuning {
            max_frame_dt: -1.0,
            ..Tuning::default()
        };
        let catalog = LevelCatalog::new(vec![drop_level()]).unwrap();
        let mut g = GameLoop::new(catalog, tuning, Vec2::new(800.0, 600.0));
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        g.frame(0.0);
        let y = g.sim().unwrap().candy.pos.y;
        assert_eq!(g.frame(16.0), LoopStatus::Running);
        assert_eq!(g.frame(32.0), LoopStatus::Running);
        assert_eq!(g.sim().unwrap().candy.pos.y, y);
    }

    #[test]
    fn test_advance_and_restart_keep_pause() {
        let mut g = game(2);
        let handle = g.pointer_handle();
        handle.press(400.0, 100.0);
        let mut t = 0.0;
        while !g.level_completed() && t < 10_000.0 {
            g.frame(t);
            t += FRAME_MS;
        }
        handle.release();

        g.pause();
        assert_eq!(g.advance(), Advance::Level(1));
        assert_eq!(g.status(), LoopStatus::Paused);
        assert_eq!(g.sim().unwrap().level_index, 1);

        g.restart();
        assert_eq!(g.status(), LoopStatus::Paused);
        assert_eq!(g.sim().unwrap().level_index, 0);

        g.resume();
        assert_eq!(g.status(), LoopStatus::Running);
    }

    #[test]
    fn test_resize_moves_bounds_not_layout() {
        let mut g = game(1);
        let anchor = g.sim().unwrap().ropes[0].anchor;
        g.resize(1000.0, 700.0);
        let sim = g.sim().unwrap();
        assert_eq!(sim.canvas, Vec2::new(1000.0, 700.0));
        assert_eq!(sim.ropes[0].anchor, anchor);
    }
}
