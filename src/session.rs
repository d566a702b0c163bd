//! A running game session
//!
//! Owns the simulation plus everything around it: frame timing, high scores,
//! player services, achievements and the suspended-run save. Hosts feed it
//! input and frame times and react to the events it returns.

use crate::achievements::{self, RunSummary};
use crate::consts::{MAX_FRAME_DT, MAX_STEPS_PER_FRAME, SWIPE_MIN_DISTANCE};
use crate::highscores::HighScores;
use crate::persistence::{self, KeyValueStore};
use crate::platform::{BEST_SCORE_LEADERBOARD, GameServices};
use crate::settings::Settings;
use crate::sim::{
    Direction, GameEvent, GamePhase, GameState, GridSize, TickInput, autopilot, tick,
};
use crate::ui::GameOverPanel;

pub struct Session<S: KeyValueStore, G: GameServices> {
    pub state: GameState,
    pub settings: Settings,
    pub highscores: HighScores,
    pub services: G,
    store: S,
    accumulator: f32,
    /// Idle/demo mode - the autopilot steers
    pub autopilot: bool,
    /// Panel for the last finished run
    pub game_over: Option<GameOverPanel>,
    /// Achievements unlocked by the last finished run
    pub unlocked: Vec<&'static str>,
}

impl<S: KeyValueStore, G: GameServices> Session<S, G> {
    /// New session with a fresh run on `grid`
    pub fn new(store: S, services: G, settings: Settings, grid: GridSize, seed: u64) -> Self {
        let highscores = HighScores::load(&store);
        let state = GameState::new(seed, grid, settings.rules());
        Self {
            state,
            settings,
            highscores,
            services,
            store,
            accumulator: 0.0,
            autopilot: false,
            game_over: None,
            unlocked: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Start over on a (possibly resized) board; drops any suspended run
    pub fn new_run(&mut self, grid: GridSize, seed: u64) {
        self.state = GameState::new(seed, grid, self.settings.rules());
        self.reset_run_ui();
        persistence::clear_saved_game(&mut self.store);
    }

    /// Restart on the same board under the current settings
    pub fn restart(&mut self) {
        let seed = self.state.next_seed();
        self.state = GameState::new(seed, self.state.grid, self.settings.rules());
        self.reset_run_ui();
        persistence::clear_saved_game(&mut self.store);
    }

    fn reset_run_ui(&mut self) {
        self.accumulator = 0.0;
        self.game_over = None;
        self.unlocked.clear();
    }

    pub fn toggle_pause(&mut self) {
        tick(
            &mut self.state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        self.accumulator = 0.0;
        if self.state.phase == GamePhase::Paused {
            self.save();
        }
    }

    /// Steer; returns true when the turn was accepted
    pub fn turn(&mut self, dir: Direction) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        self.state.queue_turn(dir)
    }

    /// Tap at a board position (grid units, y-up): restart after a run,
    /// otherwise steer toward the tap relative to the head
    pub fn tap(&mut self, x: f32, y: f32) -> bool {
        match self.state.phase {
            GamePhase::GameOver => {
                self.restart();
                true
            }
            GamePhase::Paused => false,
            GamePhase::Playing => {
                let head = self.state.head();
                let from = (head.col as f32 + 0.5, head.row as f32 + 0.5);
                match Direction::toward(from, (x, y)) {
                    Some(dir) => self.turn(dir),
                    None => false,
                }
            }
        }
    }

    /// Swipe by a screen delta (y-up). Short swipes are ignored.
    pub fn swipe(&mut self, dx: f32, dy: f32) -> bool {
        if dx.hypot(dy) < SWIPE_MIN_DISTANCE {
            return false;
        }
        match Direction::toward((0.0, 0.0), (dx, dy)) {
            Some(dir) => self.turn(dir),
            None => false,
        }
    }

    /// Advance by a frame of `dt` seconds. `now_ms` stamps high scores.
    pub fn update(&mut self, dt: f32, now_ms: f64) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            self.accumulator = 0.0;
            return Vec::new();
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut steps = 0;
        while self.state.phase == GamePhase::Playing
            && self.accumulator >= self.state.step_interval()
            && steps < MAX_STEPS_PER_FRAME
        {
            self.accumulator -= self.state.step_interval();
            let input = TickInput {
                turn: if self.autopilot { autopilot(&self.state) } else { None },
                ..Default::default()
            };
            tick(&mut self.state, &input);
            events.extend(self.state.drain_events());
            steps += 1;
        }

        for event in &events {
            if let GameEvent::GameOver { .. } = event {
                self.finish_run(event, now_ms);
            }
        }
        events
    }

    /// Record a finished run everywhere it counts
    fn finish_run(&mut self, event: &GameEvent, now_ms: f64) {
        let GameEvent::GameOver {
            reason,
            score,
            length,
            level,
        } = *event
        else {
            return;
        };

        let rank = self.highscores.add_score(score, level, length, now_ms);
        if rank.is_some() {
            self.highscores.save(&mut self.store);
        }
        self.game_over = Some(GameOverPanel::new(reason, score, rank));
        persistence::clear_saved_game(&mut self.store);

        if !self.services.auth_state().is_authenticated() {
            log::info!("Player not signed in, skipping leaderboard and achievements");
            return;
        }
        if let Err(e) = self.services.submit_score(BEST_SCORE_LEADERBOARD, score) {
            log::warn!("Error submitting score: {}", e);
        }

        let summary = RunSummary::from_game_over(&self.state, event);
        self.unlocked.clear();
        for (id, percent) in achievements::evaluate(&summary) {
            match self.services.report_achievement(id, percent) {
                Ok(true) => self.unlocked.push(id),
                Ok(false) => {}
                Err(e) => log::warn!("Error reporting achievement {}: {}", id, e),
            }
        }
    }

    /// Host is going to the background: pause and keep the run
    pub fn suspend(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.toggle_pause();
        } else {
            self.save();
        }
    }

    /// Save the current run (nothing to save after game over)
    pub fn save(&mut self) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }
        if let Err(e) = persistence::save_game(&mut self.store, &self.state) {
            log::warn!("Failed to save game: {}", e);
        }
    }

    /// Suspended run, if any
    pub fn saved_run(&mut self) -> Option<GameState> {
        persistence::load_game(&mut self.store)
    }

    /// Continue a suspended run (paused until the player resumes)
    pub fn resume_saved(&mut self) -> bool {
        match self.saved_run() {
            Some(state) => {
                log::info!("Loaded saved game (score {})", state.score);
                self.state = state;
                if self.state.phase == GamePhase::Playing {
                    self.state.phase = GamePhase::Paused;
                }
                self.reset_run_ui();
                true
            }
            None => false,
        }
    }

    /// Replace and persist settings; rule changes apply from the next run
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save(&mut self.store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::LocalGameServices;
    use crate::sim::GridPos;

    type TestSession = Session<MemoryStore, LocalGameServices<MemoryStore>>;

    fn session(signed_in: bool) -> TestSession {
        let mut services = LocalGameServices::new(MemoryStore::new(), "twin", true);
        if signed_in {
            services.authenticate();
        }
        Session::new(
            MemoryStore::new(),
            services,
            Settings::default(),
            GridSize::new(10, 10),
            42,
        )
    }

    /// Put the head right behind the apple so the next step eats it
    fn line_up_food(session: &mut TestSession) {
        let head = session.state.head();
        session.state.food = Some(GridPos::new((head.col + 1) % 10, head.row));
    }

    #[test]
    fn test_update_respects_step_interval() {
        let mut s = session(false);
        s.state.food = Some(GridPos::new(0, 0));
        let start = s.state.head();

        s.update(0.05, 0.0);
        assert_eq!(s.state.head(), start);

        s.update(0.05, 0.0);
        s.update(0.05, 0.0);
        s.update(0.06, 0.0);
        assert_eq!(s.state.time_ticks, 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut s = session(false);
        s.state.food = Some(GridPos::new(0, 0));
        s.update(5.0, 0.0);
        // 0.1s max frame at 0.2s per step
        assert_eq!(s.state.time_ticks, 0);
    }

    #[test]
    fn test_eat_event_reported() {
        let mut s = session(false);
        line_up_food(&mut s);
        let events = s.update(0.1, 0.0);
        assert!(events.is_empty());
        let events = s.update(0.1, 0.0);
        assert!(matches!(events.as_slice(), [GameEvent::AteFood { score: 10, .. }]));
    }

    #[test]
    fn test_tap_steers_relative_to_head() {
        let mut s = session(false);
        let head = s.state.head();
        // Tap well above the head
        assert!(s.tap(head.col as f32 + 0.5, head.row as f32 + 4.0));
        assert_eq!(s.state.queued, Some(Direction::Up));
        // Tap behind the head (reversal) is refused
        s.state.queued = None;
        assert!(!s.tap(head.col as f32 - 4.0, head.row as f32 + 0.5));
    }

    #[test]
    fn test_swipe_threshold() {
        let mut s = session(false);
        assert!(!s.swipe(5.0, 3.0));
        assert!(s.swipe(0.0, -80.0));
        assert_eq!(s.state.queued, Some(Direction::Down));
    }

    #[test]
    fn test_game_over_records_everything() {
        let mut s = session(true);
        line_up_food(&mut s);
        s.update(0.1, 0.0);
        s.update(0.1, 0.0);
        assert_eq!(s.state.score, 10);

        // Wrap the head into the body
        s.state.snake = [(5, 5), (5, 4), (4, 4), (4, 5), (4, 6)]
            .iter()
            .map(|&(c, r)| GridPos::new(c, r))
            .collect();
        s.state.heading = Direction::Up;
        s.state.food = Some(GridPos::new(9, 9));
        s.turn(Direction::Left);
        s.update(0.1, 1_000.0);
        s.update(0.1, 1_000.0);

        assert_eq!(s.state.phase, GamePhase::GameOver);
        assert_eq!(s.highscores.top_score(), Some(10));
        let panel = s.game_over.clone().unwrap();
        assert_eq!(panel.final_score, "Final Score: 10");
        assert!(panel.is_new_best());
        assert_eq!(s.services.leaderboard(BEST_SCORE_LEADERBOARD)[0].score, 10);
        assert!(s.unlocked.contains(&achievements::FIRST_BITE));

        // High scores persisted through the store
        assert_eq!(HighScores::load(s.store()).top_score(), Some(10));
    }

    #[test]
    fn test_signed_out_game_over_still_keeps_local_score() {
        let mut s = session(false);
        line_up_food(&mut s);
        s.update(0.1, 0.0);
        s.update(0.1, 0.0);
        s.state.snake = [(5, 5), (5, 4), (4, 4), (4, 5), (4, 6)]
            .iter()
            .map(|&(c, r)| GridPos::new(c, r))
            .collect();
        s.state.heading = Direction::Up;
        s.state.food = Some(GridPos::new(9, 9));
        s.turn(Direction::Left);
        s.update(0.1, 0.0);
        s.update(0.1, 0.0);

        assert_eq!(s.state.phase, GamePhase::GameOver);
        assert_eq!(s.highscores.top_score(), Some(10));
        assert!(s.services.leaderboard(BEST_SCORE_LEADERBOARD).is_empty());
    }

    #[test]
    fn test_tap_after_game_over_restarts() {
        let mut s = session(false);
        s.state.phase = GamePhase::GameOver;
        s.state.score = 50;
        assert!(s.tap(0.0, 0.0));
        assert_eq!(s.state.phase, GamePhase::Playing);
        assert_eq!(s.state.score, 0);
    }

    #[test]
    fn test_restart_picks_up_new_settings() {
        let mut s = session(false);
        let settings = Settings {
            wraparound: false,
            ..Default::default()
        };
        s.update_settings(settings);
        assert!(s.state.rules.wraparound);

        s.state.phase = GamePhase::GameOver;
        assert!(s.tap(0.0, 0.0));
        assert!(!s.state.rules.wraparound);
        assert_eq!(s.state.grid, GridSize::new(10, 10));

        // Persisted for the next launch too
        assert!(!Settings::load(s.store()).wraparound);
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut s = session(false);
        s.state.score = 30;
        s.suspend();
        assert_eq!(s.state.phase, GamePhase::Paused);

        s.new_run(GridSize::new(10, 10), 7);
        // new_run drops the save
        assert!(!s.resume_saved());

        s.state.score = 60;
        s.suspend();
        s.state = GameState::new(1, GridSize::new(10, 10), s.settings.rules());
        assert!(s.resume_saved());
        assert_eq!(s.state.score, 60);
        assert_eq!(s.state.phase, GamePhase::Paused);

        s.toggle_pause();
        assert_eq!(s.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_session_plays() {
        let mut s = session(true);
        s.autopilot = true;
        for _ in 0..600 {
            s.update(1.0 / 60.0, 0.0);
        }
        assert!(s.state.time_ticks > 0);
        assert!(s.state.score > 0 || s.state.phase == GamePhase::GameOver);
    }
}
