//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use crate::sim::{GameEvent, GameOverReason};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Apple eaten
    Eat,
    /// Level gained (snake speeds up)
    LevelUp,
    /// Direction change accepted
    Turn,
    /// Run ended
    GameOver,
    /// Board filled or new best score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event. `new_best` is set when the run that just
    /// ended tops the local table.
    pub fn for_event(event: &GameEvent, new_best: bool) -> Self {
        match event {
            GameEvent::AteFood { .. } => SoundEffect::Eat,
            GameEvent::LevelUp { .. } => SoundEffect::LevelUp,
            GameEvent::GameOver {
                reason: GameOverReason::BoardFull,
                ..
            } => SoundEffect::HighScore,
            GameEvent::GameOver { .. } if new_best => SoundEffect::HighScore,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Volume 0.0 - 1.0 (0 mutes)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Eat => self.play_eat(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::Turn => self.play_turn(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short rising blip
        fn blip(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, at: f64, len: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Square) else {
                return;
            };
            gain.gain().set_value_at_time(vol, at).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, at + len)
                .ok();
            osc.frequency().set_value_at_time(from, at).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, at + len)
                .ok();
            osc.start_with_when(at).ok();
            osc.stop_with_when(at + len + 0.02).ok();
        }

        /// Crunch - quick upward chirp
        fn play_eat(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            self.blip(ctx, vol * 0.25, 440.0, 880.0, t, 0.08);
        }

        /// Three-note arpeggio
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.25, 659.25, 783.99].into_iter().enumerate() {
                let at = t + i as f64 * 0.08;
                self.blip(ctx, vol * 0.2, freq, freq * 1.01, at, 0.1);
            }
        }

        /// Barely-there tick
        fn play_turn(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.03)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }

        /// Falling sawtooth
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.frequency().set_value_at_time(400.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.8)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.85).ok();
        }

        /// Fanfare
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
                let at = t + i as f64 * 0.12;
                self.blip(ctx, vol * 0.22, freq, freq, at, 0.18);
            }
        }
    }
}
