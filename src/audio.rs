//! Audio system using Web Audio API
//!
//! Procedurally generated sound cues - no external files needed. Synthesis
//! is strictly best-effort: a missing or broken audio backend disables
//! sound and gameplay continues identically.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Good bubble popped
    Pop,
    /// Bad bubble hit (life lost)
    Boom,
}

/// Audio manager for the games
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Play a sound cue
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Pop => self.play_pop(ctx, vol),
            SoundEffect::Boom => self.play_boom(ctx, vol),
        }
    }

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

    /// Pop - short descending chirp
    fn play_pop(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(400.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Boom - lower, slightly longer descend for a lost life
    fn play_boom(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }
}
