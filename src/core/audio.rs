/// Audio collaborator boundary — one-shot blip playback with pitch jitter.

use rand::rngs::StdRng;
use rand::Rng;

/// Where character blips go. Implemented by the host's audio layer.
pub trait AudioSink {
    /// Play one text blip. `volume` is already scaled by the engine's
    /// volume setting.
    fn play_blip(&mut self, pitch: f32, volume: f32);
}

/// A sink that discards every blip, for headless and test use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_blip(&mut self, _pitch: f32, _volume: f32) {}
}

/// Pitch range and volume scale for character blips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlipSettings {
    /// Lower bound of the per-blip pitch jitter.
    pub pitch_min: f32,
    /// Upper bound of the per-blip pitch jitter.
    pub pitch_max: f32,
    /// External volume scale, e.g. the player's sfx setting.
    pub volume: f32,
}

impl Default for BlipSettings {
    fn default() -> Self {
        Self {
            pitch_min: 0.9,
            pitch_max: 1.0,
            volume: 1.0,
        }
    }
}

/// Every-other-step blip cadence with per-play pitch jitter.
///
/// The toggle is engine state, not per-page state: it carries over from
/// one page to the next exactly as the original textbox component did.
#[derive(Debug, Clone)]
pub struct BlipCadence {
    settings: BlipSettings,
    play_next: bool,
}

impl BlipCadence {
    pub fn new(settings: BlipSettings) -> Self {
        Self {
            settings,
            play_next: true,
        }
    }

    /// Called once per appended reveal step, whether the step was a plain
    /// character or a whole tag. Plays on every other call.
    pub fn on_reveal(&mut self, audio: &mut dyn AudioSink, rng: &mut StdRng) {
        if self.play_next {
            let pitch = if self.settings.pitch_max > self.settings.pitch_min {
                rng.gen_range(self.settings.pitch_min..self.settings.pitch_max)
            } else {
                self.settings.pitch_min
            };
            audio.play_blip(pitch, self.settings.volume);
        }
        self.play_next = !self.play_next;
    }
}
