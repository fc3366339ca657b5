/// Page reveal state machine — one page of text, revealed step by step.
///
/// The original coroutine ("reveal a step, suspend for the interval,
/// repeat; then suspend for the end-of-page pause") maps to an explicit
/// timer-driven state machine advanced by `tick`.

use rand::rngs::StdRng;

use crate::core::audio::{AudioSink, BlipCadence};
use crate::core::tag::Token;

/// Pause after the last step of a page, before the buffer clears.
pub const END_OF_PAGE_PAUSE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealState {
    /// Steps remain; `timer` accumulates toward the next one.
    Printing,
    /// Last step shown; `timer` counts down the end-of-page pause.
    Settling,
    Done,
}

/// Reveals one page's steps into a display buffer at a fixed cadence.
#[derive(Debug)]
pub struct PageReveal {
    tokens: Vec<Token>,
    next: usize,
    timer: f32,
    state: RevealState,
}

impl PageReveal {
    /// Clear the buffer and begin revealing. The first step lands
    /// immediately on the starting tick; an empty page goes straight to
    /// the end-of-page pause without ever appending.
    pub fn start(
        tokens: Vec<Token>,
        buffer: &mut String,
        blip: &mut BlipCadence,
        audio: &mut dyn AudioSink,
        rng: &mut StdRng,
    ) -> Self {
        buffer.clear();
        let mut page = Self {
            tokens,
            next: 0,
            timer: 0.0,
            state: RevealState::Printing,
        };
        page.step(buffer, blip, audio, rng);
        page
    }

    /// Advance by `dt` seconds. Returns true while the page is still
    /// revealing; once it returns false the buffer has been cleared.
    pub fn tick(
        &mut self,
        dt: f32,
        interval: f32,
        buffer: &mut String,
        blip: &mut BlipCadence,
        audio: &mut dyn AudioSink,
        rng: &mut StdRng,
    ) -> bool {
        match self.state {
            RevealState::Printing => {
                self.timer += dt;
                // A large dt reveals several steps, carrying the remainder.
                while self.state == RevealState::Printing && self.timer >= interval {
                    self.timer -= interval;
                    self.step(buffer, blip, audio, rng);
                }
            }
            RevealState::Settling => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    buffer.clear();
                    self.state = RevealState::Done;
                }
            }
            RevealState::Done => {}
        }
        self.state != RevealState::Done
    }

    fn step(
        &mut self,
        buffer: &mut String,
        blip: &mut BlipCadence,
        audio: &mut dyn AudioSink,
        rng: &mut StdRng,
    ) {
        if let Some(token) = self.tokens.get(self.next) {
            token.push_onto(buffer);
            self.next += 1;
            blip.on_reveal(audio, rng);
        }
        if self.next >= self.tokens.len() {
            // No interval wait after the last step; the pause starts fresh.
            self.state = RevealState::Settling;
            self.timer = END_OF_PAGE_PAUSE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::{BlipSettings, NullAudio};
    use crate::core::tag::{tokenize, TagPolicy};
    use rand::SeedableRng;

    const INTERVAL: f32 = 0.01;

    struct Rig {
        buffer: String,
        blip: BlipCadence,
        audio: NullAudio,
        rng: StdRng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                buffer: String::new(),
                blip: BlipCadence::new(BlipSettings::default()),
                audio: NullAudio,
                rng: StdRng::seed_from_u64(42),
            }
        }

        fn start(&mut self, page: &str) -> PageReveal {
            let tokens = tokenize(page, TagPolicy::Strict).unwrap();
            PageReveal::start(
                tokens,
                &mut self.buffer,
                &mut self.blip,
                &mut self.audio,
                &mut self.rng,
            )
        }

        fn tick(&mut self, reveal: &mut PageReveal, dt: f32) -> bool {
            reveal.tick(
                dt,
                INTERVAL,
                &mut self.buffer,
                &mut self.blip,
                &mut self.audio,
                &mut self.rng,
            )
        }
    }

    #[test]
    fn first_step_lands_on_the_starting_tick() {
        let mut rig = Rig::new();
        let _reveal = rig.start("Hi");
        assert_eq!(rig.buffer, "H");
    }

    #[test]
    fn steps_advance_one_per_interval() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("abc");
        assert_eq!(rig.buffer, "a");
        rig.tick(&mut reveal, INTERVAL);
        assert_eq!(rig.buffer, "ab");
        rig.tick(&mut reveal, INTERVAL);
        assert_eq!(rig.buffer, "abc");
    }

    #[test]
    fn tag_never_appears_partially() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("a<<bold>>c");
        let mut seen = vec![rig.buffer.clone()];
        while rig.tick(&mut reveal, INTERVAL) {
            if seen.last() != Some(&rig.buffer) {
                seen.push(rig.buffer.clone());
            }
        }
        assert_eq!(seen, vec!["a", "a<bold>", "a<bold>c", ""]);
    }

    #[test]
    fn large_dt_reveals_several_steps_with_carry() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("abcdef");
        assert_eq!(rig.buffer, "a");
        rig.tick(&mut reveal, INTERVAL * 3.0);
        assert_eq!(rig.buffer, "abcd");
    }

    #[test]
    fn buffer_clears_after_end_of_page_pause() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("x");
        // Single step already shown; page is now settling.
        assert_eq!(rig.buffer, "x");
        assert!(rig.tick(&mut reveal, END_OF_PAGE_PAUSE / 2.0));
        assert_eq!(rig.buffer, "x");
        assert!(!rig.tick(&mut reveal, END_OF_PAGE_PAUSE));
        assert_eq!(rig.buffer, "");
    }

    #[test]
    fn empty_page_still_incurs_the_pause() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("");
        assert_eq!(rig.buffer, "");
        assert!(rig.tick(&mut reveal, END_OF_PAGE_PAUSE / 2.0));
        assert!(!rig.tick(&mut reveal, END_OF_PAGE_PAUSE));
    }

    #[test]
    fn done_page_stays_done() {
        let mut rig = Rig::new();
        let mut reveal = rig.start("x");
        while rig.tick(&mut reveal, INTERVAL) {}
        assert!(!rig.tick(&mut reveal, INTERVAL));
        assert_eq!(rig.buffer, "");
    }
}
