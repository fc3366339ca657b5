/// Textbox sequencer — drives the pages of one message in order and
/// signals the caller when the whole sequence has finished displaying.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::core::audio::{AudioSink, BlipCadence, BlipSettings};
use crate::core::reveal::PageReveal;
use crate::core::tag::{tokenize, TagError, TagPolicy, Token};

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("a sequence is already being displayed")]
    Busy,
    #[error("no pages to display")]
    NoPages,
    #[error("malformed format tag in page {page}: {source}")]
    MalformedTag { page: usize, source: TagError },
    #[error("no audio sink supplied")]
    MissingAudioSink,
    #[error("character interval must be positive, got {0}")]
    InvalidInterval(f32),
}

/// Pause after the last page clears, so a held skip button does not also
/// trigger whatever control closes the box.
pub const SEQUENCE_SETTLE: f32 = 0.2;

/// Default time between revealed steps.
pub const DEFAULT_CHAR_INTERVAL: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SequenceState {
    Idle,
    /// `display` was accepted; the sequence begins on the next tick.
    Pending,
    Advancing,
    Draining { remaining: f32 },
}

/// The textbox engine. Built via [`Textbox::builder`].
///
/// Cooperative: the host calls [`Textbox::tick`] once per scheduling tick
/// with the elapsed time, and polls [`Textbox::is_active`] or supplies a
/// completion closure to [`Textbox::display_then`].
pub struct Textbox {
    pages: Vec<Vec<Token>>,
    current_page: usize,
    end_of_text: bool,
    state: SequenceState,
    reveal: Option<PageReveal>,
    buffer: String,
    blip: BlipCadence,
    audio: Box<dyn AudioSink>,
    rng: StdRng,
    char_interval: f32,
    tag_policy: TagPolicy,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// Builder for constructing a [`Textbox`].
pub struct TextboxBuilder {
    char_interval: f32,
    blip: BlipSettings,
    tag_policy: TagPolicy,
    seed: u64,
    audio: Option<Box<dyn AudioSink>>,
}

impl std::fmt::Debug for Textbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Textbox")
            .field("pages", &self.pages)
            .field("current_page", &self.current_page)
            .field("end_of_text", &self.end_of_text)
            .field("state", &self.state)
            .field("reveal", &self.reveal)
            .field("buffer", &self.buffer)
            .field("blip", &self.blip)
            .field("char_interval", &self.char_interval)
            .field("tag_policy", &self.tag_policy)
            .finish_non_exhaustive()
    }
}

impl Textbox {
    pub fn builder() -> TextboxBuilder {
        TextboxBuilder {
            char_interval: DEFAULT_CHAR_INTERVAL,
            blip: BlipSettings::default(),
            tag_policy: TagPolicy::default(),
            seed: 0,
            audio: None,
        }
    }

    /// Queue a sequence of pages for display, starting on the next tick.
    ///
    /// Rejected with [`DisplayError::Busy`] while a sequence is active and
    /// with [`DisplayError::MalformedTag`] if any page fails to tokenize
    /// under the configured policy; rejection never mutates in-flight state.
    pub fn display<S: AsRef<str>>(&mut self, pages: &[S]) -> Result<(), DisplayError> {
        self.display_inner(pages, None)
    }

    /// Like [`Textbox::display`], invoking `on_complete` exactly once after
    /// the last page has finished its end-of-page pause and the sequence
    /// has settled back to idle.
    pub fn display_then<S: AsRef<str>>(
        &mut self,
        pages: &[S],
        on_complete: impl FnOnce() + 'static,
    ) -> Result<(), DisplayError> {
        self.display_inner(pages, Some(Box::new(on_complete)))
    }

    fn display_inner<S: AsRef<str>>(
        &mut self,
        pages: &[S],
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Result<(), DisplayError> {
        if self.state != SequenceState::Idle {
            return Err(DisplayError::Busy);
        }
        if pages.is_empty() {
            return Err(DisplayError::NoPages);
        }

        // Tokenize everything up front: a malformed page rejects the whole
        // call before any state changes.
        let mut tokenized = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            let tokens = tokenize(page.as_ref(), self.tag_policy)
                .map_err(|source| DisplayError::MalformedTag { page: i, source })?;
            tokenized.push(tokens);
        }

        self.pages = tokenized;
        self.current_page = 0;
        self.end_of_text = false;
        self.on_complete = on_complete;
        self.state = SequenceState::Pending;
        Ok(())
    }

    /// Advance the sequence by `dt` seconds of scheduler time.
    ///
    /// The page driver resumes first; if it dispatched a page this tick,
    /// that page's reveal has already run to its first suspension point
    /// and is not ticked again until the next call.
    pub fn tick(&mut self, dt: f32) {
        if self.drive(dt) {
            return;
        }
        if let Some(reveal) = self.reveal.as_mut() {
            let revealing = reveal.tick(
                dt,
                self.char_interval,
                &mut self.buffer,
                &mut self.blip,
                &mut *self.audio,
                &mut self.rng,
            );
            if !revealing {
                self.reveal = None;
            }
        }
    }

    /// Returns true if a page was dispatched this tick.
    fn drive(&mut self, dt: f32) -> bool {
        match self.state {
            SequenceState::Idle => false,
            SequenceState::Pending => {
                self.state = SequenceState::Advancing;
                self.dispatch()
            }
            SequenceState::Advancing => self.dispatch(),
            SequenceState::Draining { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.finish();
                } else {
                    self.state = SequenceState::Draining { remaining };
                }
                false
            }
        }
    }

    fn dispatch(&mut self) -> bool {
        if self.reveal.is_some() {
            return false;
        }
        if self.current_page < self.pages.len() {
            let tokens = self.pages[self.current_page].clone();
            self.current_page += 1;
            if self.current_page >= self.pages.len() {
                self.end_of_text = true;
            }
            self.reveal = Some(PageReveal::start(
                tokens,
                &mut self.buffer,
                &mut self.blip,
                &mut *self.audio,
                &mut self.rng,
            ));
            true
        } else {
            self.state = SequenceState::Draining {
                remaining: SEQUENCE_SETTLE,
            };
            false
        }
    }

    fn finish(&mut self) {
        self.end_of_text = false;
        self.state = SequenceState::Idle;
        self.pages.clear();
        self.current_page = 0;
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }

    /// The currently revealed text, written progressively while a page
    /// plays and cleared between pages.
    pub fn visible_text(&self) -> &str {
        &self.buffer
    }

    /// True from a successful `display` until the sequence settles back
    /// to idle.
    pub fn is_active(&self) -> bool {
        self.state != SequenceState::Idle
    }

    /// True while a page is mid-reveal (including its end-of-page pause).
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// True once the final page has been dispatched.
    pub fn is_end_of_text(&self) -> bool {
        self.end_of_text
    }

    /// Index of the next page to dispatch.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl TextboxBuilder {
    /// Time between revealed steps. Must be positive.
    pub fn char_interval(mut self, seconds: f32) -> Self {
        self.char_interval = seconds;
        self
    }

    pub fn blip(mut self, settings: BlipSettings) -> Self {
        self.blip = settings;
        self
    }

    pub fn tag_policy(mut self, policy: TagPolicy) -> Self {
        self.tag_policy = policy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The audio collaborator. Required; use [`NullAudio`] to run silent.
    ///
    /// [`NullAudio`]: crate::core::audio::NullAudio
    pub fn audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(sink));
        self
    }

    /// Build the textbox, failing fast if a required collaborator is
    /// missing rather than no-opping mid-sequence.
    pub fn build(self) -> Result<Textbox, DisplayError> {
        if !(self.char_interval > 0.0) {
            return Err(DisplayError::InvalidInterval(self.char_interval));
        }
        let audio = self.audio.ok_or(DisplayError::MissingAudioSink)?;
        Ok(Textbox {
            pages: Vec::new(),
            current_page: 0,
            end_of_text: false,
            state: SequenceState::Idle,
            reveal: None,
            buffer: String::new(),
            blip: BlipCadence::new(self.blip),
            audio,
            rng: StdRng::seed_from_u64(self.seed),
            char_interval: self.char_interval,
            tag_policy: self.tag_policy,
            on_complete: None,
        })
    }
}
