//! Textbox Engine — progressive text reveal for turn-based game dialogue.
//!
//! Reveals pages of narration one character at a time at a fixed cadence,
//! treats inline `<<...>>` formatting tags as single atomic reveal steps,
//! blips an audio cue on a per-character cadence, and signals the caller
//! once a whole sequence of pages has finished displaying.

pub mod core;
pub mod schema;
