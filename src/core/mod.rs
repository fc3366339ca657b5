pub mod audio;
pub mod combat;
pub mod reveal;
pub mod sequencer;
pub mod tag;
