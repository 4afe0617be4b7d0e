pub mod slot;
pub mod specs;
pub mod wire;

pub use slot::{MirrorState, Slot};
pub use specs::{LinesCleared, Level, Mode, NextTetromino, Render, Score, SlotSpec};
pub use wire::{AckStatus, Count, Grid, Reading, WriteAck, WriteError};
