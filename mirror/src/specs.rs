use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::slot::{MirrorState, Slot};
use crate::wire::{Count, Grid, Reading, WriteError, extract_field};

/// Describes one mirrored quantity: where it lives in [`MirrorState`] and how
/// it is named on the wire.
pub trait SlotSpec: 'static {
    type Value: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Short name used in logs.
    const NAME: &'static str;
    /// Member read from write bodies.
    const WRITE_KEY: &'static str;
    /// Member emitted in read bodies.
    const READ_KEY: &'static str;
    /// Message sent back on a successful write.
    const RECEIVED: &'static str;

    fn slot(state: &MirrorState) -> &Slot<Self::Value>;

    /// Replaces the slot with the value carried in `body`. The slot is left
    /// untouched when the body cannot be parsed.
    fn write(state: &MirrorState, body: &[u8]) -> Result<(), WriteError> {
        let value = extract_field::<Self::Value>(body, Self::WRITE_KEY)?;
        Self::slot(state).set(value);
        Ok(())
    }

    fn read(state: &MirrorState) -> Reading<Self::Value> {
        Reading::new(Self::READ_KEY, Self::slot(state).get())
    }
}

pub struct Render;
pub struct Score;
pub struct LinesCleared;
pub struct Level;
pub struct NextTetromino;
pub struct Mode;

impl SlotSpec for Render {
    type Value = Grid;

    const NAME: &'static str = "render";
    const WRITE_KEY: &'static str = "board_state";
    const READ_KEY: &'static str = "boardState";
    const RECEIVED: &'static str = "Board state received successfully";

    fn slot(state: &MirrorState) -> &Slot<Grid> {
        &state.board
    }
}

impl SlotSpec for Score {
    type Value = Count;

    const NAME: &'static str = "score";
    const WRITE_KEY: &'static str = "score";
    const READ_KEY: &'static str = "score";
    const RECEIVED: &'static str = "score received successfully";

    fn slot(state: &MirrorState) -> &Slot<Count> {
        &state.score
    }
}

impl SlotSpec for LinesCleared {
    type Value = Count;

    const NAME: &'static str = "lines_cleared";
    const WRITE_KEY: &'static str = "linesCleared";
    const READ_KEY: &'static str = "linesCleared";
    const RECEIVED: &'static str = "lines cleared received successfully";

    fn slot(state: &MirrorState) -> &Slot<Count> {
        &state.lines_cleared
    }
}

impl SlotSpec for Level {
    type Value = Count;

    const NAME: &'static str = "level";
    const WRITE_KEY: &'static str = "level";
    const READ_KEY: &'static str = "level";
    const RECEIVED: &'static str = "level received successfully";

    fn slot(state: &MirrorState) -> &Slot<Count> {
        &state.level
    }
}

impl SlotSpec for NextTetromino {
    type Value = Grid;

    const NAME: &'static str = "next_tetromino";
    const WRITE_KEY: &'static str = "representation";
    const READ_KEY: &'static str = "representation";
    const RECEIVED: &'static str = "representation received successfully";

    fn slot(state: &MirrorState) -> &Slot<Grid> {
        &state.next_tetromino
    }
}

impl SlotSpec for Mode {
    type Value = String;

    const NAME: &'static str = "mode";
    const WRITE_KEY: &'static str = "mode";
    const READ_KEY: &'static str = "mode";
    const RECEIVED: &'static str = "mode received successfully";

    fn slot(state: &MirrorState) -> &Slot<String> {
        &state.mode
    }
}
