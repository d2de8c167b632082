pub mod pause;

pub use pause::{ControlSignal, PauseController};
