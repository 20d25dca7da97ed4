pub mod constants;
pub mod error;
pub mod input;
pub mod rng;
pub mod sim;

pub use error::ControlError;
pub use input::FrameInput;
pub use sim::{EntryTicket, Game, RunSummary, UiMode, WorldSnapshot};
