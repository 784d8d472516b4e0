pub use constants::CLOCK_SPEED;
pub use error::Error;
pub use machine::Machine;
pub use state::FrameBuffer;

pub mod constants;
mod error;
mod font;
mod instruction;
mod machine;
mod opcode;
mod operations;
mod state;
