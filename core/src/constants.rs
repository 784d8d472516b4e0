/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which loaded programs begin.
/// Everything below this is reserved for the interpreter (glyph font).
pub const PROGRAM_START: usize = 0x200;

/// Number of general purpose registers (V0-VF).
pub const NUM_REGISTERS: usize = 16;

/// Depth of the call stack.
pub const STACK_DEPTH: usize = 16;

/// Number of keys on the hexadecimal keypad.
pub const NUM_KEYS: usize = 16;

/// Horizontal resolution of the display.
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical resolution of the display.
pub const DISPLAY_HEIGHT: usize = 32;

/// Nanoseconds per machine cycle.
/// One instruction and one timer tick per 60Hz frame.
pub const CLOCK_SPEED: u32 = 16_666_667;
