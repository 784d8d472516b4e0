use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, NUM_KEYS, NUM_REGISTERS, PROGRAM_START, STACK_DEPTH,
};
use crate::font::GLYPHS;

/// The frame buffer is indexed as [y][x] with one 0/1 cell per pixel
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The pressed status of each key on the hexadecimal keypad
pub type Keys = [bool; NUM_KEYS];

/// A snapshot of the machine's internal state
///
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - V0..VE are general purpose
///     - VF holds the carry/borrow/collision flag and shouldn't be targeted
///       directly by well-formed programs
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter, starting at the program region
/// - (sp) the number of live entries on the call stack
///
/// Timers
/// - two 8-bit countdown timers (delay & sound)
/// - the sound timer landing on 1 is what triggers a beep
///
/// Memory
/// - 4096 bytes of addressable memory; the glyph font occupies the bottom of
///   the reserved region and programs load at 0x200
/// - a 16-entry stack of return addresses
/// - a 64x32 1-bit frame buffer plus a one-shot draw flag that is set on any
///   frame buffer change and cleared when the host consumes the frame
///
/// Input
/// - `waiting_for_key` is set while a key-wait instruction is stalled; the
///   same instruction re-executes each cycle until a key is down
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub waiting_for_key: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..GLYPHS.len()].copy_from_slice(&GLYPHS);

        State {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START as u16,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            // force an initial clear render
            draw_flag: true,
            waiting_for_key: false,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
