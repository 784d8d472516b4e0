use std::io::Read;

use tracing::trace;

use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::Error;
use crate::instruction;
use crate::state::{FrameBuffer, Keys, State};

/// # Machine
/// The CHIP-8 virtual machine: all emulated state plus the fetch, decode,
/// execute engine that advances it one instruction at a time.
///
/// The host drives it with a narrow interface:
/// - `load` / `load_rom` place a program image at 0x200
/// - `set_key` mirrors the host's input device into the hex keypad
/// - `cycle` executes exactly one instruction and ticks the timers
/// - `frame` hands out the frame buffer when a redraw is pending
/// - `set_beep` installs the hook fired when the sound timer lands on 1
pub struct Machine {
    state: State,
    pressed_keys: Keys,
    beep: Box<dyn FnMut()>,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            state: State::new(),
            pressed_keys: [false; 16],
            beep: Box::new(|| {}),
        }
    }

    /// Copy a program image into memory at the program region
    ///
    /// Fails with `CapacityExceeded` when the image is longer than the
    /// memory left above 0x200; no state is touched in that case.
    pub fn load(&mut self, program: &[u8]) -> Result<(), Error> {
        let capacity = MEMORY_SIZE - PROGRAM_START;
        if program.len() > capacity {
            return Err(Error::CapacityExceeded {
                len: program.len(),
                capacity,
            });
        }
        self.state.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Read a ROM to its end and load it
    ///
    /// # Arguments
    /// * `reader` a reader over a ROM file
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Error> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load(&program)
    }

    /// Set the pressed status of a key
    ///
    /// Key indices past the 16-key pad are ignored; the original hardware
    /// never generates them so there is nothing sensible to map them to.
    ///
    /// # Arguments
    /// * `key` the index of the key (0x0..=0xF)
    /// * `pressed` whether the key is down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.pressed_keys.get_mut(key as usize) {
            *slot = pressed;
        }
    }

    /// Replace the beep hook; the last hook set wins
    pub fn set_beep(&mut self, beep: impl FnMut() + 'static) {
        self.beep = Box::new(beep);
    }

    /// Returns the frame buffer if the display should be redrawn
    ///
    /// Consuming the frame clears the draw flag, so each change to the
    /// frame buffer is handed out exactly once.
    pub fn frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The current sound timer value; nonzero means the tone should play
    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Advance the machine by a single cycle
    ///
    /// Fetches, decodes, and executes one instruction, then decrements the
    /// timers. A stalled key-wait instruction leaves the program counter in
    /// place and skips the timer tick, so it re-executes on the next call.
    /// The only possible errors are call stack over- and underflow.
    pub fn cycle(&mut self) -> Result<(), Error> {
        let op = self.fetch();
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        self.state = instruction::decode(&op)(&op, &self.state, self.pressed_keys)?;

        if self.state.waiting_for_key {
            return Ok(());
        }

        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            if self.state.sound_timer == 1 {
                (self.beep)();
            }
        }
        Ok(())
    }

    /// Combine the two bytes at the pc into one big-endian opcode
    ///
    /// The pc is masked into the address space so a program that runs off
    /// the end of memory spins instead of crashing the host.
    fn fetch(&self) -> u16 {
        let pc = self.state.pc as usize % MEMORY_SIZE;
        let left = u16::from(self.state.memory[pc]);
        let right = u16::from(self.state.memory[(pc + 1) % MEMORY_SIZE]);
        left << 8 | right
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::font::GLYPHS;

    #[test]
    fn test_new_machine_forces_an_initial_render() {
        let mut machine = Machine::new();
        assert!(machine.frame().is_some());
        // the flag is one-shot
        assert!(machine.frame().is_none());
    }

    #[test]
    fn test_new_machine_has_the_font_loaded() {
        let machine = Machine::new();
        assert_eq!(machine.state.memory[..80], GLYPHS[..]);
    }

    #[test]
    fn test_load_copies_the_program() {
        let mut machine = Machine::new();
        machine.load(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(machine.state.memory[0x200..0x203], [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_load_fills_memory_exactly() {
        let mut machine = Machine::new();
        machine.load(&[0x11; 4096 - 512]).unwrap();
        assert_eq!(machine.state.memory[0xFFF], 0x11);
    }

    #[test]
    fn test_load_rejects_an_oversized_program() {
        let mut machine = Machine::new();
        let result = machine.load(&[0x11; 4096 - 512 + 1]);
        assert!(matches!(result, Err(Error::CapacityExceeded { .. })));
        // memory is untouched on failure
        assert_eq!(machine.state.memory[0x200], 0x0);
    }

    #[test]
    fn test_load_rom_reads_a_stream() {
        let mut machine = Machine::new();
        let mut rom: &[u8] = &[0x00, 0xE0];
        machine.load_rom(&mut rom).unwrap();
        assert_eq!(machine.state.memory[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn test_fetch_combines_big_endian() {
        let mut machine = Machine::new();
        machine.load(&[0xAA, 0xBB]).unwrap();
        assert_eq!(machine.fetch(), 0xAABB);
    }

    #[test]
    fn test_cycle_advances_one_instruction() {
        let mut machine = Machine::new();
        machine.load(&[0x00, 0xE0]).unwrap();
        machine.cycle().unwrap();
        assert_eq!(machine.state.pc, 0x202);
    }

    #[test]
    fn test_cycle_ticks_the_delay_timer() {
        let mut machine = Machine::new();
        machine.load(&[0x00, 0xE0]).unwrap();
        machine.state.delay_timer = 2;
        machine.cycle().unwrap();
        assert_eq!(machine.state.delay_timer, 1);
    }

    #[test]
    fn test_set_key_ignores_out_of_range_indices() {
        let mut machine = Machine::new();
        machine.set_key(0xFF, true);
        assert_eq!(machine.pressed_keys, [false; 16]);
    }

    #[test]
    fn test_key_wait_stalls_until_a_key_is_down() {
        let mut machine = Machine::new();
        machine.load(&[0xF1, 0x0A]).unwrap();
        machine.state.delay_timer = 5;

        for _ in 0..3 {
            machine.cycle().unwrap();
            assert_eq!(machine.state.pc, 0x200);
            // timers freeze while the instruction is stalled
            assert_eq!(machine.state.delay_timer, 5);
        }

        machine.set_key(0x7, true);
        machine.cycle().unwrap();
        assert_eq!(machine.state.pc, 0x202);
        assert_eq!(machine.state.v[0x1], 0x7);
        assert_eq!(machine.state.delay_timer, 4);
    }

    #[test]
    fn test_beep_fires_exactly_once_on_the_transition_to_one() {
        let mut machine = Machine::new();
        // two noop-decoded words so the pc has somewhere to go
        machine.load(&[0x01, 0x23, 0x01, 0x23]).unwrap();
        machine.state.sound_timer = 2;

        let beeps = Rc::new(Cell::new(0));
        let counter = Rc::clone(&beeps);
        machine.set_beep(move || counter.set(counter.get() + 1));

        machine.cycle().unwrap();
        assert_eq!(beeps.get(), 1);
        machine.cycle().unwrap();
        assert_eq!(beeps.get(), 1);
        assert_eq!(machine.sound_timer(), 0);
    }

    #[test]
    fn test_draw_sets_a_pending_frame() {
        let mut machine = Machine::new();
        machine.load(&[0xD0, 0x05]).unwrap();
        machine.frame();
        machine.cycle().unwrap();
        let frame = machine.frame().expect("draw should leave a frame pending");
        assert_eq!(frame[0][0..4], [1, 1, 1, 1]);
    }

    #[test]
    fn test_unbalanced_return_reports_a_stack_fault() {
        let mut machine = Machine::new();
        machine.load(&[0x00, 0xEE]).unwrap();
        assert!(matches!(
            machine.cycle(),
            Err(Error::StackUnderflow { pc: 0x200 })
        ));
    }
}
