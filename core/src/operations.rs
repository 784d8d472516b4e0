use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, STACK_DEPTH};
use crate::error::Error;
use crate::font::GLYPH_SIZE;
use crate::opcode::Opcode;
use crate::state::{Keys, State};

/// 00E0: clear the frame buffer
pub fn clear(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: state.pc + 0x2,
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// 00EE: PC = STACK.pop() + 2
pub fn ret(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 1;
    Ok(State {
        // return past the call instruction itself
        pc: state.stack[sp as usize] + 0x2,
        sp,
        ..*state
    })
}

/// 1nnn: PC = nnn
pub fn jump(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// 2nnn: STACK.push(PC); PC = nnn
pub fn call(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    if state.sp as usize == STACK_DEPTH {
        return Err(Error::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    Ok(State {
        pc: op.nnn(),
        sp: state.sp + 1,
        stack,
        ..*state
    })
}

/// 3xkk: skip the next instruction if Vx == kk
pub fn skip_eq(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let pc = if state.v[op.x() as usize] == op.kk() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 4xkk: skip the next instruction if Vx != kk
pub fn skip_ne(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let pc = if state.v[op.x() as usize] != op.kk() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 5xy0: skip the next instruction if Vx == Vy
pub fn skip_eq_reg(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let pc = if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 6xkk: Vx = kk
pub fn set(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] = op.kk();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 7xkk: Vx += kk
/// Wraps on overflow without touching the carry flag
pub fn add(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.kk());
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy0: Vx = Vy
pub fn assign(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy1: Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] |= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy2: Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] &= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy3: Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] ^= v[op.y() as usize];
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy4: Vx += Vy; VF = carry
pub fn add_carry(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let (sum, carry) = state.v[op.x() as usize].overflowing_add(state.v[op.y() as usize]);
    let mut v = state.v;
    v[0xF] = carry as u8;
    v[op.x() as usize] = sum;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy5: Vx -= Vy; VF = !borrow
pub fn sub(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let (diff, borrow) = state.v[op.x() as usize].overflowing_sub(state.v[op.y() as usize]);
    let mut v = state.v;
    v[0xF] = !borrow as u8;
    v[op.x() as usize] = diff;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy6: VF = lsb(Vx); Vx >>= 1
pub fn shift_right(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[0xF] = v[op.x() as usize] & 0x1;
    v[op.x() as usize] >>= 1;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xy7: Vx = Vy - Vx; VF = !borrow
pub fn sub_reverse(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let (diff, borrow) = state.v[op.y() as usize].overflowing_sub(state.v[op.x() as usize]);
    let mut v = state.v;
    v[0xF] = !borrow as u8;
    v[op.x() as usize] = diff;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xyE: VF = msb(Vx); Vx <<= 1
pub fn shift_left(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[0xF] = v[op.x() as usize] >> 7;
    v[op.x() as usize] <<= 1;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 9xy0: skip the next instruction if Vx != Vy
pub fn skip_ne_reg(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let pc = if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// Annn: I = nnn
pub fn set_index(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: state.pc + 0x2,
        i: op.nnn(),
        ..*state
    })
}

/// Bnnn: PC = nnn + V0
pub fn jump_offset(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: op.nnn() + u16::from(state.v[0x0]),
        ..*state
    })
}

/// Cxkk: Vx = random byte & kk
pub fn random(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let byte: u8 = rand::random();
    let mut v = state.v;
    v[op.x() as usize] = byte & op.kk();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Dxyn: XOR an n-row sprite from memory[I..] onto the frame buffer at (Vx, Vy)
/// VF = 1 if any set pixel was erased by the blit.
/// Rows and columns that fall outside the display are clipped, not wrapped.
pub fn draw(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    let origin_x = state.v[op.x() as usize] as usize;
    let origin_y = state.v[op.y() as usize] as usize;
    v[0xF] = 0x0;

    for row in 0..op.n() as usize {
        let y = origin_y + row;
        if y >= DISPLAY_HEIGHT {
            continue;
        }
        // I may have been pushed past the end of memory by Fx1E
        let sprite = match state.memory.get(state.i as usize + row) {
            Some(&byte) => byte,
            None => break,
        };
        for bit in 0..8 {
            let x = origin_x + bit;
            if x >= DISPLAY_WIDTH {
                continue;
            }
            let pixel = (sprite >> (7 - bit)) & 0x1;
            v[0xF] |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    Ok(State {
        pc: state.pc + 0x2,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Ex9E: skip the next instruction if key Vx is pressed
/// Only the low nibble of Vx names a key; the pad has nothing past 0xF.
pub fn skip_pressed(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State, Error> {
    let pc = if keys[(state.v[op.x() as usize] & 0xF) as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// ExA1: skip the next instruction if key Vx is released
pub fn skip_released(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State, Error> {
    let pc = if keys[(state.v[op.x() as usize] & 0xF) as usize] {
        state.pc + 0x2
    } else {
        state.pc + 0x4
    };
    Ok(State { pc, ..*state })
}

/// Fx07: Vx = DT
pub fn read_delay(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Fx0A: block until a key is down, then Vx = that key
/// While no key is down the pc doesn't advance, so the instruction
/// re-executes on every cycle; the lowest-indexed pressed key wins.
pub fn wait_key(op: &dyn Opcode, state: &State, keys: Keys) -> Result<State, Error> {
    match keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            let mut v = state.v;
            v[op.x() as usize] = key as u8;
            Ok(State {
                pc: state.pc + 0x2,
                v,
                waiting_for_key: false,
                ..*state
            })
        }
        None => Ok(State {
            waiting_for_key: true,
            ..*state
        }),
    }
}

/// Fx15: DT = Vx
pub fn set_delay(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: state.pc + 0x2,
        delay_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// Fx18: ST = Vx
pub fn set_sound(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: state.pc + 0x2,
        sound_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// Fx1E: I += Vx; VF = 1 if the result passes 0xFFF
pub fn add_index(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let sum = u32::from(state.i) + u32::from(state.v[op.x() as usize]);
    let mut v = state.v;
    v[0xF] = (sum > 0xFFF) as u8;
    Ok(State {
        pc: state.pc + 0x2,
        i: sum as u16,
        v,
        ..*state
    })
}

/// Fx29: I = address of the glyph sprite for digit Vx
pub fn glyph(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let digit = state.v[op.x() as usize] & 0xF;
    Ok(State {
        pc: state.pc + 0x2,
        i: u16::from(digit) * GLYPH_SIZE,
        ..*state
    })
}

/// Fx33: memory[I..I+3] = hundreds, tens, ones of Vx
pub fn bcd(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let value = state.v[op.x() as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    for (offset, &digit) in digits.iter().enumerate() {
        // writes past the end of memory are dropped
        if let Some(cell) = memory.get_mut(state.i as usize + offset) {
            *cell = digit;
        }
    }
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// Fx55: memory[I..=I+x] = V0..=Vx
pub fn store(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut memory = state.memory;
    for offset in 0..=op.x() as usize {
        if let Some(cell) = memory.get_mut(state.i as usize + offset) {
            *cell = state.v[offset];
        }
    }
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// Fx65: V0..=Vx = memory[I..=I+x]
pub fn load(op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    let mut v = state.v;
    for offset in 0..=op.x() as usize {
        if let Some(&byte) = state.memory.get(state.i as usize + offset) {
            v[offset] = byte;
        }
    }
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Unassigned patterns within a group fall through to the default pc advance
pub fn noop(_op: &dyn Opcode, state: &State, _keys: Keys) -> Result<State, Error> {
    Ok(State {
        pc: state.pc + 0x2,
        ..*state
    })
}
