use std::fmt;

use crate::constants::{DUMP_WINDOW, REGISTER_COUNT};
use crate::state::State;

/// A snapshot of everything needed to diagnose a halted Chip-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDump {
    pub pc: u16,
    pub i: u16,
    pub sp: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub v: [u8; REGISTER_COUNT],
    pub stack: Vec<u16>,
    /// `(address, word)` pairs from `DUMP_WINDOW` bytes before the PC up to the PC.
    /// Bytes past the end of memory read as 0.
    pub memory: Vec<(u16, u16)>,
}

impl StateDump {
    pub fn capture(state: &State) -> Self {
        let byte = |address: u16| state.memory.get(usize::from(address)).copied().unwrap_or(0);
        let start = state.pc.saturating_sub(DUMP_WINDOW);
        let memory = (start..=state.pc)
            .step_by(2)
            .map(|address| {
                let word = u16::from(byte(address)) << 8 | u16::from(byte(address.wrapping_add(1)));
                (address, word)
            })
            .collect();

        StateDump {
            pc: state.pc,
            i: state.i,
            sp: state.sp,
            delay_timer: state.delay_timer,
            sound_timer: state.sound_timer,
            v: state.v,
            stack: state.stack.to_vec(),
            memory,
        }
    }
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------DUMP START------")?;
        writeln!(f, "PC:\t{:04X}", self.pc)?;
        writeln!(f, "I:\t{:04X}", self.i)?;
        writeln!(f, "SP:\t{:04X}", self.sp)?;
        writeln!(f, "DT:\t{:02X}", self.delay_timer)?;
        writeln!(f, "ST:\t{:02X}", self.sound_timer)?;
        writeln!(f, "Registers:")?;
        for (index, value) in self.v.iter().enumerate() {
            writeln!(f, "\tV{:X}:\t{:02X}", index, value)?;
        }
        writeln!(f, "Stack:")?;
        for (index, address) in self.stack.iter().enumerate() {
            writeln!(f, "\tStack[{:02X}]:\t{:04X}", index, address)?;
        }
        writeln!(f, "Memory:")?;
        for (address, word) in self.memory.iter() {
            writeln!(f, "\t{:04X}\t{:04X}", address, word)?;
        }
        write!(f, "------DUMP END------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STACK_SIZE;

    #[test]
    fn test_captures_registers_and_whole_stack() {
        let mut state = State::new(&[]);
        state.v[0xA] = 0x42;
        state.i = 0x123;
        state.sp = 2;
        state.stack[1] = 0x0456;
        state.delay_timer = 3;
        state.sound_timer = 4;
        let dump = StateDump::capture(&state);
        assert_eq!(dump.pc, 0x200);
        assert_eq!(dump.i, 0x123);
        assert_eq!(dump.sp, 2);
        assert_eq!(dump.v[0xA], 0x42);
        assert_eq!(dump.delay_timer, 3);
        assert_eq!(dump.sound_timer, 4);
        assert_eq!(dump.stack.len(), STACK_SIZE);
        assert_eq!(dump.stack[1], 0x0456);
    }

    #[test]
    fn test_memory_window_leads_up_to_pc() {
        let mut state = State::new(&[0x12, 0x34]);
        state.pc = 0x202;
        let dump = StateDump::capture(&state);
        assert_eq!(dump.memory.first(), Some(&(0x202 - DUMP_WINDOW, 0x0000)));
        assert_eq!(dump.memory.len(), 11);
        assert!(dump.memory.contains(&(0x200, 0x1234)));
        assert_eq!(dump.memory.last(), Some(&(0x202, 0x0000)));
    }

    #[test]
    fn test_memory_window_is_clamped_at_zero() {
        let mut state = State::new(&[]);
        state.pc = 0x4;
        let dump = StateDump::capture(&state);
        assert_eq!(dump.memory, vec![(0x0, 0xF090), (0x2, 0x9090), (0x4, 0xF020)]);
    }

    #[test]
    fn test_memory_window_reads_past_the_end_as_zero() {
        let mut state = State::new(&[]);
        state.pc = 0xFFE;
        state.memory[0xFFE] = 0xAB;
        let dump = StateDump::capture(&state);
        assert_eq!(dump.memory.last(), Some(&(0xFFE, 0xAB00)));
    }

    #[test]
    fn test_display_lists_everything() {
        let dump = StateDump::capture(&State::new(&[0x00, 0xE0]));
        let text = dump.to_string();
        assert!(text.starts_with("------DUMP START------"));
        assert!(text.contains("PC:\t0200"));
        assert!(text.contains("\tVF:\t00"));
        assert!(text.contains("\tStack[FE]:\t0000"));
        assert!(text.contains("\t0200\t00E0"));
        assert!(text.ends_with("------DUMP END------"));
    }
}
