//! SM83 instruction interpreter: registers, IME/HALT state machine,
//! interrupt dispatch, and the two dense opcode tables (`opcodes`,
//! `cb`) that do the actual fetch-decode-execute work.

mod alu;
mod cb;
mod mnemonics;
mod opcodes;
mod registers;

use log::trace;

use crate::bus::interrupts::InterruptKind;
use crate::bus::Bus;

pub use registers::{Flags, Reg16, Reg8, Registers};

/// Running vs. Halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted,
}

pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    ei_pending: bool,
    pub state: CpuState,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            ime: false,
            ei_pending: false,
            state: CpuState::Running,
        }
    }

    /// Read the byte at PC and advance PC by one.
    pub(crate) fn fetch_byte(&mut self, bus: &mut Bus) -> u8 {
        let byte = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    /// Read the little-endian word at PC and advance PC by two.
    pub(crate) fn fetch_word(&mut self, bus: &mut Bus) -> u16 {
        let low = self.fetch_byte(bus) as u16;
        let high = self.fetch_byte(bus) as u16;
        (high << 8) | low
    }

    pub(crate) fn push(&mut self, bus: &mut Bus, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, (value >> 8) as u8);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, value as u8);
    }

    pub(crate) fn pop(&mut self, bus: &mut Bus) -> u16 {
        let low = bus.read(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let high = bus.read(self.regs.sp) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        (high << 8) | low
    }

    pub(crate) fn set_ei_pending(&mut self) {
        self.ei_pending = true;
    }

    pub(crate) fn enter_halt(&mut self) {
        self.state = CpuState::Halted;
    }

    /// Execute one instruction (or, while halted, idle one M-cycle),
    /// after dispatching any pending interrupt. Returns the M-cycles
    /// consumed.
    pub fn step(&mut self, bus: &mut Bus) -> u8 {
        if self.ei_pending {
            self.ime = true;
            self.ei_pending = false;
        } else if self.ime {
            if let Some(kind) = bus.interrupts.pending_source() {
                return self.dispatch_interrupt(bus, kind);
            }
        }

        if self.state == CpuState::Halted {
            if bus.interrupts.pending_mask() != 0 {
                self.state = CpuState::Running;
            } else {
                return 1;
            }
        }

        let pc = self.regs.pc;
        let opcode = self.fetch_byte(bus);

        if opcode == 0xCB {
            let cb_opcode = self.fetch_byte(bus);
            trace!("pc={:#06x} opcode=cb {:#04x}", pc, cb_opcode);
            cb::execute(self, bus, cb_opcode)
        } else {
            trace!("pc={:#06x} opcode={:#04x} ({})", pc, opcode, mnemonics::primary_mnemonic(opcode));
            opcodes::execute(self, bus, opcode, pc)
        }
    }

    fn dispatch_interrupt(&mut self, bus: &mut Bus, kind: InterruptKind) -> u8 {
        self.ime = false;
        bus.interrupts.clear(kind);
        self.state = CpuState::Running;
        let pc = self.regs.pc;
        self.push(bus, pc);
        self.regs.pc = kind.vector();
        5
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bus() -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0147] = 0x00;
        Bus::new(rom, None).unwrap()
    }

    #[test]
    fn ld_a_b_loads_register_to_register() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.write16(Reg16::BC, 0x1234);
        bus.write(0x0100, 0x78); // ld a,b
        cpu.regs.pc = 0x0100;
        let cycles = cpu.step(&mut bus);
        assert_eq!(cpu.regs.read8(Reg8::A), 0x12);
        assert_eq!(cycles, 1);
        assert_eq!(cpu.regs.pc, 0x0101);
    }

    #[test]
    fn inc_a_overflow_sets_zero_and_half_carry() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.write8(Reg8::A, 0xFF);
        bus.write(0x0100, 0x3C); // inc a
        cpu.regs.pc = 0x0100;
        cpu.step(&mut bus);
        assert_eq!(cpu.regs.read8(Reg8::A), 0x00);
        assert!(cpu.regs.flag(Flags::ZERO));
        assert!(cpu.regs.flag(Flags::HALF_CARRY));
    }

    #[test]
    fn call_then_ret_round_trips_pc_and_sp() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.sp = 0xFFFE;
        cpu.regs.pc = 0x0100;
        bus.write(0x0100, 0xCD);
        bus.write(0x0101, 0x50);
        bus.write(0x0102, 0x02);
        bus.write(0x0250, 0xC9); // ret

        cpu.step(&mut bus);
        assert_eq!(cpu.regs.pc, 0x0250);
        assert_eq!(cpu.regs.sp, 0xFFFC);

        cpu.step(&mut bus);
        assert_eq!(cpu.regs.pc, 0x0103);
        assert_eq!(cpu.regs.sp, 0xFFFE);
    }

    #[test]
    fn halted_cpu_wakes_on_pending_interrupt() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.enter_halt();
        bus.interrupts.set_ie_reg(0x01);
        bus.interrupts.request(InterruptKind::VBlank);
        let cycles = cpu.step(&mut bus);
        assert_eq!(cpu.state, CpuState::Running);
        // IME was false, so this step just resumed fetch -- no dispatch.
        assert_eq!(cycles, 1);
    }

    #[test]
    fn ei_pending_delays_ime_by_one_instruction() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.pc = 0x0100;
        bus.write(0x0100, 0xFB); // ei
        bus.write(0x0101, 0x00); // nop
        cpu.step(&mut bus);
        assert!(!cpu.ime);
        cpu.step(&mut bus);
        assert!(cpu.ime);
    }
}
