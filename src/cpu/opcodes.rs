//! Primary (non-prefixed) opcode dispatch: one dense `match` over the
//! raw opcode byte. Each arm owns its own PC advancement (via
//! `fetch_byte`/`fetch_word`) and returns the M-cycles it consumed.

use crate::bus::Bus;
use crate::error::GbError;

use super::alu;
use super::registers::{Flags, Reg16, Reg8};
use super::Cpu;

/// Decode one of the eight 3-bit register-field encodings used
/// throughout the primary and CB tables: 0=B,1=C,2=D,3=E,4=H,5=L,
/// 6=(HL),7=A.
pub(super) fn read_r8(cpu: &mut Cpu, bus: &mut Bus, index: u8) -> u8 {
    match index {
        0 => cpu.regs.read8(Reg8::B),
        1 => cpu.regs.read8(Reg8::C),
        2 => cpu.regs.read8(Reg8::D),
        3 => cpu.regs.read8(Reg8::E),
        4 => cpu.regs.read8(Reg8::H),
        5 => cpu.regs.read8(Reg8::L),
        6 => bus.read(cpu.regs.read16(Reg16::HL)),
        7 => cpu.regs.read8(Reg8::A),
        _ => unreachable!(),
    }
}

pub(super) fn write_r8(cpu: &mut Cpu, bus: &mut Bus, index: u8, value: u8) {
    match index {
        0 => cpu.regs.write8(Reg8::B, value),
        1 => cpu.regs.write8(Reg8::C, value),
        2 => cpu.regs.write8(Reg8::D, value),
        3 => cpu.regs.write8(Reg8::E, value),
        4 => cpu.regs.write8(Reg8::H, value),
        5 => cpu.regs.write8(Reg8::L, value),
        6 => bus.write(cpu.regs.read16(Reg16::HL), value),
        7 => cpu.regs.write8(Reg8::A, value),
        _ => unreachable!(),
    }
}

fn condition(cpu: &Cpu, code: u8) -> bool {
    match code {
        0 => !cpu.regs.flag(Flags::ZERO),  // NZ
        1 => cpu.regs.flag(Flags::ZERO),   // Z
        2 => !cpu.regs.flag(Flags::CARRY), // NC
        3 => cpu.regs.flag(Flags::CARRY),  // C
        _ => unreachable!(),
    }
}

fn jr(cpu: &mut Cpu, bus: &mut Bus) {
    let offset = cpu.fetch_byte(bus) as i8;
    cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
}

fn push_and_jump(cpu: &mut Cpu, bus: &mut Bus, target: u16) {
    let return_addr = cpu.regs.pc;
    cpu.push(bus, return_addr);
    cpu.regs.pc = target;
}

pub fn execute(cpu: &mut Cpu, bus: &mut Bus, opcode: u8, pc: u16) -> u8 {
    match opcode {
        0x00 => 1, // NOP
        0x10 => 1, // STOP, treated as NOP

        // 16-bit immediate loads.
        0x01 => { let v = cpu.fetch_word(bus); cpu.regs.write16(Reg16::BC, v); 3 }
        0x11 => { let v = cpu.fetch_word(bus); cpu.regs.write16(Reg16::DE, v); 3 }
        0x21 => { let v = cpu.fetch_word(bus); cpu.regs.write16(Reg16::HL, v); 3 }
        0x31 => { let v = cpu.fetch_word(bus); cpu.regs.sp = v; 3 }

        // Indirect loads through BC/DE/HL+/HL-.
        0x02 => { bus.write(cpu.regs.read16(Reg16::BC), cpu.regs.read8(Reg8::A)); 2 }
        0x12 => { bus.write(cpu.regs.read16(Reg16::DE), cpu.regs.read8(Reg8::A)); 2 }
        0x22 => {
            let hl = cpu.regs.read16(Reg16::HL);
            bus.write(hl, cpu.regs.read8(Reg8::A));
            cpu.regs.write16(Reg16::HL, hl.wrapping_add(1));
            2
        }
        0x32 => {
            let hl = cpu.regs.read16(Reg16::HL);
            bus.write(hl, cpu.regs.read8(Reg8::A));
            cpu.regs.write16(Reg16::HL, hl.wrapping_sub(1));
            2
        }
        0x0A => { let v = bus.read(cpu.regs.read16(Reg16::BC)); cpu.regs.write8(Reg8::A, v); 2 }
        0x1A => { let v = bus.read(cpu.regs.read16(Reg16::DE)); cpu.regs.write8(Reg8::A, v); 2 }
        0x2A => {
            let hl = cpu.regs.read16(Reg16::HL);
            cpu.regs.write8(Reg8::A, bus.read(hl));
            cpu.regs.write16(Reg16::HL, hl.wrapping_add(1));
            2
        }
        0x3A => {
            let hl = cpu.regs.read16(Reg16::HL);
            cpu.regs.write8(Reg8::A, bus.read(hl));
            cpu.regs.write16(Reg16::HL, hl.wrapping_sub(1));
            2
        }

        // 16-bit inc/dec, no flags.
        0x03 => { cpu.regs.write16(Reg16::BC, cpu.regs.read16(Reg16::BC).wrapping_add(1)); 2 }
        0x13 => { cpu.regs.write16(Reg16::DE, cpu.regs.read16(Reg16::DE).wrapping_add(1)); 2 }
        0x23 => { cpu.regs.write16(Reg16::HL, cpu.regs.read16(Reg16::HL).wrapping_add(1)); 2 }
        0x33 => { cpu.regs.sp = cpu.regs.sp.wrapping_add(1); 2 }
        0x0B => { cpu.regs.write16(Reg16::BC, cpu.regs.read16(Reg16::BC).wrapping_sub(1)); 2 }
        0x1B => { cpu.regs.write16(Reg16::DE, cpu.regs.read16(Reg16::DE).wrapping_sub(1)); 2 }
        0x2B => { cpu.regs.write16(Reg16::HL, cpu.regs.read16(Reg16::HL).wrapping_sub(1)); 2 }
        0x3B => { cpu.regs.sp = cpu.regs.sp.wrapping_sub(1); 2 }

        // 8-bit inc/dec across all r8 slots including (HL).
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let index = (opcode >> 3) & 7;
            let v = read_r8(cpu, bus, index);
            let result = alu::inc8(&mut cpu.regs, v);
            write_r8(cpu, bus, index, result);
            if index == 6 { 3 } else { 1 }
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let index = (opcode >> 3) & 7;
            let v = read_r8(cpu, bus, index);
            let result = alu::dec8(&mut cpu.regs, v);
            write_r8(cpu, bus, index, result);
            if index == 6 { 3 } else { 1 }
        }

        // 8-bit immediate loads.
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let index = (opcode >> 3) & 7;
            let imm = cpu.fetch_byte(bus);
            write_r8(cpu, bus, index, imm);
            if index == 6 { 3 } else { 2 }
        }

        // Rotate-A forms: always clear Z.
        0x07 => { let a = cpu.regs.read8(Reg8::A); let r = alu::rlc(&mut cpu.regs, a); cpu.regs.write8(Reg8::A, r); cpu.regs.set_flag(Flags::ZERO, false); 1 }
        0x0F => { let a = cpu.regs.read8(Reg8::A); let r = alu::rrc(&mut cpu.regs, a); cpu.regs.write8(Reg8::A, r); cpu.regs.set_flag(Flags::ZERO, false); 1 }
        0x17 => { let a = cpu.regs.read8(Reg8::A); let r = alu::rl(&mut cpu.regs, a); cpu.regs.write8(Reg8::A, r); cpu.regs.set_flag(Flags::ZERO, false); 1 }
        0x1F => { let a = cpu.regs.read8(Reg8::A); let r = alu::rr(&mut cpu.regs, a); cpu.regs.write8(Reg8::A, r); cpu.regs.set_flag(Flags::ZERO, false); 1 }

        0x08 => { // ld (a16),sp
            let addr = cpu.fetch_word(bus);
            bus.write_word(addr, cpu.regs.sp);
            5
        }

        0x09 => { let v = alu::add16(&mut cpu.regs, cpu.regs.read16(Reg16::HL), cpu.regs.read16(Reg16::BC)); cpu.regs.write16(Reg16::HL, v); 2 }
        0x19 => { let v = alu::add16(&mut cpu.regs, cpu.regs.read16(Reg16::HL), cpu.regs.read16(Reg16::DE)); cpu.regs.write16(Reg16::HL, v); 2 }
        0x29 => { let hl = cpu.regs.read16(Reg16::HL); let v = alu::add16(&mut cpu.regs, hl, hl); cpu.regs.write16(Reg16::HL, v); 2 }
        0x39 => { let v = alu::add16(&mut cpu.regs, cpu.regs.read16(Reg16::HL), cpu.regs.sp); cpu.regs.write16(Reg16::HL, v); 2 }

        0x18 => { jr(cpu, bus); 3 }
        0x20 | 0x28 | 0x30 | 0x38 => {
            let code = (opcode >> 3) & 3;
            let offset = cpu.fetch_byte(bus) as i8;
            if condition(cpu, code) {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
                3
            } else {
                2
            }
        }

        0x27 => { let a = cpu.regs.read8(Reg8::A); let r = alu::daa(&mut cpu.regs, a); cpu.regs.write8(Reg8::A, r); 1 }
        0x2F => {
            let a = cpu.regs.read8(Reg8::A);
            cpu.regs.write8(Reg8::A, !a);
            cpu.regs.set_flag(Flags::SUBTRACT, true);
            cpu.regs.set_flag(Flags::HALF_CARRY, true);
            1
        }
        0x37 => { cpu.regs.set_flag(Flags::SUBTRACT, false); cpu.regs.set_flag(Flags::HALF_CARRY, false); cpu.regs.set_flag(Flags::CARRY, true); 1 }
        0x3F => {
            let carry = cpu.regs.flag(Flags::CARRY);
            cpu.regs.set_flag(Flags::SUBTRACT, false);
            cpu.regs.set_flag(Flags::HALF_CARRY, false);
            cpu.regs.set_flag(Flags::CARRY, !carry);
            1
        }

        0x76 => { cpu.enter_halt(); 1 }

        // ld r,r' block.
        0x40..=0x7F => {
            let dst = (opcode >> 3) & 7;
            let src = opcode & 7;
            let v = read_r8(cpu, bus, src);
            write_r8(cpu, bus, dst, v);
            if dst == 6 || src == 6 { 2 } else { 1 }
        }

        // add/adc/sub/sbc/and/xor/or/cp A,r8.
        0x80..=0xBF => {
            let op_index = (opcode >> 3) & 7;
            let src = opcode & 7;
            let operand = read_r8(cpu, bus, src);
            let a = cpu.regs.read8(Reg8::A);
            let write_back = apply_alu_op(cpu, op_index, a, operand);
            if let Some(result) = write_back {
                cpu.regs.write8(Reg8::A, result);
            }
            if src == 6 { 2 } else { 1 }
        }

        0xC6 => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::add8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xCE => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::adc8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xD6 => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::sub8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xDE => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::sbc8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xE6 => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::and8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xEE => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::xor8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xF6 => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); let r = alu::or8(&mut cpu.regs, a, n); cpu.regs.write8(Reg8::A, r); 2 }
        0xFE => { let n = cpu.fetch_byte(bus); let a = cpu.regs.read8(Reg8::A); alu::cp8(&mut cpu.regs, a, n); 2 }

        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            let code = (opcode >> 3) & 3;
            if condition(cpu, code) {
                cpu.regs.pc = cpu.pop(bus);
                5
            } else {
                2
            }
        }
        0xC9 => { cpu.regs.pc = cpu.pop(bus); 4 }
        0xD9 => { cpu.regs.pc = cpu.pop(bus); cpu.ime = true; 4 }

        0xC1 => { let v = cpu.pop(bus); cpu.regs.write16(Reg16::BC, v); 3 }
        0xD1 => { let v = cpu.pop(bus); cpu.regs.write16(Reg16::DE, v); 3 }
        0xE1 => { let v = cpu.pop(bus); cpu.regs.write16(Reg16::HL, v); 3 }
        0xF1 => { let v = cpu.pop(bus) & 0xFFF0; cpu.regs.write16(Reg16::AF, v); 3 }

        0xC5 => { let v = cpu.regs.read16(Reg16::BC); cpu.push(bus, v); 4 }
        0xD5 => { let v = cpu.regs.read16(Reg16::DE); cpu.push(bus, v); 4 }
        0xE5 => { let v = cpu.regs.read16(Reg16::HL); cpu.push(bus, v); 4 }
        0xF5 => { let v = cpu.regs.read16(Reg16::AF); cpu.push(bus, v); 4 }

        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let code = (opcode >> 3) & 3;
            let target = cpu.fetch_word(bus);
            if condition(cpu, code) { cpu.regs.pc = target; 4 } else { 3 }
        }
        0xC3 => { cpu.regs.pc = cpu.fetch_word(bus); 4 }
        0xE9 => { cpu.regs.pc = cpu.regs.read16(Reg16::HL); 1 }

        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let code = (opcode >> 3) & 3;
            let target = cpu.fetch_word(bus);
            if condition(cpu, code) { push_and_jump(cpu, bus, target); 6 } else { 3 }
        }
        0xCD => { let target = cpu.fetch_word(bus); push_and_jump(cpu, bus, target); 6 }

        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            let vector = (opcode & 0x38) as u16;
            push_and_jump(cpu, bus, vector);
            4
        }

        0xE0 => { let n = cpu.fetch_byte(bus); bus.write(0xFF00 | n as u16, cpu.regs.read8(Reg8::A)); 3 }
        0xF0 => { let n = cpu.fetch_byte(bus); let v = bus.read(0xFF00 | n as u16); cpu.regs.write8(Reg8::A, v); 3 }
        0xE2 => { bus.write(0xFF00 | cpu.regs.read8(Reg8::C) as u16, cpu.regs.read8(Reg8::A)); 2 }
        0xF2 => { let v = bus.read(0xFF00 | cpu.regs.read8(Reg8::C) as u16); cpu.regs.write8(Reg8::A, v); 2 }
        0xEA => { let addr = cpu.fetch_word(bus); bus.write(addr, cpu.regs.read8(Reg8::A)); 4 }
        0xFA => { let addr = cpu.fetch_word(bus); let v = bus.read(addr); cpu.regs.write8(Reg8::A, v); 4 }

        0xE8 => {
            let e8 = cpu.fetch_byte(bus) as i8;
            let result = alu::add_sp_e8(&mut cpu.regs, cpu.regs.sp, e8);
            cpu.regs.sp = result;
            4
        }
        0xF8 => {
            let e8 = cpu.fetch_byte(bus) as i8;
            let result = alu::add_sp_e8(&mut cpu.regs, cpu.regs.sp, e8);
            cpu.regs.write16(Reg16::HL, result);
            3
        }
        0xF9 => { cpu.regs.sp = cpu.regs.read16(Reg16::HL); 2 }

        0xF3 => { cpu.ime = false; 1 }
        0xFB => { cpu.set_ei_pending(); 1 }

        0xCB => unreachable!("0xCB is intercepted by Cpu::step before reaching the primary table"),

        0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED | 0xF4 | 0xFC | 0xFD => {
            panic!("{}", GbError::UnimplementedOpcode { pc, opcode });
        }
    }
}

/// Applies the ALU operation selected by the 3-bit `op_index` used in
/// the 0x80-0xBF block (and shared meaning with other tables): returns
/// `Some(result)` for operations that write back to A, `None` for CP.
fn apply_alu_op(cpu: &mut Cpu, op_index: u8, a: u8, operand: u8) -> Option<u8> {
    match op_index {
        0 => Some(alu::add8(&mut cpu.regs, a, operand)),
        1 => Some(alu::adc8(&mut cpu.regs, a, operand)),
        2 => Some(alu::sub8(&mut cpu.regs, a, operand)),
        3 => Some(alu::sbc8(&mut cpu.regs, a, operand)),
        4 => Some(alu::and8(&mut cpu.regs, a, operand)),
        5 => Some(alu::xor8(&mut cpu.regs, a, operand)),
        6 => Some(alu::or8(&mut cpu.regs, a, operand)),
        7 => { alu::cp8(&mut cpu.regs, a, operand); None }
        _ => unreachable!(),
    }
}
