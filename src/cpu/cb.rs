//! CB-prefixed opcode dispatch: rotates/shifts, BIT/RES/SET, all
//! operating uniformly over the eight r8 slots (including `(HL)`)
//! via the 3-bit field shared with the primary table's 0x40-0xBF block.

use crate::bus::Bus;

use super::alu;
use super::opcodes::{read_r8, write_r8};
use super::Cpu;

pub fn execute(cpu: &mut Cpu, bus: &mut Bus, opcode: u8) -> u8 {
    let reg_index = opcode & 7;
    let group = opcode >> 3;
    // Every CB-prefixed op on (HL) costs 4 M-cycles except BIT n,(HL),
    // which costs 3 (it never writes the result back).
    let rw_cycles = if reg_index == 6 { 4 } else { 2 };

    match group {
        0x00..=0x07 => {
            let v = read_r8(cpu, bus, reg_index);
            let result = match group {
                0x00 => alu::rlc(&mut cpu.regs, v),
                0x01 => alu::rrc(&mut cpu.regs, v),
                0x02 => alu::rl(&mut cpu.regs, v),
                0x03 => alu::rr(&mut cpu.regs, v),
                0x04 => alu::sla(&mut cpu.regs, v),
                0x05 => alu::sra(&mut cpu.regs, v),
                0x06 => alu::swap(&mut cpu.regs, v),
                0x07 => alu::srl(&mut cpu.regs, v),
                _ => unreachable!(),
            };
            write_r8(cpu, bus, reg_index, result);
            rw_cycles
        }
        // BIT n,r8: 0x08..=0x0F group index range is actually 0x40-0x7F
        // in raw-opcode terms; `group` here is opcode>>3 so BIT spans
        // group 8..=15.
        0x08..=0x0F => {
            let bit_n = group - 0x08;
            let v = read_r8(cpu, bus, reg_index);
            alu::bit(&mut cpu.regs, v, bit_n);
            if reg_index == 6 { 3 } else { 2 }
        }
        0x10..=0x17 => {
            let bit_n = group - 0x10;
            let v = read_r8(cpu, bus, reg_index);
            write_r8(cpu, bus, reg_index, v & !(1 << bit_n));
            rw_cycles
        }
        0x18..=0x1F => {
            let bit_n = group - 0x18;
            let v = read_r8(cpu, bus, reg_index);
            write_r8(cpu, bus, reg_index, v | (1 << bit_n));
            rw_cycles
        }
        _ => unreachable!("cb opcode group out of range: {:#04x}", opcode),
    }
}
