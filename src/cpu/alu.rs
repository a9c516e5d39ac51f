//! Flag-exact arithmetic and shift/rotate helpers shared by the primary
//! and CB-prefixed dispatch tables. Every function here takes the
//! current register file to recompute flags into and returns the
//! arithmetic result; callers are responsible for writing the result
//! back into whichever register or memory cell it belongs in.

use super::registers::{Flags, Registers};

pub fn add8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let (result, carry) = a.overflowing_add(op);
    let half_carry = (a & 0x0F) + (op & 0x0F) > 0x0F;
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::HALF_CARRY, half_carry);
    flags.set(Flags::CARRY, carry);
    regs.set_flags(flags);
    result
}

pub fn adc8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let carry_in = regs.flag(Flags::CARRY) as u8;
    let (partial, carry1) = a.overflowing_add(op);
    let (result, carry2) = partial.overflowing_add(carry_in);
    let half_carry = (a & 0x0F) + (op & 0x0F) + carry_in > 0x0F;
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::HALF_CARRY, half_carry);
    flags.set(Flags::CARRY, carry1 || carry2);
    regs.set_flags(flags);
    result
}

pub fn sub8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let (result, carry) = a.overflowing_sub(op);
    let half_carry = (a & 0x0F) < (op & 0x0F);
    let mut flags = Flags::SUBTRACT;
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::HALF_CARRY, half_carry);
    flags.set(Flags::CARRY, carry);
    regs.set_flags(flags);
    result
}

pub fn sbc8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let carry_in = regs.flag(Flags::CARRY) as u8;
    let (partial, carry1) = a.overflowing_sub(op);
    let (result, carry2) = partial.overflowing_sub(carry_in);
    let half_carry = (a & 0x0F) < (op & 0x0F) + carry_in;
    let mut flags = Flags::SUBTRACT;
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::HALF_CARRY, half_carry);
    flags.set(Flags::CARRY, carry1 || carry2);
    regs.set_flags(flags);
    result
}

pub fn and8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let result = a & op;
    let mut flags = Flags::HALF_CARRY;
    flags.set(Flags::ZERO, result == 0);
    regs.set_flags(flags);
    result
}

pub fn or8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let result = a | op;
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    regs.set_flags(flags);
    result
}

pub fn xor8(regs: &mut Registers, a: u8, op: u8) -> u8 {
    let result = a ^ op;
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    regs.set_flags(flags);
    result
}

/// Same flag contract as `sub8`, but the caller discards the result.
pub fn cp8(regs: &mut Registers, a: u8, op: u8) {
    sub8(regs, a, op);
}

pub fn inc8(regs: &mut Registers, v: u8) -> u8 {
    let result = v.wrapping_add(1);
    let half_carry = (v & 0x0F) == 0x0F;
    regs.set_flag(Flags::ZERO, result == 0);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, half_carry);
    result
}

pub fn dec8(regs: &mut Registers, v: u8) -> u8 {
    let result = v.wrapping_sub(1);
    let half_carry = (v & 0x0F) == 0x00;
    regs.set_flag(Flags::ZERO, result == 0);
    regs.set_flag(Flags::SUBTRACT, true);
    regs.set_flag(Flags::HALF_CARRY, half_carry);
    result
}

pub fn add16(regs: &mut Registers, a: u16, op: u16) -> u16 {
    let (result, carry) = a.overflowing_add(op);
    let half_carry = (a & 0x0FFF) + (op & 0x0FFF) > 0x0FFF;
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, half_carry);
    regs.set_flag(Flags::CARRY, carry);
    result
}

/// Shared arithmetic for `add sp,e8` and `ld hl,sp+e8`: the hardware
/// computes H/C from the *unsigned* low byte of SP plus the raw `e8`
/// byte, then sign-extends for the 16-bit result.
pub fn add_sp_e8(regs: &mut Registers, sp: u16, e8: i8) -> u16 {
    let low = sp as u8;
    let (_, half_carry_in) = (low & 0x0F).overflowing_add((e8 as u8) & 0x0F);
    let half_carry = half_carry_in || (low & 0x0F) + ((e8 as u8) & 0x0F) > 0x0F;
    let (_, carry) = low.overflowing_add(e8 as u8);
    let result = (sp as i32 + e8 as i32) as u16;

    let mut flags = Flags::empty();
    flags.set(Flags::HALF_CARRY, half_carry);
    flags.set(Flags::CARRY, carry);
    regs.set_flags(flags);
    result
}

pub fn daa(regs: &mut Registers, a: u8) -> u8 {
    let subtract = regs.flag(Flags::SUBTRACT);
    let mut half_carry = regs.flag(Flags::HALF_CARRY);
    let mut carry = regs.flag(Flags::CARRY);
    let mut result = a;

    if !subtract {
        if carry || result > 0x99 {
            result = result.wrapping_add(0x60);
            carry = true;
        }
        if half_carry || (result & 0x0F) > 0x09 {
            result = result.wrapping_add(0x06);
        }
    } else {
        if carry {
            result = result.wrapping_sub(0x60);
        }
        if half_carry {
            result = result.wrapping_sub(0x06);
        }
    }
    half_carry = false;

    regs.set_flag(Flags::ZERO, result == 0);
    regs.set_flag(Flags::HALF_CARRY, half_carry);
    regs.set_flag(Flags::CARRY, carry);
    result
}

pub fn rlc(regs: &mut Registers, v: u8) -> u8 {
    let carry = v & 0x80 != 0;
    let result = v.rotate_left(1);
    set_shift_flags(regs, result, carry);
    result
}

pub fn rrc(regs: &mut Registers, v: u8) -> u8 {
    let carry = v & 0x01 != 0;
    let result = v.rotate_right(1);
    set_shift_flags(regs, result, carry);
    result
}

pub fn rl(regs: &mut Registers, v: u8) -> u8 {
    let carry_in = regs.flag(Flags::CARRY) as u8;
    let carry_out = v & 0x80 != 0;
    let result = (v << 1) | carry_in;
    set_shift_flags(regs, result, carry_out);
    result
}

pub fn rr(regs: &mut Registers, v: u8) -> u8 {
    let carry_in = regs.flag(Flags::CARRY) as u8;
    let carry_out = v & 0x01 != 0;
    let result = (v >> 1) | (carry_in << 7);
    set_shift_flags(regs, result, carry_out);
    result
}

pub fn sla(regs: &mut Registers, v: u8) -> u8 {
    let carry = v & 0x80 != 0;
    let result = v << 1;
    set_shift_flags(regs, result, carry);
    result
}

pub fn sra(regs: &mut Registers, v: u8) -> u8 {
    let carry = v & 0x01 != 0;
    let result = (v >> 1) | (v & 0x80);
    set_shift_flags(regs, result, carry);
    result
}

pub fn srl(regs: &mut Registers, v: u8) -> u8 {
    let carry = v & 0x01 != 0;
    let result = v >> 1;
    set_shift_flags(regs, result, carry);
    result
}

pub fn swap(regs: &mut Registers, v: u8) -> u8 {
    let result = (v << 4) | (v >> 4);
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    regs.set_flags(flags);
    result
}

fn set_shift_flags(regs: &mut Registers, result: u8, carry: bool) {
    let mut flags = Flags::empty();
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::CARRY, carry);
    regs.set_flags(flags);
}

/// `bit n,r`: Z reflects the tested bit, H is always set, C untouched.
pub fn bit(regs: &mut Registers, v: u8, n: u8) {
    let is_set = v & (1 << n) != 0;
    regs.set_flag(Flags::ZERO, !is_set);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add8_sets_half_and_full_carry() {
        let mut regs = Registers::new();
        let result = add8(&mut regs, 0x0F, 0x01);
        assert_eq!(result, 0x10);
        assert!(regs.flag(Flags::HALF_CARRY));
        assert!(!regs.flag(Flags::CARRY));
    }

    #[test]
    fn inc_wraps_and_sets_half_carry_without_touching_c() {
        let mut regs = Registers::new();
        regs.set_flag(Flags::CARRY, true);
        let result = inc8(&mut regs, 0xFF);
        assert_eq!(result, 0x00);
        assert!(regs.flag(Flags::ZERO));
        assert!(regs.flag(Flags::HALF_CARRY));
        assert!(regs.flag(Flags::CARRY));
    }

    #[test]
    fn daa_after_bcd_addition() {
        let mut regs = Registers::new();
        // 0x45 + 0x38 = 0x7D raw; low nibble 0xD needs the +0x06 correction.
        let raw = add8(&mut regs, 0x45, 0x38);
        let adjusted = daa(&mut regs, raw);
        assert_eq!(adjusted, 0x83);
        assert!(!regs.flag(Flags::CARRY));
    }

    #[test]
    fn rlc_rotates_bit7_into_carry_and_bit0() {
        let mut regs = Registers::new();
        let result = rlc(&mut regs, 0x85);
        assert_eq!(result, 0x0B);
        assert!(regs.flag(Flags::CARRY));
    }

    #[test]
    fn bit_sets_zero_when_clear() {
        let mut regs = Registers::new();
        bit(&mut regs, 0b0000_0000, 3);
        assert!(regs.flag(Flags::ZERO));
        assert!(regs.flag(Flags::HALF_CARRY));
    }
}
