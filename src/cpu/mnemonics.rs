//! A static opcode-to-mnemonic lookup table, used only for `trace!`
//! diagnostics so a host running with `RUST_LOG=trace` gets readable
//! instruction traces. Built once, lazily, since it's sizeable and
//! otherwise never touched in normal operation.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref PRIMARY_MNEMONICS: HashMap<u8, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0x00, "nop");
        m.insert(0x01, "ld bc,d16");
        m.insert(0x02, "ld (bc),a");
        m.insert(0x06, "ld b,d8");
        m.insert(0x18, "jr e8");
        m.insert(0x20, "jr nz,e8");
        m.insert(0x27, "daa");
        m.insert(0x76, "halt");
        m.insert(0xC3, "jp a16");
        m.insert(0xC9, "ret");
        m.insert(0xCD, "call a16");
        m.insert(0xF3, "di");
        m.insert(0xFB, "ei");
        m
    };
}

/// Best-effort mnemonic for a primary-table opcode; instructions not
/// worth naming individually (the bulk of the `ld r,r'` and ALU
/// blocks, whose shape is obvious from the opcode byte itself) fall
/// back to a generic label.
pub fn primary_mnemonic(opcode: u8) -> &'static str {
    PRIMARY_MNEMONICS.get(&opcode).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_opcode_resolves() {
        assert_eq!(primary_mnemonic(0xC9), "ret");
    }

    #[test]
    fn unknown_opcode_falls_back() {
        assert_eq!(primary_mnemonic(0x41), "?");
    }
}
