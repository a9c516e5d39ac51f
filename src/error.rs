//! Error types surfaced by the core to a host.
//!
//! Hardware-shaped conditions (blocked VRAM/OAM, disabled external RAM,
//! writes to ROM or unused memory) are never errors -- they resolve to
//! sentinel values inside the bus, exactly as the real hardware does.
//! `GbError` exists only for conditions that indicate a programmer
//! mistake or an unsupported cartridge, never for normal game behavior.

use std::fmt::{self, Display, Formatter};

/// Top level error enum for the emulation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GbError {
    /// An address fell outside the 16-bit address space. Addresses are
    /// carried as `u16` everywhere, so this is unreachable in practice;
    /// it exists for diagnostic completeness.
    BadAddress(u32),
    /// The CPU fetched an opcode with no defined decoding.
    UnimplementedOpcode { pc: u16, opcode: u8 },
    /// A cartridge header named a `CartridgeType` this core does not
    /// implement (only ROM_ONLY and MBC1 variants are supported).
    UnsupportedCartridgeType(u8),
}

impl Display for GbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GbError::BadAddress(addr) => write!(f, "address out of range: {:#06x}", addr),
            GbError::UnimplementedOpcode { pc, opcode } => write!(
                f,
                "unimplemented opcode {:#04x} at pc={:#06x}",
                opcode, pc
            ),
            GbError::UnsupportedCartridgeType(code) => {
                write!(f, "unsupported cartridge type {:#04x}", code)
            }
        }
    }
}

impl std::error::Error for GbError {}
