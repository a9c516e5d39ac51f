//! Cartridge loading and memory bank controllers.
//!
//! The Bus talks to whatever cartridge is loaded through the
//! [`Cartridge`] trait object; it never needs to know whether it is
//! talking to a plain ROM or an MBC1 chip.

pub mod header;
mod mbc1;
mod rom_only;

use log::info;

pub use header::{CartridgeHeader, CartridgeType};
pub use mbc1::Mbc1;
pub use rom_only::RomOnly;

use crate::error::GbError;

/// A cartridge intercepts reads/writes to 0x0000-0x7FFF (ROM, plus MBC
/// control registers) and 0xA000-0xBFFF (external RAM).
pub trait Cartridge {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);
}

/// Parse the header out of `rom` and build the matching cartridge
/// implementation. Returns an error if the header names a
/// `CartridgeType` this core does not implement.
pub fn load(rom: Vec<u8>) -> Result<(Box<dyn Cartridge>, CartridgeHeader), GbError> {
    let header = CartridgeHeader::parse(&rom);
    let cartridge_type = header
        .cartridge_type()
        .map_err(GbError::UnsupportedCartridgeType)?;

    if !cartridge_type.is_supported() {
        return Err(GbError::UnsupportedCartridgeType(header.cartridge_type_raw));
    }

    let ram_bytes = header.ram_size().map(|sz| sz.bytes()).unwrap_or(0);

    info!(
        "loaded cartridge \"{}\" type={:?} rom_bytes={} ram_bytes={}",
        header.title,
        cartridge_type,
        rom.len(),
        ram_bytes
    );

    let cartridge: Box<dyn Cartridge> = if cartridge_type.is_mbc1() {
        Box::new(Mbc1::new(rom, ram_bytes))
    } else {
        Box::new(RomOnly::new(rom, ram_bytes))
    };

    Ok((cartridge, header))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_rom(cartridge_type: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0147] = cartridge_type;
        rom[0x0148] = 0x00; // 32 KiB, 2 banks
        rom[0x0149] = 0x00; // no RAM
        rom
    }

    #[test]
    fn rom_only_loads() {
        let (_cart, header) = load(minimal_rom(0x00)).unwrap();
        assert_eq!(header.cartridge_type_raw, 0x00);
    }

    #[test]
    fn mbc1_loads() {
        let (_cart, header) = load(minimal_rom(0x01)).unwrap();
        assert_eq!(header.cartridge_type_raw, 0x01);
    }

    #[test]
    fn unsupported_type_errors() {
        let result = load(minimal_rom(0x19)); // MBC5
        assert!(matches!(result, Err(GbError::UnsupportedCartridgeType(0x19))));
    }
}
