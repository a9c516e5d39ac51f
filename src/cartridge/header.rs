//! The cartridge header contains the following information:
//! <https://gbdev.io/pandocs/The_Cartridge_Header.html>
//! Entry Point - $0100-$0103
//! Nintendo Logo - $0104-$0133
//! Title - $0134-$0142
//! Cartridge Type - $0147 (MBC)
//! ROM Size - $0148
//! RAM Size - $0149
//! Destination Code - $014A
//! Old/New Licensee Code - $014B / $0144-$0145
//! Header Checksum - $014D

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Cartridge Type. Indicates what kind of hardware is used in the
/// cartridge, most importantly the Memory Bank Controller (MBC). Only
/// the ROM_ONLY and MBC1 family are supported by this core; every other
/// variant is a load-time error.
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CartridgeType {
    RomOnly = 0x00,
    Mbc1 = 0x01,
    Mbc1Ram = 0x02,
    Mbc1RamBattery = 0x03,
    Mbc2 = 0x05,
    Mbc2Battery = 0x06,
    RomRam = 0x08,
    RomRamBattery = 0x09,
    Mmm01 = 0x0B,
    Mmm01Ram = 0x0C,
    Mmm01RamBattery = 0x0D,
    Mbc3TimerBattery = 0x0F,
    Mbc3TimerRamBattery = 0x10,
    Mbc3 = 0x11,
    Mbc3Ram = 0x12,
    Mbc3RamBattery = 0x13,
    Mbc5 = 0x19,
    Mbc5Ram = 0x1A,
    Mbc5RamBattery = 0x1B,
    Mbc5Rumble = 0x1C,
    Mbc5RumbleRam = 0x1D,
    Mbc5RumbleRamBattery = 0x1E,
    Mbc6 = 0x20,
    Mbc7SensorRumbleRamBattery = 0x22,
    PocketCamera = 0xFC,
    BandaiTama5 = 0xFD,
    HuC3 = 0xFE,
    HuC1RamBattery = 0xFF,
}

impl CartridgeType {
    /// Whether this core implements the variant.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            CartridgeType::RomOnly
                | CartridgeType::Mbc1
                | CartridgeType::Mbc1Ram
                | CartridgeType::Mbc1RamBattery
        )
    }

    /// Whether the variant is one of the MBC1 family (as opposed to ROM_ONLY).
    pub fn is_mbc1(self) -> bool {
        matches!(
            self,
            CartridgeType::Mbc1 | CartridgeType::Mbc1Ram | CartridgeType::Mbc1RamBattery
        )
    }
}

/// ROM Size. `32 KiB x (1 << value)`; the bank count is `rom_size_bytes / 16 KiB`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum RomSize {
    Rom32Kb = 0x00,
    Rom64Kb = 0x01,
    Rom128Kb = 0x02,
    Rom256Kb = 0x03,
    Rom512Kb = 0x04,
    Rom1Mb = 0x05,
    Rom2Mb = 0x06,
    Rom4Mb = 0x07,
    Rom8Mb = 0x08,
}

impl RomSize {
    pub fn bytes(self) -> usize {
        0x8000 << (self as u8)
    }

    pub fn rom_banks(self) -> usize {
        self.bytes() / 0x4000
    }
}

/// RAM Size. If the cartridge type's name does not mention RAM, the
/// size is implicitly `None` regardless of this byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum RamSize {
    None = 0x00,
    Kb2Unused = 0x01,
    Kb8 = 0x02,
    Kb32 = 0x03,
    Kb128 = 0x04,
    Kb64 = 0x05,
}

impl RamSize {
    pub fn bytes(self) -> usize {
        match self {
            RamSize::None => 0,
            RamSize::Kb2Unused => 0x800,
            RamSize::Kb8 => 0x2000,
            RamSize::Kb32 => 0x8000,
            RamSize::Kb128 => 0x20000,
            RamSize::Kb64 => 0x10000,
        }
    }
}

/// Destination Code: whether the cartridge targets the Japanese or the
/// overseas market. Informational only.
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DestinationCode {
    Japan = 0x00,
    Overseas = 0x01,
}

/// Parsed cartridge header, read once at load time from the raw ROM bytes.
#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type_raw: u8,
    pub rom_size_raw: u8,
    pub ram_size_raw: u8,
    pub destination_code_raw: u8,
    pub header_checksum: u8,
}

impl CartridgeHeader {
    /// Parse a header out of the first 0x150 bytes of a ROM image.
    /// Panics if `rom` is shorter than the header region -- that is a
    /// malformed-file condition the ROM loader (out of scope) is
    /// expected to have already guarded against.
    pub fn parse(rom: &[u8]) -> Self {
        let title_bytes = &rom[0x0134..=0x0142];
        let title_end = title_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(title_bytes.len());
        let title = String::from_utf8_lossy(&title_bytes[..title_end])
            .trim_end()
            .to_string();

        Self {
            title,
            cartridge_type_raw: rom[0x0147],
            rom_size_raw: rom[0x0148],
            ram_size_raw: rom[0x0149],
            destination_code_raw: rom[0x014A],
            header_checksum: rom[0x014D],
        }
    }

    pub fn cartridge_type(&self) -> Result<CartridgeType, u8> {
        CartridgeType::try_from(self.cartridge_type_raw).map_err(|_| self.cartridge_type_raw)
    }

    pub fn rom_size(&self) -> Option<RomSize> {
        RomSize::try_from(self.rom_size_raw).ok()
    }

    pub fn ram_size(&self) -> Option<RamSize> {
        RamSize::try_from(self.ram_size_raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(cartridge_type: u8, rom_size: u8, ram_size: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x150];
        rom[0x0134..0x0142].copy_from_slice(b"TESTGAME");
        rom[0x0147] = cartridge_type;
        rom[0x0148] = rom_size;
        rom[0x0149] = ram_size;
        rom
    }

    #[test]
    fn parses_title_and_type() {
        let rom = header_bytes(0x01, 0x00, 0x00);
        let header = CartridgeHeader::parse(&rom);
        assert_eq!(header.title, "TESTGAME");
        assert_eq!(header.cartridge_type().unwrap(), CartridgeType::Mbc1);
    }

    #[test]
    fn rom_size_bank_count() {
        assert_eq!(RomSize::Rom32Kb.rom_banks(), 2);
        assert_eq!(RomSize::Rom128Kb.rom_banks(), 8);
    }

    #[test]
    fn unsupported_type_is_flagged() {
        let rom = header_bytes(0x19, 0x00, 0x00); // MBC5
        let header = CartridgeHeader::parse(&rom);
        assert!(!header.cartridge_type().unwrap().is_supported());
    }
}
