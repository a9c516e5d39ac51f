//! Facade wiring a loaded cartridge and an optional boot ROM into a
//! ready-to-run Bus/Cpu/Ppu/FrameRunner trio.

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::GbError;
use crate::frame::FrameRunner;
use crate::ppu::Ppu;

pub struct GameBoy {
    runner: FrameRunner,
}

impl GameBoy {
    pub fn new(rom: Vec<u8>, boot_rom: Option<[u8; 256]>) -> Result<Self, GbError> {
        let bus = Bus::new(rom, boot_rom)?;
        let runner = FrameRunner::new(Cpu::new(), bus, Ppu::new());
        Ok(Self { runner })
    }

    /// Advance the emulation by one full frame (70224 dots).
    pub fn run_frame(&mut self) {
        self.runner.run_frame();
    }

    pub fn framebuffer(&self) -> &[[u8; crate::ppu::SCREEN_WIDTH]; crate::ppu::SCREEN_HEIGHT] {
        self.runner.ppu.framebuffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_from_a_minimal_rom() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0147] = 0x00;
        let gb = GameBoy::new(rom, None);
        assert!(gb.is_ok());
    }

    #[test]
    fn unsupported_cartridge_type_errors() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0147] = 0x19; // MBC5
        let gb = GameBoy::new(rom, None);
        assert!(matches!(gb, Err(GbError::UnsupportedCartridgeType(0x19))));
    }
}
