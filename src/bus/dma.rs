//! OAM DMA. Writing a source page to 0xFF46 copies 160 bytes into OAM
//! and charges a flat 160 M-cycle penalty to the CPU, during which OAM
//! reads/writes from the CPU path return 0xFF.
//!
//! The copy itself happens instantaneously at the moment of the write;
//! `Dma` only tracks how many M-cycles of the charge remain so the bus
//! can know when to re-open OAM.
pub const DMA_CYCLES: u32 = 160;

#[derive(Default)]
pub struct Dma {
    cycles_remaining: u32,
}

impl Dma {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.cycles_remaining = DMA_CYCLES;
    }

    pub fn is_active(&self) -> bool {
        self.cycles_remaining > 0
    }

    /// Advance by `m_cycles`, returning true if DMA was active at the
    /// start of this tick (used by the caller to decide whether to
    /// report extra cycles).
    pub fn tick(&mut self, m_cycles: u32) {
        self.cycles_remaining = self.cycles_remaining.saturating_sub(m_cycles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_active_and_expires() {
        let mut dma = Dma::new();
        assert!(!dma.is_active());
        dma.start();
        assert!(dma.is_active());
        dma.tick(159);
        assert!(dma.is_active());
        dma.tick(1);
        assert!(!dma.is_active());
    }
}
