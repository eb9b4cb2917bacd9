use crate::can::CanChannelConfig;

/// The initialization parameters of a CAN channel, handed over to `UcanInitCanEx2`.
#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
pub struct InitCanParam {
    size: u32,
    mode: u8,
    btr0: u8,
    btr1: u8,
    ocr: u8,
    amr: u32,
    acr: u32,
    baudrate: u32,
    rx_buffer_entries: u16,
    tx_buffer_entries: u16,
}

impl From<&CanChannelConfig> for InitCanParam {
    fn from(cfg: &CanChannelConfig) -> Self {
        Self {
            size: std::mem::size_of::<Self>() as u32,
            mode: cfg.mode(),
            btr0: (cfg.baudrate() >> 8) as u8,
            btr1: cfg.baudrate() as u8,
            ocr: cfg.ocr(),
            amr: cfg.amr(),
            acr: cfg.acr(),
            baudrate: cfg.baudrate_ex(),
            rx_buffer_entries: cfg.rx_buffer_entries(),
            tx_buffer_entries: cfg.tx_buffer_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InitCanParam;
    use crate::can::{Baudrate, BaudrateEx, CanChannelConfig, Mode};

    #[test]
    fn param() {
        assert_eq!(std::mem::size_of::<InitCanParam>(), 24);

        let mut cfg = CanChannelConfig::default();
        cfg.set_mode(Mode::LISTEN_ONLY | Mode::TX_ECHO)
            .set_baudrate(Baudrate::BAUD_250kBit)
            .set_baudrate_ex(BaudrateEx::BAUDEX_G4_250kBit)
            .set_rx_buffer_entries(1024);
        let param = InitCanParam::from(&cfg);

        let (size, mode, btr0, btr1, ocr) = (param.size, param.mode, param.btr0, param.btr1, param.ocr);
        let (amr, acr, baudrate, rx, tx) = (param.amr, param.acr, param.baudrate, param.rx_buffer_entries, param.tx_buffer_entries);
        assert_eq!(size, 24);
        assert_eq!(mode, 0x03);
        assert_eq!(btr0, 0x01);
        assert_eq!(btr1, 0x1C);
        assert_eq!(ocr, 0x1A);
        assert_eq!(amr, 0xFFFF_FFFF);
        assert_eq!(acr, 0);
        assert_eq!(baudrate, 0x406F_0003);
        assert_eq!(rx, 1024);
        assert_eq!(tx, 4096);
    }
}
