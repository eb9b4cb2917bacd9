mod config;
mod filter;
mod flags;
mod message;
mod param;

pub use config::*;
pub use filter::*;
pub use flags::*;
pub use message::*;
pub use param::*;

use std::fmt::{Display, Formatter};
use crate::error::UcanError;

/// The CAN channel selector.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Channel {
    #[default]
    CH0 = 0,
    CH1 = 1,
    /// All channels, only valid for deinitialization and shutdown.
    ALL = 254,
    /// Reading from any channel.
    ANY = 255,
}

impl Channel {
    /// The index into the per-session channel table of a physical channel.
    #[inline]
    pub(crate) fn index(&self) -> Option<usize> {
        match self {
            Self::CH0 => Some(0),
            Self::CH1 => Some(1),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = UcanError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Channel::CH0),
            1 => Ok(Channel::CH1),
            254 => Ok(Channel::ALL),
            255 => Ok(Channel::ANY),
            _ => Err(UcanError::ChannelNotSupported(value)),
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Baudrate register values (BTR0 in the high byte, BTR1 in the low byte) of the SJA1000.
#[repr(u16)]
#[allow(non_camel_case_types)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Baudrate {
    #[default]
    BAUD_1MBit = 0x0014,
    BAUD_800kBit = 0x0016,
    BAUD_500kBit = 0x001C,
    BAUD_250kBit = 0x011C,
    BAUD_125kBit = 0x031C,
    BAUD_100kBit = 0x432F,
    BAUD_50kBit = 0x472F,
    BAUD_20kBit = 0x532F,
    BAUD_10kBit = 0x672F,
    /// Uses predefined extended values of baudrate for all systec USB-CANmoduls.
    BAUD_USE_BTREX = 0x0000,
    /// Automatic baudrate detection (not implemented in this version).
    BAUD_AUTO = 0xFFFF,
}

impl Baudrate {
    #[inline]
    pub fn btr0(&self) -> u8 {
        ((*self as u16) >> 8) as u8
    }
    #[inline]
    pub fn btr1(&self) -> u8 {
        (*self as u16) as u8
    }
}

impl TryFrom<u16> for Baudrate {
    type Error = UcanError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0014 => Ok(Self::BAUD_1MBit),
            0x0016 => Ok(Self::BAUD_800kBit),
            0x001C => Ok(Self::BAUD_500kBit),
            0x011C => Ok(Self::BAUD_250kBit),
            0x031C => Ok(Self::BAUD_125kBit),
            0x432F => Ok(Self::BAUD_100kBit),
            0x472F => Ok(Self::BAUD_50kBit),
            0x532F => Ok(Self::BAUD_20kBit),
            0x672F => Ok(Self::BAUD_10kBit),
            0x0000 => Ok(Self::BAUD_USE_BTREX),
            0xFFFF => Ok(Self::BAUD_AUTO),
            _ => Err(UcanError::parameter_not_supported(format!("baudrate {:#06X}", value))),
        }
    }
}

/// Extended baudrate register values for the multiport, USB-CANmodul1/2 (G3) and G4 modules.
#[repr(u32)]
#[allow(non_camel_case_types)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaudrateEx {
    // G3 (multiport 3004006, USB-CANmodul1 3204000, USB-CANmodul2 3204002)
    BAUDEX_1MBit = 0x0002_0354,
    BAUDEX_800kBit = 0x0003_0254,
    BAUDEX_500kBit = 0x0005_0354,
    BAUDEX_250kBit = 0x000B_0354,
    BAUDEX_125kBit = 0x0017_0354,
    BAUDEX_100kBit = 0x0017_0466,
    BAUDEX_50kBit = 0x002F_0466,
    BAUDEX_20kBit = 0x0077_0466,
    BAUDEX_10kBit = 0x8077_0466,

    // G3 with sample point at 87.5%
    BAUDEX_SP2_1MBit = 0x0002_0741,
    BAUDEX_SP2_800kBit = 0x0003_0731,
    BAUDEX_SP2_500kBit = 0x0005_0741,
    BAUDEX_SP2_250kBit = 0x000B_0741,
    BAUDEX_SP2_125kBit = 0x0017_0741,
    BAUDEX_SP2_100kBit = 0x001D_1741,
    BAUDEX_SP2_50kBit = 0x003B_1741,
    BAUDEX_SP2_20kBit = 0x0077_1772,
    BAUDEX_SP2_10kBit = 0x8077_1772,

    // G4
    BAUDEX_G4_1MBit = 0x406F_0000,
    BAUDEX_G4_800kBit = 0x402A_0001,
    BAUDEX_G4_500kBit = 0x406F_0001,
    BAUDEX_G4_250kBit = 0x406F_0003,
    BAUDEX_G4_125kBit = 0x406F_0007,
    BAUDEX_G4_100kBit = 0x416F_0009,
    BAUDEX_G4_50kBit = 0x416F_0013,
    BAUDEX_G4_20kBit = 0x417F_002F,
    BAUDEX_G4_10kBit = 0x417F_005F,

    /// Uses the BTR0/BTR1 register values.
    #[default]
    BAUDEX_USE_BTR01 = 0x0000_0000,
    /// Automatic baudrate detection (not implemented in this version).
    BAUDEX_AUTO = 0xFFFF_FFFF,
}

impl BaudrateEx {
    const ALL: [Self; 29] = [
        Self::BAUDEX_1MBit, Self::BAUDEX_800kBit, Self::BAUDEX_500kBit, Self::BAUDEX_250kBit,
        Self::BAUDEX_125kBit, Self::BAUDEX_100kBit, Self::BAUDEX_50kBit, Self::BAUDEX_20kBit, Self::BAUDEX_10kBit,
        Self::BAUDEX_SP2_1MBit, Self::BAUDEX_SP2_800kBit, Self::BAUDEX_SP2_500kBit, Self::BAUDEX_SP2_250kBit,
        Self::BAUDEX_SP2_125kBit, Self::BAUDEX_SP2_100kBit, Self::BAUDEX_SP2_50kBit, Self::BAUDEX_SP2_20kBit, Self::BAUDEX_SP2_10kBit,
        Self::BAUDEX_G4_1MBit, Self::BAUDEX_G4_800kBit, Self::BAUDEX_G4_500kBit, Self::BAUDEX_G4_250kBit,
        Self::BAUDEX_G4_125kBit, Self::BAUDEX_G4_100kBit, Self::BAUDEX_G4_50kBit, Self::BAUDEX_G4_20kBit, Self::BAUDEX_G4_10kBit,
        Self::BAUDEX_USE_BTR01, Self::BAUDEX_AUTO,
    ];
}

impl TryFrom<u32> for BaudrateEx {
    type Error = UcanError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL.iter()
            .find(|v| **v as u32 == value)
            .copied()
            .ok_or_else(|| UcanError::parameter_not_supported(format!("extended baudrate {:#010X}", value)))
    }
}

/// Output control register of the SJA1000.
#[repr(u8)]
#[allow(non_camel_case_types)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OutputControl {
    #[default]
    OCR_DEFAULT = 0x1A,
    OCR_RS485_ISOLATED = 0x1E,
    OCR_RS485_NOT_ISOLATED = 0x0A,
}

impl TryFrom<u8> for OutputControl {
    type Error = UcanError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x1A => Ok(Self::OCR_DEFAULT),
            0x1E => Ok(Self::OCR_RS485_ISOLATED),
            0x0A => Ok(Self::OCR_RS485_NOT_ISOLATED),
            _ => Err(UcanError::parameter_not_supported(format!("output control {:#04X}", value))),
        }
    }
}

/// Human readable text of a BTR0/BTR1 baudrate value.
pub fn baudrate_message(baudrate: u16) -> &'static str {
    match Baudrate::try_from(baudrate) {
        Ok(Baudrate::BAUD_AUTO) => "auto baudrate",
        Ok(Baudrate::BAUD_10kBit) => "10 kBit/sec",
        Ok(Baudrate::BAUD_20kBit) => "20 kBit/sec",
        Ok(Baudrate::BAUD_50kBit) => "50 kBit/sec",
        Ok(Baudrate::BAUD_100kBit) => "100 kBit/sec",
        Ok(Baudrate::BAUD_125kBit) => "125 kBit/sec",
        Ok(Baudrate::BAUD_250kBit) => "250 kBit/sec",
        Ok(Baudrate::BAUD_500kBit) => "500 kBit/sec",
        Ok(Baudrate::BAUD_800kBit) => "800 kBit/sec",
        Ok(Baudrate::BAUD_1MBit) => "1 MBit/s",
        Ok(Baudrate::BAUD_USE_BTREX) => "BTR Ext is used",
        Err(_) => "unknown",
    }
}

/// Human readable text of an extended baudrate value.
pub fn baudrate_ex_message(baudrate_ex: u32) -> &'static str {
    use BaudrateEx::*;
    match BaudrateEx::try_from(baudrate_ex) {
        Ok(BAUDEX_AUTO) => "auto baudrate",
        Ok(BAUDEX_10kBit | BAUDEX_SP2_10kBit | BAUDEX_G4_10kBit) => "10 kBit/sec",
        Ok(BAUDEX_20kBit | BAUDEX_SP2_20kBit | BAUDEX_G4_20kBit) => "20 kBit/sec",
        Ok(BAUDEX_50kBit | BAUDEX_SP2_50kBit | BAUDEX_G4_50kBit) => "50 kBit/sec",
        Ok(BAUDEX_100kBit | BAUDEX_SP2_100kBit | BAUDEX_G4_100kBit) => "100 kBit/sec",
        Ok(BAUDEX_125kBit | BAUDEX_SP2_125kBit | BAUDEX_G4_125kBit) => "125 kBit/sec",
        Ok(BAUDEX_250kBit | BAUDEX_SP2_250kBit | BAUDEX_G4_250kBit) => "250 kBit/sec",
        Ok(BAUDEX_500kBit | BAUDEX_SP2_500kBit | BAUDEX_G4_500kBit) => "500 kBit/sec",
        Ok(BAUDEX_800kBit | BAUDEX_SP2_800kBit | BAUDEX_G4_800kBit) => "800 kBit/sec",
        Ok(BAUDEX_1MBit | BAUDEX_SP2_1MBit | BAUDEX_G4_1MBit) => "1 MBit/s",
        Ok(BAUDEX_USE_BTR01) => "BTR0/BTR1 is used",
        Err(_) => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::{baudrate_ex_message, baudrate_message, Baudrate, BaudrateEx, Channel, OutputControl};

    #[test]
    fn channel() -> anyhow::Result<()> {
        assert_eq!(Channel::try_from(0)?, Channel::CH0);
        assert_eq!(Channel::try_from(1)?, Channel::CH1);
        assert_eq!(Channel::try_from(254)?, Channel::ALL);
        assert_eq!(Channel::try_from(255)?, Channel::ANY);
        assert!(Channel::try_from(2).is_err());
        assert_eq!(Channel::CH1.index(), Some(1));
        assert_eq!(Channel::ALL.index(), None);
        Ok(())
    }

    #[test]
    fn baudrate() -> anyhow::Result<()> {
        assert_eq!(Baudrate::BAUD_250kBit.btr0(), 0x01);
        assert_eq!(Baudrate::BAUD_250kBit.btr1(), 0x1C);
        assert_eq!(Baudrate::try_from(0x432F)?, Baudrate::BAUD_100kBit);
        assert!(Baudrate::try_from(0x1234).is_err());

        assert_eq!(BaudrateEx::try_from(0x406F_0001)?, BaudrateEx::BAUDEX_G4_500kBit);
        assert_eq!(BaudrateEx::try_from(0xFFFF_FFFF)?, BaudrateEx::BAUDEX_AUTO);
        assert!(BaudrateEx::try_from(0x1234).is_err());

        assert_eq!(OutputControl::try_from(0x0A)?, OutputControl::OCR_RS485_NOT_ISOLATED);
        assert!(OutputControl::try_from(0x00).is_err());
        Ok(())
    }

    #[test]
    fn messages() {
        assert_eq!(baudrate_message(0x0014), "1 MBit/s");
        assert_eq!(baudrate_message(0x0000), "BTR Ext is used");
        assert_eq!(baudrate_message(0x1234), "unknown");
        assert_eq!(baudrate_ex_message(0x0017_0741), "125 kBit/sec");
        assert_eq!(baudrate_ex_message(0x417F_005F), "10 kBit/sec");
        assert_eq!(baudrate_ex_message(0), "BTR0/BTR1 is used");
        assert_eq!(baudrate_ex_message(1), "unknown");
    }
}
