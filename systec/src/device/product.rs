use crate::constants::{PRODCODE_MASK_PID, PRODCODE_PID_G4, PRODCODE_PID_RBCAN, PRODCODE_PID_RBUSER, PRODCODE_PID_TERM, PRODCODE_PID_TWO_CHA};
use crate::device::Version;
use crate::error::UcanError;

/// Product code (the lower 16 bits of `HardwareInfoEx::product_code`).
#[repr(u16)]
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProductCode {
    GW001 = 0x1100,
    GW002 = 0x1102,
    MULTIPORT = 0x1103,
    BASIC = 0x1104,
    ADVANCED = 0x1105,
    USBCAN8 = 0x1107,
    USBCAN16 = 0x1109,
    RESERVED3 = 0x1110,
    ADVANCED_G4 = 0x1121,
    BASIC_G4 = 0x1122,
    RESERVED1 = 0x1144,
    RESERVED2 = 0x1145,
}

impl TryFrom<u32> for ProductCode {
    type Error = UcanError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value & PRODCODE_MASK_PID {
            0x1100 => Ok(Self::GW001),
            0x1102 => Ok(Self::GW002),
            0x1103 => Ok(Self::MULTIPORT),
            0x1104 => Ok(Self::BASIC),
            0x1105 => Ok(Self::ADVANCED),
            0x1107 => Ok(Self::USBCAN8),
            0x1109 => Ok(Self::USBCAN16),
            0x1110 => Ok(Self::RESERVED3),
            0x1121 => Ok(Self::ADVANCED_G4),
            0x1122 => Ok(Self::BASIC_G4),
            0x1144 => Ok(Self::RESERVED1),
            0x1145 => Ok(Self::RESERVED2),
            v => Err(UcanError::parameter_not_supported(format!("product code {:#06X}", v))),
        }
    }
}

#[inline]
fn pid(product_code: u32) -> u32 {
    product_code & PRODCODE_MASK_PID
}

/// The module is a systec USB-CANmodul (not a GW-001 or GW-002).
pub fn is_systec(product_code: u32) -> bool {
    pid(product_code) >= ProductCode::MULTIPORT as u32
}

/// The module is of the fourth generation.
pub fn is_g4(product_code: u32) -> bool {
    product_code & PRODCODE_PID_G4 != 0
}

/// The module is of the third generation.
pub fn is_g3(product_code: u32) -> bool {
    is_systec(product_code) && !is_g4(product_code)
}

pub fn support_cyclic_msg(product_code: u32, fw_version: Version) -> bool {
    is_systec(product_code) && fw_version.is_equal_or_higher(3, 6)
}

/// The logical device has two CAN channels.
pub fn support_two_channel(product_code: u32) -> bool {
    is_systec(product_code) && product_code & PRODCODE_PID_TWO_CHA != 0
}

pub fn support_term_resistor(product_code: u32) -> bool {
    product_code & PRODCODE_PID_TERM != 0
}

pub fn support_user_port(product_code: u32, fw_version: Version) -> bool {
    pid(product_code) != ProductCode::BASIC as u32
        && pid(product_code) != ProductCode::RESERVED1 as u32
        && fw_version.is_equal_or_higher(2, 16)
}

/// User I/O port including the read back feature.
pub fn support_rb_user_port(product_code: u32) -> bool {
    product_code & PRODCODE_PID_RBUSER != 0
}

/// CAN I/O port including the read back feature.
pub fn support_rb_can_port(product_code: u32) -> bool {
    product_code & PRODCODE_PID_RBCAN != 0
}

/// Usage of the USB-CANnetwork driver.
pub fn support_ucannet(product_code: u32, fw_version: Version) -> bool {
    is_systec(product_code) && fw_version.is_equal_or_higher(3, 8)
}
