pub(crate) const SYSTEC_ENV: &str = "systec.env";
pub(crate) const SYSTEC_VAR: &str = "SYSTEC_LIBRARY";
pub(crate) const CHANNEL_CFG_FILENAME: &str = "channel.cfg.yaml";

#[cfg(target_pointer_width = "64")]
pub(crate) const LIB_NAME: &str = "USBCAN64.dll";
#[cfg(not(target_pointer_width = "64"))]
pub(crate) const LIB_NAME: &str = "USBCAN32.dll";

/// Maximum number of modules that are supported.
pub const MAX_MODULES: u8 = 64;
/// Maximum number of applications that can use the USB-CAN-library.
pub const MAX_INSTANCES: u8 = 64;
/// Use the module which is detected first, only sensible with a single connected module.
pub const ANY_MODULE: u8 = 255;
/// No valid USB-CAN handle.
pub const INVALID_HANDLE: u8 = 0xFF;

/// Acceptance mask for receiving all CAN messages.
pub const AMR_ALL: u32 = 0xFFFF_FFFF;
/// Acceptance code for receiving all CAN messages.
pub const ACR_ALL: u32 = 0x0;

/// Default number of entries of the receive and transmit buffer.
pub const DEFAULT_BUFFER_ENTRIES: u16 = 4096;

/// Maximum number of cyclic CAN messages.
pub const MAX_CYCLIC_CAN_MSG: usize = 16;

/// The max sizeof can-frame's data.
pub const CAN_FRAME_MAX_SIZE: usize = 8;

/// The CAN channel count of a logical device.
pub(crate) const CHANNEL_COUNT: usize = 2;

/// Product code bit masks.
pub(crate) const PRODCODE_PID_TWO_CHA: u32 = 0x1;
pub(crate) const PRODCODE_PID_TERM: u32 = 0x1;
pub(crate) const PRODCODE_PID_RBUSER: u32 = 0x1;
pub(crate) const PRODCODE_PID_RBCAN: u32 = 0x1;
pub(crate) const PRODCODE_PID_G4: u32 = 0x20;

pub(crate) const PRODCODE_MASK_PID: u32 = 0xFFFF;
