mod product;
pub use product::*;

use std::ffi::c_void;
use std::fmt::{Display, Formatter};
use crate::api::CallbackFktEx;
use crate::can::{CanStatus, UsbStatus};
use crate::constants::CHANNEL_COUNT;
use crate::error::UcanError;

/// A version number as reported by the library and the firmware.
///
/// Bits 0..8 are the major, bits 8..16 the minor version and bits 16..32 the release.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Version(pub u32);

impl Version {
    #[inline]
    pub fn major(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
    #[inline]
    pub fn minor(&self) -> u8 {
        ((self.0 & 0xFF00) >> 8) as u8
    }
    #[inline]
    pub fn release(&self) -> u16 {
        ((self.0 & 0xFFFF_0000) >> 16) as u16
    }
    #[inline]
    pub fn is_equal_or_higher(&self, major: u8, minor: u8) -> bool {
        self.major() > major || (self.major() == major && self.minor() >= minor)
    }
}

impl From<u32> for Version {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}.{}", self.major(), self.minor(), self.release())
    }
}

/// Selects the file of which `UcanGetVersionEx` reports the version.
#[repr(u32)]
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VersionType {
    /// version of the USB-CAN-library, also known as `VER_TYPE_USER_DLL`
    USER_LIB = 1,
    /// version of USBCAN.SYS (not supported in this version)
    SYS_DRV = 2,
    /// version of firmware in hardware (not supported, use `UcanServer::get_fw_version`)
    FIRMWARE = 3,
    NET_DRV = 4,
    SYS_LD = 5,
    SYS_L2 = 6,
    SYS_L3 = 7,
    SYS_L4 = 8,
    SYS_L5 = 9,
    CPL = 10,
}

impl VersionType {
    pub const USER_DLL: Self = Self::USER_LIB;
}

impl TryFrom<u32> for VersionType {
    type Error = UcanError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::USER_LIB),
            2 => Ok(Self::SYS_DRV),
            3 => Ok(Self::FIRMWARE),
            4 => Ok(Self::NET_DRV),
            5 => Ok(Self::SYS_LD),
            6 => Ok(Self::SYS_L2),
            7 => Ok(Self::SYS_L3),
            8 => Ok(Self::SYS_L4),
            9 => Ok(Self::SYS_L5),
            10 => Ok(Self::CPL),
            _ => Err(UcanError::parameter_not_supported(format!("version type {}", value))),
        }
    }
}

/// Events delivered to the callback functions.
#[repr(u32)]
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CbEvent {
    /// the USB-CANmodul has been initialized
    INITHW = 0,
    /// the CAN interface has been initialized
    INITCAN = 1,
    /// a new CAN message has been received
    RECEIVE = 2,
    /// the error state in the module has changed
    STATUS = 3,
    /// the CAN interface has been deinitialized
    DEINITCAN = 4,
    /// the USB-CANmodul has been deinitialized
    DEINITHW = 5,
    /// a new USB-CANmodul has been connected
    CONNECT = 6,
    /// a USB-CANmodul has been disconnected
    DISCONNECT = 7,
    /// a USB-CANmodul has been disconnected during operation
    FATALDISCON = 8,
    RESERVED1 = 0x80,
}

impl TryFrom<u32> for CbEvent {
    type Error = UcanError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::INITHW),
            1 => Ok(Self::INITCAN),
            2 => Ok(Self::RECEIVE),
            3 => Ok(Self::STATUS),
            4 => Ok(Self::DEINITCAN),
            5 => Ok(Self::DEINITHW),
            6 => Ok(Self::CONNECT),
            7 => Ok(Self::DISCONNECT),
            8 => Ok(Self::FATALDISCON),
            0x80 => Ok(Self::RESERVED1),
            _ => Err(UcanError::parameter_not_supported(format!("callback event {}", value))),
        }
    }
}

/// Extended hardware information of a USB-CANmodul.
#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
pub struct HardwareInfoEx {
    size: u32,
    handle: u8,
    device_nr: u8,
    serial_nr: u32,
    fw_version: u32,
    product_code: u32,
    /// available since V5.01
    unique_id: [u32; 4],
    flags: u32,
}

impl Default for HardwareInfoEx {
    fn default() -> Self {
        Self {
            size: std::mem::size_of::<Self>() as u32,
            handle: Default::default(),
            device_nr: Default::default(),
            serial_nr: Default::default(),
            fw_version: Default::default(),
            product_code: Default::default(),
            unique_id: Default::default(),
            flags: Default::default(),
        }
    }
}

impl HardwareInfoEx {
    #[inline]
    pub fn handle(&self) -> u8 {
        self.handle
    }
    #[inline]
    pub fn device_nr(&self) -> u8 {
        self.device_nr
    }
    #[inline]
    pub fn serial_nr(&self) -> u32 {
        self.serial_nr
    }
    #[inline]
    pub fn fw_version(&self) -> Version {
        Version(self.fw_version)
    }
    #[inline]
    pub fn product_code(&self) -> u32 {
        self.product_code
    }
    #[inline]
    pub fn unique_id(&self) -> [u32; 4] {
        self.unique_id
    }
    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    #[inline]
    pub fn is_systec(&self) -> bool {
        is_systec(self.product_code)
    }
    #[inline]
    pub fn is_g4(&self) -> bool {
        is_g4(self.product_code)
    }
    #[inline]
    pub fn is_g3(&self) -> bool {
        is_g3(self.product_code)
    }
    #[inline]
    pub fn support_cyclic_msg(&self) -> bool {
        support_cyclic_msg(self.product_code, self.fw_version())
    }
    #[inline]
    pub fn support_two_channel(&self) -> bool {
        support_two_channel(self.product_code)
    }
    #[inline]
    pub fn support_term_resistor(&self) -> bool {
        support_term_resistor(self.product_code)
    }
    #[inline]
    pub fn support_user_port(&self) -> bool {
        support_user_port(self.product_code, self.fw_version())
    }
    #[inline]
    pub fn support_rb_user_port(&self) -> bool {
        support_rb_user_port(self.product_code)
    }
    #[inline]
    pub fn support_rb_can_port(&self) -> bool {
        support_rb_can_port(self.product_code)
    }
    #[inline]
    pub fn support_ucannet(&self) -> bool {
        support_ucannet(self.product_code, self.fw_version())
    }

    #[cfg(test)]
    pub(crate) fn with_product(product_code: u32, fw_version: u32) -> Self {
        Self { product_code, fw_version, ..Default::default() }
    }

    #[cfg(test)]
    pub(crate) fn with_serial_nr(mut self, serial_nr: u32) -> Self {
        self.serial_nr = serial_nr;
        self
    }
}

/// Information of a single CAN channel.
#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
pub struct ChannelInfo {
    size: u32,
    mode: u8,
    btr0: u8,
    btr1: u8,
    ocr: u8,
    amr: u32,
    acr: u32,
    baudrate: u32,
    can_is_init: i32,
    can_status: u16,
}

impl Default for ChannelInfo {
    fn default() -> Self {
        Self {
            size: std::mem::size_of::<Self>() as u32,
            mode: Default::default(),
            btr0: Default::default(),
            btr1: Default::default(),
            ocr: Default::default(),
            amr: Default::default(),
            acr: Default::default(),
            baudrate: Default::default(),
            can_is_init: Default::default(),
            can_status: Default::default(),
        }
    }
}

impl ChannelInfo {
    #[inline]
    pub fn mode(&self) -> u8 {
        self.mode
    }
    /// BTR0 in the high byte, BTR1 in the low byte.
    #[inline]
    pub fn btr(&self) -> u16 {
        (self.btr0 as u16) << 8 | self.btr1 as u16
    }
    #[inline]
    pub fn ocr(&self) -> u8 {
        self.ocr
    }
    #[inline]
    pub fn amr(&self) -> u32 {
        self.amr
    }
    #[inline]
    pub fn acr(&self) -> u32 {
        self.acr
    }
    #[inline]
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }
    #[inline]
    pub fn can_is_init(&self) -> bool {
        self.can_is_init != 0
    }
    #[inline]
    pub fn can_status(&self) -> CanStatus {
        CanStatus::from_bits_retain(self.can_status)
    }
}

/// CAN and USB error status of a channel.
#[repr(C, packed)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Status {
    can_status: u16,
    usb_status: u16,
}

impl Status {
    #[inline]
    pub fn can_status(&self) -> CanStatus {
        CanStatus::from_bits_retain(self.can_status)
    }
    #[inline]
    pub fn usb_status(&self) -> UsbStatus {
        UsbStatus::from_bits_retain(self.usb_status)
    }
}

/// Number of sent and received CAN messages of a channel.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct MsgCountInfo {
    sent: u16,
    received: u16,
}

impl MsgCountInfo {
    #[inline]
    pub fn sent(&self) -> u16 {
        self.sent
    }
    #[inline]
    pub fn received(&self) -> u16 {
        self.received
    }
}

/// Handed over to the enumeration callback, only valid during the callback.
#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
pub struct HardwareInitInfo {
    size: u32,
    do_initialize: i32,
    handle: *mut u8,
    callback: Option<CallbackFktEx>,
    callback_arg: *mut c_void,
    try_next: i32,
}

impl HardwareInitInfo {
    #[inline]
    pub fn do_initialize(&self) -> bool {
        self.do_initialize != 0
    }
    #[inline]
    pub fn try_next(&self) -> bool {
        self.try_next != 0
    }
}

/// The ranges a module has to match during `enumerate_hardware`.
#[derive(Debug, Copy, Clone)]
pub struct HardwareFilter {
    pub enum_used_devices: bool,
    pub device_number_low: u8,
    pub device_number_high: u8,
    pub serial_low: u32,
    pub serial_high: u32,
    pub product_code_low: u32,
    pub product_code_high: u32,
}

impl Default for HardwareFilter {
    fn default() -> Self {
        Self {
            enum_used_devices: false,
            device_number_low: 0,
            device_number_high: u8::MAX,
            serial_low: 0,
            serial_high: u32::MAX,
            product_code_low: 0,
            product_code_high: u32::MAX,
        }
    }
}

/// A module found by `enumerate_hardware`.
#[derive(Debug, Copy, Clone)]
pub struct EnumeratedModule {
    pub index: u32,
    pub is_used: bool,
    pub info: HardwareInfoEx,
}

/// The result of `UcanServer::get_hardware_info`.
#[derive(Debug, Default, Copy, Clone)]
pub struct HardwareInfo {
    pub info: HardwareInfoEx,
    pub channels: [ChannelInfo; CHANNEL_COUNT],
}

#[cfg(test)]
mod tests {
    use super::{ChannelInfo, HardwareInfoEx, HardwareInitInfo, MsgCountInfo, Status, Version};

    #[test]
    fn layout() {
        assert_eq!(std::mem::size_of::<HardwareInfoEx>(), 38);
        assert_eq!(std::mem::size_of::<ChannelInfo>(), 26);
        assert_eq!(std::mem::size_of::<Status>(), 4);
        assert_eq!(std::mem::size_of::<MsgCountInfo>(), 4);
        assert_eq!(std::mem::size_of::<HardwareInitInfo>(), 12 + 3 * std::mem::size_of::<usize>());

        let size = HardwareInfoEx::default().size;
        assert_eq!(size, 38);
        let size = ChannelInfo::default().size;
        assert_eq!(size, 26);
    }

    #[test]
    fn version() {
        let v = Version(0x0005_1002);
        assert_eq!(v.major(), 2);
        assert_eq!(v.minor(), 16);
        assert_eq!(v.release(), 5);
        assert_eq!(v.to_string(), "2.16.5");

        assert!(v.is_equal_or_higher(2, 16));
        assert!(v.is_equal_or_higher(1, 99));
        assert!(!v.is_equal_or_higher(2, 17));
        assert!(!v.is_equal_or_higher(3, 0));
    }
}
