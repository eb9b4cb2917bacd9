use std::fmt::{Debug, Display, Formatter};
use crate::error::UcanError;

/// The classification of a [`ReturnCode`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResultKind {
    Success,
    Warning,
    /// Error coming from the USB-CAN-library.
    LibraryError,
    /// Error coming from the command interface between host and module.
    CommandError,
}

/// The byte-coded return value of every USB-CAN-library function.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ReturnCode(pub u8);

impl ReturnCode {
    /// no error
    pub const SUCCESSFUL: Self = Self(0x00);
    /// start of error codes coming from USB-CAN-library
    pub const ERR: Self = Self(0x01);
    /// start of error codes coming from command interface between host and USB-CANmodul
    pub const ERRCMD: Self = Self(0x40);
    /// start of warning codes
    pub const WARNING: Self = Self(0x80);
    /// start of reserved codes which are only used internally
    pub const RESERVED: Self = Self(0xC0);

    pub const ERR_RESOURCE: Self = Self(0x01);
    pub const ERR_MAXMODULES: Self = Self(0x02);
    pub const ERR_HWINUSE: Self = Self(0x03);
    pub const ERR_ILLVERSION: Self = Self(0x04);
    pub const ERR_ILLHW: Self = Self(0x05);
    pub const ERR_ILLHANDLE: Self = Self(0x06);
    pub const ERR_ILLPARAM: Self = Self(0x07);
    pub const ERR_BUSY: Self = Self(0x08);
    pub const ERR_TIMEOUT: Self = Self(0x09);
    pub const ERR_IOFAILED: Self = Self(0x0A);
    pub const ERR_DLL_TXFULL: Self = Self(0x0B);
    pub const ERR_MAXINSTANCES: Self = Self(0x0C);
    pub const ERR_CANNOTINIT: Self = Self(0x0D);
    pub const ERR_DISCONNECT: Self = Self(0x0E);
    pub const ERR_NOHWCLASS: Self = Self(0x0F);
    pub const ERR_ILLCHANNEL: Self = Self(0x10);
    pub const ERR_RESERVED1: Self = Self(0x11);
    pub const ERR_ILLHWTYPE: Self = Self(0x12);

    pub const ERRCMD_NOTEQU: Self = Self(0x40);
    pub const ERRCMD_REGTST: Self = Self(0x41);
    pub const ERRCMD_ILLCMD: Self = Self(0x42);
    pub const ERRCMD_EEPROM: Self = Self(0x43);
    pub const ERRCMD_RESERVED1: Self = Self(0x44);
    pub const ERRCMD_RESERVED2: Self = Self(0x45);
    pub const ERRCMD_RESERVED3: Self = Self(0x46);
    pub const ERRCMD_ILLBDR: Self = Self(0x47);
    pub const ERRCMD_NOTINIT: Self = Self(0x48);
    pub const ERRCMD_ALREADYINIT: Self = Self(0x49);
    pub const ERRCMD_ILLSUBCMD: Self = Self(0x4A);
    pub const ERRCMD_ILLIDX: Self = Self(0x4B);
    pub const ERRCMD_RUNNING: Self = Self(0x4C);

    pub const WARN_NODATA: Self = Self(0x80);
    pub const WARN_SYS_RXOVERRUN: Self = Self(0x81);
    pub const WARN_DLL_RXOVERRUN: Self = Self(0x82);
    pub const WARN_RESERVED1: Self = Self(0x83);
    pub const WARN_RESERVED2: Self = Self(0x84);
    pub const WARN_FW_TXOVERRUN: Self = Self(0x85);
    pub const WARN_FW_RXOVERRUN: Self = Self(0x86);
    pub const WARN_FW_TXMSGLOST: Self = Self(0x87);
    pub const WARN_NULL_PTR: Self = Self(0x90);
    pub const WARN_TXLIMIT: Self = Self(0x91);
    pub const WARN_BUSY: Self = Self(0x92);

    #[inline]
    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESSFUL
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        *self >= Self::WARNING
    }

    /// Error from USB-CAN-library or from the firmware.
    #[inline]
    pub fn is_error(&self) -> bool {
        *self != Self::SUCCESSFUL && *self < Self::WARNING
    }

    #[inline]
    pub fn is_firmware_error(&self) -> bool {
        *self >= Self::ERRCMD && *self < Self::WARNING
    }

    /// A received CAN message is valid even if a warning greater than `WARN_NODATA` was returned.
    #[inline]
    pub fn is_valid_rx(&self) -> bool {
        *self == Self::SUCCESSFUL || *self > Self::WARNING
    }

    /// At least one CAN message was written.
    #[inline]
    pub fn is_tx_ok(&self) -> bool {
        *self == Self::SUCCESSFUL || *self > Self::WARNING
    }

    /// All CAN messages were written.
    #[inline]
    pub fn is_tx_success(&self) -> bool {
        *self == Self::SUCCESSFUL
    }

    /// Not all CAN messages could be stored into the transmit buffer.
    #[inline]
    pub fn is_tx_not_all(&self) -> bool {
        *self == Self::WARN_TXLIMIT
    }

    pub fn kind(&self) -> ResultKind {
        if self.is_warning() {
            ResultKind::Warning
        }
        else if self.is_firmware_error() {
            ResultKind::CommandError
        }
        else if self.is_error() {
            ResultKind::LibraryError
        }
        else {
            ResultKind::Success
        }
    }

    /// Applies the taxonomy to the result of a native call.
    ///
    /// Warnings are logged and handed back, errors are converted into [`UcanError`]
    /// carrying the function name and the arguments of the call.
    pub fn check(self, func: &'static str, args: &dyn Debug) -> Result<Self, UcanError> {
        match self.kind() {
            ResultKind::Success => Ok(self),
            ResultKind::Warning => {
                log::warn!("SYSTEC - function `{}` returned {:#04X}: {}, args: {:?}", func, self.0, self.message(), args);
                Ok(self)
            },
            ResultKind::CommandError => Err(UcanError::Command { code: self, func, args: format!("{:?}", args) }),
            ResultKind::LibraryError => Err(UcanError::Library { code: self, func, args: format!("{:?}", args) }),
        }
    }

    pub fn message(&self) -> &'static str {
        match *self {
            Self::SUCCESSFUL => "no error",
            Self::ERR_RESOURCE => "could not created a resource (memory, handle, ...)",
            Self::ERR_MAXMODULES => "the maximum number of opened modules is reached",
            Self::ERR_HWINUSE => "the specified module is already in use",
            Self::ERR_ILLVERSION => "the software versions of the module and library are incompatible",
            Self::ERR_ILLHW => "the module with the specified device number is not connected (or used by an other application)",
            Self::ERR_ILLHANDLE => "wrong USB-CAN-Handle handed over to the function",
            Self::ERR_ILLPARAM => "wrong parameter handed over to the function",
            Self::ERR_BUSY => "instruction can not be processed at this time",
            Self::ERR_TIMEOUT => "no answer from module",
            Self::ERR_IOFAILED => "a request to the driver failed",
            Self::ERR_DLL_TXFULL => "a CAN message did not fit into the transmit buffer",
            Self::ERR_MAXINSTANCES => "maximum number of applications is reached",
            Self::ERR_CANNOTINIT => "CAN interface is not yet initialized",
            Self::ERR_DISCONNECT => "USB-CANmodul was disconnected",
            Self::ERR_NOHWCLASS => "the needed device class does not exist",
            Self::ERR_ILLCHANNEL => "illegal CAN channel",
            Self::ERR_RESERVED1 => "reserved",
            Self::ERR_ILLHWTYPE => "the API function can not be used with this hardware",

            Self::ERRCMD_NOTEQU => "the received response does not match to the transmitted command",
            Self::ERRCMD_REGTST => "no access to the CAN controller",
            Self::ERRCMD_ILLCMD => "the module could not interpret the command",
            Self::ERRCMD_EEPROM => "error while reading the EEPROM",
            Self::ERRCMD_RESERVED1 | Self::ERRCMD_RESERVED2 | Self::ERRCMD_RESERVED3 => "reserved",
            Self::ERRCMD_ILLBDR => "illegal baud rate value specified in BTR0/BTR1 for systec USB-CANmoduls",
            Self::ERRCMD_NOTINIT => "CAN channel is not initialized",
            Self::ERRCMD_ALREADYINIT => "CAN channel is already initialized",
            Self::ERRCMD_ILLSUBCMD => "illegal sub-command specified",
            Self::ERRCMD_ILLIDX => "illegal index specified (e.g. index for cyclic CAN messages)",
            Self::ERRCMD_RUNNING => "cyclic CAN message(s) can not be defined because transmission of cyclic CAN messages is already running",

            Self::WARN_NODATA => "no CAN messages received",
            Self::WARN_SYS_RXOVERRUN => "overrun in receive buffer of the kernel driver",
            Self::WARN_DLL_RXOVERRUN => "overrun in receive buffer of the USB-CAN-library",
            Self::WARN_RESERVED1 | Self::WARN_RESERVED2 => "reserved",
            Self::WARN_FW_TXOVERRUN => "overrun in transmit buffer of the firmware (but this CAN message was successfully stored in buffer of the library)",
            Self::WARN_FW_RXOVERRUN => "overrun in receive buffer of the firmware (but this CAN message was successfully read)",
            Self::WARN_FW_TXMSGLOST => "reserved",
            Self::WARN_NULL_PTR => "pointer is NULL",
            Self::WARN_TXLIMIT => "not all CAN messages could be stored to the transmit buffer in USB-CAN-library",
            Self::WARN_BUSY => "reserved",
            _ => "unknown",
        }
    }
}

impl From<u8> for ReturnCode {
    #[inline]
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<ReturnCode> for u8 {
    #[inline]
    fn from(value: ReturnCode) -> Self {
        value.0
    }
}

impl Display for ReturnCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#04X} ({})", self.0, self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::{ResultKind, ReturnCode};
    use crate::error::UcanError;

    #[test]
    fn classify_bands() {
        for c in 0..=u8::MAX {
            let code = ReturnCode(c);
            if c != 0 && c < 0x80 {
                assert!(code.is_error(), "{:#04X}", c);
                assert!(!code.is_warning(), "{:#04X}", c);
            }
            if c >= 0x80 {
                assert!(code.is_warning(), "{:#04X}", c);
                assert!(!code.is_error(), "{:#04X}", c);
            }
            assert_eq!(code.is_firmware_error(), (0x40..0x80).contains(&c), "{:#04X}", c);
        }

        assert!(!ReturnCode::SUCCESSFUL.is_error());
        assert!(!ReturnCode::SUCCESSFUL.is_warning());
        assert_eq!(ReturnCode::SUCCESSFUL.kind(), ResultKind::Success);
        assert_eq!(ReturnCode::ERR_ILLHW.kind(), ResultKind::LibraryError);
        assert_eq!(ReturnCode::ERRCMD_ALREADYINIT.kind(), ResultKind::CommandError);
        assert_eq!(ReturnCode::WARN_TXLIMIT.kind(), ResultKind::Warning);
        assert_eq!(ReturnCode::RESERVED.kind(), ResultKind::Warning);
    }

    #[test]
    fn transfer_predicates() {
        assert!(ReturnCode::SUCCESSFUL.is_valid_rx());
        assert!(!ReturnCode::WARN_NODATA.is_valid_rx());
        assert!(ReturnCode::WARN_DLL_RXOVERRUN.is_valid_rx());
        assert!(!ReturnCode::ERR_ILLHANDLE.is_valid_rx());

        assert!(ReturnCode::WARN_TXLIMIT.is_tx_ok());
        assert!(!ReturnCode::WARN_TXLIMIT.is_tx_success());
        assert!(ReturnCode::WARN_TXLIMIT.is_tx_not_all());
        assert!(!ReturnCode::WARN_FW_TXOVERRUN.is_tx_success());
        assert!(!ReturnCode::WARN_FW_TXOVERRUN.is_tx_not_all());
        assert!(ReturnCode::SUCCESSFUL.is_tx_success());
    }

    #[test]
    fn check_result() {
        assert_eq!(ReturnCode::SUCCESSFUL.check("UcanDeinitHardware", &(0u8, )).ok(), Some(ReturnCode::SUCCESSFUL));
        assert_eq!(ReturnCode::WARN_NODATA.check("UcanReadCanMsgEx", &(0u8, 0u8)).ok(), Some(ReturnCode::WARN_NODATA));

        match ReturnCode::ERRCMD_NOTINIT.check("UcanResetCanEx", &(0u8, 1u8, 0u32)) {
            Err(UcanError::Command { code, func, args }) => {
                assert_eq!(code, ReturnCode::ERRCMD_NOTINIT);
                assert_eq!(func, "UcanResetCanEx");
                assert_eq!(args, "(0, 1, 0)");
            },
            other => panic!("unexpected: {:?}", other),
        }

        match ReturnCode::ERR_ILLHW.check("UcanInitHardwareEx", &(255u8, )) {
            Err(e @ UcanError::Library { .. }) => {
                let text = e.to_string();
                assert!(text.contains("UcanInitHardwareEx"));
                assert!(text.contains("is not connected"));
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unknown_message() {
        assert_eq!(ReturnCode(0x3F).message(), "unknown");
        assert_eq!(ReturnCode(0xC5).message(), "unknown");
    }
}
