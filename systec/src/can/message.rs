use std::fmt::{Display, Formatter, Write};
use crate::can::FrameFormat;
use crate::constants::CAN_FRAME_MAX_SIZE;
use crate::error::UcanError;

/// A CAN message as exchanged with the USB-CAN-library.
#[repr(C, packed)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CanMsg {
    /// CAN identifier
    id: u32,
    /// CAN frame format, see [`FrameFormat`]
    frame_format: u8,
    /// CAN data length code
    dlc: u8,
    data: [u8; CAN_FRAME_MAX_SIZE],
    /// receive time stamp in ms, no meaning for transmit messages
    time: u32,
}

impl CanMsg {
    pub fn new(id: u32, frame_format: FrameFormat, data: &[u8]) -> Result<Self, UcanError> {
        let length = data.len();
        if length > CAN_FRAME_MAX_SIZE {
            return Err(UcanError::DataOutOfRange(length));
        }

        let mut buffer = [0u8; CAN_FRAME_MAX_SIZE];
        buffer[..length].copy_from_slice(data);
        Ok(Self {
            id,
            frame_format: frame_format.bits(),
            dlc: length as u8,
            data: buffer,
            time: Default::default(),
        })
    }

    pub fn new_remote(id: u32, extended: bool, dlc: u8) -> Result<Self, UcanError> {
        if dlc as usize > CAN_FRAME_MAX_SIZE {
            return Err(UcanError::DataOutOfRange(dlc as usize));
        }

        let mut frame_format = FrameFormat::RTR;
        if extended {
            frame_format |= FrameFormat::EXT;
        }
        Ok(Self {
            id,
            frame_format: frame_format.bits(),
            dlc,
            data: Default::default(),
            time: Default::default(),
        })
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn set_id(&mut self, id: u32) -> &mut Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn frame_format(&self) -> FrameFormat {
        FrameFormat::from_bits_retain(self.frame_format)
    }

    #[inline]
    pub fn set_frame_format(&mut self, frame_format: FrameFormat) -> &mut Self {
        self.frame_format = frame_format.bits();
        self
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.frame_format().contains(FrameFormat::EXT)
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.frame_format().contains(FrameFormat::RTR)
    }

    #[inline]
    pub fn is_echo(&self) -> bool {
        self.frame_format().contains(FrameFormat::ECHO)
    }

    #[inline]
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// The valid part of the data, empty for remote frames.
    #[inline]
    pub fn data(&self) -> &[u8] {
        if self.is_remote() {
            return &[];
        }
        let length = std::cmp::min(self.dlc as usize, CAN_FRAME_MAX_SIZE);
        &self.data[..length]
    }

    pub fn set_data(&mut self, data: &[u8]) -> Result<&mut Self, UcanError> {
        let length = data.len();
        if length > CAN_FRAME_MAX_SIZE {
            return Err(UcanError::DataOutOfRange(length));
        }

        let mut buffer = [0u8; CAN_FRAME_MAX_SIZE];
        buffer[..length].copy_from_slice(data);
        self.data = buffer;
        self.dlc = length as u8;
        Ok(self)
    }

    #[inline]
    pub fn time(&self) -> u32 {
        self.time
    }
}

impl Display for CanMsg {
    /// Output the message as `asc` like String.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data_str = if self.is_remote() {
            " ".to_owned()
        } else {
            self.data()
                .iter()
                .fold(String::new(), |mut out, &b| {
                    let _ = write!(out, "{b:02x} ");
                    out
                })
        };

        write!(f, "{:.3} {}{: <4} {} {} {}",
               self.time() as f64 / 1000.,
               format!("{: >8x}", self.id()),
               if self.is_extended() { "x" } else { "" },
               if self.is_remote() { "r" } else { "d" },
               format!("{: >2}", self.dlc()),
               data_str,
        )
    }
}
