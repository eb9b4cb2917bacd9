use bitflags::bitflags;

bitflags! {
    /// Frame format of a [`CanMsg`](crate::can::CanMsg).
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct FrameFormat: u8 {
        /// standard CAN data frame with 11 bit ID (CAN2.0A spec.)
        const STD = 0x00;
        /// transmit echo
        const ECHO = 0x20;
        /// CAN remote request frame
        const RTR = 0x40;
        /// extended CAN data frame with 29 bit ID (CAN2.0B spec.)
        const EXT = 0x80;
    }
}

bitflags! {
    /// Operating mode of a CAN channel.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Mode: u8 {
        const NORMAL = 0x00;
        /// listen only mode (no acknowledge, no error frames)
        const LISTEN_ONLY = 0x01;
        /// echo of transmitted messages
        const TX_ECHO = 0x02;
        /// receive messages in the order of their CAN channel
        const RX_ORDER_CH = 0x04;
        /// high resolution time stamps in received CAN messages (only for G5 modules)
        const HIGH_RES_TIMER = 0x08;
    }
}

bitflags! {
    /// CAN error status bits, see [`Status`](crate::device::Status).
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct CanStatus: u16 {
        const OK = 0x0000;
        const XMTFULL = 0x0001;
        const OVERRUN = 0x0002;
        const BUSLIGHT = 0x0004;
        const BUSHEAVY = 0x0008;
        const BUSOFF = 0x0010;
        const QRCVEMPTY = 0x0020;
        const QOVERRUN = 0x0040;
        const QXMTFULL = 0x0080;
        const REGTEST = 0x0100;
        const MEMTEST = 0x0200;
        const TXMSGLOST = 0x0400;
    }
}

impl CanStatus {
    const MESSAGES: [(Self, &'static str); 11] = [
        (Self::TXMSGLOST, "Transmit message lost"),
        (Self::MEMTEST, "Memory test failed"),
        (Self::REGTEST, "Register test failed"),
        (Self::QXMTFULL, "Transmit queue is full"),
        (Self::QOVERRUN, "Receive queue overrun"),
        (Self::QRCVEMPTY, "Receive queue is empty"),
        (Self::BUSOFF, "Bus Off"),
        (Self::BUSHEAVY, "Error Passive"),
        (Self::BUSLIGHT, "Warning Limit"),
        (Self::OVERRUN, "Rx-buffer is full"),
        (Self::XMTFULL, "Tx-buffer is full"),
    ];

    /// The joined texts of all set status bits, `OK` when nothing is set.
    pub fn message(&self) -> String {
        if self.is_empty() {
            return "OK".into();
        }

        Self::MESSAGES.iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, msg)| *msg)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

bitflags! {
    /// USB error status bits.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct UsbStatus: u16 {
        const OK = 0x0000;
    }
}

bitflags! {
    /// Selects what is kept while resetting a CAN channel, see `UcanResetCanEx`.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ResetFlags: u32 {
        /// reset everything
        const ALL = 0x0000_0000;
        const NO_STATUS = 0x0000_0001;
        const NO_CANCTRL = 0x0000_0002;
        const NO_TXCOUNTER = 0x0000_0004;
        const NO_RXCOUNTER = 0x0000_0008;
        const NO_TXBUFFER_CH = 0x0000_0010;
        const NO_TXBUFFER_DLL = 0x0000_0020;
        const NO_TXBUFFER_SYS = 0x0000_0040;
        const NO_TXBUFFER_FW = 0x0000_0080;
        const NO_RXBUFFER_CH = 0x0000_0100;
        const NO_RXBUFFER_DLL = 0x0000_0200;
        const NO_RXBUFFER_SYS = 0x0000_0400;
        const NO_RXBUFFER_FW = 0x0000_0800;
        /// complete firmware reset (module will automatically reconnect at USB port in 500ms)
        const FIRMWARE = 0xFFFF_FFFF;

        const NO_COUNTER_ALL = Self::NO_TXCOUNTER.bits() | Self::NO_RXCOUNTER.bits();
        const NO_TXBUFFER_COMM = Self::NO_TXBUFFER_DLL.bits() | Self::NO_TXBUFFER_SYS.bits() | Self::NO_TXBUFFER_FW.bits();
        const NO_RXBUFFER_COMM = Self::NO_RXBUFFER_DLL.bits() | Self::NO_RXBUFFER_SYS.bits() | Self::NO_RXBUFFER_FW.bits();
        const NO_TXBUFFER_ALL = Self::NO_TXBUFFER_CH.bits() | Self::NO_TXBUFFER_COMM.bits();
        const NO_RXBUFFER_ALL = Self::NO_RXBUFFER_CH.bits() | Self::NO_RXBUFFER_COMM.bits();
        const NO_BUFFER_COMM = Self::NO_TXBUFFER_COMM.bits() | Self::NO_RXBUFFER_COMM.bits();
        const NO_BUFFER_ALL = Self::NO_TXBUFFER_ALL.bits() | Self::NO_RXBUFFER_ALL.bits();

        const ONLY_STATUS = 0xFFFF & !Self::NO_STATUS.bits();
        const ONLY_CANCTRL = 0xFFFF & !Self::NO_CANCTRL.bits();
        const ONLY_TXBUFFER_FW = 0xFFFF & !Self::NO_TXBUFFER_FW.bits();
        const ONLY_RXBUFFER_FW = 0xFFFF & !Self::NO_RXBUFFER_FW.bits();
        const ONLY_RXCHANNEL_BUFF = 0xFFFF & !Self::NO_RXBUFFER_CH.bits();
        const ONLY_TXCHANNEL_BUFF = 0xFFFF & !Self::NO_TXBUFFER_CH.bits();
        const ONLY_RX_BUFF = 0xFFFF & !(Self::NO_RXBUFFER_ALL.bits() | Self::NO_RXCOUNTER.bits());
        const ONLY_RX_BUFF_GW002 = 0xFFFF & !(Self::NO_RXBUFFER_ALL.bits() | Self::NO_RXCOUNTER.bits() | Self::NO_TXBUFFER_FW.bits());
        const ONLY_TX_BUFF = 0xFFFF & !(Self::NO_TXBUFFER_ALL.bits() | Self::NO_TXCOUNTER.bits());
        const ONLY_ALL_BUFF = Self::ONLY_RX_BUFF.bits() & Self::ONLY_TX_BUFF.bits();
        const ONLY_ALL_COUNTER = 0xFFFF & !Self::NO_COUNTER_ALL.bits();
    }
}

bitflags! {
    /// Controls the transmission of cyclic CAN messages.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct CyclicFlags: u32 {
        /// stops the transmission of cyclic CAN messages
        const STOPP = 0x0000_0000;
        /// starts the transmission of cyclic CAN messages
        const START = 0x8000_0000;
        /// sequential mode, only one message per cycle time
        const SEQUMODE = 0x4000_0000;
        /// no echo of cyclic messages even if `Mode::TX_ECHO` is set
        const NOECHO = 0x0001_0000;

        const LOCK_0 = 1 << 0;
        const LOCK_1 = 1 << 1;
        const LOCK_2 = 1 << 2;
        const LOCK_3 = 1 << 3;
        const LOCK_4 = 1 << 4;
        const LOCK_5 = 1 << 5;
        const LOCK_6 = 1 << 6;
        const LOCK_7 = 1 << 7;
        const LOCK_8 = 1 << 8;
        const LOCK_9 = 1 << 9;
        const LOCK_10 = 1 << 10;
        const LOCK_11 = 1 << 11;
        const LOCK_12 = 1 << 12;
        const LOCK_13 = 1 << 13;
        const LOCK_14 = 1 << 14;
        const LOCK_15 = 1 << 15;
    }
}

bitflags! {
    /// Selects the buffers counted by `UcanGetMsgPending`.
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct PendingFlags: u32 {
        const RX_DLL = 0x0000_0001;
        const RX_SYS = 0x0000_0002;
        const RX_FW = 0x0000_0004;
        const TX_DLL = 0x0000_0010;
        const TX_SYS = 0x0000_0020;
        const TX_FW = 0x0000_0040;

        const RX_ALL = Self::RX_DLL.bits() | Self::RX_SYS.bits() | Self::RX_FW.bits();
        const TX_ALL = Self::TX_DLL.bits() | Self::TX_SYS.bits() | Self::TX_FW.bits();
        const ALL = Self::RX_ALL.bits() | Self::TX_ALL.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::{CanStatus, CyclicFlags, PendingFlags, ResetFlags};

    #[test]
    fn composites() {
        assert_eq!(ResetFlags::NO_COUNTER_ALL.bits(), 0x0C);
        assert_eq!(ResetFlags::NO_TXBUFFER_COMM.bits(), 0x20 | 0x40 | 0x80);
        assert_eq!(ResetFlags::NO_RXBUFFER_COMM.bits(), 0x200 | 0x400 | 0x800);
        assert_eq!(ResetFlags::NO_TXBUFFER_ALL.bits(), 0xF0);
        assert_eq!(ResetFlags::NO_RXBUFFER_ALL.bits(), 0xF00);
        assert_eq!(ResetFlags::NO_BUFFER_COMM, ResetFlags::NO_TXBUFFER_COMM | ResetFlags::NO_RXBUFFER_COMM);
        assert_eq!(ResetFlags::NO_BUFFER_ALL.bits(), 0xFF0);
        assert_eq!(ResetFlags::ONLY_STATUS.bits(), 0xFFFE);
        assert_eq!(ResetFlags::ONLY_CANCTRL.bits(), 0xFFFD);
        assert_eq!(ResetFlags::ONLY_RX_BUFF.bits(), 0xFFFF & !0xF08);
        assert_eq!(ResetFlags::ONLY_RX_BUFF_GW002.bits(), 0xFFFF & !0xF88);
        assert_eq!(ResetFlags::ONLY_TX_BUFF.bits(), 0xFFFF & !0xF4);
        assert_eq!(ResetFlags::ONLY_ALL_BUFF, ResetFlags::ONLY_RX_BUFF & ResetFlags::ONLY_TX_BUFF);
        assert_eq!(ResetFlags::ONLY_ALL_COUNTER.bits(), 0xFFF3);
        assert_eq!(ResetFlags::FIRMWARE.bits(), 0xFFFF_FFFF);

        assert_eq!(PendingFlags::RX_ALL, PendingFlags::RX_DLL | PendingFlags::RX_SYS | PendingFlags::RX_FW);
        assert_eq!(PendingFlags::TX_ALL.bits(), 0x70);
        assert_eq!(PendingFlags::ALL.bits(), 0x77);

        assert_eq!((CyclicFlags::START | CyclicFlags::LOCK_15).bits(), 0x8000_8000);
    }

    #[test]
    fn status_message() {
        assert_eq!(CanStatus::OK.message(), "OK");
        assert_eq!(CanStatus::BUSOFF.message(), "Bus Off");
        assert_eq!(
            (CanStatus::XMTFULL | CanStatus::TXMSGLOST | CanStatus::BUSHEAVY).message(),
            "Transmit message lost, Error Passive, Tx-buffer is full"
        );
        assert_eq!(CanStatus::from_bits_retain(0x0800).message(), "");
    }
}
