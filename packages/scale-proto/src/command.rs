//! Command codes understood by the scale.

/// Command code bytes as they appear on the wire.
pub mod cmds {
    pub const HANDSHAKE: u8 = b'A';
    pub const READ_GROSS: u8 = b'B';
    pub const READ_TARE: u8 = b'C';
    pub const READ_NET: u8 = b'D';

    /// Two-byte inquiry that some controllers send in place of a framed
    /// [`READ_NET`] request.
    pub const INQUIRY: [u8; 2] = *b"SI";

    /// Every single-byte code, in table order.
    pub const ALL: &[u8] = &[HANDSHAKE, READ_GROSS, READ_TARE, READ_NET];
}

use cmds::{HANDSHAKE, READ_GROSS, READ_NET, READ_TARE};

/// A request the scale can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Link check. Answered without a weight payload.
    Handshake,
    ReadGross,
    ReadTare,
    ReadNet,
}

impl Command {
    /// Looks up a command by its code byte.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            HANDSHAKE => Some(Self::Handshake),
            READ_GROSS => Some(Self::ReadGross),
            READ_TARE => Some(Self::ReadTare),
            READ_NET => Some(Self::ReadNet),
            _ => None,
        }
    }

    /// The code byte sent on the wire for this command.
    pub const fn code(self) -> u8 {
        match self {
            Self::Handshake => HANDSHAKE,
            Self::ReadGross => READ_GROSS,
            Self::ReadTare => READ_TARE,
            Self::ReadNet => READ_NET,
        }
    }

    /// Which reading this command reports, or `None` for [`Command::Handshake`].
    pub const fn reading_kind(self) -> Option<ReadingKind> {
        match self {
            Self::Handshake => None,
            Self::ReadGross => Some(ReadingKind::Gross),
            Self::ReadTare => Some(ReadingKind::Tare),
            Self::ReadNet => Some(ReadingKind::Net),
        }
    }
}

/// The three readings a scale keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Gross,
    Tare,
    Net,
}

impl ReadingKind {
    /// The command that reports this reading.
    pub const fn command(self) -> Command {
        match self {
            Self::Gross => Command::ReadGross,
            Self::Tare => Command::ReadTare,
            Self::Net => Command::ReadNet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_table() {
        assert_eq!(Command::from_code(b'A'), Some(Command::Handshake));
        assert_eq!(Command::from_code(b'B'), Some(Command::ReadGross));
        assert_eq!(Command::from_code(b'C'), Some(Command::ReadTare));
        assert_eq!(Command::from_code(b'D'), Some(Command::ReadNet));
        assert_eq!(Command::from_code(b'E'), None);
        assert_eq!(Command::from_code(b'a'), None);

        for &code in cmds::ALL {
            assert_eq!(Command::from_code(code).map(Command::code), Some(code));
        }
    }

    #[test]
    fn readings_pair_with_commands() {
        assert_eq!(Command::Handshake.reading_kind(), None);
        for kind in [ReadingKind::Gross, ReadingKind::Tare, ReadingKind::Net] {
            assert_eq!(kind.command().reading_kind(), Some(kind));
        }
    }
}
