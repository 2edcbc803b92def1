// Copyright 2026 The qqlocation Authors
use std::net::Ipv4Addr;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while loading a database or resolving an address.
#[derive(Debug, Error)]
pub enum Error {
    /// Header offsets are inconsistent or point outside the file.
    #[error("corrupt database: {0}")]
    CorruptDatabase(String),
    /// The input could not be parsed as an IPv4 address.
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
    /// The prefix index has no window for this first octet.
    #[error("no prefix window for {prefix} (looking up {ip})")]
    PrefixNotFound { ip: Ipv4Addr, prefix: u8 },
    /// The address falls in a gap between the ranges of its prefix window.
    #[error("address {0} not found")]
    AddressNotFound(Ipv4Addr),
    /// A text record did not split into the expected number of fields.
    #[error("unexpected ip info format ({fields} fields): {text:?}")]
    MalformedRecord { fields: usize, text: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptDatabase(msg.into())
    }

    /// True for both flavours of "no data for this address".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PrefixNotFound { .. } | Error::AddressNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_both_variants() {
        let ip = Ipv4Addr::new(10, 0, 0, 1);
        assert!(Error::PrefixNotFound { ip, prefix: 10 }.is_not_found());
        assert!(Error::AddressNotFound(ip).is_not_found());
        assert!(!Error::InvalidAddress("::1".into()).is_not_found());
        assert!(!Error::corrupt("short").is_not_found());
    }

    #[test]
    fn messages_carry_context() {
        let err = Error::MalformedRecord {
            fields: 3,
            text: "a|b|c".into(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected ip info format (3 fields): \"a|b|c\""
        );
        let err = Error::PrefixNotFound {
            ip: Ipv4Addr::new(7, 1, 2, 3),
            prefix: 7,
        };
        assert_eq!(err.to_string(), "no prefix window for 7 (looking up 7.1.2.3)");
    }
}
