// Copyright 2026 The qqlocation Authors
//! # Prefix-Indexed IPv4 Geolocation Database Reader
//!
//! The qqlocation library crate resolves IPv4 addresses against a pre-built binary
//! geolocation database (the `ip-utf8.dat` layout). The file carries an ordered table of
//! IP ranges plus a first-octet prefix index that narrows every lookup to a small window
//! before a binary search picks the matching range.
//!
//! Two readers are provided:
//!
//! - [`MemoryReader`] owns the whole file in memory and answers lookups through `&self`,
//!   so a single instance can be shared across threads.
//! - [`FileReader`] keeps only the header and prefix table in memory and seeks for
//!   everything else.
//!
//! ```no_run
//! use qqlocation::MemoryReader;
//! let reader = MemoryReader::open("resources/ip-utf8.dat")?;
//! let info = reader.lookup("59.78.23.18")?;
//! println!("{}", info);
//! # Ok::<(), qqlocation::Error>(())
//! ```

pub mod address;
mod error;
pub mod file_reader;
mod information;
pub mod memory_reader;
mod parse;

pub use error::{Error, Result};
pub use file_reader::FileReader;
pub use information::{Information, UNKNOWN};
pub use memory_reader::{MemoryReader, Record};
pub use parse::{FileHeader, PrefixWindow, RangeEntry};

mod utility {
    // interpret an array of four bytes as a Little Endian unsigned integer
    pub(crate) fn four_byte_int(bytes: &[u8]) -> u32 {
        let mut buffer = [0u8; 4];
        buffer[..4].copy_from_slice(&bytes[..4]);

        u32::from_le_bytes(buffer)
    }
    // interpret an array of three bytes as a Little Endian unsigned integer
    pub(crate) fn three_byte_int(bytes: &[u8]) -> u32 {
        let mut buffer = [0u8; 4];
        buffer[..3].copy_from_slice(&bytes[..3]);

        u32::from_le_bytes(buffer)
    }
}
