// Copyright 2026 The qqlocation Authors
use std::{net::Ipv4Addr, path::Path};

use tracing::{debug, trace};

mod record;

pub use record::Record;

use crate::{
    address,
    error::{Error, Result},
    information::Information,
    parse::{
        search_window, FileHeader, PrefixTable, PrefixWindow, RangeEntry, HEADER_LENGTH,
        RANGE_ENTRY_LENGTH,
    },
};

/// A database held entirely in memory.
///
/// The reader owns its buffer and never mutates it after construction, and every lookup
/// goes through `&self`. `MemoryReader<T>` is therefore `Send + Sync` whenever `T` is,
/// and one instance (for example behind an `Arc`) can serve any number of threads
/// without locking. Records returned by [`MemoryReader::fetch`] borrow the reader, so
/// they cannot outlive the buffer they point into.
pub struct MemoryReader<T> {
    data: T,
    header: FileHeader,
    prefixes: PrefixTable,
}

impl MemoryReader<Vec<u8>> {
    /// Opens the file at `Path` for reading, reads its contents and returns a
    /// MemoryReader interface
    /// ```no_run
    /// use std::path::PathBuf;
    /// use qqlocation::MemoryReader;
    /// let mut path_buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    /// path_buf.push("resources/ip-utf8.dat");
    /// let reader = MemoryReader::open(&path_buf)?;
    /// # Ok::<(), qqlocation::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }
}

impl<T: AsRef<[u8]>> MemoryReader<T> {
    /// Creates a MemoryReader interface from a collection of bytes.
    ///
    /// The header and every prefix window are validated against the buffer length; any
    /// inconsistency fails with [`Error::CorruptDatabase`] and no reader is built.
    pub fn from_bytes(data: T) -> Result<Self> {
        let slice = data.as_ref();
        let file_len = slice.len() as u64;
        let header = FileHeader::parse(&slice[..slice.len().min(HEADER_LENGTH)], file_len)?;

        // FileHeader::parse has checked the zone fits in the buffer
        let (zone_start, zone_len) = header.prefix_zone();
        let zone_start = zone_start as usize;
        let prefixes = PrefixTable::parse(
            &header,
            &slice[zone_start..zone_start + zone_len],
            file_len,
        )?;

        debug!(
            bytes = file_len,
            range_start = header.range_start,
            range_end = header.range_end,
            prefix_start = header.prefix_start,
            prefix_end = header.prefix_end,
            "loaded database into memory"
        );

        Ok(Self {
            data,
            header,
            prefixes,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The window of range entries for `prefix`, if the index has one.
    #[inline]
    pub fn window(&self, prefix: u8) -> Option<PrefixWindow> {
        self.prefixes.get(prefix)
    }

    /// Every populated window, in prefix order.
    pub fn windows(&self) -> impl Iterator<Item = PrefixWindow> + '_ {
        self.prefixes.iter()
    }

    /// Decode the range entry at ordinal `index`.
    ///
    /// # Panics
    ///
    /// Panics if the entry lies outside the buffer. Ordinals taken from a
    /// [`PrefixWindow`] of this reader are always in bounds.
    #[inline]
    pub fn range_at(&self, index: u32) -> RangeEntry {
        let offset = self.header.range_position(index) as usize;
        RangeEntry::parse(&self.data.as_ref()[offset..offset + RANGE_ENTRY_LENGTH])
    }

    /// Find the range entry containing `ip`, searching only the window of `prefix`.
    ///
    /// `ip` is the big-endian integer value of the address and `prefix` its first octet,
    /// as produced by [`address::parse`].
    pub fn resolve(&self, ip: u32, prefix: u8) -> Result<RangeEntry> {
        let window = self.window(prefix).ok_or(Error::PrefixNotFound {
            ip: Ipv4Addr::from(ip),
            prefix,
        })?;

        let index = search_window(window, ip, |i| Ok(self.range_at(i).ip_end))?;
        let entry = self.range_at(index);
        trace!(ip, prefix, index, ?entry, "searched prefix window");

        if entry.contains(ip) {
            Ok(entry)
        } else {
            Err(Error::AddressNotFound(Ipv4Addr::from(ip)))
        }
    }

    /// The raw text record an entry points at.
    pub fn text(&self, entry: &RangeEntry) -> Result<&[u8]> {
        let span = entry.text_span();
        self.data.as_ref().get(span.clone()).ok_or_else(|| {
            Error::corrupt(format!(
                "text record [{}, {}) is past the end of the {} byte file",
                span.start,
                span.end,
                self.data.as_ref().len()
            ))
        })
    }

    /// Retrieve the record associated with `Ipv4Addr`, if one exists
    /// ```no_run
    /// use qqlocation::MemoryReader;
    /// use std::net::Ipv4Addr;
    /// # let reader = MemoryReader::open("resources/ip-utf8.dat")?;
    /// let record = reader.fetch(&Ipv4Addr::new(59, 78, 23, 18))?;
    /// println!("{}", record.information()?.city);
    /// # Ok::<(), qqlocation::Error>(())
    /// ```
    pub fn fetch(&self, ip: &Ipv4Addr) -> Result<Record<'_>> {
        let (ip_int, prefix) = address::split(ip);
        let entry = self.resolve(ip_int, prefix)?;
        let text = self.text(&entry)?;
        Ok(Record::new(*ip, entry, text))
    }

    /// Parse `ip` and decode the geolocation of the range containing it.
    pub fn lookup(&self, ip: &str) -> Result<Information> {
        let ip = address::to_ipv4(ip)?;
        self.fetch(&ip)?.information()
    }

    /// Like [`MemoryReader::lookup`], but an address without data yields
    /// [`Information::unknown`] instead of an error.
    ///
    /// A stored record whose fields are all `"N/A"` comes back identical to a miss; use
    /// [`MemoryReader::lookup`] and [`Error::is_not_found`] when the two must be told apart.
    pub fn lookup_or_unknown(&self, ip: &str) -> Result<Information> {
        match self.lookup(ip) {
            Err(e) if e.is_not_found() => Ok(Information::unknown()),
            result => result,
        }
    }

    /// Walk every prefix window and check the invariants the search relies on: each
    /// entry starts inside its prefix, starts no later than it ends, does not end before
    /// its predecessor in the window, and points at text inside the buffer.
    pub fn verify(&self) -> Result<()> {
        for window in self.windows() {
            let mut previous_end = None;
            for index in window.start..=window.end {
                let entry = self.range_at(index);
                if (entry.ip_start >> 24) as u8 != window.prefix {
                    return Err(Error::corrupt(format!(
                        "record {index} starts at {} outside prefix {}",
                        Ipv4Addr::from(entry.ip_start),
                        window.prefix
                    )));
                }
                if entry.ip_start > entry.ip_end {
                    return Err(Error::corrupt(format!(
                        "record {index} starts at {} after it ends at {}",
                        Ipv4Addr::from(entry.ip_start),
                        Ipv4Addr::from(entry.ip_end)
                    )));
                }
                if previous_end.is_some_and(|end| entry.ip_end < end) {
                    return Err(Error::corrupt(format!(
                        "record {index} in prefix {} is out of order",
                        window.prefix
                    )));
                }
                self.text(&entry)?;
                previous_end = Some(entry.ip_end);
            }
        }
        Ok(())
    }
}
