// Copyright 2026 The qqlocation Authors
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    utility,
};

pub(crate) const HEADER_LENGTH: usize = 16;
pub(crate) const RANGE_ENTRY_LENGTH: usize = 12;
pub(crate) const PREFIX_ENTRY_LENGTH: usize = 9;

/// The four zone offsets stored in the first 16 bytes of the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    /// position of the first record in the range zone
    pub range_start: u32,
    /// position of the last record in the range zone
    pub range_end: u32,
    /// position of the first record in the prefix zone
    pub prefix_start: u32,
    /// position of the last record in the prefix zone
    pub prefix_end: u32,
}

impl FileHeader {
    /// Decode the header and check it against the total file length.
    pub fn parse(header: &[u8], file_len: u64) -> Result<Self> {
        if header.len() < HEADER_LENGTH || file_len < HEADER_LENGTH as u64 {
            return Err(Error::corrupt(format!(
                "file is {file_len} bytes, shorter than the {HEADER_LENGTH} byte header"
            )));
        }

        let file_header = FileHeader {
            range_start: utility::four_byte_int(&header[0..4]),
            range_end: utility::four_byte_int(&header[4..8]),
            prefix_start: utility::four_byte_int(&header[8..12]),
            prefix_end: utility::four_byte_int(&header[12..16]),
        };

        if (file_header.range_start as usize) < HEADER_LENGTH
            || (file_header.prefix_start as usize) < HEADER_LENGTH
        {
            return Err(Error::corrupt(format!(
                "zones at {} and {} overlap the {HEADER_LENGTH} byte header",
                file_header.range_start, file_header.prefix_start
            )));
        }
        if file_header.range_start > file_header.range_end {
            return Err(Error::corrupt(format!(
                "range zone starts at {} but ends at {}",
                file_header.range_start, file_header.range_end
            )));
        }
        if file_header.prefix_start > file_header.prefix_end {
            return Err(Error::corrupt(format!(
                "prefix zone starts at {} but ends at {}",
                file_header.prefix_start, file_header.prefix_end
            )));
        }
        if u64::from(file_header.range_end) > file_len {
            return Err(Error::corrupt(format!(
                "range zone end {} is past the end of the {file_len} byte file",
                file_header.range_end
            )));
        }
        let (zone_start, zone_len) = file_header.prefix_zone();
        if zone_start + zone_len as u64 > file_len {
            return Err(Error::corrupt(format!(
                "prefix zone [{zone_start}, {}) is past the end of the {file_len} byte file",
                zone_start + zone_len as u64
            )));
        }
        let range_zone_end = u64::from(file_header.range_end) + RANGE_ENTRY_LENGTH as u64;
        if zone_start < range_zone_end
            && u64::from(file_header.range_start) < zone_start + zone_len as u64
        {
            return Err(Error::corrupt(format!(
                "prefix zone [{zone_start}, {}) overlaps range zone [{}, {range_zone_end})",
                zone_start + zone_len as u64,
                file_header.range_start
            )));
        }

        Ok(file_header)
    }

    /// Number of 9-byte entries in the prefix zone.
    pub fn prefix_count(&self) -> usize {
        ((self.prefix_end - self.prefix_start) / PREFIX_ENTRY_LENGTH as u32) as usize + 1
    }

    /// Byte position and length of the prefix zone.
    pub(crate) fn prefix_zone(&self) -> (u64, usize) {
        (
            u64::from(self.prefix_start),
            self.prefix_count() * PREFIX_ENTRY_LENGTH,
        )
    }

    /// Byte position of the range entry at `index`.
    #[inline]
    pub(crate) fn range_position(&self, index: u32) -> u64 {
        u64::from(self.range_start) + u64::from(index) * RANGE_ENTRY_LENGTH as u64
    }
}

/// The ordinal slice `[start, end]` of range entries sharing a first octet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PrefixWindow {
    pub prefix: u8,
    pub start: u32,
    pub end: u32,
}

impl PrefixWindow {
    fn parse(entry: &[u8]) -> Self {
        PrefixWindow {
            prefix: entry[0],
            start: utility::four_byte_int(&entry[1..5]),
            end: utility::four_byte_int(&entry[5..9]),
        }
    }

    /// Number of range entries covered by the window.
    pub fn entries(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// One decoded 12-byte entry of the range zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RangeEntry {
    pub ip_start: u32,
    pub ip_end: u32,
    pub text_offset: u32,
    pub text_length: u8,
}

impl RangeEntry {
    #[inline]
    pub(crate) fn parse(entry: &[u8]) -> Self {
        RangeEntry {
            ip_start: utility::four_byte_int(&entry[0..4]),
            ip_end: utility::four_byte_int(&entry[4..8]),
            text_offset: utility::three_byte_int(&entry[8..11]),
            text_length: entry[11],
        }
    }

    #[inline]
    pub fn contains(&self, ip: u32) -> bool {
        self.ip_start <= ip && ip <= self.ip_end
    }

    /// Byte range of the text record inside the file.
    pub fn text_span(&self) -> std::ops::Range<usize> {
        let offset = self.text_offset as usize;
        offset..offset + usize::from(self.text_length)
    }
}

/// Fixed table of prefix windows, one slot per possible first octet.
#[derive(Clone, Debug)]
pub(crate) struct PrefixTable {
    windows: [Option<PrefixWindow>; 256],
}

impl PrefixTable {
    /// Build the table from the raw prefix zone.
    ///
    /// Every window must satisfy `start <= end` and may only reference range entries that
    /// lie inside both the range zone and the file.
    pub(crate) fn parse(header: &FileHeader, zone: &[u8], file_len: u64) -> Result<Self> {
        let mut windows = [None; 256];

        for entry in zone.chunks_exact(PREFIX_ENTRY_LENGTH) {
            let window = PrefixWindow::parse(entry);
            if window.start > window.end {
                return Err(Error::corrupt(format!(
                    "prefix {} window starts at record {} after it ends at {}",
                    window.prefix, window.start, window.end
                )));
            }
            let last = header.range_position(window.end);
            if last > u64::from(header.range_end) || last + RANGE_ENTRY_LENGTH as u64 > file_len {
                return Err(Error::corrupt(format!(
                    "prefix {} window ends at record {} outside the range zone",
                    window.prefix, window.end
                )));
            }

            // last write wins
            if let Some(previous) = windows[usize::from(window.prefix)].replace(window) {
                warn!(
                    prefix = window.prefix,
                    ?previous,
                    replacement = ?window,
                    "duplicate prefix entry"
                );
            }
        }

        let table = PrefixTable { windows };
        debug!(
            entries = zone.len() / PREFIX_ENTRY_LENGTH,
            populated = table.populated(),
            "built prefix table"
        );
        Ok(table)
    }

    #[inline]
    pub(crate) fn get(&self, prefix: u8) -> Option<PrefixWindow> {
        self.windows[usize::from(prefix)]
    }

    pub(crate) fn populated(&self) -> usize {
        self.windows.iter().flatten().count()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = PrefixWindow> + '_ {
        self.windows.iter().flatten().copied()
    }
}

/// Find the ordinal of the first entry in `window` whose end address is strictly
/// greater than `ip`, falling back to `window.start` when none is.
///
/// `end_ip` reads the end address of the entry at an ordinal.
pub(crate) fn search_window<F>(window: PrefixWindow, ip: u32, mut end_ip: F) -> Result<u32>
where
    F: FnMut(u32) -> Result<u32>,
{
    let mut low = window.start;
    let mut high = window.end;
    let mut result = window.start;

    while low <= high {
        let mid = low + (high - low) / 2;
        if end_ip(mid)? > ip {
            result = mid;
            if mid == 0 {
                break;
            }
            high = mid - 1;
        } else {
            low = mid + 1;
        }
    }

    Ok(result)
}
