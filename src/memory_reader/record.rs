// Copyright 2026 The qqlocation Authors
use std::{borrow::Cow, fmt, net::Ipv4Addr};

use crate::information::Information;
use crate::error::Result;
use crate::parse::RangeEntry;

/// A matched range entry and the text record it points at, borrowed from the reader's
/// buffer.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    ip: Ipv4Addr,
    entry: RangeEntry,
    text: &'a [u8],
}

impl<'a> fmt::Debug for Record<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl<'a> fmt::Display for Record<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IP: {}
Range: {} - {}
",
            self.ip,
            self.range_start(),
            self.range_end(),
        )?;
        match self.information() {
            Ok(info) => write!(f, "{}", info),
            Err(_) => write!(f, "Raw: {:?}", self.text()),
        }
    }
}

impl<'a> Record<'a> {
    #[inline]
    pub(crate) fn new(ip: Ipv4Addr, entry: RangeEntry, text: &'a [u8]) -> Self {
        Self { ip, entry, text }
    }

    /// The address that was looked up.
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn entry(&self) -> &RangeEntry {
        &self.entry
    }

    pub fn range_start(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.entry.ip_start)
    }

    pub fn range_end(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.entry.ip_end)
    }

    /// Raw bytes of the text record.
    pub fn bytes(&self) -> &'a [u8] {
        self.text
    }

    /// The text record, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.text)
    }

    /// Decode the text record into its named fields.
    pub fn information(&self) -> Result<Information> {
        Information::decode_bytes(self.text)
    }
}
