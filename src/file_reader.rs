// Copyright 2026 The qqlocation Authors
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::net::Ipv4Addr;
use std::path::Path;

use tracing::{debug, trace};

use crate::address;
use crate::error::{Error, Result};
use crate::information::Information;
use crate::parse::{
    search_window, FileHeader, PrefixTable, PrefixWindow, RangeEntry, HEADER_LENGTH,
    RANGE_ENTRY_LENGTH,
};

/// The FileReader struct reads the database through any `Read + Seek` source.
///
/// Only the header and the prefix table are kept in memory; range entries and text
/// records are read on demand, which is why lookups need `&mut self`. Results are
/// identical to [`MemoryReader`](crate::MemoryReader).
#[derive(Debug)]
pub struct FileReader<R> {
    reader: R,
    file_len: u64,
    header: FileHeader,
    prefixes: PrefixTable,
}

impl FileReader<BufReader<File>> {
    /// Opens the file at `Path` for reading and returns a FileReader interface
    /// ```no_run
    /// use std::path::PathBuf;
    /// use qqlocation::FileReader;
    /// let mut path_buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    /// path_buf.push("resources/ip-utf8.dat");
    /// let mut reader = FileReader::open(&path_buf)?;
    /// # Ok::<(), qqlocation::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        FileReader::from_reader(reader)
    }
}

impl<T: AsRef<[u8]>> FileReader<Cursor<T>> {
    /// Open a file reader from a vec of bytes
    pub fn from_bytes(bytes: T) -> Result<Self> {
        let reader = Cursor::new(bytes);
        FileReader::from_reader(reader)
    }
}

impl<R: Read + Seek> FileReader<R> {
    /// Create file reader
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut header = [0u8; HEADER_LENGTH];
        let available = file_len.min(HEADER_LENGTH as u64) as usize;
        reader.read_exact(&mut header[..available])?;
        let header = FileHeader::parse(&header[..available], file_len)?;

        let (zone_start, zone_len) = header.prefix_zone();
        let mut zone = vec![0u8; zone_len];
        reader.seek(SeekFrom::Start(zone_start))?;
        reader.read_exact(&mut zone)?;
        let prefixes = PrefixTable::parse(&header, &zone, file_len)?;

        debug!(
            bytes = file_len,
            range_start = header.range_start,
            prefix_start = header.prefix_start,
            "opened database for seeking"
        );

        Ok(FileReader {
            reader,
            file_len,
            header,
            prefixes,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn window(&self, prefix: u8) -> Option<PrefixWindow> {
        self.prefixes.get(prefix)
    }

    /// Read the range entry at ordinal `index`.
    pub fn range_at(&mut self, index: u32) -> Result<RangeEntry> {
        let mut entry = [0u8; RANGE_ENTRY_LENGTH];
        self.reader
            .seek(SeekFrom::Start(self.header.range_position(index)))?;
        self.reader.read_exact(&mut entry)?;
        Ok(RangeEntry::parse(&entry))
    }

    /// Find the range entry containing `ip`, searching only the window of `prefix`.
    pub fn resolve(&mut self, ip: u32, prefix: u8) -> Result<RangeEntry> {
        let window = self.window(prefix).ok_or(Error::PrefixNotFound {
            ip: Ipv4Addr::from(ip),
            prefix,
        })?;

        let index = search_window(window, ip, |i| Ok(self.range_at(i)?.ip_end))?;
        let entry = self.range_at(index)?;
        trace!(ip, prefix, index, ?entry, "searched prefix window");

        if entry.contains(ip) {
            Ok(entry)
        } else {
            Err(Error::AddressNotFound(Ipv4Addr::from(ip)))
        }
    }

    /// Read the raw text record an entry points at.
    pub fn text(&mut self, entry: &RangeEntry) -> Result<Vec<u8>> {
        let span = entry.text_span();
        if span.end as u64 > self.file_len {
            return Err(Error::corrupt(format!(
                "text record [{}, {}) is past the end of the {} byte file",
                span.start, span.end, self.file_len
            )));
        }
        let mut text = vec![0u8; span.len()];
        self.reader.seek(SeekFrom::Start(span.start as u64))?;
        self.reader.read_exact(&mut text)?;
        Ok(text)
    }

    /// Retrieve the geolocation associated with `Ipv4Addr`, if one exists
    pub fn fetch(&mut self, ip: &Ipv4Addr) -> Result<Information> {
        let (ip_int, prefix) = address::split(ip);
        let entry = self.resolve(ip_int, prefix)?;
        let text = self.text(&entry)?;
        Information::decode_bytes(&text)
    }

    /// Parse `ip` and decode the geolocation of the range containing it.
    pub fn lookup(&mut self, ip: &str) -> Result<Information> {
        let ip = address::to_ipv4(ip)?;
        self.fetch(&ip)
    }

    /// Like [`FileReader::lookup`], but an address without data yields
    /// [`Information::unknown`] instead of an error.
    ///
    /// A stored record whose fields are all `"N/A"` comes back identical to a miss; use
    /// [`FileReader::lookup`] and [`Error::is_not_found`] when the two must be told apart.
    pub fn lookup_or_unknown(&mut self, ip: &str) -> Result<Information> {
        match self.lookup(ip) {
            Err(e) if e.is_not_found() => Ok(Information::unknown()),
            result => result,
        }
    }
}
