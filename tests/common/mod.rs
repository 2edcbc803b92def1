// Copyright 2026 The qqlocation Authors
//! Writes small databases in the on-disk layout:
//! header | text records | range zone | prefix zone
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;

pub const SHANGHAI: &str = "亚洲|中国|上海|上海||教育网|CN|China|CN|121.472644|31.231706";
pub const BEIJING: &str = "亚洲|中国|北京|北京||联通|CN|China|CN|116.405285|39.904989";
pub const MOUNTAIN_VIEW: &str =
    "北美洲|美国|加利福尼亚|山景城||谷歌|US|United States|US|-122.083851|37.386052";

pub fn ip(s: &str) -> u32 {
    u32::from(s.parse::<Ipv4Addr>().unwrap())
}

/// A range `[start, end]` and the text record it points at.
pub struct Range<'a> {
    pub start: u32,
    pub end: u32,
    pub text: &'a str,
}

pub fn range<'a>(start: &str, end: &str, text: &'a str) -> Range<'a> {
    Range {
        start: ip(start),
        end: ip(end),
        text,
    }
}

/// Build a database whose prefix windows are derived from the ranges. Ranges must be
/// sorted and each must stay within one first octet.
pub fn build(ranges: &[Range<'_>]) -> Vec<u8> {
    let mut windows: Vec<(u8, u32, u32)> = Vec::new();
    for (i, r) in ranges.iter().enumerate() {
        let prefix = (r.start >> 24) as u8;
        assert_eq!(prefix, (r.end >> 24) as u8, "range crosses a prefix");
        match windows.last_mut() {
            Some(last) if last.0 == prefix => last.2 = i as u32,
            _ => windows.push((prefix, i as u32, i as u32)),
        }
    }
    build_with_windows(ranges, &windows)
}

/// Build a database with an explicit prefix zone, in the order given.
pub fn build_with_windows(ranges: &[Range<'_>], windows: &[(u8, u32, u32)]) -> Vec<u8> {
    assert!(!ranges.is_empty() && !windows.is_empty());

    // identical records share one copy of their text
    let mut text = Vec::new();
    let mut stored: HashMap<&str, (u32, u8)> = HashMap::new();
    let mut spans = Vec::new();
    for r in ranges {
        let span = *stored.entry(r.text).or_insert_with(|| {
            let span = (16 + text.len() as u32, u8::try_from(r.text.len()).unwrap());
            text.extend_from_slice(r.text.as_bytes());
            span
        });
        spans.push(span);
    }

    let p1 = 16 + text.len() as u32;
    let p2 = p1 + (ranges.len() as u32 - 1) * 12;
    let p3 = p2 + 12;
    let p4 = p3 + (windows.len() as u32 - 1) * 9;

    let mut data = Vec::new();
    for p in [p1, p2, p3, p4] {
        data.extend_from_slice(&p.to_le_bytes());
    }
    data.extend_from_slice(&text);
    for (r, (offset, len)) in ranges.iter().zip(spans) {
        data.extend_from_slice(&r.start.to_le_bytes());
        data.extend_from_slice(&r.end.to_le_bytes());
        data.extend_from_slice(&offset.to_le_bytes()[..3]);
        data.push(len);
    }
    for (prefix, start, end) in windows {
        data.push(*prefix);
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&end.to_le_bytes());
    }
    data
}

/// Ranges spread over a few prefixes, with gaps between some of them.
pub fn sample() -> Vec<u8> {
    build(&[
        range("1.0.0.0", "1.0.0.255", BEIJING),
        range("1.0.1.0", "1.0.3.255", SHANGHAI),
        range("1.0.8.0", "1.0.15.255", BEIJING),
        range("8.8.4.0", "8.8.4.255", MOUNTAIN_VIEW),
        range("8.8.8.0", "8.8.8.255", MOUNTAIN_VIEW),
        range("59.78.0.0", "59.78.63.255", SHANGHAI),
        range("59.78.64.0", "59.78.127.255", BEIJING),
        range("59.79.0.0", "59.79.255.255", SHANGHAI),
        range("202.96.0.0", "202.96.0.0", BEIJING),
    ])
}

/// Full-coverage IPv4 table: every address belongs to exactly one range, 1024 ranges
/// per first octet.
pub fn dense() -> Vec<u8> {
    const TEXTS: [&str; 3] = [SHANGHAI, BEIJING, MOUNTAIN_VIEW];
    let ranges: Vec<Range<'_>> = (0u32..256 * 1024)
        .map(|i| Range {
            start: i << 14,
            end: (i << 14) | 0x3FFF,
            text: TEXTS[i as usize % TEXTS.len()],
        })
        .collect();
    build(&ranges)
}

/// Path of the reference database shipped outside the repository, when present.
pub fn reference_database() -> Option<PathBuf> {
    let mut path_buf = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path_buf.push("resources/ip-utf8.dat");
    path_buf.exists().then_some(path_buf)
}
