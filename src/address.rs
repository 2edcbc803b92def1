// Copyright 2026 The qqlocation Authors
//! Conversion of textual addresses into the integer form the index searches on.

use std::net::{IpAddr, Ipv4Addr};

use crate::error::{Error, Result};

/// Parse `ip` into its big-endian integer value and its first octet.
///
/// IPv4-mapped IPv6 literals (`::ffff:a.b.c.d`) are accepted and unwrapped; any other
/// IPv6 address fails with [`Error::InvalidAddress`].
/// ```
/// let (ip, prefix) = qqlocation::address::parse("59.78.23.18")?;
/// assert_eq!(ip, 0x3B4E_1712);
/// assert_eq!(prefix, 59);
/// # Ok::<(), qqlocation::Error>(())
/// ```
pub fn parse(ip: &str) -> Result<(u32, u8)> {
    let v4 = to_ipv4(ip)?;
    Ok(split(&v4))
}

/// Parse `ip` into an [`Ipv4Addr`], applying the same rules as [`parse`].
pub fn to_ipv4(ip: &str) -> Result<Ipv4Addr> {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        Ok(IpAddr::V6(v6)) => v6
            .to_ipv4_mapped()
            .ok_or_else(|| Error::InvalidAddress(ip.to_owned())),
        Err(_) => Err(Error::InvalidAddress(ip.to_owned())),
    }
}

/// Integer value and prefix (first octet) of an address.
#[inline]
pub fn split(ip: &Ipv4Addr) -> (u32, u8) {
    let octets = ip.octets();
    (u32::from_be_bytes(octets), octets[0])
}
