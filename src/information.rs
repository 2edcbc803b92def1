// Copyright 2026 The qqlocation Authors
use std::fmt;

use crate::error::{Error, Result};

/// Value every [`Information`] field takes when no data was found.
pub const UNKNOWN: &str = "N/A";

const FIELD_COUNT: usize = 11;

/// Geolocation details decoded from a text record.
///
/// A text record holds eleven `|`-separated fields; fields 4 and 6 are not exposed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Information {
    pub continent: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub isp: String,
    pub country_en: String,
    pub country_code: String,
    pub longitude: String,
    pub latitude: String,
}

impl Default for Information {
    fn default() -> Self {
        Self::unknown()
    }
}

impl Information {
    /// An `Information` with every field set to [`UNKNOWN`].
    pub fn unknown() -> Self {
        Self {
            continent: UNKNOWN.to_owned(),
            country: UNKNOWN.to_owned(),
            province: UNKNOWN.to_owned(),
            city: UNKNOWN.to_owned(),
            isp: UNKNOWN.to_owned(),
            country_en: UNKNOWN.to_owned(),
            country_code: UNKNOWN.to_owned(),
            longitude: UNKNOWN.to_owned(),
            latitude: UNKNOWN.to_owned(),
        }
    }

    /// True when every field is the [`UNKNOWN`] sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    /// Split a raw text record into its named fields.
    /// ```
    /// use qqlocation::Information;
    /// let info = Information::decode("亚洲|中国|上海|上海||教育网|CN|China|CN|121.47|31.23")?;
    /// assert_eq!(info.isp, "教育网");
    /// assert_eq!(info.latitude, "31.23");
    /// # Ok::<(), qqlocation::Error>(())
    /// ```
    pub fn decode(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split('|').collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::MalformedRecord {
                fields: fields.len(),
                text: text.to_owned(),
            });
        }

        Ok(Self {
            continent: fields[0].to_owned(),
            country: fields[1].to_owned(),
            province: fields[2].to_owned(),
            city: fields[3].to_owned(),
            isp: fields[5].to_owned(),
            country_en: fields[7].to_owned(),
            country_code: fields[8].to_owned(),
            longitude: fields[9].to_owned(),
            latitude: fields[10].to_owned(),
        })
    }

    /// Decode raw bytes, replacing invalid UTF-8 rather than failing.
    pub(crate) fn decode_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(&String::from_utf8_lossy(bytes))
    }
}

impl fmt::Display for Information {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Continent: {}
Country: {}
Province: {}
City: {}
ISP: {}
Country (EN): {}
Country Code: {}
Longitude: {}
Latitude: {}",
            self.continent,
            self.country,
            self.province,
            self.city,
            self.isp,
            self.country_en,
            self.country_code,
            self.longitude,
            self.latitude,
        )
    }
}
