//! Header file parsing and start-timestamp decoding.
//!
//! The header file is a flat `key=value` text log. The start time is stored
//! as one dash-separated composite field:
//!
//! ```text
//! Year-Month-WeekNo-JDay-WDay-Day-Hour-Minute-Second-MSec-UTCOffsetMinutes
//! ```
//!
//! `WeekNo`, `JDay` and `WDay` are matched but unused.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::{Captures, Regex};

use crate::error::{ConvertError, Result};

pub const DUT_START_TIME: &str = "Cfg_DutStartTime";
pub const USER_NAME: &str = "Cfg_UserName";
pub const SERIAL_NUMBER: &str = "Cfg_SerialNumber";
pub const LOGIN_MODE: &str = "Cfg_LoginMode";
pub const SPEAKER: &str = "Cfg_Speaker";
pub const OVERALL_VERDICT: &str = "Ctrl_OverallVerdict";

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?<year>\d+)-(?<month>\d+)-(?<week>-*\d+)-(?<jday>-*\d+)-(?<wday>\d+)-(?<day>\d+)-(?<hour>\d+)-(?<minute>\d+)-(?<second>\d+)-(?<msec>\d+)-(?<offset>-?\d+)",
    )
    .expect("static regex must compile")
});

/// Parsed header key/value mapping.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::Header;
///
/// let header = Header::parse("Cfg_UserName=oper\nnot a pair\nCfg_Note=a=b=c\n").unwrap();
/// assert_eq!(header.get("Cfg_UserName").unwrap(), "oper");
/// // Only the segment after the first '=' is kept
/// assert_eq!(header.get("Cfg_Note").unwrap(), "a");
/// assert_eq!(header.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    values: HashMap<String, String>,
}

impl Header {
    /// Parses header text.
    ///
    /// Every line containing `=` is split on all `=` characters; the first
    /// segment is the key and the second the value. Remaining segments are
    /// dropped. Lines without `=` are ignored. Keys and values are kept
    /// verbatim (no trimming).
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateHeaderKey`](ConvertError::DuplicateHeaderKey) when a
    /// key appears twice.
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for line in text.lines() {
            if !line.contains('=') {
                continue;
            }
            let mut segments = line.split('=');
            let key = segments.next().unwrap_or_default();
            let value = segments.next().unwrap_or_default();
            if values.insert(key.to_string(), value.to_string()).is_some() {
                return Err(ConvertError::DuplicateHeaderKey(key.to_string()));
            }
        }
        Ok(Self { values })
    }

    /// Looks up a required key.
    ///
    /// # Errors
    ///
    /// Returns [`MissingHeaderKey`](ConvertError::MissingHeaderKey) when the
    /// key is absent.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConvertError::MissingHeaderKey(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decodes the `Cfg_DutStartTime` field.
    pub fn start_time(&self) -> Result<StartTime> {
        StartTime::decode(self.get(DUT_START_TIME)?)
    }
}

/// Decoded instrument start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTime {
    /// Local wall-clock time as recorded
    pub local: NaiveDateTime,
    /// Minutes the local time is ahead of UTC
    pub utc_offset_minutes: i32,
    pub utc: DateTime<Utc>,
}

impl StartTime {
    /// Decodes a composite timestamp.
    ///
    /// The pattern is searched anywhere in `raw`, so trailing fields are
    /// tolerated. UTC is the local time minus the offset.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedTimestamp`](ConvertError::MalformedTimestamp) when
    /// the layout does not match or the fields do not form a valid time.
    ///
    /// # Examples
    ///
    /// ```
    /// use klippel_report_converter::StartTime;
    ///
    /// let start = StartTime::decode("2020-5-20-135-5-14-10-1-37-563-120").unwrap();
    /// assert_eq!(start.local.to_string(), "2020-05-14 10:01:37.563");
    /// assert_eq!(start.utc.naive_utc().to_string(), "2020-05-14 08:01:37.563");
    /// ```
    pub fn decode(raw: &str) -> Result<Self> {
        let malformed = || ConvertError::MalformedTimestamp(raw.to_string());
        let caps = TIMESTAMP_RE.captures(raw).ok_or_else(malformed)?;

        let year: i32 = field(&caps, "year").ok_or_else(malformed)?;
        let month: u32 = field(&caps, "month").ok_or_else(malformed)?;
        let day: u32 = field(&caps, "day").ok_or_else(malformed)?;
        let hour: u32 = field(&caps, "hour").ok_or_else(malformed)?;
        let minute: u32 = field(&caps, "minute").ok_or_else(malformed)?;
        let second: u32 = field(&caps, "second").ok_or_else(malformed)?;
        let msec: u32 = field(&caps, "msec").ok_or_else(malformed)?;
        let utc_offset_minutes: i32 = field(&caps, "offset").ok_or_else(malformed)?;

        if msec > 999 {
            return Err(malformed());
        }
        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, minute, second, msec))
            .ok_or_else(malformed)?;
        let utc = local
            .checked_sub_signed(Duration::minutes(i64::from(utc_offset_minutes)))
            .ok_or_else(malformed)?
            .and_utc();

        Ok(Self {
            local,
            utc_offset_minutes,
            utc,
        })
    }

    /// Local time carrying its UTC offset, if the offset is representable.
    pub fn local_with_offset(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)?;
        Some(self.utc.with_timezone(&offset))
    }
}

fn field<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}
