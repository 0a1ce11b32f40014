//! Date and time values.
//!
//! A document can hold four precisions of datetime, tagged by [`DatetimeKind`]:
//!
//! | Kind | Example |
//! |------|---------|
//! | Offset date-time | `1979-05-27T07:32:00-08:00` |
//! | Local date-time | `1979-05-27T07:32:00` |
//! | Local date | `1979-05-27` |
//! | Local time | `07:32:00.999` |
//!
//! [`Datetime`] accepts any of them. The typed destinations [`LocalDate`],
//! [`LocalTime`], [`LocalDatetime`] and [`OffsetDatetime`] only accept their own
//! precision, except that a local date-time binds to [`OffsetDatetime`] at UTC.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_toml::datetime::{LocalDate, OffsetDatetime};
//!
//! #[derive(Deserialize)]
//! struct Owner {
//!     dob: OffsetDatetime,
//!     joined: LocalDate,
//! }
//!
//! let owner: Owner = serde_toml::from_str("dob = 1979-05-27T07:32:00\njoined = 2001-02-03").unwrap();
//! assert_eq!(owner.dob.0.offset().local_minus_utc(), 0);
//! assert_eq!(owner.joined.0.to_string(), "2001-02-03");
//! ```

use chrono::Offset as _;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Type name the binder recognizes for [`Datetime`] destinations.
pub(crate) const NAME: &str = "$__serde_toml_private_Datetime";
/// Single map key used when a datetime is handed to a dynamic destination.
pub(crate) const FIELD: &str = "$__serde_toml_private_datetime";
/// Newtype name [`DatetimeKey`] answers with a unit instead of [`FIELD`].
const KEY_MARKER: &str = "$__serde_toml_private_DatetimeKey";

/// Key deserializer of the one-entry map the binder presents a datetime as.
///
/// Visitors asking through [`MapKey`] see a marker; everything else sees the
/// [`FIELD`] text.
pub(crate) struct DatetimeKey;

impl<'de> Deserializer<'de> for DatetimeKey {
    type Error = crate::Error;

    fn deserialize_any<V>(self, visitor: V) -> crate::Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(FIELD)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> crate::Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if name == KEY_MARKER {
            visitor.visit_unit()
        } else {
            visitor.visit_str(FIELD)
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple tuple_struct map
        struct enum identifier ignored_any
    }
}

/// A map key that tells the binder's datetime entry apart from a document
/// key with the same spelling.
pub(crate) enum MapKey {
    Datetime,
    Plain(String),
}

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapKeyVisitor;

        impl<'de> Visitor<'de> for MapKeyVisitor {
            type Value = MapKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table key")
            }

            fn visit_unit<E>(self) -> Result<MapKey, E> {
                Ok(MapKey::Datetime)
            }

            fn visit_str<E>(self, value: &str) -> Result<MapKey, E> {
                Ok(MapKey::Plain(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<MapKey, E> {
                Ok(MapKey::Plain(value))
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<MapKey, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_string(self)
            }
        }

        deserializer.deserialize_newtype_struct(KEY_MARKER, MapKeyVisitor)
    }
}

/// Precision of a [`Datetime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatetimeKind {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

impl fmt::Display for DatetimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatetimeKind::OffsetDateTime => "offset date-time",
            DatetimeKind::LocalDateTime => "local date-time",
            DatetimeKind::LocalDate => "local date",
            DatetimeKind::LocalTime => "local time",
        })
    }
}

/// UTC offset of an offset date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    /// Written as `Z`.
    Z,
    /// Minutes east of UTC, written as `±HH:MM`.
    Custom { minutes: i16 },
}

impl Offset {
    #[must_use]
    pub fn minutes(&self) -> i16 {
        match self {
            Offset::Z => 0,
            Offset::Custom { minutes } => *minutes,
        }
    }

    fn to_fixed(self) -> Option<FixedOffset> {
        FixedOffset::east_opt(i32::from(self.minutes()) * 60)
    }
}

/// A datetime of any precision.
///
/// At least one of `date` and `time` is set, and `offset` is only set when
/// both are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Datetime {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub offset: Option<Offset>,
}

impl Datetime {
    #[must_use]
    pub fn kind(&self) -> DatetimeKind {
        match (self.date, self.time, self.offset) {
            (Some(_), Some(_), Some(_)) => DatetimeKind::OffsetDateTime,
            (Some(_), Some(_), None) => DatetimeKind::LocalDateTime,
            (Some(_), None, _) => DatetimeKind::LocalDate,
            (None, _, _) => DatetimeKind::LocalTime,
        }
    }

    #[must_use]
    pub fn to_local_date(&self) -> Option<NaiveDate> {
        match self.kind() {
            DatetimeKind::LocalDate => self.date,
            _ => None,
        }
    }

    #[must_use]
    pub fn to_local_time(&self) -> Option<NaiveTime> {
        match self.kind() {
            DatetimeKind::LocalTime => self.time,
            _ => None,
        }
    }

    #[must_use]
    pub fn to_local_datetime(&self) -> Option<NaiveDateTime> {
        match (self.kind(), self.date, self.time) {
            (DatetimeKind::LocalDateTime, Some(date), Some(time)) => {
                Some(NaiveDateTime::new(date, time))
            }
            _ => None,
        }
    }

    /// Converts an offset date-time, or a local date-time taken to be UTC.
    #[must_use]
    pub fn to_offset_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let (date, time) = (self.date?, self.time?);
        let offset = self.offset.unwrap_or(Offset::Z).to_fixed()?;
        offset
            .from_local_datetime(&NaiveDateTime::new(date, time))
            .single()
    }
}

impl From<NaiveDate> for Datetime {
    fn from(date: NaiveDate) -> Self {
        Datetime {
            date: Some(date),
            time: None,
            offset: None,
        }
    }
}

impl From<NaiveTime> for Datetime {
    fn from(time: NaiveTime) -> Self {
        Datetime {
            date: None,
            time: Some(time),
            offset: None,
        }
    }
}

impl From<NaiveDateTime> for Datetime {
    fn from(dt: NaiveDateTime) -> Self {
        Datetime {
            date: Some(dt.date()),
            time: Some(dt.time()),
            offset: None,
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Datetime {
    fn from(dt: DateTime<Tz>) -> Self {
        let minutes = dt.offset().fix().local_minus_utc() / 60;
        let offset = if minutes == 0 {
            Offset::Z
        } else {
            Offset::Custom {
                minutes: minutes as i16,
            }
        };
        let local = dt.naive_local();
        Datetime {
            date: Some(local.date()),
            time: Some(local.time()),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.date {
            write!(
                f,
                "{:04}-{:02}-{:02}",
                date.year(),
                date.month(),
                date.day()
            )?;
        }
        if let Some(time) = self.time {
            if self.date.is_some() {
                f.write_str("T")?;
            }
            write!(
                f,
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            )?;
            let nanos = time.nanosecond() % 1_000_000_000;
            if nanos != 0 {
                let digits = format!("{:09}", nanos);
                write!(f, ".{}", digits.trim_end_matches('0'))?;
            }
        }
        match self.offset {
            Some(Offset::Z) => f.write_str("Z")?,
            Some(Offset::Custom { minutes }) => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let minutes = minutes.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60)?;
            }
            None => {}
        }
        Ok(())
    }
}

/// Error from [`Datetime::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeParseError(&'static str);

impl fmt::Display for DatetimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for DatetimeParseError {}

impl FromStr for Datetime {
    type Err = DatetimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor { bytes: s.as_bytes(), pos: 0 };

        let date = if cursor.bytes.len() >= 10 && cursor.bytes.get(4) == Some(&b'-') {
            Some(cursor.date()?)
        } else {
            None
        };

        let time = match date {
            Some(_) if cursor.at_end() => None,
            Some(_) => {
                match cursor.next() {
                    Some(b'T' | b't' | b' ') => {}
                    _ => return Err(DatetimeParseError("expected `T` between date and time")),
                }
                Some(cursor.time()?)
            }
            None => Some(cursor.time()?),
        };

        let offset = if date.is_some() && time.is_some() && !cursor.at_end() {
            Some(cursor.offset()?)
        } else {
            None
        };

        if !cursor.at_end() {
            return Err(DatetimeParseError("unexpected trailing characters"));
        }

        Ok(Datetime { date, time, offset })
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn next(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied();
        self.pos += 1;
        b
    }

    fn expect(&mut self, byte: u8, msg: &'static str) -> Result<(), DatetimeParseError> {
        if self.next() == Some(byte) {
            Ok(())
        } else {
            Err(DatetimeParseError(msg))
        }
    }

    fn digits(&mut self, count: usize) -> Result<u32, DatetimeParseError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.next() {
                Some(b) if b.is_ascii_digit() => value = value * 10 + u32::from(b - b'0'),
                _ => return Err(DatetimeParseError("expected digit")),
            }
        }
        Ok(value)
    }

    fn date(&mut self) -> Result<NaiveDate, DatetimeParseError> {
        let year = self.digits(4)?;
        self.expect(b'-', "expected `-` after year")?;
        let month = self.digits(2)?;
        self.expect(b'-', "expected `-` after month")?;
        let day = self.digits(2)?;
        NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or(DatetimeParseError("date out of range"))
    }

    fn time(&mut self) -> Result<NaiveTime, DatetimeParseError> {
        let hour = self.digits(2)?;
        self.expect(b':', "expected `:` after hour")?;
        let minute = self.digits(2)?;
        self.expect(b':', "expected `:` after minute")?;
        let second = self.digits(2)?;

        let mut nanos = 0u32;
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            let start = self.pos;
            while let Some(b) = self.bytes.get(self.pos).filter(|b| b.is_ascii_digit()) {
                // Digits past nanosecond precision are truncated.
                if self.pos - start < 9 {
                    nanos = nanos * 10 + u32::from(b - b'0');
                }
                self.pos += 1;
            }
            let count = self.pos - start;
            if count == 0 {
                return Err(DatetimeParseError("expected digits after `.`"));
            }
            for _ in count..9 {
                nanos *= 10;
            }
        }

        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
            .ok_or(DatetimeParseError("time out of range"))
    }

    fn offset(&mut self) -> Result<Offset, DatetimeParseError> {
        let sign = match self.next() {
            Some(b'Z' | b'z') => return Ok(Offset::Z),
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(DatetimeParseError("expected offset")),
        };
        let hours = self.digits(2)?;
        self.expect(b':', "expected `:` in offset")?;
        let minutes = self.digits(2)?;
        if hours > 23 || minutes > 59 {
            return Err(DatetimeParseError("offset out of range"));
        }
        Ok(Offset::Custom {
            minutes: sign * (hours * 60 + minutes) as i16,
        })
    }
}

impl Serialize for Datetime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(NAME, &self.to_string())
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DatetimeVisitor;

        impl<'de> Visitor<'de> for DatetimeVisitor {
            type Value = Datetime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a datetime")
            }

            fn visit_str<E>(self, value: &str) -> Result<Datetime, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Datetime, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(self)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Datetime, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                // Other formats carry the datetime under its plain key.
                match map.next_key::<MapKey>()? {
                    Some(MapKey::Datetime) => {}
                    Some(MapKey::Plain(key)) if key == FIELD => {}
                    _ => return Err(de::Error::custom("expected a datetime")),
                }
                let text: String = map.next_value()?;
                text.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_newtype_struct(NAME, DatetimeVisitor)
    }
}

macro_rules! typed_datetime {
    ($(#[$meta:meta])* $name:ident($inner:ty), $convert:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub $inner);

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                Datetime::from(self.0).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let datetime = Datetime::deserialize(deserializer)?;
                datetime.$convert().map($name).ok_or_else(|| {
                    de::Error::custom(format!(
                        "expected a {}, found {} `{}`",
                        $kind,
                        datetime.kind(),
                        datetime
                    ))
                })
            }
        }
    };
}

typed_datetime!(
    /// A date without time or offset.
    LocalDate(NaiveDate),
    to_local_date,
    DatetimeKind::LocalDate
);
typed_datetime!(
    /// A time of day without date or offset.
    LocalTime(NaiveTime),
    to_local_time,
    DatetimeKind::LocalTime
);
typed_datetime!(
    /// A date and time without offset.
    LocalDatetime(NaiveDateTime),
    to_local_datetime,
    DatetimeKind::LocalDateTime
);
typed_datetime!(
    /// A date and time with offset. Local date-times bind at UTC.
    OffsetDatetime(DateTime<FixedOffset>),
    to_offset_datetime,
    DatetimeKind::OffsetDateTime
);
