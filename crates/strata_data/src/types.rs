//! Data types, conversion rules and naming utilities.
//!
//! This module is the single source of truth for the scalar types a
//! [`DataItem`](crate::DataItem) can carry, the string parsers that move
//! values between their canonical string form and native types, and the
//! name/title conversion helpers used by the codecs.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Sentinel literal that date parsing maps to "now" instead of parsing.
pub const VALUE_DATETIME_TODAY: &str = "DateTimeToday";

/// Default date/time format mask (e.g. `Jan-15-2026 09:30:00`).
pub const FORMAT_DATETIME_DEFAULT: &str = "%b-%d-%Y %H:%M:%S";

// Date and time related constants.

pub const FORMAT_DATE_DEFAULT: &str = "%b-%d-%Y";
pub const FORMAT_TIME_DEFAULT: &str = "%H:%M:%S";
pub const FORMAT_SQL_ISO_DATE: &str = "%Y-%m-%d";
pub const FORMAT_SQL_ISO_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
pub const FORMAT_ISO_8601_DATETIME: &str = "%Y-%m-%dT%H:%M:%SZ";

// Document action constants.

pub const ACTION_ADD: &str = "Add";
pub const ACTION_UPDATE: &str = "Update";
pub const ACTION_DELETE: &str = "Delete";

// Well-known item feature names. The feature map is open-ended; these are
// the names the rest of the stack recognizes.

pub const FEATURE_IS_SECRET: &str = "isSecret";
pub const FEATURE_IS_STORED: &str = "isStored";
pub const FEATURE_IS_UNIQUE: &str = "isUnique";
pub const FEATURE_IS_HIDDEN: &str = "isHidden";
pub const FEATURE_IS_VISIBLE: &str = "isVisible";
pub const FEATURE_IS_INDEXED: &str = "isIndexed";
pub const FEATURE_IS_CONTENT: &str = "isContent";
pub const FEATURE_IS_REQUIRED: &str = "isRequired";
pub const FEATURE_MV_DELIMITER: &str = "delimiterChar";
pub const FEATURE_IS_PRIMARY_KEY: &str = "isPrimaryKey";
pub const FEATURE_DESCRIPTION: &str = "fieldDescription";
pub const FEATURE_INDEX_FIELD_TYPE: &str = "indexFieldType";

/// Delimiter used when a multi-value item is collapsed to a single string.
pub const VALUE_SEPARATOR_CHAR: char = '|';

pub const STRING_TRUE: &str = "true";
pub const STRING_FALSE: &str = "false";

/// Scalar data types an item can be declared as.
///
/// `Undefined` is a placeholder: an item created without an explicit type
/// resolves to a concrete type when its first value is assigned. It is
/// never written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    DateTime,
    #[default]
    Undefined,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "Text",
            DataType::Integer => "Integer",
            DataType::Long => "Long",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::Boolean => "Boolean",
            DataType::DateTime => "DateTime",
            DataType::Undefined => "Undefined",
        }
    }

    /// Returns true if this type represents a numeric type.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::Long | DataType::Float | DataType::Double
        )
    }

    /// Returns true if this type represents a boolean type.
    pub fn is_boolean(&self) -> bool {
        matches!(self, DataType::Boolean)
    }

    /// Returns true if this type represents a text type.
    pub fn is_text(&self) -> bool {
        matches!(self, DataType::Text)
    }

    /// Returns true if this type represents a date or time type.
    pub fn is_date_or_time(&self) -> bool {
        matches!(self, DataType::DateTime)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(DataType::Text),
            "Integer" => Ok(DataType::Integer),
            "Long" => Ok(DataType::Long),
            "Float" => Ok(DataType::Float),
            "Double" => Ok(DataType::Double),
            "Boolean" => Ok(DataType::Boolean),
            "DateTime" => Ok(DataType::DateTime),
            "Undefined" => Ok(DataType::Undefined),
            _ => Err(DataError::InvalidType {
                name: s.to_string(),
            }),
        }
    }
}

/// A native value that knows its [`DataType`] and canonical string form.
///
/// Item setters accept any `DataValue`, which is how an `Undefined` item
/// takes its type from the first value written to it. Anything not covered
/// by an impl is handed in as text.
pub trait DataValue {
    fn data_type(&self) -> DataType;
    fn to_value_string(&self) -> String;
}

impl DataValue for &str {
    fn data_type(&self) -> DataType {
        DataType::Text
    }

    fn to_value_string(&self) -> String {
        (*self).to_string()
    }
}

impl DataValue for String {
    fn data_type(&self) -> DataType {
        DataType::Text
    }

    fn to_value_string(&self) -> String {
        self.clone()
    }
}

impl DataValue for bool {
    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn to_value_string(&self) -> String {
        bool_to_str(*self).to_string()
    }
}

impl DataValue for i32 {
    fn data_type(&self) -> DataType {
        DataType::Integer
    }

    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for i64 {
    fn data_type(&self) -> DataType {
        DataType::Long
    }

    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for f32 {
    fn data_type(&self) -> DataType {
        DataType::Float
    }

    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for f64 {
    fn data_type(&self) -> DataType {
        DataType::Double
    }

    fn to_value_string(&self) -> String {
        self.to_string()
    }
}

impl DataValue for NaiveDateTime {
    fn data_type(&self) -> DataType {
        DataType::DateTime
    }

    fn to_value_string(&self) -> String {
        self.format(FORMAT_DATETIME_DEFAULT).to_string()
    }
}

/// Parses an `i32` from a digits-only string.
///
/// The string must be composed entirely of ASCII digits; a leading sign is
/// not accepted. Any other input - including overflow - yields `i32::MIN`
/// instead of failing. Tolerant by contract, unlike the float parsers.
pub fn create_int(value: &str) -> i32 {
    if is_digits(value) {
        value.parse().unwrap_or(i32::MIN)
    } else {
        i32::MIN
    }
}

/// Parses an `i64` from a digits-only string, yielding `i64::MIN` on any
/// input that is not all digits.
pub fn create_long(value: &str) -> i64 {
    if is_digits(value) {
        value.parse().unwrap_or(i64::MIN)
    } else {
        i64::MIN
    }
}

/// Parses an `f32`. An empty string yields the `f32::MIN` sentinel; a
/// non-empty unparseable string is an error.
pub fn create_float(value: &str) -> Result<f32, DataError> {
    if value.is_empty() {
        return Ok(f32::MIN);
    }
    value.parse().map_err(|_| DataError::InvalidNumber {
        value: value.to_string(),
    })
}

/// Parses an `f64`. An empty string yields the `f64::MIN` sentinel; a
/// non-empty unparseable string is an error.
pub fn create_double(value: &str) -> Result<f64, DataError> {
    if value.is_empty() {
        return Ok(f64::MIN);
    }
    value.parse().map_err(|_| DataError::InvalidNumber {
        value: value.to_string(),
    })
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true if the value is one of the recognized truthy tokens
/// (case-insensitive `true`, `yes`, `on`, `1`).
pub fn str_to_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

pub fn bool_to_str(value: bool) -> &'static str {
    if value {
        STRING_TRUE
    } else {
        STRING_FALSE
    }
}

/// Parses a date/time using [`FORMAT_DATETIME_DEFAULT`]. An empty string or
/// the [`VALUE_DATETIME_TODAY`] sentinel maps to the current local time; an
/// unparseable value is `None`.
pub fn create_date(value: &str) -> Option<NaiveDateTime> {
    create_date_with_format(value, FORMAT_DATETIME_DEFAULT)
}

/// Parses a date/time using the given format mask, falling back to
/// [`FORMAT_DATETIME_DEFAULT`] when the mask is empty.
pub fn create_date_with_format(value: &str, format_mask: &str) -> Option<NaiveDateTime> {
    if value.is_empty() || value == VALUE_DATETIME_TODAY {
        return Some(Local::now().naive_local());
    }
    let mask = if format_mask.is_empty() {
        FORMAT_DATETIME_DEFAULT
    } else {
        format_mask
    };
    NaiveDateTime::parse_from_str(value, mask).ok()
}

/// Formats a date/time using the given format mask, falling back to
/// [`FORMAT_DATETIME_DEFAULT`] when the mask is empty.
pub fn date_to_string(date: &NaiveDateTime, format_mask: &str) -> String {
    let mask = if format_mask.is_empty() {
        FORMAT_DATETIME_DEFAULT
    } else {
        format_mask
    };
    date.format(mask).to_string()
}

/// Milliseconds since the Unix epoch for a parsed date/time value.
pub fn create_date_millis(value: &str) -> Option<i64> {
    create_date(value).map(|dt| dt.and_utc().timestamp_millis())
}

/// Derives a display title from an item name.
///
/// `id` becomes `Id`, `employee.name` and `employee_name` become
/// `Employee Name`, `federatedName` becomes `Federated Name`. Any other
/// character passes through unchanged.
pub fn name_to_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len() + 8);
    let mut last_space = true;
    let mut last_lower = false;

    for mut ch in name.chars() {
        if ch == '_' || ch == '.' {
            ch = ' ';
            title.push(ch);
        } else if last_space {
            title.extend(ch.to_uppercase());
        } else if ch.is_uppercase() && last_lower {
            title.push(' ');
            title.push(ch);
        } else {
            title.push(ch);
        }
        last_space = ch == ' ';
        last_lower = ch.is_lowercase();
    }

    title
}

/// Derives an item name from a display title - the approximate inverse of
/// [`name_to_title`]: lowercased, with spaces, hyphens, parentheses and
/// brackets mapped to `_`, runs of `_` collapsed and a trailing `_`
/// stripped.
pub fn title_to_name(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut name = String::with_capacity(lowered.len());
    let mut last_underscore = false;

    for ch in lowered.chars() {
        let mapped = match ch {
            ' ' | '-' | '(' | ')' | '[' | ']' => '_',
            other => other,
        };
        if mapped == '_' {
            if !last_underscore {
                name.push('_');
            }
            last_underscore = true;
        } else {
            name.push(mapped);
            last_underscore = false;
        }
    }
    if name.ends_with('_') {
        name.pop();
    }

    name
}
