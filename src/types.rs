//! Column data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShiftError;
use crate::parser;

/// Column type of a field.
///
/// Every variant maps to exactly one PostgreSQL keyword, see
/// [`ToSql`](crate::transpiler::ToSql).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    /// VARCHAR with optional length limit. Without a limit it is unbounded.
    String(Option<u32>),
    /// TIMESTAMP without timezone
    Timestamp,
    /// TIMESTAMP WITH TIME ZONE
    TimestampWithTimeZone,
    /// INTERVAL
    Interval,
    /// INET
    IpAddress,
    /// DATE
    Date,
    /// BOOLEAN
    Bool,
    /// SERIAL (auto-incrementing surrogate key)
    Serial,
    /// INTEGER
    Integer,
    /// DOUBLE PRECISION
    Double,
}

impl DataType {
    /// All variants, with `String` in its unbounded form.
    pub const ALL: [DataType; 10] = [
        Self::String(None),
        Self::Timestamp,
        Self::TimestampWithTimeZone,
        Self::Interval,
        Self::IpAddress,
        Self::Date,
        Self::Bool,
        Self::Serial,
        Self::Integer,
        Self::Double,
    ];

    /// Bounded varchar.
    pub const fn varchar(length: u32) -> Self {
        Self::String(Some(length))
    }

    /// Unbounded varchar.
    pub const fn text() -> Self {
        Self::String(None)
    }

    /// Get a human-readable name for listings.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Timestamp => "timestamp",
            Self::TimestampWithTimeZone => "timestamp-with-timezone",
            Self::Interval => "interval",
            Self::IpAddress => "ip-address",
            Self::Date => "date",
            Self::Bool => "bool",
            Self::Serial => "serial",
            Self::Integer => "integer",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::transpiler::ToSql;
        f.write_str(&self.to_sql())
    }
}

impl FromStr for DataType {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_data_type(s)
    }
}

impl TryFrom<String> for DataType {
    type Error = ShiftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_keyword() {
        assert_eq!(DataType::varchar(255).to_string(), "varchar(255)");
        assert_eq!(DataType::text().to_string(), "varchar");
        assert_eq!(DataType::Serial.to_string(), "SERIAL");
    }

    #[test]
    fn test_multi_word_keyword_parses_back() {
        let ty = DataType::TimestampWithTimeZone;
        assert_eq!(ty.to_string().parse::<DataType>().unwrap(), ty);
        assert_eq!(
            DataType::Double.to_string().parse::<DataType>().unwrap(),
            DataType::Double
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("uuid".parse::<DataType>().is_err());
    }
}
