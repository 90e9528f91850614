//! Warehouse column type definitions
//!
//! Defines the scalar column types an entity attribute can declare. The
//! names follow GoogleSQL spelling, which is also the spelling used for
//! query parameter types.

use core::fmt;
use core::str::FromStr;

/// Declared column type of an entity attribute.
///
/// Values are never validated against the declared type. The type is carried
/// for schema collaborators and for typing bound parameters.
///
/// # Examples
///
/// ```
/// use sleet_types::DataType;
///
/// assert_eq!(DataType::Int64.as_str(), "INT64");
/// assert_eq!("integer".parse::<DataType>(), Ok(DataType::Int64));
/// assert!(DataType::Timestamp.is_temporal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// Variable-length UTF-8 text
    #[default]
    String,
    /// 64-bit signed integer
    Int64,
    /// IEEE-754 double
    Float64,
    /// Exact decimal with 38 digits of precision
    Numeric,
    /// Exact decimal with 76 digits of precision
    BigNumeric,
    /// Boolean
    Bool,
    /// Variable-length binary
    Bytes,
    /// Absolute point in time
    Timestamp,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Civil date and time
    DateTime,
    /// JSON document
    Json,
    /// Geography value
    Geography,
}

impl DataType {
    /// Returns the SQL spelling of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Int64 => "INT64",
            DataType::Float64 => "FLOAT64",
            DataType::Numeric => "NUMERIC",
            DataType::BigNumeric => "BIGNUMERIC",
            DataType::Bool => "BOOL",
            DataType::Bytes => "BYTES",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::DateTime => "DATETIME",
            DataType::Json => "JSON",
            DataType::Geography => "GEOGRAPHY",
        }
    }

    /// Returns `true` for date and time types.
    #[inline]
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Timestamp | DataType::Date | DataType::Time | DataType::DateTime
        )
    }

    /// Returns `true` for numeric types.
    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int64 | DataType::Float64 | DataType::Numeric | DataType::BigNumeric
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeParseError(pub String);

impl fmt::Display for DataTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data type '{}'", self.0)
    }
}

impl std::error::Error for DataTypeParseError {}

impl FromStr for DataType {
    type Err = DataTypeParseError;

    /// Parses a type name (case-insensitive), accepting the legacy aliases
    /// `INTEGER`, `FLOAT`, `BOOLEAN` and `DECIMAL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.to_ascii_uppercase().as_str() {
            "STRING" => DataType::String,
            "INT64" | "INTEGER" | "INT" | "BIGINT" => DataType::Int64,
            "FLOAT64" | "FLOAT" => DataType::Float64,
            "NUMERIC" | "DECIMAL" => DataType::Numeric,
            "BIGNUMERIC" | "BIGDECIMAL" => DataType::BigNumeric,
            "BOOL" | "BOOLEAN" => DataType::Bool,
            "BYTES" => DataType::Bytes,
            "TIMESTAMP" => DataType::Timestamp,
            "DATE" => DataType::Date,
            "TIME" => DataType::Time,
            "DATETIME" => DataType::DateTime,
            "JSON" => DataType::Json,
            "GEOGRAPHY" => DataType::Geography,
            _ => return Err(DataTypeParseError(s.to_string())),
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("BOOLEAN".parse(), Ok(DataType::Bool));
        assert_eq!("float".parse(), Ok(DataType::Float64));
        assert_eq!("Decimal".parse(), Ok(DataType::Numeric));
        assert!("VARCHAR".parse::<DataType>().is_err());
    }

    #[test]
    fn serde_uses_sql_spelling() {
        let json = serde_json::to_string(&DataType::Timestamp).unwrap();
        assert_eq!(json, "\"TIMESTAMP\"");
        let back: DataType = serde_json::from_str("\"INT64\"").unwrap();
        assert_eq!(back, DataType::Int64);
    }
}
