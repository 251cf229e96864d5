//! Data Types and the Type Range Table
//!
//! Every variable node carries a `DataType`. The eight numeric types map to an
//! inclusive range of legal values; the remaining types (boolean, string,
//! datetime, bytestring, array) have no range.
//!
//! # Exact comparison
//!
//! Candidate values arrive as text and are compared as exact decimals
//! (`BigDecimal`). The int64/uint64 bounds do not survive a round trip through
//! `f64`, and the double bound (`1.8e308`) is larger than `f64::MAX`, so a float
//! comparison would silently accept or reject values at the boundary.
//!
//! ```rust
//! use opcsim_core::models::DataType;
//!
//! assert!(DataType::Int32.check_value("2147483647").is_ok());
//! assert!(DataType::Int32.check_value("2147483648").is_err());
//! assert!(DataType::String.check_value("anything").is_ok());
//! ```

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Magnitude (in decimal orders) beyond which no numeric type can hold a value.
///
/// The widest bound is double's `1.8e308`, so anything with more than 310
/// integer digits is out of range without a full comparison.
const MAX_ORDER_OF_MAGNITUDE: i64 = 310;

/// Errors produced when a raw value does not fit its data type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Value is required")]
    Empty,

    #[error("'{value}' is not a valid {data_type} value")]
    Unparseable { data_type: DataType, value: String },

    #[error("'{value}' is not an integer; {data_type} only accepts whole numbers")]
    NotInteger { data_type: DataType, value: String },

    #[error("'{value}' is out of range for {data_type} [{min}, {max}]")]
    OutOfRange {
        data_type: DataType,
        value: String,
        min: &'static str,
        max: &'static str,
    },
}

/// Data type of a variable node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Double,
    Float,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Boolean,
    String,
    DateTime,
    ByteString,
    Array,
}

impl DataType {
    /// All data types in display order
    pub const ALL: [DataType; 12] = [
        DataType::Double,
        DataType::Float,
        DataType::Int32,
        DataType::Int64,
        DataType::UInt16,
        DataType::UInt32,
        DataType::UInt64,
        DataType::Boolean,
        DataType::String,
        DataType::DateTime,
        DataType::ByteString,
        DataType::Array,
    ];

    /// Wire identifier (e.g. `"uint16"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::ByteString => "bytestring",
            Self::Array => "array",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Double => "Double Precision Float (Double)",
            Self::Float => "Single Precision Float (Float)",
            Self::Int32 => "32-bit Integer (Int32)",
            Self::Int64 => "64-bit Integer (Int64)",
            Self::UInt16 => "Unsigned 16-bit Integer (UInt16)",
            Self::UInt32 => "Unsigned 32-bit Integer (UInt32)",
            Self::UInt64 => "Unsigned 64-bit Integer (UInt64)",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "Date Time (DateTime)",
            Self::ByteString => "Byte String (ByteString)",
            Self::Array => "Array",
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Double | Self::Float)
    }

    /// Inclusive numeric range for this type, `None` for non-numeric types
    pub fn range(&self) -> Option<NumericRange> {
        let range = match self {
            Self::Int32 => NumericRange::integral(
                BigDecimal::from(i32::MIN),
                BigDecimal::from(i32::MAX),
                "-2147483648",
                "2147483647",
            ),
            Self::Int64 => NumericRange::integral(
                BigDecimal::from(i64::MIN),
                BigDecimal::from(i64::MAX),
                "-9223372036854775808",
                "9223372036854775807",
            ),
            Self::UInt16 => NumericRange::integral(
                BigDecimal::from(0u16),
                BigDecimal::from(u16::MAX),
                "0",
                "65535",
            ),
            Self::UInt32 => NumericRange::integral(
                BigDecimal::from(0u32),
                BigDecimal::from(u32::MAX),
                "0",
                "4294967295",
            ),
            Self::UInt64 => NumericRange::integral(
                BigDecimal::from(0u64),
                BigDecimal::from(u64::MAX),
                "0",
                "18446744073709551615",
            ),
            // 3.4e38 == 34 * 10^37
            Self::Float => NumericRange::floating(
                BigDecimal::new(BigInt::from(-34), -37),
                BigDecimal::new(BigInt::from(34), -37),
                "-3.4e38",
                "3.4e38",
            ),
            // 1.8e308 == 18 * 10^307
            Self::Double => NumericRange::floating(
                BigDecimal::new(BigInt::from(-18), -307),
                BigDecimal::new(BigInt::from(18), -307),
                "-1.8e308",
                "1.8e308",
            ),
            _ => return None,
        };
        Some(range)
    }

    /// Check a raw textual value against this type's range.
    ///
    /// Non-numeric types accept any non-empty text. Numeric types require the
    /// text to parse as a decimal number inside the inclusive range; integer
    /// types additionally reject fractional values. Nothing is clamped or
    /// truncated.
    pub fn check_value(&self, raw: &str) -> Result<(), ValueError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValueError::Empty);
        }

        match self.range() {
            Some(range) => range.check(*self, raw),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|data_type| data_type.as_str() == s)
            .ok_or_else(|| format!("Invalid data type: {}", s))
    }
}

/// Inclusive bounds of a numeric data type
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRange {
    pub min: BigDecimal,
    pub max: BigDecimal,
    /// Whether only whole numbers are legal
    pub integral: bool,
    min_text: &'static str,
    max_text: &'static str,
}

impl NumericRange {
    fn integral(
        min: BigDecimal,
        max: BigDecimal,
        min_text: &'static str,
        max_text: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            integral: true,
            min_text,
            max_text,
        }
    }

    fn floating(
        min: BigDecimal,
        max: BigDecimal,
        min_text: &'static str,
        max_text: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            integral: false,
            min_text,
            max_text,
        }
    }

    /// Lower bound as documented text
    pub fn min_text(&self) -> &'static str {
        self.min_text
    }

    /// Upper bound as documented text
    pub fn max_text(&self) -> &'static str {
        self.max_text
    }

    /// Whether `value` lies within `[min, max]`
    pub fn contains(&self, value: &BigDecimal) -> bool {
        &self.min <= value && value <= &self.max
    }

    fn check(&self, data_type: DataType, raw: &str) -> Result<(), ValueError> {
        let value = BigDecimal::from_str(raw).map_err(|_| ValueError::Unparseable {
            data_type,
            value: raw.to_string(),
        })?;

        let out_of_range = || ValueError::OutOfRange {
            data_type,
            value: raw.to_string(),
            min: self.min_text,
            max: self.max_text,
        };

        if value.is_zero() {
            return Ok(());
        }

        // Decide extreme exponents up front so the comparison below never has
        // to materialise an enormous rescaled integer.
        let (_, scale) = value.as_bigint_and_exponent();
        let order = (value.digits() as i64)
            .checked_sub(scale)
            .unwrap_or(i64::MAX);
        if order > MAX_ORDER_OF_MAGNITUDE {
            return Err(out_of_range());
        }
        if order < -MAX_ORDER_OF_MAGNITUDE {
            // |value| < 1 and non-zero digits far behind the point
            return if self.integral {
                Err(ValueError::NotInteger {
                    data_type,
                    value: raw.to_string(),
                })
            } else {
                Ok(())
            };
        }

        if self.integral && value.with_scale(0) != value {
            return Err(ValueError::NotInteger {
                data_type,
                value: raw.to_string(),
            });
        }

        if self.contains(&value) {
            Ok(())
        } else {
            Err(out_of_range())
        }
    }
}
