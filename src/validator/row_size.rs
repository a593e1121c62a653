//! DB2 row size model
//!
//! Byte counts per column follow the DB2 11.5 "Byte Counts of Columns by Data
//! Type" table. Only used for budget style checks; unknown types cost nothing.

use crate::error::{parse_number, LintError};
use crate::state::ColumnState;
use crate::util::get_precision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Db2Type {
    /// TINYINT, BOOLEAN and SMALLINT all map to SMALLINT
    SmallInt,
    Integer,
    BigInt,
    Float,
    Decimal,
    Char,
    VarChar,
    Date,
    Time,
    Timestamp,
    Lob,
}

impl Db2Type {
    fn parse(base_type: &str) -> Option<Self> {
        let db2_type = match base_type.to_uppercase().as_str() {
            "TINYINT" | "BOOLEAN" | "SMALLINT" => Db2Type::SmallInt,
            "INTEGER" => Db2Type::Integer,
            "BIGINT" => Db2Type::BigInt,
            "FLOAT" | "DOUBLE" => Db2Type::Float,
            "DECIMAL" | "NUMBER" => Db2Type::Decimal,
            "CHAR" | "NCHAR" => Db2Type::Char,
            "VARCHAR" | "NVARCHAR" => Db2Type::VarChar,
            "DATE" => Db2Type::Date,
            "TIME" => Db2Type::Time,
            "DATETIME" | "TIMESTAMP" => Db2Type::Timestamp,
            "BLOB" | "CLOB" | "NCLOB" => Db2Type::Lob,
            _ => return None,
        };
        Some(db2_type)
    }
}

/// Upper bound of a LOB length band and the descriptor size stored in the row
const LOB_BANDS: &[(u64, u64)] = &[
    (1024, 73),
    (8192, 97),
    (65536, 121),
    (524_000, 145),
    (4_190_000, 169),
    (134_000_000, 201),
    (536_000_000, 225),
    (1_070_000_000, 257),
    (1_470_000_000, 281),
    (2_147_483_647, 317),
];

const DEFAULT_LOB_LENGTH: u64 = 1024;

/// Declared length of a column, `None` when empty or undeclared
fn declared_length(column: &ColumnState) -> Option<&str> {
    column
        .length
        .as_deref()
        .map(str::trim)
        .filter(|length| !length.is_empty())
}

fn length_of(value: &str) -> Result<u64, LintError> {
    parse_number("type", value)
}

/// Estimated bytes a column occupies in a data row
pub fn row_size(column: &ColumnState) -> Result<u64, LintError> {
    let Some(db2_type) = column.data_type.as_deref().and_then(Db2Type::parse) else {
        return Ok(0);
    };
    let length = declared_length(column);
    let size = match db2_type {
        Db2Type::SmallInt => 4,
        Db2Type::Integer => 6,
        Db2Type::BigInt | Db2Type::Float => 10,
        Db2Type::Decimal => match length {
            Some(length) => (get_precision("type", length)? / 2).saturating_add(3),
            None => 5,
        },
        Db2Type::Char => match length {
            Some(length) => length_of(length)?.saturating_add(2),
            None => 3,
        },
        // longer values are moved out of the row behind a 24 byte descriptor
        Db2Type::VarChar => match length {
            Some(length) => {
                let length = length_of(length)?;
                if length > 24 {
                    29
                } else {
                    length.saturating_add(5)
                }
            }
            None => 6,
        },
        Db2Type::Date => 6,
        Db2Type::Time => 5,
        Db2Type::Timestamp => match length {
            Some(length) => (length_of(length)?.saturating_add(1) / 2).saturating_add(9),
            None => 12,
        },
        Db2Type::Lob => {
            let length = match length {
                Some(length) => length_of(length)?,
                None => DEFAULT_LOB_LENGTH,
            };
            LOB_BANDS
                .iter()
                .find(|(limit, _)| length <= *limit)
                .map_or(0, |(_, size)| *size)
        }
    };
    Ok(size)
}

/// Estimated bytes a column contributes to an index key
pub fn key_size(column: &ColumnState) -> Result<u64, LintError> {
    match column.data_type.as_deref().and_then(Db2Type::parse) {
        // varying length columns carry a 2 byte length field in the key
        Some(Db2Type::VarChar) => match declared_length(column) {
            Some(length) => Ok(length_of(length)?.saturating_add(3)),
            None => Ok(4),
        },
        _ => row_size(column),
    }
}
