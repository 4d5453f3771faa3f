use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

use crate::domain::UnknownVariant;

/// Reads a status-like TEXT column into its enum
pub fn text_enum<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
