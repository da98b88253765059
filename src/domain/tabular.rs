//! Typed rows for custom tabular feeds.
//!
//! Column positions are resolved once from the header. Each row then carries
//! its well-known fields as typed values; any other column is read by name
//! through the schema's lookup table.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::error::TradefeedError;

const TIME_COLUMNS: &[&str] = &["date", "time", "datetime"];
/// In priority order: the first present wins.
const VALUE_COLUMNS: &[&str] = &["value", "close", "settle", "price"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y%m%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

#[derive(Debug, Clone, PartialEq)]
pub struct TabularSchema {
    time_column: usize,
    value_column: usize,
    high_column: Option<usize>,
    low_column: Option<usize>,
    /// Record positions of the remaining columns, in header order.
    extra_columns: Vec<usize>,
    /// Lowercased column name to its slot in `extra_columns`.
    lookup: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    pub time: NaiveDateTime,
    pub value: Decimal,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    /// Trimmed cell text of the unlisted columns, in header order.
    pub extras: Vec<String>,
}

impl TabularRow {
    /// Text of an unlisted column, `None` when the column is absent or the cell empty.
    pub fn get_str(&self, schema: &TabularSchema, name: &str) -> Option<&str> {
        let slot = *schema.lookup.get(&name.trim().to_lowercase())?;
        self.extras
            .get(slot)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Numeric value of an unlisted column. A cell that is present but not a
    /// number is a `DataParse` error.
    pub fn get_decimal(
        &self,
        schema: &TabularSchema,
        name: &str,
    ) -> Result<Option<Decimal>, TradefeedError> {
        match self.get_str(schema, name) {
            Some(cell) => parse_decimal(cell)
                .map_err(|_| parse_error(format!("column '{name}' at {}: invalid number '{cell}'", self.time))),
            None => Ok(None),
        }
    }
}

fn parse_error(reason: String) -> TradefeedError {
    TradefeedError::DataParse {
        source_name: "tabular".to_string(),
        reason,
    }
}

impl TabularSchema {
    pub fn from_header(header: &[&str]) -> Result<Self, TradefeedError> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let position = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| names.iter().position(|n| n.as_str() == *c))
        };

        let time_column = position(TIME_COLUMNS)
            .ok_or_else(|| parse_error("header has no date or time column".to_string()))?;
        let value_column = position(VALUE_COLUMNS)
            .ok_or_else(|| parse_error("header has no value, close, settle or price column".to_string()))?;
        let high_column = position(&["high"]);
        let low_column = position(&["low"]);

        let mut extra_columns = Vec::new();
        let mut lookup = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if i == time_column
                || i == value_column
                || Some(i) == high_column
                || Some(i) == low_column
            {
                continue;
            }
            lookup.insert(name.clone(), extra_columns.len());
            extra_columns.push(i);
        }

        Ok(Self {
            time_column,
            value_column,
            high_column,
            low_column,
            extra_columns,
            lookup,
        })
    }

    pub fn parse_row(&self, record: &[&str]) -> Result<TabularRow, TradefeedError> {
        let cell = |i: usize| record.get(i).map(|s| s.trim()).unwrap_or("");

        let time = parse_time(cell(self.time_column))?;
        let value = parse_decimal(cell(self.value_column))?
            .ok_or_else(|| parse_error(format!("row at {time} has no value")))?;
        let high = match self.high_column {
            Some(i) => parse_decimal(cell(i))?,
            None => None,
        };
        let low = match self.low_column {
            Some(i) => parse_decimal(cell(i))?,
            None => None,
        };
        let extras = self
            .extra_columns
            .iter()
            .map(|&i| cell(i).to_string())
            .collect();

        Ok(TabularRow {
            time,
            value,
            high,
            low,
            extras,
        })
    }
}

pub fn parse_time(s: &str) -> Result<NaiveDateTime, TradefeedError> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(d.and_time(NaiveTime::MIN));
        }
    }
    Err(parse_error(format!("unrecognised timestamp '{s}'")))
}

fn parse_decimal(s: &str) -> Result<Option<Decimal>, TradefeedError> {
    if s.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map(Some)
        .map_err(|_| parse_error(format!("invalid number '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn settle_is_aliased_to_value() {
        let schema = TabularSchema::from_header(&["Date", "Settle", "Volume"]).unwrap();
        let row = schema.parse_row(&["2024-01-15", "101.25", "900"]).unwrap();
        assert_eq!(row.value, dec!(101.25));
        assert_eq!(row.time.to_string(), "2024-01-15 00:00:00");
        assert_eq!(row.get_decimal(&schema, "volume").unwrap(), Some(dec!(900)));
    }

    #[test]
    fn value_priority_when_several_present() {
        let schema = TabularSchema::from_header(&["time", "price", "close"]).unwrap();
        let row = schema.parse_row(&["2024-01-15 10:30:00", "1", "2"]).unwrap();
        assert_eq!(row.value, dec!(2));
        assert_eq!(row.get_decimal(&schema, "price").unwrap(), Some(dec!(1)));
    }

    #[test]
    fn high_low_optional() {
        let schema = TabularSchema::from_header(&["date", "high", "low", "close"]).unwrap();
        let row = schema.parse_row(&["20240115 09:31", "10", "", "9.5"]).unwrap();
        assert_eq!(row.high, Some(dec!(10)));
        assert_eq!(row.low, None);
        assert_eq!(row.time.to_string(), "2024-01-15 09:31:00");
    }

    #[test]
    fn unknown_column_reads_none() {
        let schema = TabularSchema::from_header(&["date", "value"]).unwrap();
        let row = schema.parse_row(&["2024-01-15", "3"]).unwrap();
        assert_eq!(row.get_str(&schema, "open_interest"), None);
        assert_eq!(row.get_decimal(&schema, "open_interest").unwrap(), None);
        assert!(row.extras.is_empty());
    }

    #[test]
    fn text_columns_read_back_and_bad_numbers_surface() {
        let schema =
            TabularSchema::from_header(&["date", "settle", "exchange", "volume", "note"]).unwrap();
        let row = schema
            .parse_row(&["2024-01-15", "72.5", "NYMEX", "12x", ""])
            .unwrap();
        assert_eq!(row.value, dec!(72.5));
        assert_eq!(row.get_str(&schema, "Exchange"), Some("NYMEX"));
        assert_eq!(row.get_str(&schema, "volume"), Some("12x"));
        assert!(matches!(
            row.get_decimal(&schema, "volume"),
            Err(TradefeedError::DataParse { .. })
        ));
        assert_eq!(row.get_str(&schema, "note"), None);
        assert_eq!(row.get_decimal(&schema, "note").unwrap(), None);
    }

    #[test]
    fn missing_required_columns() {
        assert!(matches!(
            TabularSchema::from_header(&["value"]),
            Err(TradefeedError::DataParse { .. })
        ));
        assert!(matches!(
            TabularSchema::from_header(&["date", "volume"]),
            Err(TradefeedError::DataParse { .. })
        ));
    }

    #[test]
    fn bad_cells() {
        let schema = TabularSchema::from_header(&["date", "value"]).unwrap();
        assert!(schema.parse_row(&["15/01/2024", "1"]).is_err());
        assert!(schema.parse_row(&["2024-01-15", "abc"]).is_err());
        assert!(schema.parse_row(&["2024-01-15", ""]).is_err());
        assert!(schema.parse_row(&["2024-01-15"]).is_err());
    }

    #[test]
    fn scientific_notation_accepted() {
        let schema = TabularSchema::from_header(&["date", "value"]).unwrap();
        let row = schema.parse_row(&["2024-01-15", "1.5e2"]).unwrap();
        assert_eq!(row.value, dec!(150));
    }
}
