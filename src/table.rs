//! Typed access to decoded parquet rows.

use parquet::record::{Field, Row};

use crate::constants::columns;

/// Column accessor over one decoded parquet row.
///
/// Lookups return a documented default instead of failing when a column is
/// absent or null, so shards with partial schemas extract cleanly.
pub struct RowFields<'a> {
    row: &'a Row,
}

impl<'a> RowFields<'a> {
    /// Wrap a decoded row.
    pub fn new(row: &'a Row) -> Self {
        Self { row }
    }

    fn field(&self, column: &str) -> Option<&'a Field> {
        self.row
            .get_column_iter()
            .find(|(name, _)| name.as_str() == column)
            .map(|(_, field)| field)
    }

    /// Render a scalar column as text, or the empty string when the column
    /// is absent, null, or not scalar.
    pub fn text_or_default(&self, column: &str) -> String {
        self.field(column).and_then(field_text).unwrap_or_default()
    }

    /// Render the identifier column, falling back to `unknown_<row_index>`
    /// when the column is absent or null.
    pub fn id_or_synthetic(&self, column: &str, row_index: usize) -> String {
        self.field(column)
            .and_then(field_text)
            .unwrap_or_else(|| format!("{}{row_index}", columns::SYNTHETIC_ID_PREFIX))
    }

    /// Binary payload stored under `column`'s `sub_field`, when well-formed.
    ///
    /// Returns `None` for absent columns, null values, non-group values,
    /// and groups without a binary sub-field of that name. Callers treat
    /// all of those the same way: no image for this row.
    pub fn embedded_bytes(&self, column: &str, sub_field: &str) -> Option<&'a [u8]> {
        let Field::Group(group) = self.field(column)? else {
            return None;
        };
        group
            .get_column_iter()
            .find(|(name, _)| name.as_str() == sub_field)
            .and_then(|(_, field)| match field {
                Field::Bytes(bytes) => Some(bytes.data()),
                _ => None,
            })
    }
}

/// Scalar field rendered as text; `None` for null and non-scalar values.
///
/// Numeric columns are accepted and formatted with their canonical decimal
/// form, matching how rank positions arrive in evaluation shards.
fn field_text(field: &Field) -> Option<String> {
    match field {
        Field::Str(value) => Some(value.clone()),
        Field::Bool(value) => Some(value.to_string()),
        Field::Byte(value) => Some(value.to_string()),
        Field::Short(value) => Some(value.to_string()),
        Field::Int(value) => Some(value.to_string()),
        Field::Long(value) => Some(value.to_string()),
        Field::UByte(value) => Some(value.to_string()),
        Field::UShort(value) => Some(value.to_string()),
        Field::UInt(value) => Some(value.to_string()),
        Field::ULong(value) => Some(value.to_string()),
        Field::Float(value) => Some(value.to_string()),
        Field::Double(value) => Some(value.to_string()),
        _ => None,
    }
}
