//! Tab-delimited measurement row tokenizing.

/// Splits a data line on tabs and parses every field as a number.
///
/// Each field is trimmed before parsing. Empty, non-numeric and `NaN` fields
/// become `None`; the returned length is always the number of tab-separated
/// fields, present or not.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::parse_fields;
///
/// assert_eq!(parse_fields("100\t1.5\t\tNaN"), vec![Some(100.0), Some(1.5), None, None]);
/// assert_eq!(parse_fields("SPL\t85.2"), vec![None, Some(85.2)]);
/// assert_eq!(parse_fields(""), vec![None]);
/// ```
pub fn parse_fields(line: &str) -> Vec<Option<f64>> {
    line.split('\t').map(parse_field).collect()
}

/// Parses one field, mapping anything that is not a number to `None`.
pub fn parse_field(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Returns field `index`, treating a field past the end of the row as absent.
pub fn field_at(fields: &[Option<f64>], index: usize) -> Option<f64> {
    fields.get(index).copied().flatten()
}

/// Returns the first tab-separated token of a line.
pub fn first_token(line: &str) -> &str {
    line.split('\t').next().unwrap_or_default()
}
