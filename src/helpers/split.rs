use memchr::memchr_iter;

/// Field separator for every line of a table.
pub const DELIMITER: u8 = b',';

/// Splits one line into its fields on [`DELIMITER`].
///
/// An empty line yields a single empty field and a trailing delimiter yields a
/// trailing empty field. Fields are not trimmed and there is no quoting.
///
/// ```rust
/// # use csv_table::split_line;
/// assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
/// assert_eq!(split_line(""), vec![""]);
/// ```
pub fn split_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut field_start = 0;
    // DELIMITER is ASCII, so every match position is a char boundary
    for comma_pos in memchr_iter(DELIMITER, line.as_bytes()) {
        fields.push(&line[field_start..comma_pos]);
        field_start = comma_pos + 1;
    }
    fields.push(&line[field_start..]);
    fields
}
