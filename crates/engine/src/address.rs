//! Cell addressing.
//!
//! Converts between structural positions (0-based row and column indices)
//! and display identifiers like `"B12"` (column letters + 1-based row).
//! Identifiers are always derived from positions; structural edits recompute
//! them rather than treating the strings as a source of truth.

use thiserror::Error;

/// Errors from parsing a cell identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string does not match `[A-Z]+[0-9]+` with a row number >= 1.
    #[error("malformed cell identifier: {0:?}")]
    MalformedIdentifier(String),
}

/// Convert a 0-based column index to spreadsheet-style letter(s).
/// 0=A, 1=B, ..., 25=Z, 26=AA, 27=AB, etc.
pub fn column_label(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Convert column letters back to a 0-based index.
/// Returns `None` unless the string is one or more ASCII uppercase letters.
pub fn column_index(label: &str) -> Option<usize> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let n = label
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    Some(n - 1)
}

/// Build the display identifier for a structural position.
pub fn to_identifier(row: usize, col: usize) -> String {
    format!("{}{}", column_label(col), row + 1)
}

/// Parse a display identifier back into `(row, col)` structural indices.
///
/// Fails loudly on anything outside `[A-Z]+[0-9]+`: lowercase letters,
/// missing letter or digit runs, interleaved characters, or a row of 0.
pub fn from_identifier(id: &str) -> Result<(usize, usize), AddressError> {
    let malformed = || AddressError::MalformedIdentifier(id.to_string());

    let split = id
        .bytes()
        .position(|b| b.is_ascii_digit())
        .ok_or_else(malformed)?;
    let (letters, digits) = id.split_at(split);

    let col = column_index(letters).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let row_num: usize = digits.parse().map_err(|_| malformed())?;
    if row_num == 0 {
        return Err(malformed());
    }

    Ok((row_num - 1, col))
}
