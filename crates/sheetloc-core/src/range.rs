//! A1 notation for the remote table.
//!
//! Columns and rows are 1-based. Column letters count like an odometer
//! with no zero digit: A..Z, AA..AZ, BA.., ZZ, AAA.

use std::fmt;

use crate::SheetLocError;

/// Letters for a 1-based column index. `0` has no representation and yields
/// an empty string.
pub fn column_letters(column: usize) -> String {
    let mut n = column;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// 1-based column index for a run of letters (case-insensitive).
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0usize, |acc, b| {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Cell address such as `B12`.
pub fn to_a1(column: usize, row: usize) -> String {
    format!("{}{}", column_letters(column), row)
}

/// A possibly partial cell reference: `B12`, `B` or `12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRef {
    pub column: Option<usize>,
    pub row: Option<usize>,
}

impl CellRef {
    pub fn parse(s: &str) -> Result<Self, SheetLocError> {
        let invalid = || SheetLocError::InvalidCell(s.to_string());
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(cleaned.len());
        let (letters, digits) = cleaned.split_at(split);
        if letters.is_empty() && digits.is_empty() {
            return Err(invalid());
        }
        let column = if letters.is_empty() {
            None
        } else {
            Some(column_index(letters).ok_or_else(invalid)?)
        };
        let row = if digits.is_empty() {
            None
        } else {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let row: usize = digits.parse().map_err(|_| invalid())?;
            if row == 0 {
                return Err(invalid());
            }
            Some(row)
        };
        Ok(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(column) = self.column {
            f.write_str(&column_letters(column))?;
        }
        if let Some(row) = self.row {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Base range the sheet is read from: a tab name plus an optional anchor.
///
/// `Sheet1`, `'String list'!A1:H` and `Sheet1!C3` are all accepted. Text
/// without `!` is always a tab name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub start: Option<CellRef>,
    pub end: Option<CellRef>,
}

impl SheetRange {
    pub fn parse(s: &str) -> Result<Self, SheetLocError> {
        let invalid = || SheetLocError::InvalidRange(s.to_string());
        let trimmed = s.trim();
        let (sheet, rest) = if let Some(quoted) = trimmed.strip_prefix('\'') {
            let (name, rest) = split_quoted(quoted).ok_or_else(invalid)?;
            match rest {
                "" => (name, None),
                r => (name, Some(r.strip_prefix('!').ok_or_else(invalid)?)),
            }
        } else {
            match trimmed.split_once('!') {
                Some((name, cells)) => (name.to_string(), Some(cells)),
                None => (trimmed.to_string(), None),
            }
        };
        if sheet.is_empty() {
            return Err(invalid());
        }
        let (start, end) = match rest {
            None => (None, None),
            Some(cells) => {
                let (a, b) = match cells.split_once(':') {
                    Some((a, b)) => (a, Some(b)),
                    None => (cells, None),
                };
                let start = CellRef::parse(a).map_err(|_| invalid())?;
                let end = b
                    .map(|b| CellRef::parse(b).map_err(|_| invalid()))
                    .transpose()?;
                (Some(start), end)
            }
        };
        Ok(Self { sheet, start, end })
    }

    /// First column of the table (the header's first cell).
    pub fn anchor_column(&self) -> usize {
        self.start.and_then(|c| c.column).unwrap_or(1)
    }

    /// Row holding the header.
    pub fn anchor_row(&self) -> usize {
        self.start.and_then(|c| c.row).unwrap_or(1)
    }

    /// Absolute sheet row of the zero-based data row `row_id`.
    pub fn data_row(&self, row_id: usize) -> usize {
        self.anchor_row() + 1 + row_id
    }

    /// Tab name quoted for use in a range.
    pub fn quoted_sheet(&self) -> String {
        format!("'{}'", self.sheet.replace('\'', "''"))
    }

    /// Range covering one data row across `column_count` columns.
    pub fn row_range(&self, row_id: usize, column_count: usize) -> String {
        let row = self.data_row(row_id);
        let first = self.anchor_column();
        let last = first + column_count.max(1) - 1;
        format!(
            "{}!{}:{}",
            self.quoted_sheet(),
            to_a1(first, row),
            to_a1(last, row)
        )
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted_sheet())?;
        if let Some(start) = self.start {
            write!(f, "!{start}")?;
            if let Some(end) = self.end {
                write!(f, ":{end}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for SheetRange {
    type Err = SheetLocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split `name'rest` honoring `''` escapes. Input starts after the opening quote.
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let mut name = String::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if let Some((_, '\'')) = chars.peek() {
                chars.next();
                name.push('\'');
                continue;
            }
            return Some((name, &s[i + 1..]));
        }
        name.push(c);
    }
    None
}
