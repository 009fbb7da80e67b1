//! Table dialect options.

use encoding_rs::Encoding;

use crate::error::{CsvError, Result};

/// Decimal separator used when writing fractional cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatDelimiter {
    #[default]
    Point,
    Comma,
}

impl FloatDelimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Point => '.',
            Self::Comma => ',',
        }
    }
}

/// Delimiter, text encoding and decimal separator of a table file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub float_delimiter: FloatDelimiter,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: encoding_rs::WINDOWS_1251,
            float_delimiter: FloatDelimiter::Point,
        }
    }
}

impl CsvOptions {
    /// Default dialect with UTF-8 text.
    pub fn utf8() -> Self {
        Self::default().with_encoding(encoding_rs::UTF_8)
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Looks up an encoding by WHATWG label, e.g. `windows-1251` or `cp1251`.
    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        let encoding =
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| CsvError::UnknownEncoding {
                label: label.to_string(),
            })?;
        Ok(self.with_encoding(encoding))
    }

    #[must_use]
    pub fn with_float_delimiter(mut self, float_delimiter: FloatDelimiter) -> Self {
        self.float_delimiter = float_delimiter;
        self
    }
}
