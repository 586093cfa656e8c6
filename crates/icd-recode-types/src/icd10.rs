//! ICD-10 code type.
//!
//! This module provides the `IcdCode` struct, a parsed ICD-10 code of the form
//! `<Letter><2-digit-category>[.<subcategory digits>]`, together with the
//! ordering used for range comparisons.

use std::fmt;
use std::str::FromStr;

/// Error type for ICD-10 code parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcdCodeParseError {
    /// The input was empty after trimming.
    Empty,
    /// The input does not follow the `A00[.0]` layout.
    InvalidFormat(String),
    /// The input contains characters outside letters, digits, `.` and `*`.
    InvalidCharacter(String),
}

impl fmt::Display for IcdCodeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty ICD-10 code"),
            Self::InvalidFormat(s) => {
                write!(f, "invalid ICD-10 code: '{}' (expected A00 or A00.0)", s)
            }
            Self::InvalidCharacter(s) => write!(f, "invalid character in ICD-10 code: '{}'", s),
        }
    }
}

impl std::error::Error for IcdCodeParseError {}

/// A parsed ICD-10 code.
///
/// Codes are ordered by letter, then by the numeric value of the category,
/// then by the subcategory digits compared position by position, which is
/// decimal-fraction order (`G20.1 < G20.11 < G20.2`). Every digit is
/// significant: `G20.10` is a subdivision of `G20.1`, so a code sorts
/// directly before its own subdivisions (`G20 < G20.0`, `G20.1 < G20.10`).
///
/// # Examples
///
/// ```
/// use icd_recode_types::IcdCode;
///
/// let code: IcdCode = "c140".parse().unwrap();
/// assert_eq!(code.to_string(), "C14.0");
/// assert!(code.category_level().covers(&code));
///
/// let a: IcdCode = "G20.1".parse().unwrap();
/// let b: IcdCode = "G20.11".parse().unwrap();
/// assert!(a < b);
/// assert_ne!(a, "G20.10".parse().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct IcdCode {
    // Field order is the sort order.
    letter: char,
    category: u8,
    subcategory: String,
}

impl IcdCode {
    /// Parses a code, normalizing case and layout.
    ///
    /// Surrounding whitespace is ignored, a leading `*` (the NCHS marker for
    /// codes outside ICD-10 proper, e.g. `*U01`) is dropped and a missing
    /// decimal point is inserted after the category (`C140` becomes `C14.0`).
    pub fn parse(value: &str) -> Result<Self, IcdCodeParseError> {
        let trimmed = value.trim();
        let body = trimmed.strip_prefix('*').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(IcdCodeParseError::Empty);
        }

        let invalid = || IcdCodeParseError::InvalidFormat(value.trim().to_string());
        let upper = body.to_ascii_uppercase();
        let bytes = upper.as_bytes();

        if bytes.len() < 3
            || !bytes[0].is_ascii_uppercase()
            || !bytes[1].is_ascii_digit()
            || !bytes[2].is_ascii_digit()
        {
            return Err(invalid());
        }

        let rest = &upper[3..];
        let subcategory = match rest.strip_prefix('.') {
            Some(digits) if digits.is_empty() => return Err(invalid()),
            Some(digits) => digits,
            None => rest,
        };
        if !subcategory.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self {
            letter: bytes[0] as char,
            category: upper[1..3].parse().map_err(|_| invalid())?,
            subcategory: subcategory.to_string(),
        })
    }

    /// Returns the chapter letter.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Returns the two-digit category as a number (`G20` → 20).
    pub fn category(&self) -> u8 {
        self.category
    }

    /// Returns the subcategory digits after the decimal point, possibly empty.
    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    /// Returns true if the code has no subcategory digits (e.g. `G20`).
    pub fn is_category_level(&self) -> bool {
        self.subcategory.is_empty()
    }

    /// Returns the (letter, category) pair used to compare categories.
    pub fn category_key(&self) -> (char, u8) {
        (self.letter, self.category)
    }

    /// Returns the three-character category this code belongs to.
    pub fn category_level(&self) -> Self {
        Self {
            letter: self.letter,
            category: self.category,
            subcategory: String::new(),
        }
    }

    /// Returns true if `other` is this code or one of its subdivisions.
    ///
    /// `G20` covers `G20` and `G20.1`; `G20.1` covers `G20.11` but not `G20.2`;
    /// `G20.0` does not cover `G20`.
    pub fn covers(&self, other: &IcdCode) -> bool {
        self.category_key() == other.category_key()
            && other.subcategory.starts_with(&self.subcategory)
    }
}

impl fmt::Display for IcdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.letter, self.category)?;
        if !self.subcategory.is_empty() {
            write!(f, ".{}", self.subcategory)?;
        }
        Ok(())
    }
}

impl FromStr for IcdCode {
    type Err = IcdCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IcdCode {
    type Error = IcdCodeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IcdCode> for String {
    fn from(code: IcdCode) -> Self {
        code.to_string()
    }
}
