//! Length-bounded profile field types.
//!
//! Upper bounds on field length are part of the type: a [`BoundedText`] or
//! [`ExpertiseAreas`] value that exceeds its limit cannot be constructed or
//! deserialized. Lower bounds (non-empty, at least one entry) are a profile
//! completeness rule and are checked when a [`Record`](crate::Record) is built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

pub const MAX_IDENTIFIER_CHARS: usize = 100;
pub const MAX_REGION_CHARS: usize = 100;
pub const MAX_EXPERTISE_CHARS: usize = 50;
pub const MAX_EXPERTISE_AREAS: usize = 10;

/// UTF-8 text holding at most `MAX` characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedText<const MAX: usize>(String);

/// A caller's self-chosen display identifier.
pub type PersonalIdentifier = BoundedText<MAX_IDENTIFIER_CHARS>;
/// The region a caller is based in.
pub type RegionName = BoundedText<MAX_REGION_CHARS>;
/// A single skill label.
pub type ExpertiseArea = BoundedText<MAX_EXPERTISE_CHARS>;

impl<const MAX: usize> BoundedText<MAX> {
    /// The character limit of this type.
    pub const MAX_CHARS: usize = MAX;

    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        let actual = value.chars().count();
        if actual > MAX {
            return Err(TypeError::TextTooLong { max: MAX, actual });
        }
        Ok(Self(value))
    }

    /// The empty value. Valid as a field type, rejected as a profile.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const MAX: usize> TryFrom<String> for BoundedText<MAX> {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const MAX: usize> TryFrom<&str> for BoundedText<MAX> {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const MAX: usize> From<BoundedText<MAX>> for String {
    fn from(text: BoundedText<MAX>) -> Self {
        text.0
    }
}

impl<const MAX: usize> AsRef<str> for BoundedText<MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> PartialEq<str> for BoundedText<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const MAX: usize> PartialEq<&str> for BoundedText<MAX> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<const MAX: usize> fmt::Debug for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of at most [`MAX_EXPERTISE_AREAS`] expertise labels.
///
/// Order is preserved exactly as submitted; duplicates are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExpertiseArea>", into = "Vec<ExpertiseArea>")]
pub struct ExpertiseAreas(Vec<ExpertiseArea>);

impl ExpertiseAreas {
    pub fn new(areas: Vec<ExpertiseArea>) -> Result<Self, TypeError> {
        if areas.len() > MAX_EXPERTISE_AREAS {
            return Err(TypeError::TooManyEntries {
                max: MAX_EXPERTISE_AREAS,
                actual: areas.len(),
            });
        }
        Ok(Self(areas))
    }

    /// Build from plain strings, checking every element and the list length.
    pub fn from_strs<I, S>(labels: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let areas = labels
            .into_iter()
            .map(ExpertiseArea::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(areas)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExpertiseArea> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ExpertiseArea] {
        &self.0
    }

    /// Labels as plain string slices.
    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(BoundedText::as_str).collect()
    }
}

impl TryFrom<Vec<ExpertiseArea>> for ExpertiseAreas {
    type Error = TypeError;

    fn try_from(value: Vec<ExpertiseArea>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExpertiseAreas> for Vec<ExpertiseArea> {
    fn from(areas: ExpertiseAreas) -> Self {
        areas.0
    }
}

impl<'a> IntoIterator for &'a ExpertiseAreas {
    type Item = &'a ExpertiseArea;
    type IntoIter = std::slice::Iter<'a, ExpertiseArea>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
