use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Closed set of labels an expense can be filed under.
///
/// The order of [`Category::ALL`] is the order shown to the user; the first
/// entry is the default selection of a fresh form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Food,
    Entertainment,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ];

    /// Label stored in the database and shown in the table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next label in display order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous label in display order, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EngineError::InvalidCategory(needle.to_string()))
    }
}
