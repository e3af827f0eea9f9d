//! Ordinal encoding table.
//!
//! Each ordinal habit attribute has a fixed, ordered list of textual levels.
//! A level's rank is its position in that list. The table is built once on
//! first use and never mutated afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Habit attributes whose levels carry an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrdinalAttribute {
    Vegetables,
    MainMeals,
    Snacks,
    Water,
    PhysicalActivity,
    ScreenTime,
    Alcohol,
}

impl OrdinalAttribute {
    pub const ALL: [Self; 7] = [
        Self::Vegetables,
        Self::MainMeals,
        Self::Snacks,
        Self::Water,
        Self::PhysicalActivity,
        Self::ScreenTime,
        Self::Alcohol,
    ];

    /// Column name in the model row.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::Vegetables => "vegetable_frequency",
            Self::MainMeals => "main_meals",
            Self::Snacks => "snacking",
            Self::Water => "water_intake",
            Self::PhysicalActivity => "physical_activity",
            Self::ScreenTime => "screen_time",
            Self::Alcohol => "alcohol",
        }
    }

    /// Levels in rank order.
    #[must_use]
    pub fn levels(&self) -> &'static [&'static str] {
        match self {
            Self::Vegetables => &["rarely", "sometimes", "always"],
            Self::MainMeals => &["one", "two", "three", "four or more"],
            Self::Snacks => &["never", "sometimes", "frequently", "always"],
            Self::Water => &["< 1 L/day", "1-2 L/day", "> 2 L/day"],
            Self::PhysicalActivity => &["none", "1-2x/week", "3-4x/week", "5x/week or more"],
            Self::ScreenTime => &["0-2 h/day", "3-5 h/day", "> 5 h/day"],
            Self::Alcohol => &["never", "sometimes", "frequently", "always"],
        }
    }
}

impl std::fmt::Display for OrdinalAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Level-to-rank lookup for every ordinal attribute.
#[derive(Debug)]
pub struct OrdinalEncoding {
    ranks: HashMap<OrdinalAttribute, HashMap<&'static str, u8>>,
}

static ENCODING: OnceLock<OrdinalEncoding> = OnceLock::new();

/// The process-wide encoding table.
pub fn ordinal_encoding() -> &'static OrdinalEncoding {
    ENCODING.get_or_init(OrdinalEncoding::build)
}

impl OrdinalEncoding {
    fn build() -> Self {
        let ranks = OrdinalAttribute::ALL
            .iter()
            .map(|attr| {
                let levels = attr
                    .levels()
                    .iter()
                    .enumerate()
                    .map(|(rank, level)| (*level, rank as u8))
                    .collect();
                (*attr, levels)
            })
            .collect();
        Self { ranks }
    }

    /// Rank of `level` for `attribute`.
    ///
    /// Unrecognized levels map to 0.
    #[must_use]
    pub fn rank(&self, attribute: OrdinalAttribute, level: &str) -> u8 {
        match self.ranks.get(&attribute).and_then(|m| m.get(level)) {
            Some(rank) => *rank,
            None => {
                tracing::warn!(%attribute, "Unmapped ordinal level, using rank 0");
                0
            }
        }
    }

    /// Levels in rank order, for building selection controls.
    #[must_use]
    pub fn levels(&self, attribute: OrdinalAttribute) -> &'static [&'static str] {
        attribute.levels()
    }
}
