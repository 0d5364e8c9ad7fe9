//! Vegetable catalog.
//!
//! Static per-species data: growth time and display names.

use std::fmt;

use serde::{Serialize, Deserialize};

/// A vegetable species.
///
/// Ord follows declaration order, which is also the iteration order of every
/// BTreeMap keyed by vegetable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Vegetable {
    /// Grows every turn
    Carrot = 0,
    /// Grows every 2 turns
    Salad = 1,
    /// Grows every 3 turns
    Tomato = 2,
    /// Grows every 4 turns, forest only (besides gardens)
    Mushroom = 3,
}

impl Vegetable {
    /// Every species, in declaration order.
    pub const ALL: [Vegetable; 4] = [
        Vegetable::Carrot,
        Vegetable::Salad,
        Vegetable::Tomato,
        Vegetable::Mushroom,
    ];

    /// Turns between two growth steps.
    pub const fn growth_time(self) -> u32 {
        match self {
            Vegetable::Carrot => 1,
            Vegetable::Salad => 2,
            Vegetable::Tomato => 3,
            Vegetable::Mushroom => 4,
        }
    }

    /// Singular display name.
    pub const fn singular(self) -> &'static str {
        match self {
            Vegetable::Carrot => "carrot",
            Vegetable::Salad => "salad",
            Vegetable::Tomato => "tomato",
            Vegetable::Mushroom => "mushroom",
        }
    }

    /// Plural display name.
    pub const fn plural(self) -> &'static str {
        match self {
            Vegetable::Carrot => "carrots",
            Vegetable::Salad => "salads",
            Vegetable::Tomato => "tomatoes",
            Vegetable::Mushroom => "mushrooms",
        }
    }

    /// Name matching a count ("1 carrot", "2 carrots").
    pub const fn name_for(self, count: u32) -> &'static str {
        if count == 1 {
            self.singular()
        } else {
            self.plural()
        }
    }

    /// Board abbreviation.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Vegetable::Carrot => "C",
            Vegetable::Salad => "S",
            Vegetable::Tomato => "T",
            Vegetable::Mushroom => "M",
        }
    }

    /// Parse a singular or plural name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.singular() == name || v.plural() == name)
    }
}

impl fmt::Display for Vegetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}
