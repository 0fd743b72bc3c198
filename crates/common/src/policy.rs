//! Call wording policy
//!
//! Which toppings are noodle physical properties and which option names mean
//! the smallest increase tier. Both are data, resolved when a catalog loads,
//! so the formatters never compare raw ids or string literals themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::ToppingId;

/// Topping id of noodle firmness in the current backend catalog
pub const NOODLE_FIRMNESS_TOPPING_ID: ToppingId = 5;

/// Topping id of noodle quantity in the current backend catalog
pub const NOODLE_QUANTITY_TOPPING_ID: ToppingId = 6;

/// Smallest increase tier ("a little extra")
pub const CHOI_MASHI: &str = "ちょいマシ";

/// Spoken prefix for noodle properties ("noodle")
pub const NOODLE_PREFIX: &str = "麺";

/// How a topping is worded in a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToppingKind {
    /// Noodle firmness, spoken as "麺" + option
    NoodleFirmness,
    /// Noodle quantity, spoken as "麺" + option
    NoodleQuantity,
    /// Everything else, spoken as topping + option
    Generic,
}

impl ToppingKind {
    pub fn is_noodle(self) -> bool {
        matches!(self, ToppingKind::NoodleFirmness | ToppingKind::NoodleQuantity)
    }
}

/// Wording rules applied while loading catalogs and formatting calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPolicy {
    /// Toppings that are noodle physical properties
    pub noodle_toppings: Vec<(ToppingId, ToppingKind)>,

    /// Option names that are implied by naming the topping alone
    pub minimal_increase_names: BTreeSet<String>,

    /// Prefix used instead of the topping name for noodle properties
    pub noodle_prefix: String,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            noodle_toppings: vec![
                (NOODLE_FIRMNESS_TOPPING_ID, ToppingKind::NoodleFirmness),
                (NOODLE_QUANTITY_TOPPING_ID, ToppingKind::NoodleQuantity),
            ],
            minimal_increase_names: BTreeSet::from([CHOI_MASHI.to_string()]),
            noodle_prefix: NOODLE_PREFIX.to_string(),
        }
    }
}

impl CallPolicy {
    /// Classify a topping by id
    pub fn kind_of(&self, topping_id: ToppingId) -> ToppingKind {
        self.noodle_toppings
            .iter()
            .find(|(id, _)| *id == topping_id)
            .map(|(_, kind)| *kind)
            .unwrap_or(ToppingKind::Generic)
    }

    /// Whether an option name is the minimal increase tier
    pub fn is_minimal_increase(&self, option_name: &str) -> bool {
        self.minimal_increase_names.contains(option_name)
    }
}
