//! Selection state
//!
//! Two flavours, kept as distinct types so one cannot be handed to the
//! other's formatter:
//!
//! - [`MultiSelection`]: any subset of options per topping (shop registration)
//! - [`SingleSelection`]: at most one option per topping (simulation, image tagging)
//!
//! Both remember topping insertion order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CallTiming, Catalog, OptionId, StoreToppingCallId, ToppingId};

/// A call row already stored for a shop (edit-mode seed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSelection {
    pub topping_id: ToppingId,
    pub call_option_id: OptionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_topping_call_id: Option<StoreToppingCallId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timing: Option<CallTiming>,
}

/// Options chosen for one topping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToppingOptions {
    pub topping_id: ToppingId,

    #[serde(default)]
    pub option_ids: Vec<OptionId>,
}

/// Multi-select state for one call timing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ToppingOptions>", into = "Vec<ToppingOptions>")]
pub struct MultiSelection {
    entries: Vec<ToppingOptions>,
}

impl MultiSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalog topping present with an empty option set
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            entries: catalog
                .topping_ids()
                .map(|topping_id| ToppingOptions {
                    topping_id,
                    option_ids: Vec::new(),
                })
                .collect(),
        }
    }

    /// Catalog toppings seeded from persisted rows, empty where no row exists
    pub fn seeded<'a>(
        catalog: &Catalog,
        rows: impl IntoIterator<Item = &'a PersistedSelection>,
    ) -> Self {
        let mut selection = Self::for_catalog(catalog);
        for row in rows {
            selection.toggle(row.topping_id, row.call_option_id, true);
        }
        selection
    }

    fn slot_mut(&mut self, topping_id: ToppingId) -> &mut Vec<OptionId> {
        let index = match self.entries.iter().position(|e| e.topping_id == topping_id) {
            Some(index) => index,
            None => {
                self.entries.push(ToppingOptions {
                    topping_id,
                    option_ids: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].option_ids
    }

    /// Check or uncheck one option of one topping
    pub fn toggle(&mut self, topping_id: ToppingId, option_id: OptionId, checked: bool) {
        if checked {
            let options = self.slot_mut(topping_id);
            if !options.contains(&option_id) {
                options.push(option_id);
            }
            return;
        }

        // Unchecking never creates a slot for an unknown topping
        if let Some(entry) = self.entries.iter_mut().find(|e| e.topping_id == topping_id) {
            entry.option_ids.retain(|id| *id != option_id);
        }
    }

    /// Chosen options for a topping, empty when nothing is chosen
    pub fn options(&self, topping_id: ToppingId) -> &[OptionId] {
        self.entries
            .iter()
            .find(|e| e.topping_id == topping_id)
            .map(|e| e.option_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, topping_id: ToppingId, option_id: OptionId) -> bool {
        self.options(topping_id).contains(&option_id)
    }

    /// Whether at least one option is chosen anywhere
    pub fn has_any(&self) -> bool {
        self.entries.iter().any(|e| !e.option_ids.is_empty())
    }

    /// Toppings in insertion order with their chosen options
    pub fn iter(&self) -> impl Iterator<Item = (ToppingId, &[OptionId])> {
        self.entries
            .iter()
            .map(|e| (e.topping_id, e.option_ids.as_slice()))
    }

    /// Number of tracked toppings, including empty ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set equality per topping; an empty set equals an absent topping.
impl PartialEq for MultiSelection {
    fn eq(&self, other: &Self) -> bool {
        let covers = |a: &Self, b: &Self| {
            a.iter().all(|(topping_id, options)| {
                let theirs = b.options(topping_id);
                options.len() == theirs.len() && options.iter().all(|id| theirs.contains(id))
            })
        };
        covers(self, other) && covers(other, self)
    }
}

impl Eq for MultiSelection {}

impl From<Vec<ToppingOptions>> for MultiSelection {
    fn from(entries: Vec<ToppingOptions>) -> Self {
        let mut selection = Self::new();
        for entry in entries {
            selection.slot_mut(entry.topping_id);
            for option_id in entry.option_ids {
                selection.toggle(entry.topping_id, option_id, true);
            }
        }
        selection
    }
}

impl From<MultiSelection> for Vec<ToppingOptions> {
    fn from(selection: MultiSelection) -> Self {
        selection.entries
    }
}

/// Registration form state: pre-call and post-call are independent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSelection {
    #[serde(default)]
    pub pre_call: MultiSelection,

    #[serde(default)]
    pub post_call: MultiSelection,
}

impl RegistrationSelection {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            pre_call: MultiSelection::for_catalog(catalog),
            post_call: MultiSelection::for_catalog(catalog),
        }
    }

    /// Seed both timings from persisted rows.
    ///
    /// Rows without a timing cannot be placed and are skipped.
    pub fn seeded(catalog: &Catalog, rows: &[PersistedSelection]) -> Self {
        let mut selection = Self::for_catalog(catalog);

        for row in rows {
            match row.call_timing {
                Some(timing) => selection
                    .timing_mut(timing)
                    .toggle(row.topping_id, row.call_option_id, true),
                None => debug!(
                    "Skipping persisted call without timing: topping {} option {}",
                    row.topping_id, row.call_option_id
                ),
            }
        }

        selection
    }

    pub fn timing(&self, timing: CallTiming) -> &MultiSelection {
        match timing {
            CallTiming::PreCall => &self.pre_call,
            CallTiming::PostCall => &self.post_call,
        }
    }

    pub fn timing_mut(&mut self, timing: CallTiming) -> &mut MultiSelection {
        match timing {
            CallTiming::PreCall => &mut self.pre_call,
            CallTiming::PostCall => &mut self.post_call,
        }
    }

    pub fn has_any(&self) -> bool {
        self.pre_call.has_any() || self.post_call.has_any()
    }
}

/// The option chosen for one topping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub option_id: OptionId,

    /// Only meaningful when tagging images with a shop's registered calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_topping_call_id: Option<StoreToppingCallId>,
}

/// Wire form of one single-select choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPair {
    pub topping_id: ToppingId,
    pub option_id: OptionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_topping_call_id: Option<StoreToppingCallId>,
}

/// Single-select state for one screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SelectionPair>", into = "Vec<SelectionPair>")]
pub struct SingleSelection {
    entries: Vec<(ToppingId, SelectedOption)>,
}

impl SingleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose an option, replacing any earlier choice for the topping
    pub fn select(
        &mut self,
        topping_id: ToppingId,
        option_id: OptionId,
        store_topping_call_id: Option<StoreToppingCallId>,
    ) {
        let chosen = SelectedOption {
            option_id,
            store_topping_call_id,
        };

        match self.entries.iter_mut().find(|(id, _)| *id == topping_id) {
            Some((_, slot)) => *slot = chosen,
            None => self.entries.push((topping_id, chosen)),
        }
    }

    pub fn get(&self, topping_id: ToppingId) -> Option<&SelectedOption> {
        self.entries
            .iter()
            .find(|(id, _)| *id == topping_id)
            .map(|(_, chosen)| chosen)
    }

    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Choices in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ToppingId, &SelectedOption)> {
        self.entries.iter().map(|(id, chosen)| (*id, chosen))
    }
}

impl From<Vec<SelectionPair>> for SingleSelection {
    fn from(pairs: Vec<SelectionPair>) -> Self {
        let mut selection = Self::new();
        for pair in pairs {
            selection.select(pair.topping_id, pair.option_id, pair.store_topping_call_id);
        }
        selection
    }
}

impl From<SingleSelection> for Vec<SelectionPair> {
    fn from(selection: SingleSelection) -> Self {
        selection
            .entries
            .into_iter()
            .map(|(topping_id, chosen)| SelectionPair {
                topping_id,
                option_id: chosen.option_id,
                store_topping_call_id: chosen.store_topping_call_id,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TimingFilter, WireCatalogEntry};
    use crate::policy::CallPolicy;
    use serde_json::json;

    fn catalog() -> Catalog {
        let rows: Vec<WireCatalogEntry> = serde_json::from_value(json!([
            {"topping": {"id": 1, "topping_name": "ヤサイ"},
             "call_options": [
                {"id": 1, "call_option_name": "マシ"},
                {"id": 2, "call_option_name": "マシマシ"}
             ]},
            {"topping": {"id": 2, "topping_name": "アブラ"},
             "call_options": [{"id": 1, "call_option_name": "マシ"}]}
        ]))
        .unwrap();
        Catalog::from_wire(rows, TimingFilter::All, &CallPolicy::default())
    }

    #[test]
    fn test_for_catalog_prepopulates_every_topping() {
        let selection = MultiSelection::for_catalog(&catalog());

        assert_eq!(selection.len(), 2);
        assert!(selection.options(1).is_empty());
        assert!(selection.options(2).is_empty());
        assert!(!selection.has_any());
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut once = MultiSelection::for_catalog(&catalog());
        once.toggle(1, 2, true);

        let mut twice = once.clone();
        twice.toggle(1, 2, true);

        assert_eq!(once, twice);
        assert_eq!(twice.options(1), &[2]);
    }

    #[test]
    fn test_toggle_on_then_off_restores_state() {
        let mut selection = MultiSelection::for_catalog(&catalog());
        selection.toggle(1, 1, true);
        let before = selection.clone();

        selection.toggle(2, 1, true);
        selection.toggle(2, 1, false);
        assert_eq!(selection, before);

        // unchecking something never checked is a no-op
        selection.toggle(1, 2, false);
        assert_eq!(selection, before);
        assert_eq!(selection.options(1), &[1]);
    }

    #[test]
    fn test_toggle_leaves_other_toppings_alone() {
        let mut selection = MultiSelection::for_catalog(&catalog());
        selection.toggle(1, 1, true);
        selection.toggle(2, 1, true);
        selection.toggle(1, 1, false);

        assert!(selection.options(1).is_empty());
        assert!(selection.contains(2, 1));
    }

    #[test]
    fn test_toggle_off_unknown_topping_adds_nothing() {
        let mut selection = MultiSelection::for_catalog(&catalog());
        selection.toggle(1, 2, true);
        let before = serde_json::to_value(&selection).unwrap();

        selection.toggle(42, 1, false);

        assert_eq!(selection.len(), 2);
        assert!(selection.iter().all(|(topping_id, _)| topping_id != 42));
        assert_eq!(serde_json::to_value(&selection).unwrap(), before);
    }

    #[test]
    fn test_seeded_falls_back_to_empty_sets() {
        let rows = vec![PersistedSelection {
            topping_id: 2,
            call_option_id: 1,
            store_topping_call_id: Some(40),
            call_timing: None,
        }];

        let selection = MultiSelection::seeded(&catalog(), &rows);

        assert!(selection.options(1).is_empty());
        assert_eq!(selection.options(2), &[1]);
    }

    #[test]
    fn test_registration_seeded_splits_by_timing() {
        let rows: Vec<PersistedSelection> = serde_json::from_value(json!([
            {"topping_id": 1, "call_option_id": 2, "store_topping_call_id": 1,
             "call_timing": "pre_call"},
            {"topping_id": 1, "call_option_id": 1, "store_topping_call_id": 2,
             "call_timing": "post_call"},
            {"topping_id": 2, "call_option_id": 1, "store_topping_call_id": 3}
        ]))
        .unwrap();

        let selection = RegistrationSelection::seeded(&catalog(), &rows);

        assert_eq!(selection.pre_call.options(1), &[2]);
        assert_eq!(selection.post_call.options(1), &[1]);
        assert!(selection.pre_call.options(2).is_empty());
        assert!(selection.post_call.options(2).is_empty());
    }

    #[test]
    fn test_timings_are_independent() {
        let mut selection = RegistrationSelection::for_catalog(&catalog());
        selection.timing_mut(CallTiming::PreCall).toggle(1, 1, true);

        assert!(selection.timing(CallTiming::PreCall).contains(1, 1));
        assert!(!selection.timing(CallTiming::PostCall).has_any());
        assert!(selection.has_any());
    }

    #[test]
    fn test_multi_selection_deserialize_drops_duplicates() {
        let selection: MultiSelection = serde_json::from_value(json!([
            {"topping_id": 1, "option_ids": [1, 1, 2]},
            {"topping_id": 2}
        ]))
        .unwrap();

        assert_eq!(selection.options(1), &[1, 2]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_single_select_replaces() {
        let mut selection = SingleSelection::new();
        selection.select(1, 1, None);
        selection.select(1, 2, Some(9));

        assert_eq!(selection.len(), 1);
        assert_eq!(
            selection.get(1),
            Some(&SelectedOption {
                option_id: 2,
                store_topping_call_id: Some(9),
            })
        );
    }

    #[test]
    fn test_single_selection_from_pairs_last_wins() {
        let selection: SingleSelection = serde_json::from_value(json!([
            {"topping_id": 3, "option_id": 1},
            {"topping_id": 1, "option_id": 1},
            {"topping_id": 3, "option_id": 4}
        ]))
        .unwrap();

        let order: Vec<_> = selection.iter().map(|(id, chosen)| (id, chosen.option_id)).collect();
        assert_eq!(order, vec![(3, 4), (1, 1)]);
    }
}
