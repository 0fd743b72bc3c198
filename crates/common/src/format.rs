//! Formatters
//!
//! Pure projections of selection state:
//! - submission records for the backend ([`submission_records`])
//! - the spoken call phrase ([`call_text`])
//! - call tags for a menu photo ([`image_tags`])
//!
//! None of them fail. Nothing selected means empty output; selections the
//! catalog cannot resolve are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::catalog::{
    CallTiming, Catalog, CatalogEntry, OptionId, StoreToppingCallId, ToppingId,
};
use crate::policy::CallPolicy;
use crate::selection::{MultiSelection, RegistrationSelection, SingleSelection};

/// Only one noodle type is modelled
pub const DEFAULT_NOODLE_TYPE_ID: u32 = 1;

/// One (topping, option) pair as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub topping_id: ToppingId,
    pub call_option_id: OptionId,
    pub call_timing: CallTiming,
    pub noodle_type_id: u32,
}

/// Flatten one timing's selection into records, in selection order
pub fn submission_records(
    selection: &MultiSelection,
    timing: CallTiming,
) -> Vec<SubmissionRecord> {
    selection
        .iter()
        .flat_map(|(topping_id, option_ids)| {
            option_ids.iter().map(move |&call_option_id| SubmissionRecord {
                topping_id,
                call_option_id,
                call_timing: timing,
                noodle_type_id: DEFAULT_NOODLE_TYPE_ID,
            })
        })
        .collect()
}

/// Full shop payload: pre-call records followed by post-call records
pub fn registration_records(selection: &RegistrationSelection) -> Vec<SubmissionRecord> {
    let mut records = submission_records(&selection.pre_call, CallTiming::PreCall);
    records.extend(submission_records(&selection.post_call, CallTiming::PostCall));
    records
}

/// Newline-joined call phrase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallText(String);

impl CallText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CallText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CallText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

fn call_line(entry: &CatalogEntry, option_id: OptionId, policy: &CallPolicy) -> Option<String> {
    let Some(option) = entry.option(option_id) else {
        debug!(
            "Skipping stale selection: topping {} has no option {}",
            entry.topping.id, option_id
        );
        return None;
    };

    let line = if entry.topping.kind.is_noodle() {
        format!("{}{}", policy.noodle_prefix, option.name)
    } else if policy.is_minimal_increase(&option.name) {
        entry.topping.name.clone()
    } else {
        format!("{}{}", entry.topping.name, option.name)
    };

    Some(line)
}

/// One line per selected topping, in catalog order
pub fn call_lines(
    selection: &SingleSelection,
    catalog: &Catalog,
    policy: &CallPolicy,
) -> Vec<String> {
    catalog
        .entries()
        .iter()
        .filter_map(|entry| {
            let chosen = selection.get(entry.topping.id)?;
            call_line(entry, chosen.option_id, policy)
        })
        .collect()
}

/// The phrase a customer says for this selection
pub fn call_text(
    selection: &SingleSelection,
    catalog: &Catalog,
    policy: &CallPolicy,
) -> CallText {
    CallText(call_lines(selection, catalog, policy).join("\n"))
}

/// Links a menu photo to one of the shop's registered calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCallTag {
    pub store_topping_call_id: StoreToppingCallId,
    pub topping_id: ToppingId,
    pub call_option_id: OptionId,
}

/// Tags for the selected shop calls, in catalog order.
///
/// The shop call id comes from the selection when the screen supplied one,
/// otherwise from the catalog option. Choices with neither are skipped.
pub fn image_tags(selection: &SingleSelection, catalog: &Catalog) -> Vec<ImageCallTag> {
    catalog
        .entries()
        .iter()
        .filter_map(|entry| {
            let chosen = selection.get(entry.topping.id)?;
            let option = entry.option(chosen.option_id)?;
            let store_topping_call_id = chosen
                .store_topping_call_id
                .or(option.store_topping_call_id)?;

            Some(ImageCallTag {
                store_topping_call_id,
                topping_id: entry.topping.id,
                call_option_id: option.id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TimingFilter, WireCatalogEntry};
    use serde_json::json;

    fn catalog(value: serde_json::Value) -> Catalog {
        let rows: Vec<WireCatalogEntry> = serde_json::from_value(value).unwrap();
        Catalog::from_wire(rows, TimingFilter::All, &CallPolicy::default())
    }

    fn jiro_catalog() -> Catalog {
        catalog(json!([
            {"topping": {"id": 5, "topping_category": 1, "topping_name": "麺の硬さ"},
             "call_options": [{"id": 1, "call_option_name": "硬め"}]},
            {"topping": {"id": 10, "topping_category": 0, "topping_name": "ニンニク"},
             "call_options": [
                {"id": 1, "call_option_name": "ちょいマシ"},
                {"id": 2, "call_option_name": "マシマシ"}
             ]}
        ]))
    }

    #[test]
    fn test_submission_records_count_and_tags() {
        let mut selection = MultiSelection::new();
        selection.toggle(3, 1, true);
        selection.toggle(3, 2, true);
        selection.toggle(1, 4, true);
        selection.toggle(7, 1, true);
        selection.toggle(7, 1, false);

        let records = submission_records(&selection, CallTiming::PostCall);

        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.call_timing == CallTiming::PostCall && r.noodle_type_id == 1));
        let pairs: Vec<_> = records.iter().map(|r| (r.topping_id, r.call_option_id)).collect();
        assert_eq!(pairs, vec![(3, 1), (3, 2), (1, 4)]);
    }

    #[test]
    fn test_registration_records_pre_call_first() {
        let mut selection = RegistrationSelection::default();
        selection.post_call.toggle(1, 1, true);
        selection.pre_call.toggle(2, 3, true);

        let records = registration_records(&selection);

        assert_eq!(
            records,
            vec![
                SubmissionRecord {
                    topping_id: 2,
                    call_option_id: 3,
                    call_timing: CallTiming::PreCall,
                    noodle_type_id: 1,
                },
                SubmissionRecord {
                    topping_id: 1,
                    call_option_id: 1,
                    call_timing: CallTiming::PostCall,
                    noodle_type_id: 1,
                },
            ]
        );
    }

    #[test]
    fn test_empty_selection_formats_to_nothing() {
        let catalog = jiro_catalog();
        let policy = CallPolicy::default();
        let nothing = MultiSelection::for_catalog(&catalog);

        assert!(submission_records(&nothing, CallTiming::PreCall).is_empty());
        assert!(call_text(&SingleSelection::new(), &catalog, &policy).is_empty());
        assert!(call_text(&SingleSelection::new(), &Catalog::default(), &policy).is_empty());
    }

    #[test]
    fn test_noodle_topping_uses_prefix() {
        let mut selection = SingleSelection::new();
        selection.select(5, 1, None);

        let text = call_text(&selection, &jiro_catalog(), &CallPolicy::default());

        assert_eq!(text.as_str(), "麺硬め");
    }

    #[test]
    fn test_minimal_increase_names_topping_only() {
        let mut selection = SingleSelection::new();
        selection.select(10, 1, None);

        let text = call_text(&selection, &jiro_catalog(), &CallPolicy::default());

        assert_eq!(text.as_str(), "ニンニク");
    }

    #[test]
    fn test_generic_line_concatenates() {
        let mut selection = SingleSelection::new();
        selection.select(10, 2, None);

        let text = call_text(&selection, &jiro_catalog(), &CallPolicy::default());

        assert_eq!(text.as_str(), "ニンニクマシマシ");
    }

    #[test]
    fn test_lines_follow_catalog_order() {
        let catalog = catalog(json!([
            {"topping": {"id": 1, "topping_name": "ヤサイ"},
             "call_options": [{"id": 1, "call_option_name": "マシ"}]},
            {"topping": {"id": 2, "topping_name": "ニンニク"},
             "call_options": [{"id": 1, "call_option_name": "マシ"}]},
            {"topping": {"id": 3, "topping_name": "アブラ"},
             "call_options": [{"id": 1, "call_option_name": "マシ"}]}
        ]));
        let mut selection = SingleSelection::new();
        selection.select(3, 1, None);
        selection.select(1, 1, None);
        selection.select(2, 1, None);

        let text = call_text(&selection, &catalog, &CallPolicy::default());

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["ヤサイマシ", "ニンニクマシ", "アブラマシ"]
        );
    }

    #[test]
    fn test_stale_ids_are_skipped() {
        let mut selection = SingleSelection::new();
        selection.select(10, 99, None);
        selection.select(42, 1, None);
        selection.select(5, 1, None);

        let text = call_text(&selection, &jiro_catalog(), &CallPolicy::default());

        assert_eq!(text.as_str(), "麺硬め");
    }

    #[test]
    fn test_end_to_end_call_text() {
        let mut selection = SingleSelection::new();
        selection.select(10, 2, None);
        selection.select(5, 1, None);

        let text = call_text(&selection, &jiro_catalog(), &CallPolicy::default());

        assert_eq!(text.as_str(), "麺硬め\nニンニクマシマシ");
    }

    #[test]
    fn test_configured_minimal_increase_name() {
        let mut policy = CallPolicy::default();
        policy.minimal_increase_names.insert("マシマシ".to_string());
        let mut selection = SingleSelection::new();
        selection.select(10, 2, None);

        assert_eq!(call_text(&selection, &jiro_catalog(), &policy).as_str(), "ニンニク");
    }

    #[test]
    fn test_image_tags_use_shop_call_ids() {
        let catalog = catalog(json!([
            {"topping": {"id": 1, "topping_name": "ヤサイ"},
             "call_options": [
                {"id": 1, "call_option_name": "マシ", "store_topping_call_id": 31}
             ]},
            {"topping": {"id": 2, "topping_name": "アブラ"},
             "call_options": [{"id": 1, "call_option_name": "マシ"}]},
            {"topping": {"id": 3, "topping_name": "カラメ"},
             "call_options": [{"id": 2, "call_option_name": "マシ"}]}
        ]));
        let mut selection = SingleSelection::new();
        selection.select(3, 2, Some(55));
        selection.select(2, 1, None);
        selection.select(1, 1, None);

        let tags = image_tags(&selection, &catalog);

        assert_eq!(
            tags,
            vec![
                ImageCallTag {
                    store_topping_call_id: 31,
                    topping_id: 1,
                    call_option_id: 1,
                },
                ImageCallTag {
                    store_topping_call_id: 55,
                    topping_id: 3,
                    call_option_id: 2,
                },
            ]
        );
    }

    #[test]
    fn test_image_tags_take_the_requested_timing_call_id() {
        let rows: Vec<WireCatalogEntry> = serde_json::from_value(json!([
            {"topping": {"id": 10, "topping_name": "ニンニク"},
             "call_options": [
                {"id": 1, "call_option_name": "マシ", "call_timing": "pre_call",
                 "store_topping_call_id": 11},
                {"id": 1, "call_option_name": "マシ", "call_timing": "post_call",
                 "store_topping_call_id": 22}
             ]}
        ]))
        .unwrap();
        let post_call = Catalog::from_wire(rows, TimingFilter::PostCall, &CallPolicy::default());
        let mut selection = SingleSelection::new();
        selection.select(10, 1, None);

        let tags = image_tags(&selection, &post_call);

        assert_eq!(
            tags,
            vec![ImageCallTag {
                store_topping_call_id: 22,
                topping_id: 10,
                call_option_id: 1,
            }]
        );
    }
}
