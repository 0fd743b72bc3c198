//! Topping catalog
//!
//! A catalog is the ordered list of toppings a screen can call, each with the
//! call options valid for the requested timing. Entry order is the order the
//! backend returned and is kept through every projection: the registration
//! form and the generated call text both render toppings in catalog order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::policy::{CallPolicy, ToppingKind};

pub type ToppingId = u32;
pub type OptionId = u32;
pub type StoreToppingCallId = u32;

/// When a call is spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTiming {
    /// Before the bowl is served (at the ticket check)
    PreCall,
    /// When the staff asks "ニンニク入れますか？"
    PostCall,
}

impl CallTiming {
    pub fn as_str(self) -> &'static str {
        match self {
            CallTiming::PreCall => "pre_call",
            CallTiming::PostCall => "post_call",
        }
    }
}

impl fmt::Display for CallTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallTiming {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre_call" => Ok(CallTiming::PreCall),
            "post_call" => Ok(CallTiming::PostCall),
            other => Err(Error::InvalidTiming(other.to_string())),
        }
    }
}

/// Timing filter used when requesting a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingFilter {
    #[default]
    All,
    PreCall,
    PostCall,
}

impl TimingFilter {
    pub fn includes(self, timing: CallTiming) -> bool {
        match self {
            TimingFilter::All => true,
            TimingFilter::PreCall => timing == CallTiming::PreCall,
            TimingFilter::PostCall => timing == CallTiming::PostCall,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimingFilter::All => "all",
            TimingFilter::PreCall => "pre_call",
            TimingFilter::PostCall => "post_call",
        }
    }
}

impl From<CallTiming> for TimingFilter {
    fn from(timing: CallTiming) -> Self {
        match timing {
            CallTiming::PreCall => TimingFilter::PreCall,
            CallTiming::PostCall => TimingFilter::PostCall,
        }
    }
}

impl fmt::Display for TimingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimingFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TimingFilter::All),
            other => other.parse::<CallTiming>().map(TimingFilter::from),
        }
    }
}

/// Topping as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTopping {
    pub id: ToppingId,

    #[serde(default)]
    pub topping_category: i32,

    pub topping_name: String,
}

/// Call option as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCallOption {
    pub id: OptionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_category: Option<i32>,

    pub call_option_name: String,

    /// Present on shop-scoped rows; global catalogs leave it out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timing: Option<CallTiming>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_topping_call_id: Option<StoreToppingCallId>,
}

/// One row of a catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCatalogEntry {
    pub topping: WireTopping,

    #[serde(default)]
    pub call_options: Vec<WireCallOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topping {
    pub id: ToppingId,
    pub name: String,
    pub category: i32,
    pub kind: ToppingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOption {
    pub id: OptionId,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_topping_call_id: Option<StoreToppingCallId>,

    /// Shop-scoped options carry the timing they were registered for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<CallTiming>,
}

impl From<WireCallOption> for CallOption {
    fn from(wire: WireCallOption) -> Self {
        Self {
            id: wire.id,
            name: wire.call_option_name,
            category: wire.call_category,
            store_topping_call_id: wire.store_topping_call_id,
            timing: wire.call_timing,
        }
    }
}

/// A topping together with its call options for the catalog's timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub topping: Topping,
    pub options: Vec<CallOption>,
}

impl CatalogEntry {
    /// Look up one of this topping's options.
    ///
    /// Under the `all` filter a shop option may be listed once per timing;
    /// this returns the first listing.
    pub fn option(&self, option_id: OptionId) -> Option<&CallOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// The same option registered at two timings is kept twice.
    fn push_option(&mut self, option: CallOption) {
        let listed = self
            .options
            .iter()
            .any(|o| o.id == option.id && o.timing == option.timing);
        if !listed {
            self.options.push(option);
        }
    }
}

/// Ordered, normalised topping catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub timing: TimingFilter,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Normalise a backend response.
    ///
    /// - entry order is kept
    /// - options tagged with a timing outside `timing` are dropped
    /// - a topping listed twice is merged into its first occurrence, an
    ///   option repeated at the same timing is kept once
    /// - toppings left without options are excluded
    pub fn from_wire(
        entries: Vec<WireCatalogEntry>,
        timing: TimingFilter,
        policy: &CallPolicy,
    ) -> Self {
        let mut merged: Vec<CatalogEntry> = Vec::with_capacity(entries.len());

        for wire in entries {
            let options = wire
                .call_options
                .into_iter()
                .filter(|option| option.call_timing.map_or(true, |t| timing.includes(t)))
                .map(CallOption::from);

            let index = match merged.iter().position(|e| e.topping.id == wire.topping.id) {
                Some(index) => index,
                None => {
                    merged.push(CatalogEntry {
                        topping: Topping {
                            id: wire.topping.id,
                            kind: policy.kind_of(wire.topping.id),
                            name: wire.topping.topping_name,
                            category: wire.topping.topping_category,
                        },
                        options: Vec::new(),
                    });
                    merged.len() - 1
                }
            };

            for option in options {
                merged[index].push_option(option);
            }
        }

        merged.retain(|entry| !entry.options.is_empty());

        Self {
            timing,
            entries: merged,
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, topping_id: ToppingId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.topping.id == topping_id)
    }

    /// Topping ids in catalog order
    pub fn topping_ids(&self) -> impl Iterator<Item = ToppingId> + '_ {
        self.entries.iter().map(|entry| entry.topping.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
