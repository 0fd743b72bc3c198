//! J-Navi topping call pipeline
//!
//! Catalog loading, selection state and the formatters that turn a user's
//! topping choices into backend records or a spoken call phrase.
//!
//! ```text
//! catalog / source -> selection -> format
//!                                    \-> simulation (carries call text only)
//! ```

pub mod catalog;
pub mod error;
pub mod format;
pub mod policy;
pub mod selection;
pub mod simulation;
pub mod source;

pub use catalog::{
    CallOption, CallTiming, Catalog, CatalogEntry, OptionId, StoreToppingCallId, TimingFilter,
    Topping, ToppingId, WireCatalogEntry,
};
pub use error::{Error, Result};
pub use format::{
    call_lines, call_text, image_tags, registration_records, submission_records, CallText,
    ImageCallTag, SubmissionRecord, DEFAULT_NOODLE_TYPE_ID,
};
pub use policy::{CallPolicy, ToppingKind};
pub use selection::{
    MultiSelection, PersistedSelection, RegistrationSelection, SelectedOption, SelectionPair,
    SingleSelection,
};
pub use simulation::{AfterMealQuiz, QuizResult, SimulationAction, SimulationState, SimulationStep};
pub use source::{load_catalog, CatalogRequest, CatalogSource, StaticCatalogSource};
