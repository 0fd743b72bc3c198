//! Request and response bodies for the Call Service

use jnavi_common::{
    AfterMealQuiz, CallText, CallTiming, Catalog, ImageCallTag, RegistrationSelection,
    SimulationAction, SimulationState, SingleSelection, SubmissionRecord,
};
use serde::{Deserialize, Serialize};

/// Query for `GET /api/catalog`
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Shop identifier, global catalog when absent
    pub store_id: Option<String>,

    /// `all`, `pre_call` or `post_call`
    pub timing: Option<String>,
}

/// Normalised catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub catalog: Catalog,
    pub total: usize,
}

/// Edit-mode seed for a shop's registration form
#[derive(Debug, Serialize)]
pub struct StoreSelectionsResponse {
    pub store_id: String,
    pub catalog: Catalog,
    pub selection: RegistrationSelection,
}

/// Registration form state to format or persist
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub selection: RegistrationSelection,
}

/// Formatted submission records
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub records: Vec<SubmissionRecord>,
    pub total: usize,
}

/// Result of persisting a shop's calls
#[derive(Debug, Serialize)]
pub struct UpdateCallsResponse {
    pub success: bool,
    pub message: String,
    pub records: Vec<SubmissionRecord>,
}

/// Request to build a call phrase
#[derive(Debug, Deserialize)]
pub struct CallTextRequest {
    /// Shop whose registered calls are used, global catalog when absent
    #[serde(default)]
    pub store_id: Option<String>,

    pub timing: CallTiming,

    #[serde(default)]
    pub selection: SingleSelection,
}

/// Generated call phrase
#[derive(Debug, Serialize)]
pub struct CallTextResponse {
    pub call_text: CallText,
    pub lines: Vec<String>,
}

/// Request to tag a menu photo with shop calls
#[derive(Debug, Deserialize)]
pub struct ImageTagRequest {
    pub image_url: String,

    /// Photos are tagged with one timing's shop calls at a time
    pub timing: CallTiming,

    #[serde(default)]
    pub selection: SingleSelection,
}

/// Tags sent to the backend
#[derive(Debug, Serialize)]
pub struct ImageTagResponse {
    pub success: bool,
    pub tags: Vec<ImageCallTag>,
}

/// One simulation step
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub state: SimulationState,

    pub action: SimulationAction,
}

/// Next screen of the simulation
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub state: SimulationState,

    /// Text for speech playback on result screens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_text: Option<CallText>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<AfterMealQuiz>,
}

impl From<SimulationState> for SimulationResponse {
    fn from(state: SimulationState) -> Self {
        Self {
            speech_text: state.speech_text().cloned(),
            quiz: state.quiz(),
            state,
        }
    }
}
