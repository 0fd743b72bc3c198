//! Dining simulation flow
//!
//! ```text
//! TicketSelect -> PreCall -> PreCallResult -> PostCall -> PostCallResult
//!              -> AfterMealQuiz -> Answer
//! ```
//!
//! The state is navigation data only: the shop, the ticket and the two call
//! texts. Selections never leave the screen that built them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::format::CallText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStep {
    #[default]
    TicketSelect,
    PreCall,
    PreCallResult,
    PostCall,
    PostCallResult,
    AfterMealQuiz,
    Answer,
}

impl SimulationStep {
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationStep::TicketSelect => "ticket_select",
            SimulationStep::PreCall => "pre_call",
            SimulationStep::PreCallResult => "pre_call_result",
            SimulationStep::PostCall => "post_call",
            SimulationStep::PostCallResult => "post_call_result",
            SimulationStep::AfterMealQuiz => "after_meal_quiz",
            SimulationStep::Answer => "answer",
        }
    }
}

impl fmt::Display for SimulationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationAction {
    /// Buy a meal ticket at a shop
    SelectTicket { store_id: String, ticket: String },
    /// Hand over the ticket with the pre-call
    SubmitPreCall { call_text: CallText },
    /// Leave a result screen
    Continue,
    /// Answer "ニンニク入れますか？"
    SubmitPostCall { call_text: CallText },
    AnswerQuiz { choice: usize },
    Restart,
}

impl SimulationAction {
    pub fn name(&self) -> &'static str {
        match self {
            SimulationAction::SelectTicket { .. } => "select_ticket",
            SimulationAction::SubmitPreCall { .. } => "submit_pre_call",
            SimulationAction::Continue => "continue",
            SimulationAction::SubmitPostCall { .. } => "submit_post_call",
            SimulationAction::AnswerQuiz { .. } => "answer_quiz",
            SimulationAction::Restart => "restart",
        }
    }
}

/// Multiple-choice question asked after the meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterMealQuiz {
    pub question: String,
    pub choices: Vec<String>,
    pub correct_choice: usize,
}

impl AfterMealQuiz {
    pub fn standard() -> Self {
        Self {
            question: "食べ終わったらどうする？".to_string(),
            choices: vec![
                "丼をカウンターの上に上げ、テーブルを拭いてから帰る".to_string(),
                "丼はそのままにして、すぐに席を立つ".to_string(),
                "店員を呼んでお会計をお願いする".to_string(),
            ],
            correct_choice: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub choice: usize,
    pub correct: bool,
}

/// Navigation state carried between simulation screens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    #[serde(default)]
    pub step: SimulationStep,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_call_text: Option<CallText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_call_text: Option<CallText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_result: Option<QuizResult>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action and return the next screen's state
    pub fn apply(self, action: SimulationAction) -> Result<Self> {
        use SimulationAction as A;
        use SimulationStep as S;

        match (self.step, action) {
            (_, A::Restart) => Ok(Self::new()),
            (S::TicketSelect, A::SelectTicket { store_id, ticket }) => Ok(Self {
                step: S::PreCall,
                store_id: Some(store_id),
                ticket: Some(ticket),
                ..Self::new()
            }),
            (S::PreCall, A::SubmitPreCall { call_text }) => Ok(Self {
                step: S::PreCallResult,
                pre_call_text: Some(non_empty(call_text)?),
                ..self
            }),
            (S::PreCallResult, A::Continue) => Ok(Self {
                step: S::PostCall,
                ..self
            }),
            (S::PostCall, A::SubmitPostCall { call_text }) => Ok(Self {
                step: S::PostCallResult,
                post_call_text: Some(non_empty(call_text)?),
                ..self
            }),
            (S::PostCallResult, A::Continue) => Ok(Self {
                step: S::AfterMealQuiz,
                ..self
            }),
            (S::AfterMealQuiz, A::AnswerQuiz { choice }) => {
                let quiz = AfterMealQuiz::standard();
                if choice >= quiz.choices.len() {
                    return Err(Error::InvalidQuizChoice(choice));
                }
                Ok(Self {
                    step: S::Answer,
                    quiz_result: Some(QuizResult {
                        choice,
                        correct: choice == quiz.correct_choice,
                    }),
                    ..self
                })
            }
            (from, action) => Err(Error::InvalidTransition {
                from: from.to_string(),
                action: action.name().to_string(),
            }),
        }
    }

    /// Text to hand to speech playback on a result screen
    pub fn speech_text(&self) -> Option<&CallText> {
        match self.step {
            SimulationStep::PreCallResult => self.pre_call_text.as_ref(),
            SimulationStep::PostCallResult => self.post_call_text.as_ref(),
            _ => None,
        }
    }

    /// Quiz shown on the quiz and answer screens
    pub fn quiz(&self) -> Option<AfterMealQuiz> {
        matches!(self.step, SimulationStep::AfterMealQuiz | SimulationStep::Answer)
            .then(AfterMealQuiz::standard)
    }
}

fn non_empty(call_text: CallText) -> Result<CallText> {
    if call_text.is_empty() {
        return Err(Error::EmptySelection);
    }
    Ok(call_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CallText {
        CallText::from(s.to_string())
    }

    #[test]
    fn test_full_flow() {
        let state = SimulationState::new()
            .apply(SimulationAction::SelectTicket {
                store_id: "store-1".to_string(),
                ticket: "小ラーメン".to_string(),
            })
            .unwrap();
        assert_eq!(state.step, SimulationStep::PreCall);

        let state = state
            .apply(SimulationAction::SubmitPreCall { call_text: text("麺硬め") })
            .unwrap();
        assert_eq!(state.step, SimulationStep::PreCallResult);
        assert_eq!(state.speech_text().map(CallText::as_str), Some("麺硬め"));

        let state = state.apply(SimulationAction::Continue).unwrap();
        assert_eq!(state.speech_text(), None);

        let state = state
            .apply(SimulationAction::SubmitPostCall {
                call_text: text("ヤサイマシ\nニンニク"),
            })
            .unwrap();
        assert_eq!(
            state.speech_text().map(CallText::as_str),
            Some("ヤサイマシ\nニンニク")
        );

        let state = state.apply(SimulationAction::Continue).unwrap();
        assert_eq!(state.step, SimulationStep::AfterMealQuiz);
        assert!(state.quiz().is_some());

        let state = state.apply(SimulationAction::AnswerQuiz { choice: 0 }).unwrap();
        assert_eq!(state.step, SimulationStep::Answer);
        assert_eq!(state.quiz_result, Some(QuizResult { choice: 0, correct: true }));
        assert_eq!(state.store_id.as_deref(), Some("store-1"));
        assert_eq!(state.pre_call_text, Some(text("麺硬め")));
    }

    #[test]
    fn test_empty_call_text_is_rejected() {
        let state = SimulationState {
            step: SimulationStep::PreCall,
            store_id: Some("store-1".to_string()),
            ..SimulationState::new()
        };

        let result = state.apply(SimulationAction::SubmitPreCall { call_text: text("") });

        assert!(matches!(result, Err(Error::EmptySelection)));
    }

    #[test]
    fn test_invalid_transition() {
        let result = SimulationState::new().apply(SimulationAction::Continue);

        match result {
            Err(Error::InvalidTransition { from, action }) => {
                assert_eq!(from, "ticket_select");
                assert_eq!(action, "continue");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_quiz_choice_out_of_range() {
        let state = SimulationState {
            step: SimulationStep::AfterMealQuiz,
            ..SimulationState::new()
        };

        let result = state.apply(SimulationAction::AnswerQuiz { choice: 7 });

        assert!(matches!(result, Err(Error::InvalidQuizChoice(7))));
    }

    #[test]
    fn test_restart_from_anywhere() {
        let state = SimulationState {
            step: SimulationStep::PostCall,
            store_id: Some("store-1".to_string()),
            pre_call_text: Some(text("麺少なめ")),
            ..SimulationState::new()
        };

        assert_eq!(state.apply(SimulationAction::Restart).unwrap(), SimulationState::new());
    }

    #[test]
    fn test_action_wire_format() {
        let action: SimulationAction = serde_json::from_value(serde_json::json!({
            "type": "submit_post_call",
            "call_text": "ニンニクマシマシ"
        }))
        .unwrap();

        assert_eq!(
            action,
            SimulationAction::SubmitPostCall {
                call_text: text("ニンニクマシマシ"),
            }
        );
    }
}
