//! Resolution of a raw `generateContent` response into exactly one image or
//! exactly one typed failure.
//!
//! The API's failure signals are not mutually exclusive (a candidate can carry
//! both a non-`STOP` finish reason and no parts), so the checks below run in a
//! fixed order and the first one that applies decides the outcome.

use super::types::{Candidate, FinishReason, GenerateContentResponse, Part, SafetyRating};
use crate::models::ImagePayload;
use std::fmt;
use thiserror::Error;

/// Why a response did not yield an image.
///
/// The `Display` text is the message shown to the user. Safety ratings are
/// carried for diagnostics only and never rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("The request was blocked by the AI. Reason: {reason}. Try adjusting the images or the instruction.")]
    Blocked { reason: String },

    #[error("The API returned an unexpectedly empty response. Check the input images.")]
    EmptyResponse,

    #[error("The AI could not complete the task. Generation was stopped for violating safety policies.")]
    SafetyBlocked {
        finish_reason: FinishReason,
        ratings: Vec<SafetyRating>,
    },

    #[error("The AI could not complete the task. Reason: {finish_reason}.")]
    IncompleteGeneration { finish_reason: FinishReason },

    #[error("The AI did not return valid content. Finish reason: {}.", finish_reason_label(.finish_reason))]
    NoContent { finish_reason: Option<FinishReason> },

    #[error("The AI answered with text instead of an image: \"{text}\"")]
    UnexpectedTextResponse { text: String },

    #[error("The generated image was not found in the API response.")]
    NoImageFound,
}

fn finish_reason_label(reason: &Option<FinishReason>) -> &str {
    reason.as_ref().map(FinishReason::as_str).unwrap_or("unknown")
}

/// Payload-free tag of a [`GenerationFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Blocked,
    EmptyResponse,
    SafetyBlocked,
    IncompleteGeneration,
    NoContent,
    UnexpectedTextResponse,
    NoImageFound,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl GenerationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationFailure::Blocked { .. } => FailureKind::Blocked,
            GenerationFailure::EmptyResponse => FailureKind::EmptyResponse,
            GenerationFailure::SafetyBlocked { .. } => FailureKind::SafetyBlocked,
            GenerationFailure::IncompleteGeneration { .. } => FailureKind::IncompleteGeneration,
            GenerationFailure::NoContent { .. } => FailureKind::NoContent,
            GenerationFailure::UnexpectedTextResponse { .. } => {
                FailureKind::UnexpectedTextResponse
            }
            GenerationFailure::NoImageFound => FailureKind::NoImageFound,
        }
    }
}

pub type InterpretationOutcome = std::result::Result<ImagePayload, GenerationFailure>;

/// Classify a response. Reads only; the response is left untouched.
pub fn interpret(response: &GenerateContentResponse) -> InterpretationOutcome {
    let candidate = match response.candidates.as_deref() {
        Some([first, ..]) => first,
        _ => return Err(no_candidates(response)),
    };

    if let Some(reason) = &candidate.finish_reason {
        if !reason.is_normal() {
            return Err(abnormal_finish(candidate, reason));
        }
    }

    let parts = match candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.as_deref())
    {
        Some(parts) if !parts.is_empty() => parts,
        _ => {
            return Err(GenerationFailure::NoContent {
                finish_reason: candidate.finish_reason.clone(),
            })
        }
    };

    let image = parts.iter().find_map(|part| match part {
        Part::InlineData { inline_data } if !inline_data.data.is_empty() => Some(inline_data),
        _ => None,
    });
    if let Some(image) = image {
        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image.mime_type
        );
        return Ok(image.clone());
    }

    let text = parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");
    if !text.is_empty() {
        tracing::warn!("Gemini answered with text instead of an image: {}", text);
        return Err(GenerationFailure::UnexpectedTextResponse { text });
    }

    Err(GenerationFailure::NoImageFound)
}

fn no_candidates(response: &GenerateContentResponse) -> GenerationFailure {
    match response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
        .filter(|reason| !reason.is_empty())
    {
        Some(reason) => {
            tracing::warn!("Gemini blocked the prompt: {}", reason);
            GenerationFailure::Blocked {
                reason: reason.clone(),
            }
        }
        None => GenerationFailure::EmptyResponse,
    }
}

fn abnormal_finish(candidate: &Candidate, reason: &FinishReason) -> GenerationFailure {
    if reason.is_safety() {
        let ratings = candidate.safety_ratings.clone().unwrap_or_default();
        tracing::error!("Safety details ({}): {:?}", reason, ratings);
        GenerationFailure::SafetyBlocked {
            finish_reason: reason.clone(),
            ratings,
        }
    } else {
        tracing::warn!("Gemini stopped generating early: {}", reason);
        GenerationFailure::IncompleteGeneration {
            finish_reason: reason.clone(),
        }
    }
}
