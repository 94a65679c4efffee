use super::types::{Content, GenerateContentRequest, GenerationConfig, Modality, Part};
use crate::models::ImagePayload;

/// Assemble a `generateContent` request: images first, in the order given,
/// then the instruction as the final part.
///
/// Arity is not checked here; each facade operation pins its own.
pub fn build_request(images: &[&ImagePayload], instruction: &str) -> GenerateContentRequest {
    let parts = images
        .iter()
        .map(|image| Part::InlineData {
            inline_data: (*image).clone(),
        })
        .chain(std::iter::once(Part::Text {
            text: instruction.to_string(),
        }))
        .collect();

    GenerateContentRequest {
        contents: vec![Content { role: None, parts }],
        generation_config: GenerationConfig {
            response_modalities: vec![Modality::Image, Modality::Text],
        },
    }
}
