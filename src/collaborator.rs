//! Boundary types for the two external collaborators: the image-generation
//! service that proposes backgrounds and the language-model service that
//! suggests style patches. The core owns only these shapes and the rule
//! that a failed call leaves session state untouched; transport, retries
//! and cancellation belong to the caller.

use crate::{
    error::PosterResult,
    geometry::AspectRatio,
    model::{BackgroundOption, EventDetails},
    patch::StylePatch,
    session::PosterSession,
};

/// What the image collaborator needs to propose backgrounds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBrief {
    pub title: String,
    pub description: String,
    pub location: String,
    pub time: String,
    pub aspect_ratio: String,
}

impl ImageBrief {
    pub fn for_event(details: &EventDetails, aspect_ratio: AspectRatio) -> Self {
        Self {
            title: details.title.clone(),
            description: details.description.clone(),
            location: details.location.clone(),
            time: match (details.date.as_str(), details.time.as_str()) {
                (d, "") => d.to_string(),
                ("", t) => t.to_string(),
                (d, t) => format!("{d}, {t}"),
            },
            aspect_ratio: aspect_ratio.to_string(),
        }
    }
}

/// Request payload for the style advisor, using the original wire names.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatchRequest {
    #[serde(rename = "originalCSS")]
    pub original_css: String,
    pub prompt: String,
}

/// One suggested modification: a selector and its new declarations.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatchModification {
    #[serde(rename = "className")]
    pub class_name: String,
    pub content: String,
}

impl From<PatchModification> for StylePatch {
    fn from(m: PatchModification) -> Self {
        Self {
            selector: m.class_name,
            content: m.content,
        }
    }
}

/// The style advisor's structured response.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatchResponse {
    pub modifications: Vec<PatchModification>,
}

/// Produces candidate background image URLs for an event brief.
pub trait BackgroundGenerator {
    fn generate(&self, brief: &ImageBrief) -> PosterResult<Vec<String>>;
}

/// Turns a natural-language prompt plus the current CSS into a patch set.
pub trait StyleAdvisor {
    fn suggest(&self, request: &PatchRequest) -> PosterResult<PatchResponse>;
}

/// Asks the generator for candidates and wraps the returned URLs as
/// selectable background options, in order.
pub fn background_candidates(
    generator: &dyn BackgroundGenerator,
    brief: &ImageBrief,
) -> PosterResult<Vec<BackgroundOption>> {
    let urls = generator.generate(brief)?;
    Ok(urls
        .into_iter()
        .enumerate()
        .map(|(idx, url)| BackgroundOption {
            id: format!("gen-{}", idx + 1),
            name: format!("Generated background {}", idx + 1),
            url,
            thumbnail: None,
        })
        .collect())
}

/// Runs one advisor round-trip and applies the response atomically: if the
/// advisor fails, the session is left exactly as it was and the error is
/// surfaced for the caller to retry.
pub fn request_restyle(
    session: &mut PosterSession,
    advisor: &dyn StyleAdvisor,
    prompt: &str,
) -> PosterResult<()> {
    let request = PatchRequest {
        original_css: session.css(),
        prompt: prompt.to_string(),
    };
    let response = advisor.suggest(&request)?;
    let patches: Vec<StylePatch> = response.modifications.into_iter().map(Into::into).collect();
    session.apply_patch(&patches);
    Ok(())
}
