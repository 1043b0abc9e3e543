use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    individuals::repo_types::Individual,
    state::AppState,
};

pub(crate) fn summary_prompt(individual: &Individual) -> String {
    let notes = individual
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("No specific notes.");
    format!(
        "Summarize the following notes about {name} in two or three short sentences. \
         Keep only facts that are useful for staying in touch.\n\nNotes:\n{notes}",
        name = individual.name,
    )
}

pub(crate) fn draft_message_prompt(individual: &Individual, purpose: Option<&str>) -> String {
    let purpose = purpose
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("checking in");

    let mut context = Vec::new();
    if let Some(occupation) = individual.occupation.as_deref() {
        context.push(format!("Occupation: {occupation}"));
    }
    if let Some(interests) = individual.interests.as_deref() {
        context.push(format!("Interests: {interests}"));
    }
    if let Some(rel) = individual.relationship_status.as_deref() {
        context.push(format!("Relationship: {rel}"));
    }
    if let Some(notes) = individual.notes.as_deref() {
        context.push(format!("Notes: {notes}"));
    }
    let context = if context.is_empty() {
        "No additional context.".to_string()
    } else {
        context.join("\n")
    };

    format!(
        "Draft a short, friendly personal message to {name}. Purpose: {purpose}.\n\
         Use the context below where it helps; do not invent facts.\n\n{context}",
        name = individual.name,
    )
}

/// Runs `prompt` through the configured generator.
pub(crate) async fn generate(state: &AppState, prompt: &str) -> AppResult<String> {
    let Some(generator) = state.textgen.as_ref() else {
        return Err(AppError::Unavailable(
            "Text generation is not configured".into(),
        ));
    };
    generator.generate(prompt).await.map_err(|e| {
        warn!(error = %e, "text generation call failed");
        AppError::Upstream(format!("{e:#}"))
    })
}
