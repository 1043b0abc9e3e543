use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    db::SearchQuery,
    error::{parse_id, AppError, AppResult, MessageBody},
    individuals::{
        dto::{
            CreateIndividualRequest, DraftMessageRequest, GeneratedText, IndividualResponse,
            UpdateIndividualRequest,
        },
        repo_types::Individual,
        services::{draft_message_prompt, generate, summary_prompt},
    },
    state::AppState,
};

pub fn individual_routes() -> Router<AppState> {
    Router::new()
        .route("/individuals", get(list_individuals).post(create_individual))
        .route(
            "/individuals/:id",
            get(get_individual)
                .put(update_individual)
                .delete(delete_individual),
        )
        .route("/individuals/:id/summary", post(summarize_notes))
        .route("/individuals/:id/draft-message", post(draft_message))
}

fn not_found() -> AppError {
    AppError::not_found("Individual not found")
}

async fn load(state: &AppState, id: i32) -> AppResult<Individual> {
    state.individuals.get(id).await?.ok_or_else(not_found)
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn list_individuals(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Individual>>> {
    let rows = state.individuals.list(query.term()).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn get_individual(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Individual>> {
    let id = parse_id(&id, "individual")?;
    Ok(Json(load(&state, id).await?))
}

#[instrument(skip(state, caller, payload), fields(caller = caller.id))]
pub async fn create_individual(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<CreateIndividualRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<IndividualResponse>)> {
    let Json(payload) = payload?;
    let new = payload.into_new()?;
    let individual = state.individuals.create(new).await?;

    info!(individual_id = individual.id, owner = ?individual.user_id, "individual created");
    Ok((
        StatusCode::CREATED,
        Json(IndividualResponse {
            message: "Individual created".into(),
            individual,
        }),
    ))
}

#[instrument(skip(state, caller, payload), fields(caller = caller.id))]
pub async fn update_individual(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateIndividualRequest>, JsonRejection>,
) -> AppResult<Json<IndividualResponse>> {
    let id = parse_id(&id, "individual")?;
    let Json(payload) = payload?;
    let changes = payload.into_changes()?;

    let Some(individual) = state.individuals.update(id, caller.id, changes).await? else {
        warn!(individual_id = id, "update refused: missing or owned by another user");
        return Err(not_found());
    };

    info!(individual_id = id, "individual updated");
    Ok(Json(IndividualResponse {
        message: "Individual updated".into(),
        individual,
    }))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn delete_individual(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    let id = parse_id(&id, "individual")?;
    if !state.individuals.delete(id, caller.id).await? {
        warn!(individual_id = id, "delete refused: missing or owned by another user");
        return Err(not_found());
    }

    info!(individual_id = id, "individual deleted");
    Ok(Json(MessageBody::new("Individual deleted")))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn summarize_notes(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<GeneratedText>> {
    let id = parse_id(&id, "individual")?;
    let individual = load(&state, id).await?;
    let text = generate(&state, &summary_prompt(&individual)).await?;
    Ok(Json(GeneratedText { text }))
}

#[instrument(skip(state, caller, body), fields(caller = caller.id))]
pub async fn draft_message(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<GeneratedText>> {
    let id = parse_id(&id, "individual")?;
    // The body is optional; when present it must be valid.
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        DraftMessageRequest::default()
    } else {
        serde_json::from_slice::<DraftMessageRequest>(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };
    let individual = load(&state, id).await?;
    let prompt = draft_message_prompt(&individual, request.purpose.as_deref());
    let text = generate(&state, &prompt).await?;
    Ok(Json(GeneratedText { text }))
}
