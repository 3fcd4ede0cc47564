//! Annotation backend endpoints
//!
//! Posts are form-encoded; `boundaries`, `tags` and `contexts` fields hold
//! JSON documents.

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    Json,
};
use morphseg_common::api::{
    AnnotationForm, LogForm, LoginQuery, LoginResponse, SegmentationForm, SegmentedResponse,
    UidForm, UidQuery, WordResponse, WordsResponse,
};
use morphseg_common::TagKind;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::AnnotationRecord;
use crate::AppState;

fn parse_field<T: DeserializeOwned>(name: &str, value: &str) -> ApiResult<T> {
    serde_json::from_str(value)
        .map_err(|e| ApiError::BadRequest(format!("Field '{}' is not valid JSON: {}", name, e)))
}

/// GET /user/:email?width=
pub async fn login(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(query): Query<LoginQuery>,
) -> Json<LoginResponse> {
    let response = state.store.write().await.login(&email, query.width);
    info!(uid = %response.uid, email = %email, width = query.width, "login");
    Json(response)
}

/// GET /words/:uid
pub async fn words(State(state): State<AppState>, Path(uid): Path<String>) -> ApiResult<Json<WordsResponse>> {
    Ok(Json(state.store.read().await.queue(&uid)?))
}

/// GET /word/:word?uid=
pub async fn word(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Query(query): Query<UidQuery>,
) -> ApiResult<Json<WordResponse>> {
    Ok(Json(state.store.read().await.word(&query.uid, &word)?))
}

/// POST /log/:handle
pub async fn log(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Form(form): Form<LogForm>,
) -> StatusCode {
    let store = state.store.read().await;
    let email = store.email(&form.uid).unwrap_or("-");
    info!(uid = %form.uid, email = %email, handle = %handle, message = %form.message, "frontend log");
    StatusCode::OK
}

/// POST /sense/:context_id
pub async fn sense(Path(context_id): Path<String>, Form(form): Form<UidForm>) -> StatusCode {
    info!(uid = %form.uid, context_id = %context_id, "sense");
    StatusCode::OK
}

/// POST /skip/:word
pub async fn skip(Path(word): Path<String>, Form(form): Form<UidForm>) -> StatusCode {
    info!(uid = %form.uid, word = %word, "skip");
    StatusCode::OK
}

/// POST /nonword/:word
pub async fn nonword(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Form(form): Form<UidForm>,
) -> ApiResult<StatusCode> {
    state.store.write().await.record_nonword(&form.uid, &word)?;
    Ok(StatusCode::OK)
}

/// POST /b2seg/:word
pub async fn b2seg(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Form(form): Form<SegmentationForm>,
) -> ApiResult<Json<SegmentedResponse>> {
    let boundaries: Vec<bool> = parse_field("boundaries", &form.boundaries)?;
    let contexts: BTreeMap<String, bool> = parse_field("contexts", &form.contexts)?;
    info!(uid = %form.uid, word = %word, boundaries = ?boundaries, contexts = ?contexts, "b2seg");

    let segmented = state.store.read().await.segment(&word, &boundaries)?;
    Ok(Json(SegmentedResponse { word, segmented }))
}

/// POST /word/:word
pub async fn annotate(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Form(form): Form<AnnotationForm>,
) -> ApiResult<StatusCode> {
    let boundaries: Vec<bool> = parse_field("boundaries", &form.boundaries)?;
    let tags: Vec<TagKind> = parse_field("tags", &form.tags)?;
    let contexts: BTreeMap<String, bool> = parse_field("contexts", &form.contexts)?;

    state
        .store
        .write()
        .await
        .record_final(&form.uid, &word, &boundaries, &tags, &contexts)?;
    Ok(StatusCode::OK)
}

/// GET /annotations/:uid
pub async fn annotations(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<Vec<AnnotationRecord>>> {
    Ok(Json(state.store.read().await.annotations(&uid)?.to_vec()))
}
