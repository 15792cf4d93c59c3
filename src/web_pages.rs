use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    assistant::CreativeAssistant,
    error::MuseError,
    form::{FormUpdate, FormView},
    models::{CopyFragment, GeneratedResult, Tone},
    orchestrator::ImageOutcome,
};

const INDEX_HTML: &str = include_str!("../templates/index.html");
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

type AppState = Arc<CreativeAssistant>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    result: GeneratedResult,
    image: ImageOutcome,
    notice: Option<&'static str>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

fn error_response(err: MuseError) -> Response {
    let status = match &err {
        MuseError::Validation(_) | MuseError::InvalidReferenceImage(_) => StatusCode::BAD_REQUEST,
        MuseError::NotFound(_) => StatusCode::NOT_FOUND,
        MuseError::CopyGeneration(_) => StatusCode::BAD_GATEWAY,
        MuseError::Storage(_) | MuseError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = ?err, "request failed");
    }
    json_error(status, &err.to_string())
}

pub fn api_router(assistant: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/form", get(get_form).put(update_form))
        .route("/api/form/tones/{tone}", post(toggle_tone))
        .route(
            "/api/form/reference",
            post(upload_reference)
                .delete(clear_reference)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/form/refinement/cancel", post(cancel_refinement))
        .route("/api/generate", post(generate))
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/{id}", get(get_campaign).delete(delete_campaign))
        .route("/api/campaigns/{id}/tweak", post(tweak_campaign))
        .route("/api/campaigns/{id}/fragments/{kind}", get(copy_fragment))
        .route("/api/campaigns/{id}/image", get(download_image))
        .with_state(assistant)
}

pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_form(State(assistant): State<AppState>) -> Json<FormView> {
    Json(assistant.form().await)
}

async fn update_form(
    State(assistant): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<FormView>, Response> {
    assistant.update_form(update).await.map(Json).map_err(error_response)
}

async fn toggle_tone(
    State(assistant): State<AppState>,
    Path(tone): Path<String>,
) -> Result<Json<FormView>, Response> {
    let tone = tone.parse::<Tone>().map_err(error_response)?;
    Ok(Json(assistant.toggle_tone(tone).await))
}

async fn upload_reference(State(assistant): State<AppState>, mut multipart: Multipart) -> Response {
    let mut content_type = None;
    let mut bytes = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    content_type = field.content_type().map(|value| value.to_string());
                    match field.bytes().await {
                        Ok(data) => {
                            bytes = Some(data);
                        }
                        Err(err) => {
                            return json_error(StatusCode::BAD_REQUEST, &format!("failed to read file: {err}"));
                        }
                    }
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                return json_error(StatusCode::BAD_REQUEST, &format!("failed to read form: {err}"));
            }
        }
    }

    let Some(bytes) = bytes else {
        return json_error(StatusCode::BAD_REQUEST, "no file uploaded");
    };
    match assistant.attach_reference(bytes.to_vec(), content_type.as_deref()).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn clear_reference(State(assistant): State<AppState>) -> Json<FormView> {
    Json(assistant.clear_reference().await)
}

async fn cancel_refinement(State(assistant): State<AppState>) -> Json<FormView> {
    Json(assistant.cancel_refinement().await)
}

async fn generate(State(assistant): State<AppState>) -> Response {
    match assistant.generate().await {
        Ok(outcome) => {
            let notice = outcome.notice();
            let body = GenerateResponse {
                result: outcome.result,
                image: outcome.image,
                notice,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn list_campaigns(
    State(assistant): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<GeneratedResult>> {
    Json(assistant.search(&query.q).await)
}

async fn get_campaign(
    State(assistant): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedResult>, Response> {
    assistant.get(&id).await.map(Json).map_err(error_response)
}

async fn delete_campaign(State(assistant): State<AppState>, Path(id): Path<String>) -> Response {
    match assistant.delete(&id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn tweak_campaign(
    State(assistant): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormView>, Response> {
    assistant.tweak(&id).await.map(Json).map_err(error_response)
}

async fn copy_fragment(
    State(assistant): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Response {
    let kind = match kind.parse::<CopyFragment>() {
        Ok(kind) => kind,
        Err(err) => return error_response(err),
    };
    match assistant.fragment(&id, kind).await {
        Ok(text) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response(),
        Err(err) => error_response(err),
    }
}

async fn download_image(State(assistant): State<AppState>, Path(id): Path<String>) -> Response {
    match assistant.image_download(&id).await {
        Ok(download) => (
            [
                (header::CONTENT_TYPE, download.mime_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.file_name),
                ),
            ],
            download.bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
