//! HTTP handlers for `/api/*`.
//!
//! # Responsibility
//! - Decode query/JSON input into core calls.
//! - Encode task records with string-typed fields for the web front-end.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use scheduler_core::{next_date_text, Task, TaskDraft, TaskId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextDateParams {
    pub now: String,
    pub date: String,
    pub repeat: String,
}

#[derive(Debug, Serialize)]
pub struct NextDateResponse {
    pub next_date: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskIdParams {
    pub id: Option<String>,
}

/// Update body: draft fields plus the target id as a string or number.
#[derive(Debug, Deserialize)]
pub struct TaskUpdatePayload {
    #[serde(default, deserialize_with = "deserialize_task_id")]
    pub id: Option<TaskId>,
    #[serde(flatten)]
    pub draft: TaskDraft,
}

#[derive(Debug, Serialize)]
pub struct TaskIdResponse {
    pub id: String,
}

/// Task as rendered to the front-end; every field is a string.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            date: task.date.to_string(),
            title: task.title,
            comment: task.comment,
            repeat: task.repeat.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Serialize)]
pub struct EmptyResponse {}

/// `GET /api/nextdate?now=&date=&repeat=`
pub async fn next_date(
    Query(params): Query<NextDateParams>,
) -> Result<Json<NextDateResponse>, ApiError> {
    let next_date = next_date_text(&params.now, &params.date, &params.repeat)?;
    Ok(Json(NextDateResponse { next_date }))
}

/// `POST /api/task/add`
pub async fn add_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<TaskIdResponse>, ApiError> {
    let Json(draft) = payload?;
    let today = state.today();
    let id = state.with_task_service(|service| service.create_task(today, &draft))?;
    Ok(Json(TaskIdResponse { id: id.to_string() }))
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state.with_task_service(|service| service.list_tasks(None))?;
    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// `GET /api/task?id=`
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskIdParams>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = parse_task_id(params.id.as_deref())?;
    state
        .with_task_service(|service| service.get_task(id))?
        .map(|task| Json(TaskResponse::from(task)))
        .ok_or_else(|| ApiError::NotFound("task not found".to_string()))
}

/// `PUT /api/task`
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskUpdatePayload>, JsonRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let Json(payload) = payload?;
    let id = payload
        .id
        .ok_or_else(|| ApiError::BadRequest("task id is required".to_string()))?;
    let today = state.today();
    state.with_task_service(|service| service.update_task(today, id, &payload.draft))?;
    Ok(Json(EmptyResponse {}))
}

/// Method fallback for every `/api/*` route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn parse_task_id(raw: Option<&str>) -> Result<TaskId, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest("task id is required".to_string()))?;
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid task id `{raw}`")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Number(TaskId),
    Text(String),
}

fn deserialize_task_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<TaskId>, D::Error> {
    match Option::<RawTaskId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTaskId::Number(id)) => Ok(Some(id)),
        Some(RawTaskId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawTaskId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid task id `{text}`"))),
    }
}
