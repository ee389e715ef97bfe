use crate::{
    auth::{authorize_owner, CurrentAccount},
    error::AppError,
    models::{Task, TaskCreate, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

fn task_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Task with id: {} not found", id))
}

/// Retrieves the tasks owned by the authenticated account.
///
/// ## Query Parameters:
/// - `status` (optional): `incomplete`, `in_progress` or `complete`.
/// - `search` (optional): Case-insensitive match against title and description.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, newest first.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    CurrentAccount(account): CurrentAccount,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks(account.id, &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated account.
///
/// ## Responses:
/// - `201 Created`: The stored `Task`.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `422 Unprocessable Entity`: Title or description out of bounds.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskCreate>,
    CurrentAccount(account): CurrentAccount,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), account.id, Utc::now());
    let stored = state.tasks.insert_task(&task).await?;

    log::info!("Account {} created task {}", account.id, stored.id);
    Ok(HttpResponse::Created().json(stored))
}

/// Retrieves a task by id.
///
/// Any authenticated account may read any task; only mutation is
/// restricted to the owner.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `404 Not Found`: No task with this id.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    _account: CurrentAccount,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    match state.tasks.find_task(task_id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(task_not_found(task_id)),
    }
}

/// Partially updates a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `403 Forbidden`: The task belongs to another account.
/// - `404 Not Found`: No task with this id (checked before ownership).
/// - `422 Unprocessable Entity`: Invalid field values.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    CurrentAccount(account): CurrentAccount,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let existing = state
        .tasks
        .find_task(task_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;
    if let Err(err) = authorize_owner(&account, &existing) {
        log::warn!("Account {} may not update task {}", account.id, task_id);
        return Err(err.into());
    }

    let updated = state
        .tasks
        .update_task(task_id, &task_data, Utc::now())
        .await?
        .ok_or_else(|| task_not_found(task_id))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `204 No Content`: Deleted.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `403 Forbidden`: The task belongs to another account.
/// - `404 Not Found`: No task with this id (checked before ownership).
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    CurrentAccount(account): CurrentAccount,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let existing = state
        .tasks
        .find_task(task_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;
    if let Err(err) = authorize_owner(&account, &existing) {
        log::warn!("Account {} may not delete task {}", account.id, task_id);
        return Err(err.into());
    }

    if !state.tasks.delete_task(task_id).await? {
        return Err(task_not_found(task_id));
    }

    log::info!("Account {} deleted task {}", account.id, task_id);
    Ok(HttpResponse::NoContent().finish())
}
