//! In-memory notes API used to exercise `hostlink-core` over real HTTP.
//!
//! Only what the client tests drive is served: a note can be created,
//! fetched (plain or wrapped in an envelope), pinned and removed. The
//! `/malformed` and `/empty` endpoints return bodies a JSON client has to
//! reject.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub pinned: bool,
}

#[derive(Deserialize)]
pub struct NewNote {
    pub title: String,
}

#[derive(Deserialize)]
pub struct SetPinned {
    pub pinned: bool,
}

/// Shared note storage behind the router.
#[derive(Clone, Default)]
pub struct NoteStore {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl NoteStore {
    pub async fn insert(&self, title: String) -> Note {
        let note = Note {
            id: Uuid::new_v4(),
            title,
            pinned: false,
        };
        self.notes.write().await.insert(note.id, note.clone());
        note
    }

    pub async fn find(&self, id: Uuid) -> Result<Note, NoteError> {
        self.notes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(NoteError::Missing(id))
    }

    pub async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Note, NoteError> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(NoteError::Missing(id))?;
        note.pinned = pinned;
        Ok(note.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<Note, NoteError> {
        self.notes
            .write()
            .await
            .remove(&id)
            .ok_or(NoteError::Missing(id))
    }
}

#[derive(Debug, PartialEq)]
pub enum NoteError {
    Missing(Uuid),
}

impl IntoResponse for NoteError {
    fn into_response(self) -> Response {
        match self {
            NoteError::Missing(id) => {
                debug!(%id, "note not found");
                let body = json!({ "error": "note not found", "id": id });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
        }
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/notes", post(create))
        .route("/notes/{id}", get(fetch).put(pin).delete(remove))
        .route("/envelope/notes/{id}", get(fetch_enveloped))
        .route("/malformed", get(malformed))
        .route("/empty", get(empty))
        .with_state(NoteStore::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn create(State(store): State<NoteStore>, Json(input): Json<NewNote>) -> (StatusCode, Json<Note>) {
    (StatusCode::CREATED, Json(store.insert(input.title).await))
}

async fn fetch(State(store): State<NoteStore>, Path(id): Path<Uuid>) -> Result<Json<Note>, NoteError> {
    store.find(id).await.map(Json)
}

async fn fetch_enveloped(
    State(store): State<NoteStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, NoteError> {
    let note = store.find(id).await?;
    Ok(Json(json!({ "data": note, "meta": { "version": 1 } })))
}

async fn pin(
    State(store): State<NoteStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetPinned>,
) -> Result<Json<Note>, NoteError> {
    store.set_pinned(id, input.pinned).await.map(Json)
}

/// Responds with the removed note so clients always get a JSON body back.
async fn remove(State(store): State<NoteStore>, Path(id): Path<Uuid>) -> Result<Json<Note>, NoteError> {
    store.remove(id).await.map(Json)
}

async fn malformed() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{\"title\": ",
    )
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
