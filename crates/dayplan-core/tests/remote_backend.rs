//! Remote-mode behavior against an in-process stub authority.
//!
//! The stub speaks the authority's wire contract: bearer auth on every
//! endpoint, ownership mismatches reported as not-found, template
//! creation/activation deactivating siblings, and transactional bulk
//! reorder.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use dayplan_core::backend::RemoteBackend;
use dayplan_core::{DayplanError, SyncStore, Template, Todo, DEFAULT_TEMPLATE_NAME};

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Authority {
    templates: Arc<Mutex<Vec<Template>>>,
}

impl Authority {
    fn snapshot(&self) -> Vec<Template> {
        self.templates.lock().expect("authority lock").clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} not found", what) })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message })),
    )
        .into_response()
}

async fn list_templates(State(state): State<Authority>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let templates = state.templates.lock().expect("authority lock").clone();
    Json(templates).into_response()
}

#[derive(Deserialize)]
struct CreateTemplateBody {
    name: String,
}

async fn create_template(
    State(state): State<Authority>,
    headers: HeaderMap,
    Json(body): Json<CreateTemplateBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.name.is_empty() {
        return bad_request("Name is required");
    }
    let mut templates = state.templates.lock().expect("authority lock");
    for template in templates.iter_mut() {
        template.is_active = false;
    }
    let template = Template {
        id: Uuid::new_v4(),
        name: body.name,
        is_active: true,
        todos: Vec::new(),
        new_todo: String::new(),
    };
    templates.push(template.clone());
    Json(template).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTemplateBody {
    id: Uuid,
    name: Option<String>,
    is_active: Option<bool>,
}

async fn update_template(
    State(state): State<Authority>,
    headers: HeaderMap,
    Json(body): Json<UpdateTemplateBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut templates = state.templates.lock().expect("authority lock");
    if !templates.iter().any(|t| t.id == body.id) {
        return not_found("Template");
    }
    if body.is_active == Some(true) {
        for template in templates.iter_mut() {
            template.is_active = template.id == body.id;
        }
    }
    let template = templates
        .iter_mut()
        .find(|t| t.id == body.id)
        .expect("checked above");
    if let Some(name) = body.name {
        template.name = name;
    }
    Json(template.clone()).into_response()
}

async fn delete_template(
    State(state): State<Authority>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut templates = state.templates.lock().expect("authority lock");
    let Some(position) = templates.iter().position(|t| t.id == id) else {
        return not_found("Template");
    };
    templates.remove(position);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoBody {
    content: String,
    template_id: Uuid,
    date: NaiveDate,
}

async fn create_todo(
    State(state): State<Authority>,
    headers: HeaderMap,
    Json(body): Json<CreateTodoBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.content.is_empty() {
        return bad_request("Missing required fields");
    }
    let mut templates = state.templates.lock().expect("authority lock");
    let Some(template) = templates.iter_mut().find(|t| t.id == body.template_id) else {
        return not_found("Template");
    };
    let todo = Todo {
        id: Uuid::new_v4(),
        content: body.content,
        completed: false,
        date: body.date,
        created_at: Utc::now(),
        updated_at: None,
        template_id: template.id,
        order: 0,
    };
    template.todos.push(todo.clone());
    Json(todo).into_response()
}

#[derive(Deserialize)]
struct UpdateTodoBody {
    id: Uuid,
    content: Option<String>,
    completed: Option<bool>,
}

async fn update_todo(
    State(state): State<Authority>,
    headers: HeaderMap,
    Json(body): Json<UpdateTodoBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut templates = state.templates.lock().expect("authority lock");
    let Some(todo) = templates
        .iter_mut()
        .flat_map(|t| t.todos.iter_mut())
        .find(|t| t.id == body.id)
    else {
        return not_found("Todo");
    };
    if let Some(content) = body.content {
        todo.content = content;
    }
    if let Some(completed) = body.completed {
        todo.completed = completed;
    }
    todo.updated_at = Some(Utc::now());
    Json(todo.clone()).into_response()
}

async fn delete_todo(
    State(state): State<Authority>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut templates = state.templates.lock().expect("authority lock");
    for template in templates.iter_mut() {
        if let Some(position) = template.todos.iter().position(|t| t.id == id) {
            template.todos.remove(position);
            return StatusCode::NO_CONTENT.into_response();
        }
    }
    not_found("Todo")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody {
    template_id: Uuid,
    todos: Vec<Uuid>,
}

async fn reorder_todos(
    State(state): State<Authority>,
    headers: HeaderMap,
    Json(body): Json<ReorderBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut templates = state.templates.lock().expect("authority lock");
    let Some(template) = templates.iter_mut().find(|t| t.id == body.template_id) else {
        return not_found("Template");
    };
    let mut reordered = Vec::with_capacity(template.todos.len());
    for id in &body.todos {
        let Some(position) = template.todos.iter().position(|t| t.id == *id) else {
            return not_found("Todo");
        };
        reordered.push(template.todos.remove(position));
    }
    reordered.append(&mut template.todos);
    for (index, todo) in reordered.iter_mut().enumerate() {
        todo.order = index as i64;
    }
    template.todos = reordered;
    Json(template.todos.clone()).into_response()
}

async fn spawn_authority() -> (SocketAddr, Authority) {
    let state = Authority::default();
    let app = Router::new()
        .route(
            "/api/templates",
            get(list_templates)
                .post(create_template)
                .patch(update_template),
        )
        .route("/api/templates/{id}", delete(delete_template))
        .route("/api/todos", post(create_todo).patch(update_todo))
        .route("/api/todos/{id}", delete(delete_todo))
        .route("/api/todos/reorder", post(reorder_todos))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub authority");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub authority");
    });
    (addr, state)
}

fn backend_for(addr: SocketAddr, token: &str) -> RemoteBackend {
    RemoteBackend::new(&format!("http://{}/", addr), token).expect("remote backend")
}

async fn open_remote_store(addr: SocketAddr) -> SyncStore {
    SyncStore::open(Arc::new(backend_for(addr, TOKEN)))
        .await
        .expect("open store")
}

#[tokio::test]
async fn test_bootstrap_creates_main_remotely() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;

    let templates = store.templates();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].name, DEFAULT_TEMPLATE_NAME);
    assert!(templates[0].is_active);

    let remote = authority.snapshot();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].name, DEFAULT_TEMPLATE_NAME);
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() {
    let (addr, _authority) = spawn_authority().await;
    let err = SyncStore::open(Arc::new(backend_for(addr, "wrong")))
        .await
        .unwrap_err();
    assert!(matches!(err, DayplanError::Unauthorized(_)));
}

#[tokio::test]
async fn test_add_todo_appends_authority_object() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;

    let todo = store
        .add_todo("buy milk", template)
        .await
        .expect("add todo")
        .expect("non-blank content");
    assert_eq!(todo.order, 0);
    assert_eq!(todo.template_id, template);

    let visible = store.visible_todos();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0], todo);

    let remote = authority.snapshot();
    assert_eq!(remote[0].todos, vec![todo]);
}

#[tokio::test]
async fn test_blank_todo_is_rejected_by_authority() {
    let (addr, _authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;

    // The store no-ops blank input before any request is made
    assert!(store.add_todo("  ", template).await.expect("add").is_none());

    // A direct backend call surfaces the authority's validation error
    let backend = backend_for(addr, TOKEN);
    use dayplan_core::backend::Backend;
    let err = backend
        .create_todo(template, "", store.selected_date())
        .await
        .unwrap_err();
    assert!(matches!(err, DayplanError::Validation(_)));
}

#[tokio::test]
async fn test_toggle_merges_authoritative_todo() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;
    let todo = store
        .add_todo("water plants", template)
        .await
        .expect("add")
        .expect("todo");

    let toggled = store.toggle_todo(todo.id, template).await.expect("toggle");
    assert!(toggled.completed);
    assert!(toggled.updated_at.is_some());

    // The local copy is the authority's object, not a local flip
    let remote_todo = authority.snapshot()[0].todos[0].clone();
    assert_eq!(store.visible_todos()[0], remote_todo);
}

#[tokio::test]
async fn test_delete_missing_todo_keeps_local_state() {
    let (addr, _authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;
    store
        .add_todo("keep me", template)
        .await
        .expect("add")
        .expect("todo");

    let err = store
        .delete_todo(Uuid::new_v4(), template)
        .await
        .unwrap_err();
    assert!(matches!(err, DayplanError::NotFound(_)));
    // Confirm-then-apply: the failed delete must not touch local state
    assert_eq!(store.visible_todos().len(), 1);
}

#[tokio::test]
async fn test_rename_propagates_to_authority() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;

    store
        .update_template_name(template, "Errands")
        .await
        .expect("rename");
    assert_eq!(authority.snapshot()[0].name, "Errands");

    // Blank rename is rejected before any request
    let err = store.update_template_name(template, " ").await.unwrap_err();
    assert!(matches!(err, DayplanError::Validation(_)));
    assert_eq!(authority.snapshot()[0].name, "Errands");
}

#[tokio::test]
async fn test_reorder_propagates_position_indices() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let template = store.active_template().expect("active").id;

    let mut ids = Vec::new();
    for content in ["one", "two", "three"] {
        ids.push(
            store
                .add_todo(content, template)
                .await
                .expect("add")
                .expect("todo")
                .id,
        );
    }
    let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
    store
        .reorder_todos(&reversed, template)
        .await
        .expect("reorder");

    let remote = authority.snapshot();
    let remote_ids: Vec<Uuid> = remote[0].todos.iter().map(|t| t.id).collect();
    assert_eq!(remote_ids, reversed);
    let orders: Vec<i64> = remote[0].todos.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_add_template_deactivates_siblings_remotely() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;

    let second = store.add_template().await.expect("add template");
    assert_eq!(second.name, "Template 2");

    let remote = authority.snapshot();
    assert_eq!(remote.len(), 2);
    let active: Vec<&Template> = remote.iter().filter(|t| t.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);
}

#[tokio::test]
async fn test_set_active_template_propagates() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let main = store.active_template().expect("active").id;
    store.add_template().await.expect("add template");

    store.set_active_template(main).await.expect("set active");

    let remote = authority.snapshot();
    let active: Vec<&Template> = remote.iter().filter(|t| t.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, main);
    assert_eq!(store.active_template().expect("active").id, main);
}

#[tokio::test]
async fn test_remove_template_promotes_first_remaining() {
    let (addr, authority) = spawn_authority().await;
    let store = open_remote_store(addr).await;
    let main = store.active_template().expect("active").id;
    let second = store.add_template().await.expect("add template");

    store.remove_template(second.id).await.expect("remove");
    assert_eq!(store.active_template().expect("active").id, main);
    assert_eq!(authority.snapshot().len(), 1);
}
