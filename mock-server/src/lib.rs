//! In-memory stand-in for a small slice of the GitLab v4 REST API.
//!
//! One project (`id` 1, path `group/project`) is seeded at startup; it can be
//! addressed by id or by its percent-encoded path. Merge requests, notes and
//! registry tags live in memory. List routes honour `page`/`per_page` and
//! answer with the `x-page` family of headers.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const PROJECT_ID: u64 = 1;
pub const PROJECT_PATH: &str = "group/project";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub source_branch: String,
    pub target_branch: String,
    pub author: User,
    pub labels: Vec<String>,
    pub milestone: Option<Value>,
    pub merge_commit_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
    pub author: User,
    pub system: bool,
}

#[derive(Deserialize)]
pub struct CreateMergeRequest {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    /// Comma-separated, the way the client sends label lists.
    pub labels: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct UpdateMergeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state_event: Option<String>,
    pub labels: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct MergeOptions {
    pub merge_commit_message: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateNote {
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
    pub id: u64,
    pub name: String,
    pub external_url: Option<String>,
    pub state: String,
}

#[derive(Deserialize)]
pub struct CreateEnvironment {
    pub name: String,
    pub external_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub merge_requests: Vec<MergeRequest>,
    pub notes: HashMap<u64, Vec<Note>>,
    pub environments: Vec<Environment>,
    next_id: u64,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn merge_request_mut(&mut self, iid: u64) -> Result<&mut MergeRequest, Failure> {
        self.merge_requests
            .iter_mut()
            .find(|mr| mr.iid == iid)
            .ok_or_else(not_found)
    }

    fn environment_mut(&mut self, id: u64) -> Result<&mut Environment, Failure> {
        self.environments
            .iter_mut()
            .find(|env| env.id == id)
            .ok_or_else(not_found)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode) -> Failure {
    (status, Json(json!({ "message": status.to_string() })))
}

fn not_found() -> Failure {
    failure(StatusCode::NOT_FOUND)
}

fn root_user() -> User {
    User {
        id: 1,
        username: "root".to_string(),
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/projects/{project}", get(show_project))
        .route(
            "/projects/{project}/merge_requests",
            get(list_merge_requests).post(create_merge_request),
        )
        .route(
            "/projects/{project}/merge_requests/{iid}",
            get(show_merge_request)
                .put(update_merge_request)
                .delete(delete_merge_request),
        )
        .route(
            "/projects/{project}/merge_requests/{iid}/merge",
            put(merge_merge_request),
        )
        .route(
            "/projects/{project}/merge_requests/{iid}/changes",
            get(merge_request_changes),
        )
        .route(
            "/projects/{project}/merge_requests/{iid}/notes",
            get(list_notes).post(create_note),
        )
        .route(
            "/projects/{project}/environments",
            get(list_environments).post(create_environment),
        )
        .route(
            "/projects/{project}/environments/{environment_id}",
            get(show_environment).delete(delete_environment),
        )
        .route(
            "/projects/{project}/environments/{environment_id}/stop",
            post(stop_environment),
        )
        .route(
            "/projects/{project}/registry/repositories/{repository_id}/tags/{tag_name}",
            get(show_tag),
        )
        .with_state(db);
    Router::new().nest("/api/v4", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Accepts the project's numeric id or its `namespace/project` path.
fn check_project(project: &str) -> Result<(), Failure> {
    if project == PROJECT_ID.to_string() || project == PROJECT_PATH {
        Ok(())
    } else {
        Err(not_found())
    }
}

/// Decodes an optional JSON body; an empty body yields the default.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Failure> {
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|_| failure(StatusCode::BAD_REQUEST))
}

fn query_number(query: &HashMap<String, String>, key: &str, default: usize) -> usize {
    query
        .get(key)
        .and_then(|value| value.parse().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn paginate<T: Clone + Serialize>(
    items: &[T],
    query: &HashMap<String, String>,
) -> (HeaderMap, Json<Vec<T>>) {
    let page = query_number(query, "page", 1);
    let per_page = query_number(query, "per_page", 20).min(100);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let slice: Vec<T> = items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    let mut headers = HeaderMap::new();
    let mut set = |name: &'static str, value: HeaderValue| {
        headers.insert(HeaderName::from_static(name), value);
    };
    set("x-page", HeaderValue::from(page));
    set("x-per-page", HeaderValue::from(per_page));
    set("x-total", HeaderValue::from(items.len()));
    set("x-total-pages", HeaderValue::from(total_pages));
    set(
        "x-next-page",
        if page < total_pages {
            HeaderValue::from(page + 1)
        } else {
            HeaderValue::from_static("")
        },
    );
    set(
        "x-prev-page",
        if page > 1 {
            HeaderValue::from(page - 1)
        } else {
            HeaderValue::from_static("")
        },
    );
    (headers, Json(slice))
}

fn split_labels(labels: Option<String>) -> Vec<String> {
    labels
        .map(|labels| {
            labels
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

async fn show_project(Path(project): Path<String>) -> Result<Json<Value>, Failure> {
    check_project(&project)?;
    Ok(Json(json!({
        "id": PROJECT_ID,
        "name": "project",
        "path": "project",
        "path_with_namespace": PROJECT_PATH,
        "default_branch": "main",
        "owner": root_user(),
        "star_count": 0,
        "_links": { "self": format!("/api/v4/projects/{PROJECT_ID}") }
    })))
}

async fn list_merge_requests(
    State(db): State<Db>,
    Path(project): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<MergeRequest>>), Failure> {
    check_project(&project)?;
    let store = db.read().await;
    let matching: Vec<MergeRequest> = store
        .merge_requests
        .iter()
        .filter(|mr| match query.get("state").map(String::as_str) {
            None | Some("all") => true,
            Some(state) => mr.state == state,
        })
        .cloned()
        .collect();
    Ok(paginate(&matching, &query))
}

async fn create_merge_request(
    State(db): State<Db>,
    Path(project): Path<String>,
    Json(input): Json<CreateMergeRequest>,
) -> Result<(StatusCode, Json<MergeRequest>), Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    let id = store.next_id();
    let iid = store.merge_requests.len() as u64 + 1;
    let mr = MergeRequest {
        id,
        iid,
        project_id: PROJECT_ID,
        title: input.title,
        description: input.description,
        state: "opened".to_string(),
        source_branch: input.source_branch,
        target_branch: input.target_branch,
        author: root_user(),
        labels: split_labels(input.labels),
        milestone: None,
        merge_commit_message: None,
    };
    store.merge_requests.push(mr.clone());
    Ok((StatusCode::CREATED, Json(mr)))
}

async fn show_merge_request(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
) -> Result<Json<MergeRequest>, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    Ok(Json(store.merge_request_mut(iid)?.clone()))
}

async fn update_merge_request(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
    body: Bytes,
) -> Result<Json<MergeRequest>, Failure> {
    check_project(&project)?;
    let input: UpdateMergeRequest = optional_body(&body)?;
    let mut store = db.write().await;
    let mr = store.merge_request_mut(iid)?;
    if let Some(title) = input.title {
        mr.title = title;
    }
    if let Some(description) = input.description {
        mr.description = Some(description);
    }
    if input.labels.is_some() {
        mr.labels = split_labels(input.labels);
    }
    match (input.state_event.as_deref(), mr.state.as_str()) {
        (Some("close"), "opened") => mr.state = "closed".to_string(),
        (Some("reopen"), "closed") => mr.state = "opened".to_string(),
        _ => {}
    }
    Ok(Json(mr.clone()))
}

async fn delete_merge_request(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
) -> Result<StatusCode, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    let before = store.merge_requests.len();
    store.merge_requests.retain(|mr| mr.iid != iid);
    if store.merge_requests.len() == before {
        return Err(not_found());
    }
    store.notes.remove(&iid);
    Ok(StatusCode::NO_CONTENT)
}

async fn merge_merge_request(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
    body: Bytes,
) -> Result<Json<MergeRequest>, Failure> {
    check_project(&project)?;
    let input: MergeOptions = optional_body(&body)?;
    let mut store = db.write().await;
    let mr = store.merge_request_mut(iid)?;
    if mr.state != "opened" {
        return Err(failure(StatusCode::METHOD_NOT_ALLOWED));
    }
    mr.state = "merged".to_string();
    mr.merge_commit_message = input.merge_commit_message;
    Ok(Json(mr.clone()))
}

async fn merge_request_changes(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
) -> Result<Json<Value>, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    let mr = store.merge_request_mut(iid)?;
    let mut payload =
        serde_json::to_value(&*mr).map_err(|_| failure(StatusCode::INTERNAL_SERVER_ERROR))?;
    payload["changes_count"] = json!("1");
    payload["files"] = json!([{
        "old_path": "README.md",
        "new_path": "README.md",
        "a_mode": "100644",
        "b_mode": "100644",
        "diff": "@@ -1 +1 @@\n-old\n+new\n",
        "new_file": false,
        "renamed_file": false,
        "deleted_file": false
    }]);
    Ok(Json(payload))
}

async fn list_notes(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<Note>>), Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    store.merge_request_mut(iid)?;
    let notes = store.notes.get(&iid).cloned().unwrap_or_default();
    Ok(paginate(&notes, &query))
}

async fn create_note(
    State(db): State<Db>,
    Path((project, iid)): Path<(String, u64)>,
    Json(input): Json<CreateNote>,
) -> Result<(StatusCode, Json<Note>), Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    store.merge_request_mut(iid)?;
    let note = Note {
        id: store.next_id(),
        body: input.body,
        author: root_user(),
        system: false,
    };
    store.notes.entry(iid).or_default().push(note.clone());
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_environments(
    State(db): State<Db>,
    Path(project): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<Environment>>), Failure> {
    check_project(&project)?;
    let store = db.read().await;
    let matching: Vec<Environment> = store
        .environments
        .iter()
        .filter(|env| query.get("name").map_or(true, |name| &env.name == name))
        .filter(|env| query.get("states").map_or(true, |state| &env.state == state))
        .cloned()
        .collect();
    Ok(paginate(&matching, &query))
}

async fn create_environment(
    State(db): State<Db>,
    Path(project): Path<String>,
    Json(input): Json<CreateEnvironment>,
) -> Result<(StatusCode, Json<Environment>), Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    if store.environments.iter().any(|env| env.name == input.name) {
        return Err(failure(StatusCode::BAD_REQUEST));
    }
    let env = Environment {
        id: store.next_id(),
        name: input.name,
        external_url: input.external_url,
        state: "available".to_string(),
    };
    store.environments.push(env.clone());
    Ok((StatusCode::CREATED, Json(env)))
}

async fn show_environment(
    State(db): State<Db>,
    Path((project, id)): Path<(String, u64)>,
) -> Result<Json<Environment>, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    Ok(Json(store.environment_mut(id)?.clone()))
}

async fn stop_environment(
    State(db): State<Db>,
    Path((project, id)): Path<(String, u64)>,
) -> Result<Json<Environment>, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    let env = store.environment_mut(id)?;
    env.state = "stopped".to_string();
    Ok(Json(env.clone()))
}

/// Only stopped environments can be deleted.
async fn delete_environment(
    State(db): State<Db>,
    Path((project, id)): Path<(String, u64)>,
) -> Result<StatusCode, Failure> {
    check_project(&project)?;
    let mut store = db.write().await;
    if store.environment_mut(id)?.state != "stopped" {
        return Err(failure(StatusCode::FORBIDDEN));
    }
    store.environments.retain(|env| env.id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn show_tag(
    Path((project, repository_id, tag_name)): Path<(String, u64, String)>,
) -> Result<Json<Value>, Failure> {
    check_project(&project)?;
    Ok(Json(json!({
        "name": tag_name,
        "path": format!("{PROJECT_PATH}:{tag_name}"),
        "location": format!("registry.example.com/{PROJECT_PATH}/{repository_id}:{tag_name}")
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_request_serializes_gitlab_fields() {
        let mr = MergeRequest {
            id: 10,
            iid: 1,
            project_id: PROJECT_ID,
            title: "Test".to_string(),
            description: None,
            state: "opened".to_string(),
            source_branch: "feature".to_string(),
            target_branch: "main".to_string(),
            author: root_user(),
            labels: vec!["bug".to_string()],
            milestone: None,
            merge_commit_message: None,
        };
        let json = serde_json::to_value(&mr).unwrap();
        assert_eq!(json["iid"], 1);
        assert_eq!(json["author"]["username"], "root");
        assert!(json["milestone"].is_null());
    }

    #[test]
    fn create_merge_request_requires_branches_and_title() {
        let result: Result<CreateMergeRequest, _> =
            serde_json::from_str(r#"{"source_branch":"a","title":"t"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_merge_request_all_fields_optional() {
        let input: UpdateMergeRequest = serde_json::from_str("{}").unwrap();
        assert!(input.state_event.is_none());
        assert!(input.title.is_none());
    }

    #[test]
    fn labels_split_on_commas() {
        assert_eq!(
            split_labels(Some("bug, ui,,".to_string())),
            vec!["bug".to_string(), "ui".to_string()]
        );
        assert!(split_labels(None).is_empty());
    }

    #[test]
    fn empty_body_decodes_to_default() {
        let options: MergeOptions = optional_body(&Bytes::new()).unwrap();
        assert!(options.merge_commit_message.is_none());
        let bad: Result<MergeOptions, _> = optional_body(&Bytes::from_static(b"{"));
        assert!(bad.is_err());
    }

    #[test]
    fn paginate_reports_next_and_previous_pages() {
        let items: Vec<u32> = (1..=5).collect();
        let query = HashMap::from([
            ("page".to_string(), "2".to_string()),
            ("per_page".to_string(), "2".to_string()),
        ]);
        let (headers, Json(page)) = paginate(&items, &query);
        assert_eq!(page, vec![3, 4]);
        assert_eq!(headers["x-next-page"], "3");
        assert_eq!(headers["x-prev-page"], "1");
        assert_eq!(headers["x-total-pages"], "3");
    }

    #[test]
    fn project_is_addressable_by_id_or_path() {
        assert!(check_project("1").is_ok());
        assert!(check_project("group/project").is_ok());
        assert!(check_project("other").is_err());
    }
}
