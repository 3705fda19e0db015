use serde_json::Value;

use crate::api::merge_requests;
use crate::endpoint::PathArg;
use crate::error::ApiError;
use crate::model::{
    hydrate_as, Entity, Field, File, Milestone, Model, ModelKind, Note, Project, Record, Schema,
    User,
};
use crate::page::Page;
use crate::params;
use crate::params::{ParamValue, Params};
use crate::session::Dispatch;

/// States after which a merge request no longer accepts changes.
const TERMINAL_STATES: &[&str] = &["closed", "merged"];

#[derive(Debug, Clone, PartialEq)]
pub struct MergeRequest(Record);

impl Entity for MergeRequest {
    const SCHEMA: &'static Schema = &Schema {
        model: "MergeRequest",
        identity: Some("iid"),
        fields: &[
            Field::scalar("id"),
            Field::scalar("iid"),
            Field::scalar("target_branch"),
            Field::scalar("source_branch"),
            Field::scalar("project_id"),
            Field::scalar("title"),
            Field::scalar("description"),
            Field::scalar("closed"),
            Field::scalar("merged"),
            Field::object("author", ModelKind::User),
            Field::object("assignee", ModelKind::User),
            Field::context("project"),
            Field::scalar("state"),
            Field::scalar("source_project_id"),
            Field::scalar("target_project_id"),
            Field::scalar("upvotes"),
            Field::scalar("downvotes"),
            Field::scalar("labels"),
            Field::object("milestone", ModelKind::Milestone),
            Field::collection("files", ModelKind::File),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl MergeRequest {
    /// Hydrates a merge request owned by `project`. Nested milestones and
    /// files receive the same project.
    pub fn from_value(project: &Project, raw: &Value) -> Result<Self, ApiError> {
        hydrate_as(raw, Some(&Model::Project(project.clone())))
    }

    pub fn id(&self) -> Option<u64> {
        self.0.attr("id").as_u64()
    }

    pub fn iid(&self) -> Option<u64> {
        self.0.attr("iid").as_u64()
    }

    pub fn title(&self) -> Option<&str> {
        self.0.attr("title").as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.attr("description").as_str()
    }

    pub fn state(&self) -> Option<&str> {
        self.0.attr("state").as_str()
    }

    pub fn source_branch(&self) -> Option<&str> {
        self.0.attr("source_branch").as_str()
    }

    pub fn target_branch(&self) -> Option<&str> {
        self.0.attr("target_branch").as_str()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0
            .attr("labels")
            .as_value()
            .and_then(Value::as_array)
            .map(|labels| labels.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn author(&self) -> Option<&User> {
        self.0.attr("author").as_model()?.as_user()
    }

    pub fn assignee(&self) -> Option<&User> {
        self.0.attr("assignee").as_model()?.as_user()
    }

    pub fn milestone(&self) -> Option<&Milestone> {
        self.0.attr("milestone").as_model()?.as_milestone()
    }

    pub fn project(&self) -> Option<&Project> {
        self.0.attr("project").as_model()?.as_project()
    }

    /// Hydrated file diffs; non-object entries are skipped.
    pub fn files(&self) -> Vec<&File> {
        self.0
            .attr("files")
            .as_list()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_model()?.as_file())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pure read of `state`; never dispatches.
    pub fn is_closed(&self) -> bool {
        self.state()
            .is_some_and(|state| TERMINAL_STATES.contains(&state))
    }

    fn path(&self) -> Result<[PathArg<'static>; 2], ApiError> {
        let project = self
            .project()
            .and_then(Project::id)
            .or_else(|| self.0.resource_id("project_id"))
            .ok_or(ApiError::SchemaMismatch {
                model: "MergeRequest",
                field: "project_id",
            })?;
        let iid = self.0.resource_id("iid").ok_or(ApiError::SchemaMismatch {
            model: "MergeRequest",
            field: "iid",
        })?;
        Ok([("project", project), ("merge_request_iid", iid)])
    }

    /// Hydrates a response into a new instance with this one's parent context.
    fn successor(&self, data: &Value) -> Result<Self, ApiError> {
        hydrate_as(data, self.0.attr("project").as_model())
    }

    pub fn show(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        let data = session.call(&merge_requests::SHOW, &self.path()?, Params::new())?;
        self.successor(&data)
    }

    pub fn update(&self, session: &dyn Dispatch, params: Params) -> Result<Self, ApiError> {
        let data = session.call(&merge_requests::UPDATE, &self.path()?, params)?;
        self.successor(&data)
    }

    /// Closes the merge request, first posting `note` if one is given.
    pub fn close(&self, session: &dyn Dispatch, note: Option<&str>) -> Result<Self, ApiError> {
        if let Some(body) = note {
            self.add_note(session, body)?;
        }
        self.update(session, params! { "state_event" => "close" })
    }

    pub fn reopen(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        self.update(session, params! { "state_event" => "reopen" })
    }

    pub fn merge(&self, session: &dyn Dispatch, message: Option<&str>) -> Result<Self, ApiError> {
        let mut args = Params::new();
        if let Some(message) = message {
            args.insert(
                "merge_commit_message".to_string(),
                ParamValue::from(message),
            );
        }
        let data = session.call(&merge_requests::MERGE, &self.path()?, args)?;
        self.successor(&data)
    }

    /// Fetches the merge request together with its file diffs.
    pub fn changes(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        let data = session.call(&merge_requests::CHANGES, &self.path()?, Params::new())?;
        self.successor(&data)
    }

    pub fn add_note(&self, session: &dyn Dispatch, body: &str) -> Result<Note, ApiError> {
        let data = session.call(
            &merge_requests::ADD_NOTE,
            &self.path()?,
            params! { "body" => body },
        )?;
        Note::from_value(self, &data)
    }

    pub fn notes(&self, session: &dyn Dispatch, params: Params) -> Result<Page<Note>, ApiError> {
        session
            .call_page(&merge_requests::NOTES, &self.path()?, params)?
            .try_map(|raw| Note::from_value(self, &raw))
    }

    pub fn remove(&self, session: &dyn Dispatch) -> Result<(), ApiError> {
        session.call(&merge_requests::REMOVE, &self.path()?, Params::new())?;
        Ok(())
    }
}
