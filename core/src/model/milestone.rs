use serde_json::Value;

use crate::api::milestones;
use crate::endpoint::PathArg;
use crate::error::ApiError;
use crate::model::{hydrate_as, Entity, Field, Model, Project, Record, Schema};
use crate::params;
use crate::params::Params;
use crate::session::Dispatch;

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone(Record);

impl Entity for Milestone {
    const SCHEMA: &'static Schema = &Schema {
        model: "Milestone",
        identity: Some("id"),
        fields: &[
            Field::scalar("id"),
            Field::scalar("iid"),
            Field::context("project"),
            Field::scalar("project_id"),
            Field::scalar("title"),
            Field::scalar("description"),
            Field::scalar("due_date"),
            Field::scalar("start_date"),
            Field::scalar("state"),
            Field::scalar("created_at"),
            Field::scalar("updated_at"),
            Field::scalar("web_url"),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl Milestone {
    pub fn from_value(project: &Project, raw: &Value) -> Result<Self, ApiError> {
        hydrate_as(raw, Some(&Model::Project(project.clone())))
    }

    pub fn id(&self) -> Option<u64> {
        self.0.attr("id").as_u64()
    }

    pub fn title(&self) -> Option<&str> {
        self.0.attr("title").as_str()
    }

    pub fn state(&self) -> Option<&str> {
        self.0.attr("state").as_str()
    }

    pub fn due_date(&self) -> Option<&str> {
        self.0.attr("due_date").as_str()
    }

    pub fn project(&self) -> Option<&Project> {
        self.0.attr("project").as_model()?.as_project()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == Some("closed")
    }

    fn path(&self) -> Result<[PathArg<'static>; 2], ApiError> {
        let project = self
            .project()
            .and_then(Project::id)
            .or_else(|| self.0.resource_id("project_id"))
            .ok_or(ApiError::SchemaMismatch {
                model: "Milestone",
                field: "project_id",
            })?;
        let id = self.0.resource_id("id").ok_or(ApiError::SchemaMismatch {
            model: "Milestone",
            field: "id",
        })?;
        Ok([("project", project), ("milestone_id", id)])
    }

    fn successor(&self, data: &Value) -> Result<Self, ApiError> {
        hydrate_as(data, self.0.attr("project").as_model())
    }

    pub fn show(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        let data = session.call(&milestones::SHOW, &self.path()?, Params::new())?;
        self.successor(&data)
    }

    pub fn update(&self, session: &dyn Dispatch, params: Params) -> Result<Self, ApiError> {
        let data = session.call(&milestones::UPDATE, &self.path()?, params)?;
        self.successor(&data)
    }

    pub fn close(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        self.update(session, params! { "state_event" => "close" })
    }

    pub fn activate(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        self.update(session, params! { "state_event" => "activate" })
    }
}
