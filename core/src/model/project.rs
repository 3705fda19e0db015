use serde_json::Value;

use crate::api::{merge_requests, milestones, projects};
use crate::endpoint::PathArg;
use crate::error::ApiError;
use crate::model::{hydrate_as, Attr, Entity, Field, MergeRequest, Milestone, ModelKind, Record, Schema, User};
use crate::page::Page;
use crate::params::{ParamValue, Params};
use crate::path::ResourceId;
use crate::session::Dispatch;

/// A project, the parent context of merge requests and milestones.
#[derive(Debug, Clone, PartialEq)]
pub struct Project(Record);

impl Entity for Project {
    const SCHEMA: &'static Schema = &Schema {
        model: "Project",
        identity: Some("id"),
        fields: &[
            Field::scalar("id"),
            Field::scalar("name"),
            Field::scalar("path"),
            Field::scalar("path_with_namespace"),
            Field::scalar("description"),
            Field::scalar("default_branch"),
            Field::scalar("visibility"),
            Field::scalar("web_url"),
            Field::scalar("ssh_url_to_repo"),
            Field::scalar("http_url_to_repo"),
            Field::object("owner", ModelKind::User),
            Field::scalar("namespace"),
            Field::scalar("archived"),
            Field::scalar("created_at"),
            Field::scalar("last_activity_at"),
            Field::scalar("star_count"),
            Field::scalar("forks_count"),
            Field::scalar("open_issues_count"),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl Project {
    /// A project known only by its id or `namespace/project` path.
    pub fn new(id: impl Into<ResourceId>) -> Self {
        let id = id.into();
        Self(Record::from_fields(
            Self::SCHEMA,
            [("id", Attr::Value(id.to_json()))],
        ))
    }

    pub fn from_value(raw: &Value) -> Result<Self, ApiError> {
        hydrate_as(raw, None)
    }

    pub fn id(&self) -> Option<ResourceId> {
        self.0.resource_id("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.attr("name").as_str()
    }

    pub fn path_with_namespace(&self) -> Option<&str> {
        self.0.attr("path_with_namespace").as_str()
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.0.attr("default_branch").as_str()
    }

    pub fn owner(&self) -> Option<&User> {
        self.0.attr("owner").as_model()?.as_user()
    }

    pub(crate) fn scope(&self) -> Result<PathArg<'static>, ApiError> {
        let id = self.id().ok_or(ApiError::SchemaMismatch {
            model: "Project",
            field: "id",
        })?;
        Ok(("project", id))
    }

    pub fn show(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        let data = session.call(&projects::SHOW, &[self.scope()?], Params::new())?;
        Self::from_value(&data)
    }

    pub fn merge_request(&self, session: &dyn Dispatch, iid: u64) -> Result<MergeRequest, ApiError> {
        let path = [self.scope()?, ("merge_request_iid", ResourceId::from(iid))];
        let data = session.call(&merge_requests::SHOW, &path, Params::new())?;
        MergeRequest::from_value(self, &data)
    }

    pub fn merge_requests(
        &self,
        session: &dyn Dispatch,
        params: Params,
    ) -> Result<Page<MergeRequest>, ApiError> {
        session
            .call_page(&merge_requests::ALL, &[self.scope()?], params)?
            .try_map(|raw| MergeRequest::from_value(self, &raw))
    }

    pub fn create_merge_request(
        &self,
        session: &dyn Dispatch,
        source: &str,
        target: &str,
        title: &str,
        mut params: Params,
    ) -> Result<MergeRequest, ApiError> {
        params.insert("source_branch".to_string(), ParamValue::from(source));
        params.insert("target_branch".to_string(), ParamValue::from(target));
        params.insert("title".to_string(), ParamValue::from(title));
        let data = session.call(&merge_requests::CREATE, &[self.scope()?], params)?;
        MergeRequest::from_value(self, &data)
    }

    pub fn milestone(&self, session: &dyn Dispatch, id: u64) -> Result<Milestone, ApiError> {
        let path = [self.scope()?, ("milestone_id", ResourceId::from(id))];
        let data = session.call(&milestones::SHOW, &path, Params::new())?;
        Milestone::from_value(self, &data)
    }
}
