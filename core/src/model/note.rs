use serde_json::Value;

use crate::error::ApiError;
use crate::model::{hydrate_as, Entity, Field, MergeRequest, Model, ModelKind, Record, Schema, User};

/// A comment attached to a merge request.
#[derive(Debug, Clone, PartialEq)]
pub struct Note(Record);

impl Entity for Note {
    const SCHEMA: &'static Schema = &Schema {
        model: "Note",
        identity: Some("id"),
        fields: &[
            Field::scalar("id"),
            Field::object("author", ModelKind::User),
            Field::scalar("body"),
            Field::scalar("created_at"),
            Field::scalar("updated_at"),
            Field::context("parent"),
            Field::scalar("attachment"),
            Field::scalar("system"),
            Field::scalar("noteable_type"),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl Note {
    pub fn from_value(parent: &MergeRequest, raw: &Value) -> Result<Self, ApiError> {
        hydrate_as(raw, Some(&Model::MergeRequest(parent.clone())))
    }

    pub fn id(&self) -> Option<u64> {
        self.0.attr("id").as_u64()
    }

    pub fn body(&self) -> Option<&str> {
        self.0.attr("body").as_str()
    }

    pub fn author(&self) -> Option<&User> {
        self.0.attr("author").as_model()?.as_user()
    }

    pub fn is_system(&self) -> bool {
        self.0.attr("system").as_bool().unwrap_or(false)
    }

    pub fn parent(&self) -> Option<&MergeRequest> {
        self.0.attr("parent").as_model()?.as_merge_request()
    }
}
