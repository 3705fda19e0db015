use crate::api::users;
use crate::error::ApiError;
use crate::model::{hydrate_as, Entity, Field, Record, Schema};
use crate::params::Params;
use crate::session::Dispatch;

#[derive(Debug, Clone, PartialEq)]
pub struct User(Record);

impl Entity for User {
    const SCHEMA: &'static Schema = &Schema {
        model: "User",
        identity: Some("id"),
        fields: &[
            Field::scalar("id"),
            Field::scalar("username"),
            Field::scalar("email"),
            Field::scalar("name"),
            Field::scalar("bio"),
            Field::scalar("website_url"),
            Field::scalar("state"),
            Field::scalar("created_at"),
            Field::scalar("avatar_url"),
            Field::scalar("web_url"),
            Field::scalar("is_admin"),
            Field::scalar("can_create_group"),
            Field::scalar("can_create_project"),
            Field::scalar("two_factor_enabled"),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl User {
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, ApiError> {
        hydrate_as(raw, None)
    }

    pub fn id(&self) -> Option<u64> {
        self.0.attr("id").as_u64()
    }

    pub fn username(&self) -> Option<&str> {
        self.0.attr("username").as_str()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.attr("name").as_str()
    }

    pub fn email(&self) -> Option<&str> {
        self.0.attr("email").as_str()
    }

    pub fn state(&self) -> Option<&str> {
        self.0.attr("state").as_str()
    }

    pub fn is_admin(&self) -> bool {
        self.0.attr("is_admin").as_bool().unwrap_or(false)
    }

    pub fn show(&self, session: &dyn Dispatch) -> Result<Self, ApiError> {
        let id = self.0.resource_id("id").ok_or(ApiError::SchemaMismatch {
            model: "User",
            field: "id",
        })?;
        let data = session.call(&users::SHOW, &[("user_id", id)], Params::new())?;
        Self::from_value(&data)
    }
}
