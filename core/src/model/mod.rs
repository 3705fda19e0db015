//! Immutable domain objects hydrated from response payloads.
//!
//! # Design
//! Each model type declares a const [`Schema`]: its name, the identity field
//! used to address it, and the whitelist of fields with a directive per
//! field (plain value, nested object, nested collection, or parent context).
//! [`hydrate`] copies whitelisted fields out of a raw JSON map, recursing
//! into nested objects, and silently drops everything else so payloads may
//! grow without breaking the client. Request parameters are the opposite:
//! closed and strict.
//!
//! A hydrated [`Record`] is never mutated. Methods that change server state
//! take an explicit `&dyn Dispatch`, issue the request, and hydrate a fresh
//! successor from the response.

mod file;
mod merge_request;
mod milestone;
mod note;
mod project;
mod user;

pub use file::File;
pub use merge_request::MergeRequest;
pub use milestone::Milestone;
pub use note::Note;
pub use project::Project;
pub use user::User;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::error::ApiError;
use crate::path::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    User,
    Project,
    Milestone,
    File,
    Note,
    MergeRequest,
}

/// How a whitelisted field is hydrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Copied as decoded JSON.
    Scalar,
    /// A nested map hydrated as the given model.
    Object(ModelKind),
    /// An array whose map elements are hydrated as the given model; other
    /// elements are kept as-is.
    Collection(ModelKind),
    /// Filled from the parent context rather than the payload.
    Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn object(name: &'static str, model: ModelKind) -> Self {
        Self {
            name,
            kind: FieldKind::Object(model),
        }
    }

    pub const fn collection(name: &'static str, model: ModelKind) -> Self {
        Self {
            name,
            kind: FieldKind::Collection(model),
        }
    }

    pub const fn context(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Context,
        }
    }
}

/// The property whitelist of one model type.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub model: &'static str,
    /// Field that must be present for the object to be addressable.
    pub identity: Option<&'static str>,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn context_field(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|field| field.kind == FieldKind::Context)
            .map(|field| field.name)
    }
}

/// The value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Whitelisted but absent (or `null` in the payload).
    Empty,
    Value(Value),
    Model(Model),
    List(Vec<Attr>),
}

static EMPTY: Attr = Attr::Empty;

impl Attr {
    pub fn is_empty(&self) -> bool {
        matches!(self, Attr::Empty)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attr::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value()?.as_str()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_value()?.as_u64()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value()?.as_i64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value()?.as_bool()
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Attr::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Attr]> {
        match self {
            Attr::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        Attr::Value(value)
    }
}

impl From<Model> for Attr {
    fn from(model: Model) -> Self {
        Attr::Model(model)
    }
}

/// A schema-checked, read-only field map.
#[derive(Clone, PartialEq)]
pub struct Record {
    schema: &'static Schema,
    fields: BTreeMap<&'static str, Attr>,
}

impl Record {
    pub(crate) fn from_fields(
        schema: &'static Schema,
        fields: impl IntoIterator<Item = (&'static str, Attr)>,
    ) -> Self {
        Self {
            schema,
            fields: fields
                .into_iter()
                .filter(|(name, _)| schema.field(name).is_some())
                .collect(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Reads a field. Names outside the whitelist are rejected; whitelisted
    /// names that were never set read as [`Attr::Empty`].
    pub fn get(&self, name: &str) -> Result<&Attr, ApiError> {
        if self.schema.field(name).is_none() {
            return Err(ApiError::UnknownProperty {
                model: self.schema.model,
                property: name.to_string(),
            });
        }
        Ok(self.attr(name))
    }

    /// Always fails: records are immutable once hydrated.
    pub fn set(&self, name: &str, _value: impl Into<Attr>) -> Result<(), ApiError> {
        Err(ApiError::ImmutableWrite {
            model: self.schema.model,
            property: name.to_string(),
        })
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn data(&self) -> &BTreeMap<&'static str, Attr> {
        &self.fields
    }

    pub(crate) fn attr(&self, name: &str) -> &Attr {
        self.fields.get(name).unwrap_or(&EMPTY)
    }

    pub(crate) fn resource_id(&self, name: &str) -> Option<ResourceId> {
        ResourceId::from_json(self.attr(name).as_value()?)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

/// Any hydrated domain object.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    User(User),
    Project(Project),
    Milestone(Milestone),
    File(File),
    Note(Note),
    MergeRequest(MergeRequest),
}

impl Model {
    pub fn hydrate(kind: ModelKind, raw: &Value, context: Option<&Model>) -> Result<Self, ApiError> {
        Ok(match kind {
            ModelKind::User => Model::User(hydrate_as(raw, context)?),
            ModelKind::Project => Model::Project(hydrate_as(raw, context)?),
            ModelKind::Milestone => Model::Milestone(hydrate_as(raw, context)?),
            ModelKind::File => Model::File(hydrate_as(raw, context)?),
            ModelKind::Note => Model::Note(hydrate_as(raw, context)?),
            ModelKind::MergeRequest => Model::MergeRequest(hydrate_as(raw, context)?),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::User(_) => ModelKind::User,
            Model::Project(_) => ModelKind::Project,
            Model::Milestone(_) => ModelKind::Milestone,
            Model::File(_) => ModelKind::File,
            Model::Note(_) => ModelKind::Note,
            Model::MergeRequest(_) => ModelKind::MergeRequest,
        }
    }

    pub fn record(&self) -> &Record {
        match self {
            Model::User(model) => model.record(),
            Model::Project(model) => model.record(),
            Model::Milestone(model) => model.record(),
            Model::File(model) => model.record(),
            Model::Note(model) => model.record(),
            Model::MergeRequest(model) => model.record(),
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Model::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Model::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn as_milestone(&self) -> Option<&Milestone> {
        match self {
            Model::Milestone(milestone) => Some(milestone),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Model::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_merge_request(&self) -> Option<&MergeRequest> {
        match self {
            Model::MergeRequest(merge_request) => Some(merge_request),
            _ => None,
        }
    }
}

/// A typed model backed by a [`Record`].
pub trait Entity: Sized {
    const SCHEMA: &'static Schema;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn get(&self, name: &str) -> Result<&Attr, ApiError> {
        self.record().get(name)
    }

    fn set(&self, name: &str, value: impl Into<Attr>) -> Result<(), ApiError> {
        self.record().set(name, value)
    }

    fn is_set(&self, name: &str) -> bool {
        self.record().is_set(name)
    }
}

pub fn hydrate_as<T: Entity>(raw: &Value, context: Option<&Model>) -> Result<T, ApiError> {
    hydrate(T::SCHEMA, raw, context).map(T::from_record)
}

/// Builds a record from a raw payload.
///
/// Fails only when the schema's identity field is missing or `null`. A
/// non-object payload hydrates as an empty map.
pub fn hydrate(
    schema: &'static Schema,
    raw: &Value,
    context: Option<&Model>,
) -> Result<Record, ApiError> {
    let empty = serde_json::Map::new();
    let map = raw.as_object().unwrap_or(&empty);

    if let Some(identity) = schema.identity {
        if map.get(identity).map_or(true, Value::is_null) {
            return Err(ApiError::SchemaMismatch {
                model: schema.model,
                field: identity,
            });
        }
    }

    let mut fields = BTreeMap::new();
    for (name, value) in map {
        let Some(field) = schema.field(name) else {
            trace!(model = schema.model, field = %name, "dropping field outside whitelist");
            continue;
        };
        if value.is_null() {
            continue;
        }
        let attr = match field.kind {
            FieldKind::Scalar => Attr::Value(value.clone()),
            FieldKind::Object(kind) => nested(kind, value, context)?,
            FieldKind::Collection(kind) => match value {
                Value::Array(items) => Attr::List(
                    items
                        .iter()
                        .map(|item| nested(kind, item, context))
                        .collect::<Result<_, _>>()?,
                ),
                other => Attr::Value(other.clone()),
            },
            FieldKind::Context => continue,
        };
        fields.insert(field.name, attr);
    }

    if let (Some(name), Some(parent)) = (schema.context_field(), context) {
        fields.insert(name, Attr::Model(parent.clone()));
    }

    Ok(Record { schema, fields })
}

fn nested(kind: ModelKind, value: &Value, context: Option<&Model>) -> Result<Attr, ApiError> {
    match value {
        Value::Object(_) => Model::hydrate(kind, value, context).map(Attr::Model),
        other => Ok(Attr::Value(other.clone())),
    }
}
