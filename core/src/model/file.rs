use crate::model::{Entity, Field, Project, Record, Schema};

/// One file diff of a merge request.
#[derive(Debug, Clone, PartialEq)]
pub struct File(Record);

impl Entity for File {
    const SCHEMA: &'static Schema = &Schema {
        model: "File",
        identity: None,
        fields: &[
            Field::context("project"),
            Field::scalar("old_path"),
            Field::scalar("new_path"),
            Field::scalar("a_mode"),
            Field::scalar("b_mode"),
            Field::scalar("diff"),
            Field::scalar("new_file"),
            Field::scalar("renamed_file"),
            Field::scalar("deleted_file"),
        ],
    };

    fn from_record(record: Record) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }
}

impl File {
    pub fn project(&self) -> Option<&Project> {
        self.0.attr("project").as_model()?.as_project()
    }

    pub fn old_path(&self) -> Option<&str> {
        self.0.attr("old_path").as_str()
    }

    pub fn new_path(&self) -> Option<&str> {
        self.0.attr("new_path").as_str()
    }

    pub fn diff(&self) -> Option<&str> {
        self.0.attr("diff").as_str()
    }

    pub fn is_new(&self) -> bool {
        self.0.attr("new_file").as_bool().unwrap_or(false)
    }

    pub fn is_renamed(&self) -> bool {
        self.0.attr("renamed_file").as_bool().unwrap_or(false)
    }

    pub fn is_deleted(&self) -> bool {
        self.0.attr("deleted_file").as_bool().unwrap_or(false)
    }
}
