//! The endpoint catalog: one static [`Endpoint`] per remote action.
//!
//! Each resource module declares its actions as statics named after the
//! action (`merge_requests::UPDATE`). [`find`] looks them up by dotted name.

pub mod environments;
pub mod merge_requests;
pub mod milestones;
pub mod projects;
pub mod registry;
pub mod resource_events;
pub mod topics;
pub mod users;

use crate::endpoint::Endpoint;

pub static ALL: &[&Endpoint] = &[
    &projects::SHOW,
    &merge_requests::ALL,
    &merge_requests::SHOW,
    &merge_requests::CREATE,
    &merge_requests::UPDATE,
    &merge_requests::MERGE,
    &merge_requests::CHANGES,
    &merge_requests::NOTES,
    &merge_requests::ADD_NOTE,
    &merge_requests::REMOVE,
    &milestones::SHOW,
    &milestones::UPDATE,
    &users::SHOW,
    &environments::ALL,
    &environments::CREATE,
    &environments::REMOVE,
    &environments::STOP,
    &environments::SHOW,
    &environments::STOP_STALE,
    &registry::REPOSITORIES,
    &registry::REPOSITORY_TAGS,
    &registry::REPOSITORY_TAG,
    &registry::REMOVE_REPOSITORY_TAG,
    &registry::REMOVE_REPOSITORY_TAGS,
    &topics::ALL,
    &resource_events::LABEL_EVENTS,
    &resource_events::LABEL_EVENT,
    &resource_events::STATE_EVENTS,
    &resource_events::STATE_EVENT,
];

pub fn find(name: &str) -> Option<&'static Endpoint> {
    ALL.iter().copied().find(|endpoint| endpoint.name == name)
}
