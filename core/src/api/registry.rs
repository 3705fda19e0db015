//! Container registry repositories and tags.

use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{normalize_bool, ParamRule, TypeTag, PAGE, PER_PAGE};

pub static REPOSITORIES: Endpoint = Endpoint {
    name: "registry.repositories",
    method: HttpMethod::Get,
    scope: Scope::Global,
    path: "registry/repositories/{repository_id}",
    params: &[
        ParamRule::optional("tags")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
        ParamRule::optional("tags_count")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
        ParamRule::optional("size")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
        PAGE,
        PER_PAGE,
    ],
};

pub static REPOSITORY_TAGS: Endpoint = Endpoint {
    name: "registry.repository_tags",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "registry/repositories/{repository_id}/tags",
    params: &[],
};

pub static REPOSITORY_TAG: Endpoint = Endpoint {
    name: "registry.repository_tag",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "registry/repositories/{repository_id}/tags/{tag_name}",
    params: &[],
};

pub static REMOVE_REPOSITORY_TAG: Endpoint = Endpoint {
    name: "registry.remove_repository_tag",
    method: HttpMethod::Delete,
    scope: Scope::Project,
    path: "registry/repositories/{repository_id}/tags/{tag_name}",
    params: &[],
};

/// Bulk deletion by name pattern.
pub static REMOVE_REPOSITORY_TAGS: Endpoint = Endpoint {
    name: "registry.remove_repository_tags",
    method: HttpMethod::Delete,
    scope: Scope::Project,
    path: "registry/repositories/{repository_id}/tags",
    params: &[
        ParamRule::required("name_regex_delete").types(&[TypeTag::String]),
        ParamRule::optional("name_regex_keep").types(&[TypeTag::String]),
        ParamRule::optional("keep_n").types(&[TypeTag::Int]),
        ParamRule::optional("older_than").types(&[TypeTag::String]),
        PAGE,
        PER_PAGE,
    ],
};
