//! Merge request actions, all scoped to a project.

use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{
    normalize_bool, normalize_csv, normalize_datetime, ParamRule, Scalar, TypeTag, PAGE, PER_PAGE,
};

const LABELS: ParamRule = ParamRule::optional("labels")
    .types(&[TypeTag::String, TypeTag::Array])
    .normalize(normalize_csv);

const fn flag(name: &'static str) -> ParamRule {
    ParamRule::optional(name)
        .types(&[TypeTag::Bool])
        .normalize(normalize_bool)
}

const fn instant(name: &'static str) -> ParamRule {
    ParamRule::optional(name)
        .types(&[TypeTag::DateTime])
        .normalize(normalize_datetime)
}

pub static ALL: Endpoint = Endpoint {
    name: "merge_requests.all",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "merge_requests",
    params: &[
        PAGE,
        PER_PAGE,
        ParamRule::optional("iids").types(&[TypeTag::Array]),
        ParamRule::optional("state").values(&[
            Scalar::Str("all"),
            Scalar::Str("opened"),
            Scalar::Str("merged"),
            Scalar::Str("closed"),
            Scalar::Str("locked"),
        ]),
        ParamRule::optional("scope").values(&[
            Scalar::Str("created_by_me"),
            Scalar::Str("assigned_to_me"),
            Scalar::Str("all"),
        ]),
        ParamRule::optional("order_by").values(&[Scalar::Str("created_at"), Scalar::Str("updated_at")]),
        ParamRule::optional("sort").values(&[Scalar::Str("asc"), Scalar::Str("desc")]),
        ParamRule::optional("milestone").types(&[TypeTag::String]),
        ParamRule::optional("view").values(&[Scalar::Str("simple")]),
        LABELS,
        flag("with_labels_details"),
        instant("created_after"),
        instant("created_before"),
        instant("updated_after"),
        instant("updated_before"),
        ParamRule::optional("author_id").types(&[TypeTag::Int]),
        ParamRule::optional("assignee_id").types(&[TypeTag::Int]),
        ParamRule::optional("source_branch").types(&[TypeTag::String]),
        ParamRule::optional("target_branch").types(&[TypeTag::String]),
        ParamRule::optional("search").types(&[TypeTag::String]),
    ],
};

pub static SHOW: Endpoint = Endpoint {
    name: "merge_requests.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}",
    params: &[
        flag("include_diverged_commits_count"),
        flag("include_rebase_in_progress"),
    ],
};

pub static CREATE: Endpoint = Endpoint {
    name: "merge_requests.create",
    method: HttpMethod::Post,
    scope: Scope::Project,
    path: "merge_requests",
    params: &[
        ParamRule::required("source_branch").types(&[TypeTag::String]),
        ParamRule::required("target_branch").types(&[TypeTag::String]),
        ParamRule::required("title").types(&[TypeTag::String]),
        ParamRule::optional("description").types(&[TypeTag::String]),
        ParamRule::optional("assignee_id").types(&[TypeTag::Int]),
        ParamRule::optional("target_project_id").types(&[TypeTag::Int]),
        ParamRule::optional("milestone_id").types(&[TypeTag::Int]),
        LABELS,
        flag("remove_source_branch"),
        flag("squash"),
    ],
};

pub static UPDATE: Endpoint = Endpoint {
    name: "merge_requests.update",
    method: HttpMethod::Put,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}",
    params: &[
        ParamRule::optional("title").types(&[TypeTag::String]),
        ParamRule::optional("description").types(&[TypeTag::String]),
        ParamRule::optional("target_branch").types(&[TypeTag::String]),
        ParamRule::optional("assignee_id").types(&[TypeTag::Int]),
        ParamRule::optional("milestone_id").types(&[TypeTag::Int]),
        ParamRule::optional("state_event")
            .types(&[TypeTag::String])
            .values(&[Scalar::Str("close"), Scalar::Str("reopen")]),
        LABELS,
        flag("remove_source_branch"),
        flag("squash"),
        flag("discussion_locked"),
    ],
};

pub static MERGE: Endpoint = Endpoint {
    name: "merge_requests.merge",
    method: HttpMethod::Put,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}/merge",
    params: &[
        ParamRule::optional("merge_commit_message").types(&[TypeTag::String]),
        ParamRule::optional("squash_commit_message").types(&[TypeTag::String]),
        ParamRule::optional("sha").types(&[TypeTag::String]),
        flag("squash"),
        flag("should_remove_source_branch"),
        flag("merge_when_pipeline_succeeds"),
    ],
};

pub static CHANGES: Endpoint = Endpoint {
    name: "merge_requests.changes",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}/changes",
    params: &[],
};

pub static NOTES: Endpoint = Endpoint {
    name: "merge_requests.notes",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}/notes",
    params: &[
        PAGE,
        PER_PAGE,
        ParamRule::optional("order_by").values(&[Scalar::Str("created_at"), Scalar::Str("updated_at")]),
        ParamRule::optional("sort").values(&[Scalar::Str("asc"), Scalar::Str("desc")]),
    ],
};

pub static ADD_NOTE: Endpoint = Endpoint {
    name: "merge_requests.add_note",
    method: HttpMethod::Post,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}/notes",
    params: &[
        ParamRule::required("body").types(&[TypeTag::String]),
        instant("created_at"),
    ],
};

pub static REMOVE: Endpoint = Endpoint {
    name: "merge_requests.remove",
    method: HttpMethod::Delete,
    scope: Scope::Project,
    path: "merge_requests/{merge_request_iid}",
    params: &[],
};
