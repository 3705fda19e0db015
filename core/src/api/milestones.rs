use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{ParamRule, Scalar, TypeTag};

pub static SHOW: Endpoint = Endpoint {
    name: "milestones.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "milestones/{milestone_id}",
    params: &[],
};

pub static UPDATE: Endpoint = Endpoint {
    name: "milestones.update",
    method: HttpMethod::Put,
    scope: Scope::Project,
    path: "milestones/{milestone_id}",
    params: &[
        ParamRule::optional("title").types(&[TypeTag::String]),
        ParamRule::optional("description").types(&[TypeTag::String]),
        ParamRule::optional("due_date").types(&[TypeTag::String]),
        ParamRule::optional("start_date").types(&[TypeTag::String]),
        ParamRule::optional("state_event")
            .types(&[TypeTag::String])
            .values(&[Scalar::Str("close"), Scalar::Str("activate")]),
    ],
};
