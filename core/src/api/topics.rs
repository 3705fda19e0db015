use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{normalize_bool, ParamRule, TypeTag, PAGE, PER_PAGE};

pub static ALL: Endpoint = Endpoint {
    name: "topics.all",
    method: HttpMethod::Get,
    scope: Scope::Global,
    path: "topics",
    params: &[
        PAGE,
        PER_PAGE,
        ParamRule::optional("without_projects")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
        ParamRule::optional("search"),
    ],
};
