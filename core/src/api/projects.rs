use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{normalize_bool, ParamRule, TypeTag};

pub static SHOW: Endpoint = Endpoint {
    name: "projects.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "",
    params: &[
        ParamRule::optional("statistics")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
        ParamRule::optional("with_custom_attributes")
            .types(&[TypeTag::Bool])
            .normalize(normalize_bool),
    ],
};
