use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;

pub static SHOW: Endpoint = Endpoint {
    name: "users.show",
    method: HttpMethod::Get,
    scope: Scope::Global,
    path: "users/{user_id}",
    params: &[],
};
