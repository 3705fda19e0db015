//! Label and state change events on issues.

use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;

pub static LABEL_EVENTS: Endpoint = Endpoint {
    name: "resource_label_events.all",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "issues/{issue_iid}/resource_label_events",
    params: &[],
};

pub static LABEL_EVENT: Endpoint = Endpoint {
    name: "resource_label_events.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "issues/{issue_iid}/resource_label_events/{event_id}",
    params: &[],
};

pub static STATE_EVENTS: Endpoint = Endpoint {
    name: "resource_state_events.all",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "issues/{issue_iid}/resource_state_events",
    params: &[],
};

pub static STATE_EVENT: Endpoint = Endpoint {
    name: "resource_state_events.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "issues/{issue_iid}/resource_state_events/{event_id}",
    params: &[],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::params;

    #[test]
    fn event_lists_take_no_parameters() {
        for endpoint in [&LABEL_EVENTS, &STATE_EVENTS] {
            let err = endpoint.resolve(params! { "page" => 2 }).unwrap_err();
            assert_eq!(err, ValidationError::UnknownParameter("page".to_string()));
            assert!(endpoint.resolve(params! {}).unwrap().is_empty());
        }
    }
}
