use crate::endpoint::{Endpoint, Scope};
use crate::http::HttpMethod;
use crate::params::{normalize_datetime, ParamRule, Scalar, TypeTag, PAGE, PER_PAGE};

pub static ALL: Endpoint = Endpoint {
    name: "environments.all",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "environments",
    params: &[
        PAGE,
        PER_PAGE,
        ParamRule::optional("name").types(&[TypeTag::String]),
        ParamRule::optional("search").types(&[TypeTag::String]),
        ParamRule::optional("states")
            .types(&[TypeTag::String])
            .values(&[Scalar::Str("available"), Scalar::Str("stopped")]),
    ],
};

pub static CREATE: Endpoint = Endpoint {
    name: "environments.create",
    method: HttpMethod::Post,
    scope: Scope::Project,
    path: "environments",
    params: &[
        ParamRule::required("name").types(&[TypeTag::String]),
        ParamRule::optional("external_url").types(&[TypeTag::String]),
        ParamRule::optional("tier").values(&[
            Scalar::Str("production"),
            Scalar::Str("staging"),
            Scalar::Str("testing"),
            Scalar::Str("development"),
            Scalar::Str("other"),
        ]),
    ],
};

pub static REMOVE: Endpoint = Endpoint {
    name: "environments.remove",
    method: HttpMethod::Delete,
    scope: Scope::Project,
    path: "environments/{environment_id}",
    params: &[],
};

pub static STOP: Endpoint = Endpoint {
    name: "environments.stop",
    method: HttpMethod::Post,
    scope: Scope::Project,
    path: "environments/{environment_id}/stop",
    params: &[],
};

pub static SHOW: Endpoint = Endpoint {
    name: "environments.show",
    method: HttpMethod::Get,
    scope: Scope::Project,
    path: "environments/{environment_id}",
    params: &[],
};

/// Stops environments last modified or deployed to before `before`.
pub static STOP_STALE: Endpoint = Endpoint {
    name: "environments.stop_stale",
    method: HttpMethod::Post,
    scope: Scope::Project,
    path: "environments/stop_stale",
    params: &[ParamRule::required("before")
        .types(&[TypeTag::DateTime])
        .normalize(normalize_datetime)],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::params;
    use crate::params::{ParamValue, Params};
    use chrono::{TimeZone, Utc};

    #[test]
    fn states_are_limited_to_known_values() {
        let err = ALL.resolve(params! { "states" => "deleted" }).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref key, .. } if key == "states"));
        assert!(ALL.resolve(params! { "states" => "stopped" }).is_ok());
    }

    #[test]
    fn tier_has_no_type_but_a_value_set() {
        let err = CREATE
            .resolve(params! { "name" => "review", "tier" => "qa" })
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn stop_stale_requires_a_datetime() {
        let err = STOP_STALE.resolve(Params::new()).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredParameter("before".to_string()));

        let err = STOP_STALE
            .resolve(params! { "before" => "2019-03-15" })
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));

        let before = Utc.with_ymd_and_hms(2019, 3, 15, 8, 0, 0).unwrap();
        let resolved = STOP_STALE.resolve(params! { "before" => before }).unwrap();
        assert_eq!(resolved["before"], ParamValue::from("2019-03-15T08:00:00+00:00"));
    }
}
