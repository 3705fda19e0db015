//! Static descriptors for remote actions.
//!
//! # Design
//! One `Endpoint` value describes one remote action: verb, scope, path
//! template and parameter rules. Resources declare their actions as statics
//! in [`crate::api`]; there is no per-resource type. Templates name their
//! variable segments in braces (`merge_requests/{merge_request_iid}`) and are
//! filled from named path arguments, each segment percent-encoded on its own.

use crate::error::ValidationError;
use crate::http::HttpMethod;
use crate::params::{self, ParamRule, Params};
use crate::path::{encode_segment, project_path, ResourceId};

/// A named path argument.
pub type PathArg<'a> = (&'a str, ResourceId);

/// Whether a template is relative to `projects/{project}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Project,
}

#[derive(Debug)]
pub struct Endpoint {
    /// Dotted name, e.g. `merge_requests.update`.
    pub name: &'static str,
    pub method: HttpMethod,
    pub scope: Scope,
    pub path: &'static str,
    pub params: &'static [ParamRule],
}

impl Endpoint {
    pub fn resolve(&self, args: Params) -> Result<Params, ValidationError> {
        params::resolve(self.params, args)
    }

    /// Renders the relative path. A project-scoped endpoint takes its project
    /// from the `project` argument.
    pub fn render_path(&self, args: &[PathArg<'_>]) -> Result<String, ValidationError> {
        let suffix = fill_template(self.path, args)?;
        match self.scope {
            Scope::Global => Ok(suffix),
            Scope::Project => {
                let project = lookup(args, "project")?;
                Ok(project_path(project, &suffix))
            }
        }
    }
}

fn lookup<'a>(args: &'a [PathArg<'_>], name: &str) -> Result<&'a ResourceId, ValidationError> {
    args.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, id)| id)
        .ok_or_else(|| ValidationError::MissingRequiredParameter(name.to_string()))
}

fn fill_template(template: &str, args: &[PathArg<'_>]) -> Result<String, ValidationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let name = &after[..close];
        out.push_str(&encode_segment(lookup(args, name)?));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
