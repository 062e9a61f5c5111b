//! Catalog validation.
//!
//! Runs the same structural checks `register()` applies to every catalog
//! entry, plus checks that only make sense across the whole catalog.

use crate::error::ValidationError;
use crate::registry::{AdminModule, validate_module};
use std::collections::HashMap;
use std::fmt;

/// A data-quality issue that does not prevent loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Several modules share one route.
    DuplicateRoute { route: String, ids: Vec<String> },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRoute { route, ids } => {
                write!(f, "route '{route}' is shared by {}", ids.join(", "))
            }
        }
    }
}

/// Validate a module catalog, returning all errors found.
pub fn validate(modules: &[AdminModule]) -> Result<Vec<ConfigWarning>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    for module in modules {
        if let Err(e) = validate_module(module) {
            errors.push(e);
        }
    }

    // Ids must be unique across the whole catalog, not just within one entry.
    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    let mut routes: Vec<(&str, &str)> = Vec::new();
    for module in modules {
        collect(module, &mut id_counts, &mut routes);
    }
    let mut duplicated: Vec<&str> = id_counts
        .iter()
        .filter(|(id, count)| **count > 1 && !id.trim().is_empty())
        .map(|(id, _)| *id)
        .collect();
    duplicated.sort_unstable();
    for id in duplicated {
        let already_reported = errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateId(dup) if dup == id));
        if !already_reported {
            errors.push(ValidationError::DuplicateId(id.to_string()));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(route_warnings(&routes))
}

fn collect<'a>(
    module: &'a AdminModule,
    ids: &mut HashMap<&'a str, usize>,
    routes: &mut Vec<(&'a str, &'a str)>,
) {
    *ids.entry(module.id.as_str()).or_default() += 1;
    routes.push((module.route.as_str(), module.id.as_str()));
    for child in &module.sub_modules {
        collect(child, ids, routes);
    }
}

fn route_warnings(routes: &[(&str, &str)]) -> Vec<ConfigWarning> {
    let mut by_route: Vec<(&str, Vec<String>)> = Vec::new();
    for &(route, id) in routes {
        match by_route.iter().position(|(r, _)| *r == route) {
            Some(index) => by_route[index].1.push(id.to_string()),
            None => by_route.push((route, vec![id.to_string()])),
        }
    }
    by_route
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(route, ids)| ConfigWarning::DuplicateRoute {
            route: route.to_string(),
            ids,
        })
        .collect()
}
