//! Structural validation for modules before they reach the store.
//!
//! [`validate_module`] checks an already-typed [`AdminModule`] tree.
//! [`module_from_value`] accepts loosely typed JSON, as submitted by plugins or
//! an HTTP layer, and checks every field's type on the way in.

use super::module::{AdminModule, Settings};
use crate::error::{UNNAMED_MODULE, ValidationError};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validate `module` and every sub-module. Ids must be unique within the tree.
pub fn validate_module(module: &AdminModule) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    validate_node(module, &mut seen)
}

fn validate_node<'a>(
    module: &'a AdminModule,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ValidationError> {
    let label = label_for(&module.id);

    require_text(&module.id, "id", label)?;
    require_text(&module.name, "name", label)?;
    require_text(&module.route, "route", label)?;

    match module.component.as_deref() {
        None => {
            return Err(ValidationError::MissingField {
                module: label.to_string(),
                field: "component",
            });
        }
        Some(component) => require_text(component, "component", label)?,
    }

    if !seen.insert(module.id.as_str()) {
        return Err(ValidationError::DuplicateId(module.id.clone()));
    }

    for child in &module.sub_modules {
        validate_node(child, seen)?;
    }
    Ok(())
}

fn require_text(value: &str, field: &'static str, module: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField {
            module: module.to_string(),
            field,
        });
    }
    Ok(())
}

fn label_for(id: &str) -> &str {
    if id.trim().is_empty() { UNNAMED_MODULE } else { id }
}

/// Build a validated [`AdminModule`] from untyped JSON.
pub fn module_from_value(value: &Value) -> Result<AdminModule, ValidationError> {
    let module = parse_node(value)?;
    validate_module(&module)?;
    Ok(module)
}

fn parse_node(value: &Value) -> Result<AdminModule, ValidationError> {
    let Some(obj) = value.as_object() else {
        return Err(ValidationError::InvalidType {
            module: UNNAMED_MODULE.to_string(),
            field: "module",
            expected: "an object",
        });
    };

    let label = obj
        .get("id")
        .and_then(Value::as_str)
        .map(label_for)
        .unwrap_or(UNNAMED_MODULE)
        .to_string();
    let fields = Fields { obj, label: &label };

    let id = fields.string("id")?;
    let name = fields.string("name")?;
    let route = fields.string("route")?;
    let permissions = fields.string_array("permissions")?;
    let enabled = fields.boolean("enabled")?;
    let order = fields.integer("order")?;
    let component = Some(fields.string("component")?);
    let icon = fields.optional_string("icon")?;
    let settings = fields.optional_object("settings")?;

    let children = match obj.get("subModules").or_else(|| obj.get("sub_modules")) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(parse_node).collect::<Result<_, _>>()?,
        Some(_) => return Err(fields.invalid("subModules", "an array of modules")),
    };

    Ok(AdminModule {
        id,
        name,
        icon,
        route,
        component,
        permissions,
        enabled,
        order,
        settings,
        sub_modules: children,
    })
}

/// Typed field accessors over one JSON object.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    label: &'a str,
}

impl Fields<'_> {
    fn required(&self, field: &'static str) -> Result<&Value, ValidationError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Err(ValidationError::MissingField {
                module: self.label.to_string(),
                field,
            }),
            Some(value) => Ok(value),
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> ValidationError {
        ValidationError::InvalidType {
            module: self.label.to_string(),
            field,
            expected,
        }
    }

    fn string(&self, field: &'static str) -> Result<String, ValidationError> {
        self.required(field)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn optional_string(&self, field: &'static str) -> Result<Option<String>, ValidationError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(field, "a string")),
        }
    }

    fn boolean(&self, field: &'static str) -> Result<bool, ValidationError> {
        self.required(field)?
            .as_bool()
            .ok_or_else(|| self.invalid(field, "a boolean"))
    }

    fn integer(&self, field: &'static str) -> Result<i32, ValidationError> {
        let value = self.required(field)?;
        let Some(number) = value.as_f64() else {
            return Err(self.invalid(field, "a number"));
        };
        // Accept 3 and 3.0 alike; reject fractions and out-of-range values.
        if number.fract() != 0.0 || number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
            return Err(self.invalid(field, "an integer"));
        }
        Ok(number as i32)
    }

    fn string_array(&self, field: &'static str) -> Result<Vec<String>, ValidationError> {
        let Some(items) = self.required(field)?.as_array() else {
            return Err(self.invalid(field, "an array"));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.invalid(field, "an array of strings"))
            })
            .collect()
    }

    fn optional_object(&self, field: &'static str) -> Result<Option<Settings>, ValidationError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(_) => Err(self.invalid(field, "an object")),
        }
    }
}
