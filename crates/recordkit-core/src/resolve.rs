//! Default resolution: per-field defaults, the global default, and the
//! positional ordering rule.

use crate::{
    decl::NormalizedField,
    default::DefaultArg,
    model::FieldModel,
};
use thiserror::Error as ThisError;

///
/// DefaultError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DefaultError {
    #[error("field {field:?} without a default follows defaulted field {after:?}")]
    DefaultOrderViolation { field: String, after: String },
}

/// Resolve every field's default kind, then enforce that no required field
/// follows a defaulted one.
///
/// An explicit value or factory wins. A bare name or the `NoDefault`
/// sentinel falls back to `global`, and is required when `global` is the
/// sentinel too.
pub fn resolve(
    fields: Vec<NormalizedField>,
    global: &DefaultArg,
) -> Result<Vec<FieldModel>, DefaultError> {
    let global = global.to_kind();

    let resolved: Vec<FieldModel> = fields
        .into_iter()
        .map(|field| {
            let default = field
                .default
                .as_ref()
                .and_then(DefaultArg::to_kind)
                .or_else(|| global.clone())
                .unwrap_or_default();

            FieldModel::new(field.name, default)
        })
        .collect();

    check_order(&resolved)?;

    Ok(resolved)
}

// Once a defaulted field is seen, every later field needs a default.
fn check_order(fields: &[FieldModel]) -> Result<(), DefaultError> {
    let mut defaulted: Option<&str> = None;

    for field in fields {
        match (field.default().is_required(), defaulted) {
            (false, None) => defaulted = Some(field.name()),
            (true, Some(after)) => {
                return Err(DefaultError::DefaultOrderViolation {
                    field: field.name().to_string(),
                    after: after.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(())
}
