//! Read-only labor-constraint validation.

mod validator;

pub use validator::{annotate, validate, Severity, ValidationReport, Violation, ViolationKind};
