//! Validation rules for query and request payloads.

pub mod rules;
