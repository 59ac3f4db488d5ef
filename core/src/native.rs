//! Native function utilities and helpers
//!
//! Helpers for hosts writing procedures in Rust. Errors produced here are
//! host errors: they surface to the caller of `evaluate` unchanged.

use crate::error::{Error, Result};
use crate::language::{Arguments, Value};

// ============================================================================
// Value Extraction Helpers
// ============================================================================

pub fn extract_string(value: &Value) -> Result<&str> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(type_error("string", value)),
    }
}

pub fn extract_int(value: &Value) -> Result<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        _ => Err(type_error("integer", value)),
    }
}

/// Extract a float from a Value (converting integers if needed)
pub fn extract_float(value: &Value) -> Result<f64> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(x) => Ok(*x),
        _ => Err(type_error("number", value)),
    }
}

pub fn extract_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(type_error("boolean", value)),
    }
}

pub fn extract_list(value: &Value) -> Result<&[Value]> {
    match value {
        Value::List(items) => Ok(items),
        _ => Err(type_error("list", value)),
    }
}

fn type_error(expected: &str, got: &Value) -> Error {
    Error::host(format!("expected {expected}, got {} {got}", got.type_name()))
}

// ============================================================================
// Argument Checking Helpers
// ============================================================================

/// Check that the number of positional arguments is exactly n
pub fn check_arity_exact(name: &str, args: &Arguments, expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::host(format!(
            "{name}: expected {expected} argument{}, got {}",
            if expected == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

pub fn check_arity_min(name: &str, args: &Arguments, min: usize) -> Result<()> {
    if args.len() < min {
        return Err(Error::host(format!(
            "{name}: expected at least {min} argument{}, got {}",
            if min == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

pub fn check_arity_range(name: &str, args: &Arguments, min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(Error::host(format!(
            "{name}: expected {min}-{max} arguments, got {}",
            args.len()
        )));
    }
    Ok(())
}

/// Reject keyword arguments outside `allowed`
pub fn check_keywords(name: &str, args: &Arguments, allowed: &[&str]) -> Result<()> {
    let mut unknown: Vec<&str> = args
        .keywords
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(Error::host(format!(
        "{name}: unexpected keyword argument{} {}",
        if unknown.len() == 1 { "" } else { "s" },
        unknown.join(", ")
    )))
}
