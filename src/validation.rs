use std::collections::HashSet;
use std::net::IpAddr;

use regex::Regex;

use crate::zone::ZoneDesiredState;
use crate::zone::names::normalize;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("zone name '{0}' must end with '.'")]
    ZoneNotFullyQualified(String),
    #[error("name '{0}' contains an empty label")]
    EmptyLabel(String),
    #[error("label '{0}' too long (max 63 characters)")]
    LabelTooLong(String),
    #[error("label '{0}' contains invalid characters (only letters, digits, '-' and '_' allowed)")]
    InvalidCharacters(String),
    #[error("at least one nameserver is required")]
    NoNameservers,
    #[error("nameserver {0} is listed more than once")]
    DuplicateNameserver(String),
    #[error("'{0}' is not a valid IPv4 or IPv6 address")]
    InvalidAddress(String),
    #[error("SOA rname is empty")]
    EmptyRname,
}

lazy_static::lazy_static! {
    /// Letters, digits, '-' and '_' (service labels)
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.len() > 63 {
        return Err(ValidationError::LabelTooLong(label.to_string()));
    }
    if !LABEL_RE.is_match(label) {
        return Err(ValidationError::InvalidCharacters(label.to_string()));
    }
    Ok(())
}

/// Check every label of a relative or dot-terminated name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let d = name.strip_suffix('.').unwrap_or(name);
    for label in d.split('.') {
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel(name.to_string()));
        }
        validate_label(label)?;
    }
    Ok(())
}

/// Schema checks the engine relies on but does not repeat.
pub fn validate_zone(zone: &ZoneDesiredState) -> Result<(), ValidationError> {
    if !zone.name.ends_with('.') {
        return Err(ValidationError::ZoneNotFullyQualified(zone.name.clone()));
    }
    validate_name(&zone.name)?;

    if zone.nameservers.is_empty() {
        return Err(ValidationError::NoNameservers);
    }

    let mut seen = HashSet::new();
    for ns in &zone.nameservers {
        validate_name(&ns.hostname)?;
        let fqdn = normalize(&ns.hostname, &zone.name);
        if !seen.insert(fqdn.clone()) {
            return Err(ValidationError::DuplicateNameserver(fqdn));
        }
        if ns.address.parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidAddress(ns.address.clone()));
        }
    }

    if zone.soa.rname.is_empty() {
        return Err(ValidationError::EmptyRname);
    }
    validate_name(&zone.soa.rname)?;

    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
