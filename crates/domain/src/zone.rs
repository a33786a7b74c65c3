//! Zone name normalization and suffix matching.

use crate::DomainError;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

/// Normalizes an operator-written zone into lower-case FQDN form.
///
/// Accepts the server-block spellings `dns://example.org`, `example.org:53`
/// and `Example.ORG.`, all of which become `example.org.`.
pub fn normalize_zone(raw: &str) -> Result<Arc<str>, DomainError> {
    let mut zone = raw.trim();
    if let Some(rest) = zone.strip_prefix("dns://") {
        zone = rest;
    }
    if let Some((host, port)) = zone.rsplit_once(':') {
        if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
            zone = host;
        }
    }

    if zone.is_empty() {
        return Err(DomainError::InvalidDomainName(format!("empty zone {:?}", raw)));
    }

    let fqdn = to_fqdn(&zone.to_ascii_lowercase());
    validate_name(&fqdn)?;
    Ok(Arc::from(fqdn))
}

/// Appends the root label when missing.
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Checks label and total lengths of a fully-qualified name.
pub fn validate_name(fqdn: &str) -> Result<(), DomainError> {
    if fqdn == "." {
        return Ok(());
    }
    if fqdn.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "{} exceeds {} octets",
            fqdn, MAX_NAME_LEN
        )));
    }
    let body = fqdn.strip_suffix('.').unwrap_or(fqdn);
    for label in body.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "{} contains an empty label",
                fqdn
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label {} in {} exceeds {} octets",
                label, fqdn, MAX_LABEL_LEN
            )));
        }
    }
    Ok(())
}

/// True when `qname` equals `zone` or lies below it. Both must be FQDNs;
/// comparison ignores ASCII case and respects label boundaries, so
/// `badexample.org.` is not inside `example.org.`.
pub fn zone_matches(zone: &str, qname: &str) -> bool {
    if zone == "." {
        return true;
    }
    if qname.len() < zone.len() {
        return false;
    }
    let split = qname.len() - zone.len();
    if !qname.is_char_boundary(split) || !qname[split..].eq_ignore_ascii_case(zone) {
        return false;
    }
    split == 0 || qname.as_bytes()[split - 1] == b'.'
}

/// Most specific zone containing `qname`, if any.
pub fn longest_match<'a>(zones: &'a [Arc<str>], qname: &str) -> Option<&'a Arc<str>> {
    zones
        .iter()
        .filter(|zone| zone_matches(zone, qname))
        .max_by_key(|zone| zone.len())
}
