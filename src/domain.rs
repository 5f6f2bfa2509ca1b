use url::Url;

pub fn has_valid_tld(domain: &str) -> bool {
    if domain.is_empty() || domain.len() < 3 || !domain.contains('.') {
        return false;
    }

    if let Some(last_dot) = domain.rfind('.') {
        if last_dot == domain.len() - 1 {
            return false;
        }
        let tld = &domain[last_dot + 1..];
        tld.len() >= 2
            && tld
                .chars()
                .all(|c| c.is_ascii_lowercase() && c.is_ascii_alphabetic())
    } else {
        false
    }
}

/// Trims and lowercases user input; a pasted URL is reduced to its host.
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        if let Some(host) = Url::parse(trimmed).ok().and_then(|u| u.host_str().map(str::to_string)) {
            return host.to_ascii_lowercase();
        }
    }
    trimmed.trim_end_matches('/').to_ascii_lowercase()
}

/// Portion of `domain` before its first `.`; the whole string if it has none.
pub fn first_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}

/// Splits a comma-separated list, dropping blank entries.
pub fn parse_domain_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_domain)
        .filter(|d| !d.is_empty())
        .collect()
}
