use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Second-level labels that behave like public suffixes (`example.co.uk`).
const SLD_TOKENS: &[&str] = &["co", "com", "org", "net", "gov", "edu", "io"];

static LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]([a-z0-9_-]*[a-z0-9_])?$").unwrap());

/// Extract the bare, lower-cased hostname from a URL or hostname.
///
/// Falls back to naive splitting when the input does not parse as a URL.
pub fn extract_host(input: &str) -> Option<String> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.clone()
    } else {
        format!("https://{}", trimmed)
    };

    let host = match Url::parse(&with_scheme) {
        Ok(url) => url.host_str().map(|h| h.trim_matches(|c| c == '[' || c == ']').to_string()),
        Err(_) => None,
    }
    .unwrap_or_else(|| naive_host(&trimmed));

    let host = host.trim_end_matches('.').to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

fn naive_host(input: &str) -> String {
    let after_scheme = input.rsplit("://").next().unwrap_or(input);
    let authority = after_scheme
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or(after_scheme);
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    authority.split(':').next().unwrap_or(authority).to_string()
}

/// Collapse a URL or hostname to its registrable root domain.
///
/// Keeps the last three labels when the second-level label is a common
/// public-suffix-like token and there are more than two labels, otherwise the
/// last two. IP addresses are returned unchanged. Returns `None` when no
/// usable hostname can be recovered.
pub fn get_root_domain(input: &str) -> Option<String> {
    let host = extract_host(input)?;

    if host.parse::<IpAddr>().is_ok() {
        return Some(host);
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() || !labels.iter().all(|l| LABEL_REGEX.is_match(l)) {
        return None;
    }

    let n = labels.len();
    let keep = if n > 2 && SLD_TOKENS.contains(&labels[n - 2]) { 3 } else { 2 };
    Some(labels[n.saturating_sub(keep)..].join("."))
}

/// `https://` URL for `host` plus `path`. IPv6 literals are bracketed.
pub fn https_url(host: &str, path: &str) -> String {
    if host.parse::<std::net::Ipv6Addr>().is_ok() {
        format!("https://[{}]{}", host, path)
    } else {
        format!("https://{}{}", host, path)
    }
}

/// Whether `candidate` is `root` itself or one of its subdomains.
pub fn is_within(candidate: &str, root: &str) -> bool {
    candidate == root || candidate.ends_with(&format!(".{}", root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_url_brackets_ipv6() {
        let root = get_root_domain("http://[::1]:8080/admin").unwrap();
        assert_eq!(root, "::1");
        assert_eq!(https_url(&root, "/.env"), "https://[::1]/.env");
        assert!(url::Url::parse(&https_url(&root, "")).is_ok());
        assert_eq!(https_url("192.0.2.7", "/x"), "https://192.0.2.7/x");
        assert_eq!(https_url("example.com", ""), "https://example.com");
    }

    #[test]
    fn test_root_domain_keeps_three_labels_for_sld_token() {
        assert_eq!(get_root_domain("https://a.b.example.co.uk").as_deref(), Some("example.co.uk"));
        assert_eq!(get_root_domain("portal.agency.gov.au").as_deref(), Some("agency.gov.au"));
    }

    #[test]
    fn test_root_domain_two_labels() {
        assert_eq!(get_root_domain("sub.example.com").as_deref(), Some("example.com"));
        assert_eq!(get_root_domain("example.com").as_deref(), Some("example.com"));
        assert_eq!(get_root_domain("deep.nested.sub.example.org").as_deref(), Some("example.org"));
    }

    #[test]
    fn test_root_domain_strips_scheme_path_port_and_case() {
        assert_eq!(
            get_root_domain("HTTPS://Shop.Example.COM:8443/cart?id=1#top").as_deref(),
            Some("example.com")
        );
        assert_eq!(get_root_domain("example.com/admin/").as_deref(), Some("example.com"));
        assert_eq!(get_root_domain("www.example.com.").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_root_domain_is_idempotent() {
        for input in [
            "https://a.b.example.co.uk",
            "sub.example.com",
            "example.com",
            "x.y.startup.io",
            "localhost",
            "http://10.0.0.1/login",
        ] {
            let once = get_root_domain(input).unwrap();
            assert_eq!(get_root_domain(&once).as_deref(), Some(once.as_str()), "input {input}");
        }
    }

    #[test]
    fn test_root_domain_ip_passthrough() {
        assert_eq!(get_root_domain("http://192.168.1.10:8080/").as_deref(), Some("192.168.1.10"));
    }

    #[test]
    fn test_root_domain_rejects_garbage() {
        assert_eq!(get_root_domain(""), None);
        assert_eq!(get_root_domain("   "), None);
        assert_eq!(get_root_domain("exa mple.com"), None);
    }

    #[test]
    fn test_extract_host_naive_fallback() {
        assert_eq!(naive_host("ht!tp://user@host.example.com:99/x"), "host.example.com");
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("example.com", "example.com"));
        assert!(is_within("api.example.com", "example.com"));
        assert!(!is_within("badexample.com", "example.com"));
    }
}
