use serde_yaml::Value;

use crate::errors::ReconError;

/// Substrings never expected in a config value; their presence points to a
/// pasted payload rather than a setting.
const DANGEROUS_PATTERNS: &[&str] = &[
    "<script",
    "javascript:",
    "vbscript:",
    "data:text",
    "file:",
];

/// Keys whose value is an outbound URL; these must be plain http(s).
const URL_KEYS: &[&str] = &["endpoint"];

pub fn validate_security_patterns(value: &Value) -> Result<(), ReconError> {
    let mut leaves = Vec::new();
    collect_strings(value, String::from("root"), &mut leaves);
    leaves
        .into_iter()
        .try_for_each(|(path, text)| check_leaf(&path, text))
}

/// Flatten every string scalar into `(dotted.path, value)`.
fn collect_strings<'a>(value: &'a Value, path: String, out: &mut Vec<(String, &'a str)>) {
    let child = |segment: &str| {
        if path == "root" {
            segment.to_string()
        } else {
            format!("{}.{}", path, segment)
        }
    };
    match value {
        Value::String(s) => out.push((path.clone(), s.as_str())),
        Value::Mapping(map) => {
            for (k, v) in map {
                collect_strings(v, child(k.as_str().unwrap_or("unknown")), out);
            }
        }
        Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                collect_strings(v, child(&format!("[{}]", i)), out);
            }
        }
        Value::Tagged(tagged) => collect_strings(&tagged.value, path.clone(), out),
        _ => {}
    }
}

fn check_leaf(path: &str, text: &str) -> Result<(), ReconError> {
    let lower = text.to_lowercase();
    if let Some(pattern) = DANGEROUS_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ReconError::Config(format!(
            "Dangerous pattern '{}' found at config path: {}",
            pattern, path
        )));
    }

    let key = path.rsplit('.').next().unwrap_or(path);
    if URL_KEYS.contains(&key) && !(lower.starts_with("https://") || lower.starts_with("http://")) {
        return Err(ReconError::Config(format!("Config path {} must be an http(s) URL", path)));
    }
    Ok(())
}
