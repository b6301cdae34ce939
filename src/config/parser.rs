use std::path::Path;
use crate::errors::ReconError;
use super::types::ReconConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<ReconConfig, ReconError> {
    if !path.exists() {
        return Err(ReconError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ReconError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<ReconConfig, ReconError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(ReconConfig::default());
    }

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: ReconConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema. Advisory: violations are logged,
/// typed parsing and semantic checks decide what is fatal.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ReconError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| ReconError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ReconError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &ReconConfig) -> Result<(), ReconError> {
    if let Some(scan) = &config.scan {
        if scan.batch_size == 0 {
            return Err(ReconError::Config("scan.batch_size must be at least 1".into()));
        }
        if scan.liveness_concurrency == 0 || scan.host_concurrency == 0 {
            return Err(ReconError::Config("scan concurrency values must be at least 1".into()));
        }
    }

    if let Some(sub) = &config.subdomains {
        if sub.threshold == 0 {
            return Err(ReconError::Config("subdomains.threshold must be at least 1".into()));
        }
        if sub.denylist.iter().any(|d| d.trim().is_empty()) {
            warn!("Empty entry in subdomains.denylist ignored");
        }
    }

    if let Some(probe) = &config.probe {
        if probe.timeout_secs == 0 {
            return Err(ReconError::Config("probe.timeout_secs must be at least 1".into()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_str(
            "api_key: abc123\n\
             scan:\n  batch_size: 5\n  randomize_order: true\n\
             subdomains:\n  threshold: 25\n  denylist: [www, dev]\n\
             storage:\n  max_history: 10\n",
        ).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.scan().batch_size, 5);
        assert!(config.scan().randomize_order);
        assert_eq!(config.subdomains().threshold, 25);
        assert_eq!(config.subdomains().denylist, vec!["www", "dev"]);
        assert_eq!(config.storage().max_history, 10);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config_str("").unwrap();
        assert!(config.scan.is_none());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = parse_config_str("scan:\n  batch_size: 0\n").unwrap_err();
        assert!(matches!(err, ReconError::Config(_)));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(parse_config_str("subdomains:\n  threshold: 0\n").is_err());
    }

    #[test]
    fn test_dangerous_value_rejected() {
        assert!(parse_config_str("probe:\n  user_agent: '<script>x</script>'\n").is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/reconnoiter.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.yaml");
        tokio::fs::write(&path, "probe:\n  timeout_secs: 3\n").await.unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.probe().timeout_secs, 3);
    }
}
