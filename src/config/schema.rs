use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "api_key": { "type": "string" },
            "wordlist": { "type": "string" },
            "probe": {
                "type": "object",
                "properties": {
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "follow_redirects": { "type": "boolean" },
                    "max_redirects": { "type": "integer", "minimum": 0 },
                    "user_agent": { "type": "string" },
                    "accept_invalid_certs": { "type": "boolean" }
                }
            },
            "scan": {
                "type": "object",
                "properties": {
                    "batch_size": { "type": "integer", "minimum": 1 },
                    "liveness_concurrency": { "type": "integer", "minimum": 1 },
                    "host_concurrency": { "type": "integer", "minimum": 1 },
                    "randomize_order": { "type": "boolean" },
                    "skip_previously_scanned": { "type": "boolean" }
                }
            },
            "subdomains": {
                "type": "object",
                "properties": {
                    "endpoint": { "type": "string", "format": "uri" },
                    "threshold": { "type": "integer", "minimum": 1 },
                    "recent_window_days": { "type": "integer", "minimum": 1 },
                    "denylist": { "type": "array", "items": { "type": "string" } },
                    "max_retries": { "type": "integer", "minimum": 0 }
                }
            },
            "storage": {
                "type": "object",
                "properties": {
                    "database": { "type": "string" },
                    "max_history": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
});
