use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            },
            "storage": {
                "type": "object",
                "properties": {
                    "database_path": { "type": "string" },
                    "images_dir": { "type": "string" },
                    "screenshots_dir": { "type": "string" }
                }
            },
            "browser": {
                "type": "object",
                "properties": {
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "headless": { "type": "boolean" },
                    "max_screenshot_width": { "type": "integer", "minimum": 1 },
                    "max_screenshot_height": { "type": "integer", "minimum": 1 }
                }
            },
            "classifier": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string" },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "confidence_threshold": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                    "skip_duplicates": { "type": "boolean" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "gateway": {
                "type": "object",
                "properties": {
                    "account_sid": { "type": "string" },
                    "auth_token": { "type": "string" },
                    "from_number": { "type": "string" },
                    "debug_trigger": { "type": "string" }
                }
            }
        }
    })
});
