use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shedquote_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: [(&str, String, Option<&str>); 11] = [
        ("database.url", config.database.url.clone(), Some("SHEDQUOTE_DATABASE_URL")),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            Some("SHEDQUOTE_DATABASE_MAX_CONNECTIONS"),
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            Some("SHEDQUOTE_DATABASE_TIMEOUT_SECS"),
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            Some("SHEDQUOTE_SERVER_BIND_ADDRESS"),
        ),
        ("server.api_port", config.server.api_port.to_string(), Some("SHEDQUOTE_SERVER_API_PORT")),
        (
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            Some("SHEDQUOTE_SERVER_HEALTH_CHECK_PORT"),
        ),
        (
            "uploads.dir",
            config.uploads.dir.display().to_string(),
            Some("SHEDQUOTE_UPLOADS_DIR"),
        ),
        (
            "uploads.max_files",
            config.uploads.max_files.to_string(),
            Some("SHEDQUOTE_UPLOADS_MAX_FILES"),
        ),
        (
            "uploads.max_file_size_bytes",
            config.uploads.max_file_size_bytes.to_string(),
            Some("SHEDQUOTE_UPLOADS_MAX_FILE_SIZE_BYTES"),
        ),
        ("logging.level", config.logging.level.clone(), Some("SHEDQUOTE_LOGGING_LEVEL")),
        ("logging.format", format!("{:?}", config.logging.format).to_lowercase(), Some("SHEDQUOTE_LOGGING_FORMAT")),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_var) in entries {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_var, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  ({source})")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shedquote.toml"), PathBuf::from("config/shedquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_var: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_var) = env_var {
        if env::var(env_var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env: {env_var}");
        }
    }

    if let (Some(doc), Some(path)) = (config_file_doc, config_file_path) {
        if file_has_key(doc, key) {
            return format!("file: {}", path.display());
        }
    }

    "default".to_string()
}

fn file_has_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::file_has_key;

    #[test]
    fn dotted_keys_resolve_into_toml_tables() {
        let doc: Value = r#"
[database]
url = "sqlite://from-file.db"
"#
        .parse()
        .expect("valid toml");

        assert!(file_has_key(&doc, "database.url"));
        assert!(!file_has_key(&doc, "database.max_connections"));
        assert!(!file_has_key(&doc, "server.api_port"));
    }
}
