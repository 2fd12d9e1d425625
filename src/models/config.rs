use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where uploaded post images end up.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageStorageConfig {
    /// Base64 data URI kept inside the `posts.image` column.
    #[default]
    Inline,
    /// Files written to `path` and served from `public_url`.
    Directory { path: String, public_url: String },
}

/// Configuration options for the posts service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Cookie signing key, at least 64 bytes.
    pub secret: String,
    pub templates_dir: String,
    /// Login and logout are handled by this external service.
    pub auth_service_url: String,
    #[serde(default)]
    pub image_storage: ImageStorageConfig,
}

impl ServerConfig {
    /// Reads `config/default.yaml`, then `config/<app_env>.yaml` if present,
    /// then `APP__*` environment variables.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        Self::load_from("config", app_env)
    }

    pub fn load_from(config_dir: &str, app_env: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/default")))
            .add_source(File::with_name(&format!("{config_dir}/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DEFAULTS: &str = r#"
domain: localhost
address: 127.0.0.1
port: 8080
database_url: app.db
secret: "0123456789012345678901234567890123456789012345678901234567890123"
templates_dir: templates
auth_service_url: http://localhost:8081
"#;

    #[test]
    fn image_storage_defaults_to_inline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), DEFAULTS).unwrap();

        let config = ServerConfig::load_from(dir.path().to_str().unwrap(), "missing").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.image_storage, ImageStorageConfig::Inline);
    }

    #[test]
    fn environment_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), DEFAULTS).unwrap();
        fs::write(
            dir.path().join("prod.yaml"),
            "port: 80\nimage_storage:\n  kind: directory\n  path: /var/uploads\n  public_url: /uploads\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(dir.path().to_str().unwrap(), "prod").unwrap();

        assert_eq!(config.port, 80);
        assert_eq!(
            config.image_storage,
            ImageStorageConfig::Directory {
                path: "/var/uploads".to_string(),
                public_url: "/uploads".to_string(),
            }
        );
    }
}
