use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for overrides, e.g. `DIAFLOW_TOOLS__JAVA=/usr/bin/java`.
const ENV_PREFIX: &str = "DIAFLOW_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file when it exists, built-in defaults otherwise.
/// Environment overrides apply in both cases.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn env_provider() -> Env {
    // `DIAFLOW_CONFIG` names the file itself and is not a key.
    Env::prefixed(ENV_PREFIX)
        .ignore(&["CONFIG"])
        .split("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[deconvolution]
max_memory = "4G"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.deconvolution.max_memory, "4G");
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let result = load_config_from_str("[search]\ntiers = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/diaflow.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default(Path::new("/nonexistent/diaflow.toml")).unwrap();
        assert_eq!(config.parameters.database, PathBuf::from("database.fasta"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[workspace]
root = "/data/experiment"

[tools]
search_gui = "/opt/SearchGUI.jar"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.workspace.root, PathBuf::from("/data/experiment"));
        assert_eq!(config.tools.search_gui, PathBuf::from("/opt/SearchGUI.jar"));
        // untouched keys keep their defaults
        assert_eq!(config.tools.java, PathBuf::from("java"));
    }
}
