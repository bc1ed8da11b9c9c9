//! Tests for configuration loading and precedence.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("scopelog_test_{}_{name}", std::process::id()));
    fs::write(&path, contents).expect("write test config");
    path
}

/// Removes the variable when created and again when dropped.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

// ===== Paths =====

#[test]
fn default_config_path_ends_with_scopelog_config_toml() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("scopelog/config.toml"), "got {path:?}");
    }
}

#[test]
fn default_log_path_ends_with_scopelog_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("scopelog.log"),
        "got {path:?}"
    );
}

// ===== Loading =====

#[test]
fn missing_file_is_not_an_error() {
    assert_eq!(load_config_file("/nonexistent/scopelog/config.toml"), Ok(None));
}

#[test]
fn parses_every_field() {
    let path = temp_config(
        "full.toml",
        r#"
bind_address = "0.0.0.0"
port = 5000
log_file_path = "/tmp/scopelog-test.log"
output_format = "json"
read_timeout_secs = 30
poll_interval_ms = 50
"#,
    );

    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(5000));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/scopelog-test.log"))
    );
    assert_eq!(config.output_format, Some(OutputFormat::Json));
    assert_eq!(config.read_timeout_secs, Some(30));
    assert_eq!(config.poll_interval_ms, Some(50));

    fs::remove_file(path).ok();
}

#[test]
fn partial_file_leaves_other_fields_unset() {
    let path = temp_config("partial.toml", "port = 6000\n");

    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(
        config,
        ConfigFile {
            port: Some(6000),
            ..ConfigFile::default()
        }
    );

    fs::remove_file(path).ok();
}

#[test]
fn invalid_toml_is_parse_error() {
    let path = temp_config("invalid.toml", "port = [unclosed\n");

    let result = load_config_file(&path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "got {result:?}"
    );

    fs::remove_file(path).ok();
}

#[test]
fn unknown_keys_are_rejected() {
    let path = temp_config("unknown.toml", "theme = \"dark\"\n");

    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::remove_file(path).ok();
}

#[test]
fn out_of_range_port_is_rejected() {
    let path = temp_config("port.toml", "port = 70000\n");

    assert!(load_config_file(&path).is_err());

    fs::remove_file(path).ok();
}

// ===== Merging =====

#[test]
fn defaults_are_as_documented() {
    let config = ResolvedConfig::default();
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.port, 4445);
    assert_eq!(config.output_format, OutputFormat::Text);
    assert_eq!(config.read_timeout, None);
    assert_eq!(config.poll_interval, Duration::from_millis(200));
    assert_eq!(config.listen_address(), "127.0.0.1:4445");
}

#[test]
fn merge_without_file_is_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_takes_file_values() {
    let file = ConfigFile {
        bind_address: Some("10.0.0.1".to_string()),
        read_timeout_secs: Some(5),
        poll_interval_ms: Some(20),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));
    assert_eq!(resolved.bind_address, "10.0.0.1");
    assert_eq!(resolved.read_timeout, Some(Duration::from_secs(5)));
    assert_eq!(resolved.poll_interval, Duration::from_millis(20));
    assert_eq!(resolved.port, 4445, "unset fields keep defaults");
}

#[test]
fn zero_read_timeout_means_none() {
    let file = ConfigFile {
        read_timeout_secs: Some(0),
        ..ConfigFile::default()
    };
    assert_eq!(merge_config(Some(file)).read_timeout, None);
}

// ===== Environment =====

#[test]
#[serial(scopelog_env)]
fn env_overrides_bind_and_port() {
    let _bind = EnvGuard::new(BIND_ENV);
    let _port = EnvGuard::new(PORT_ENV);
    env::set_var(BIND_ENV, "0.0.0.0");
    env::set_var(PORT_ENV, "7001");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();
    assert_eq!(result.bind_address, "0.0.0.0");
    assert_eq!(result.port, 7001);
    assert_eq!(result.output_format, OutputFormat::Text);
}

#[test]
#[serial(scopelog_env)]
fn env_without_variables_changes_nothing() {
    let _bind = EnvGuard::new(BIND_ENV);
    let _port = EnvGuard::new(PORT_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), Ok(base));
}

#[test]
#[serial(scopelog_env)]
fn env_rejects_non_numeric_port() {
    let _port = EnvGuard::new(PORT_ENV);
    env::set_var(PORT_ENV, "http");

    assert_eq!(
        apply_env_overrides(ResolvedConfig::default()),
        Err(ConfigError::InvalidEnvValue {
            var: PORT_ENV,
            value: "http".to_string(),
        })
    );
}

#[test]
#[serial(scopelog_config)]
fn explicit_path_beats_env_var() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let explicit = temp_config("explicit.toml", "port = 1111\n");
    let from_env = temp_config("env.toml", "port = 2222\n");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(config.port, Some(1111));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(scopelog_config)]
fn env_var_used_without_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let from_env = temp_config("env_only.toml", "port = 3333\n");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.port, Some(3333));

    fs::remove_file(from_env).ok();
}

// ===== CLI =====

#[test]
fn cli_without_flags_changes_nothing() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), CliOverrides::default()), base);
}

#[test]
fn cli_flags_win() {
    let base = ResolvedConfig {
        read_timeout: Some(Duration::from_secs(9)),
        ..ResolvedConfig::default()
    };
    let cli = CliOverrides {
        port: Some(0),
        output_format: Some(OutputFormat::Json),
        read_timeout_secs: Some(0),
        ..CliOverrides::default()
    };

    let resolved = apply_cli_overrides(base, cli);
    assert_eq!(resolved.port, 0);
    assert_eq!(resolved.output_format, OutputFormat::Json);
    assert_eq!(resolved.read_timeout, None);
    assert_eq!(resolved.bind_address, "127.0.0.1");
}

#[test]
#[serial(scopelog_env)]
fn full_chain_orders_sources() {
    // GIVEN a file setting port and format, env setting port, CLI setting format
    let _port = EnvGuard::new(PORT_ENV);
    let _bind = EnvGuard::new(BIND_ENV);
    let file = ConfigFile {
        port: Some(1000),
        output_format: Some(OutputFormat::Json),
        ..ConfigFile::default()
    };
    env::set_var(PORT_ENV, "2000");

    // WHEN the chain is applied
    let resolved = apply_env_overrides(merge_config(Some(file))).unwrap();
    let resolved = apply_cli_overrides(
        resolved,
        CliOverrides {
            output_format: Some(OutputFormat::Text),
            ..CliOverrides::default()
        },
    );

    // THEN each field comes from its highest-precedence source
    assert_eq!(resolved.port, 2000);
    assert_eq!(resolved.output_format, OutputFormat::Text);
}
