// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use std::path::PathBuf;

use figment::Jail;
use pharmacy_auth::config::Settings;

#[test]
fn test_load_config_from_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "pharmacy-auth.toml",
            r#"
            data_dir = "test_data"
            log_level = "debug"

            [lockout]
            max_attempts = 3
            "#,
        )?;

        let settings = Settings::load().expect("settings should load");
        assert_eq!(settings.data_dir, PathBuf::from("test_data"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.lockout.max_attempts, 3);
        // unset keys keep their defaults
        assert_eq!(settings.lockout.lockout_secs, 900);
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "log_level = \"debug\"")?;
        jail.set_env("PHARMACY_LOG_LEVEL", "warn");
        jail.set_env("PHARMACY_LOCKOUT__LOCKOUT_SECS", "60");

        let settings = Settings::load_from("custom.toml").expect("settings should load");
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.lockout.lockout_secs, 60);
        Ok(())
    });
}

#[test]
fn test_missing_file_uses_defaults() {
    Jail::expect_with(|_jail| {
        let settings = Settings::load().expect("defaults should load");
        assert_eq!(settings, Settings::default());
        Ok(())
    });
}

#[test]
fn test_invalid_values_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.create_file("pharmacy-auth.toml", "[lockout]\nmax_attempts = 0")?;
        assert!(Settings::load().is_err());
        Ok(())
    });
}
