use super::*;

const CONFIG_VARS: [&str; 4] = [
    "BISTRO_API_BASE_URL",
    "BISTRO_REQUEST_TIMEOUT_SECS",
    "BISTRO_CONNECT_TIMEOUT_SECS",
    "BISTRO_DOWNLOAD_DIR",
];

/// # Safety
/// Only `from_env_defaults_then_overrides` touches the `BISTRO_*` variables.
unsafe fn clear_config_env() {
    for var in CONFIG_VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_defaults_then_overrides() {
    unsafe { clear_config_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);

    unsafe {
        std::env::set_var("BISTRO_API_BASE_URL", "https://admin.example.test/api/");
        std::env::set_var("BISTRO_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("BISTRO_CONNECT_TIMEOUT_SECS", " 2 ");
        std::env::set_var("BISTRO_DOWNLOAD_DIR", "/tmp/exports");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://admin.example.test/api");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.download_dir, PathBuf::from("/tmp/exports"));

    unsafe { std::env::set_var("BISTRO_REQUEST_TIMEOUT_SECS", "soon") };
    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("BISTRO_REQUEST_TIMEOUT_SECS"));

    unsafe {
        std::env::remove_var("BISTRO_REQUEST_TIMEOUT_SECS");
        std::env::set_var("BISTRO_API_BASE_URL", "ftp://nope");
    }
    assert!(matches!(ClientConfig::from_env(), Err(ConfigError::InvalidBaseUrl(_))));

    unsafe { clear_config_env() };
}

#[test]
fn base_url_trims_trailing_slashes() {
    let cfg = ClientConfig::default().with_base_url("http://127.0.0.1:5000/api///").unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:5000/api");
}

#[test]
fn base_url_requires_host() {
    assert!(ClientConfig::default().with_base_url("https://").is_err());
    assert!(ClientConfig::default().with_base_url("localhost:5000").is_err());
}

#[test]
fn env_parse_falls_back_when_unset() {
    assert_eq!(env_parse_u64("__BISTRO_TEST_SURELY_UNSET_311__", 17).unwrap(), 17);
}
