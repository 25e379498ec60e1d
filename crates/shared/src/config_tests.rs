use crate::config::AppConfig;

#[test]
fn test_load_applies_defaults() {
    temp_env::with_vars(
        [
            ("MADRASAH__DATABASE__URL", Some("postgres://localhost/madrasah")),
            ("MADRASAH__QURAN_API__CLIENT_ID", None::<&str>),
            ("MADRASAH__QURAN_API__CLIENT_SECRET", None),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.database.url, "postgres://localhost/madrasah");
            assert_eq!(config.database.max_connections, 10);
            assert_eq!(config.quran_api.content_cache_ttl_secs, 86_400);
            assert_eq!(config.quran_api.token_refresh_margin_secs, 60);
            assert_eq!(config.numbering.max_attempts, 5);
            assert!(!config.quran_api.has_credentials());
        },
    );
}

#[test]
fn test_load_reads_nested_env_overrides() {
    temp_env::with_vars(
        [
            ("MADRASAH__DATABASE__URL", Some("postgres://db/school")),
            ("MADRASAH__QURAN_API__CLIENT_ID", Some("client")),
            ("MADRASAH__QURAN_API__CLIENT_SECRET", Some("secret")),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.quran_api.client_id, "client");
            assert!(config.quran_api.has_credentials());
        },
    );
}

#[test]
fn test_load_fails_without_database_url() {
    temp_env::with_var_unset("MADRASAH__DATABASE__URL", || {
        assert!(AppConfig::load().is_err());
    });
}
