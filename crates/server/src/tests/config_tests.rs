use super::{apply_file_overrides, normalize_database_url, Settings};

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn memory_url_is_kept_verbatim() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
}

#[test]
fn bare_sqlite_prefix_becomes_url() {
    assert_eq!(
        normalize_database_url(r"sqlite:data\test.db"),
        "sqlite://data/test.db"
    );
}

#[test]
fn file_overrides_replace_known_keys_only() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
        bind_addr = "127.0.0.1:9000"
        max_body_bytes = 1024
        unknown = "ignored"
        "#,
    );
    assert_eq!(settings.server_bind, "127.0.0.1:9000");
    assert_eq!(settings.max_body_bytes, 1024);
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn unparseable_file_leaves_defaults() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "bind_addr = ");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}
