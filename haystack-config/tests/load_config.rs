use haystack_config::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, ConfigSource, ListConfig};
use haystack_core::SortDirection;
use haystack_model::{EntityId, EntityKind};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// Tests below mutate process-wide environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [CONFIG_PATH_ENV, CONFIG_JSON_ENV] {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn toml_file_round_trips_settings() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("haystack.toml");
    let hidden = EntityId::new();

    fs::write(
        &path,
        format!(
            r#"
refresh_interval_ms = 2500

[settings]
direction = "descending"
group_by_body = true
hidden = ["{hidden}"]
hidden_kinds = ["debris", "space_object"]
search_term = "mun"
"#
        ),
    )
    .expect("write config");

    let config = ListConfig::load_from_file(&path).expect("load toml");

    assert_eq!(config.refresh_interval_ms, 2_500);
    assert_eq!(config.settings.direction, SortDirection::Descending);
    assert!(config.settings.group_by_body);
    assert!(!config.settings.nearby_only);
    assert!(config.settings.is_hidden(hidden));
    assert!(!config.settings.is_kind_visible(EntityKind::Debris));
    assert!(!config.settings.is_kind_visible(EntityKind::SpaceObject));
    assert_eq!(config.settings.search_term, "mun");

    let rendered = config.to_toml_string().expect("serialize");
    let reparsed = ListConfig::parse_from_str(&rendered, "rendered").expect("reparse");
    assert_eq!(reparsed, config);
}

#[test]
fn invalid_file_names_its_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write config");

    let err = ListConfig::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}

#[test]
fn env_path_takes_precedence_over_inline_json() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_env();

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("list.json");
    fs::write(&path, r#"{"refresh_interval_ms": 1000}"#).expect("write config");

    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, &path);
        std::env::set_var(CONFIG_JSON_ENV, r#"{"refresh_interval_ms": 9000}"#);
    }
    let (config, source) = ListConfig::load_from_env().expect("load");
    clear_env();

    assert_eq!(config.refresh_interval_ms, 1_000);
    assert_eq!(source, ConfigSource::EnvPath(path));
}

#[test]
fn inline_json_is_used_when_no_path_is_set() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_env();

    unsafe {
        std::env::set_var(
            CONFIG_JSON_ENV,
            r#"{"settings": {"show_hidden": true}}"#,
        );
    }
    let (config, source) = ListConfig::load_from_env().expect("load");
    clear_env();

    assert!(config.settings.show_hidden);
    assert_eq!(config.refresh_interval_ms, 5_000);
    assert_eq!(source, ConfigSource::EnvInline);
}

#[test]
fn malformed_inline_json_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    clear_env();

    unsafe { std::env::set_var(CONFIG_JSON_ENV, "{") };
    let result = ListConfig::load_from_env();
    clear_env();

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains(CONFIG_JSON_ENV));
}
