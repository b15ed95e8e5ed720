#![allow(missing_docs)]
use pkgsel_cli::config::{format_sections, CliConfig, ConfigManager};
use pkgsel_cli::output::GraphType;

#[test]
fn default_configuration_has_no_snapshot() {
    let config = CliConfig::default();
    assert!(config.snapshot.path.is_empty());
    assert_eq!(config.output.graph_type, GraphType::Dot);
    assert!(config.output.align);
    assert!(!config.evaluation.lenient_packages);
}

#[test]
fn settings_persist_across_reloads() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let config_path = temp_dir.path().join("pkgsel").join("config.toml");

    // Missing file loads defaults
    let mut manager = ConfigManager::load_with_path(&config_path).expect("load default config");
    assert_eq!(manager.get("output.graph_type").as_deref(), Some("dot"));

    manager.set("snapshot.path", "/data/packages.json").expect("set path");
    manager.set("output.graph_type", "GraphML").expect("set graph type");
    manager.set("evaluation.lenient_packages", "yes").expect("set lenient");
    manager.save().expect("save config");

    let reloaded = ConfigManager::load_with_path(&config_path).expect("reload config");
    let config = reloaded.config();
    assert_eq!(config.snapshot.path, "/data/packages.json");
    assert_eq!(config.output.graph_type, GraphType::Graphml);
    assert!(config.evaluation.lenient_packages);
    // Untouched settings keep their defaults
    assert_eq!(config.output.docs_url, "https://pkg.go.dev/");
}

#[test]
fn invalid_values_are_rejected() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let mut manager =
        ConfigManager::load_with_path(temp_dir.path().join("config.toml")).expect("load");

    let err = manager.set("output.graph_type", "svg").unwrap_err();
    assert!(err.to_string().contains("Invalid graph type: svg"));
    assert!(manager.set("output.align", "sometimes").is_err());
    assert!(manager.set("output.colour", "true").is_err());
    assert_eq!(manager.get("output.colour"), None);
}

#[test]
fn partial_user_file_merges_over_defaults() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[snapshot]\nreference_path = \"std.json\"\n").expect("write");

    let manager = ConfigManager::load_with_path(&config_path).expect("load");
    assert_eq!(manager.config().snapshot.reference_path, "std.json");
    assert_eq!(manager.config().output.graph_type, GraphType::Dot);

    let sections = format_sections(manager.config());
    assert_eq!(sections[0], "[snapshot]");
    assert!(sections.contains(&"reference_path=\"std.json\"".to_string()));
}

#[test]
fn malformed_file_names_its_path() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[output\n").expect("write");

    let err = ConfigManager::load_with_path(&config_path)
        .err()
        .expect("malformed file must fail");
    assert!(format!("{err:#}").contains("invalid config at"));
}
