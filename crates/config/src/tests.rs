use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config.completion, CompletionConfig::default());
	assert_eq!(config.syntax, SyntaxConfig::default());
	assert_eq!(config.protocol.position_encoding, OffsetEncoding::Utf16);
	assert!(config.warnings.is_empty());
}

#[test]
fn test_parse_all_sections() {
	let config = Config::parse(
		r#"
completion {
    max-items 50
    fuzzy #false
    keywords #false
    argument-names #false
}
syntax {
    incremental #false
}
protocol {
    position-encoding "utf-8"
}
"#,
	)
	.unwrap();

	assert_eq!(config.completion, CompletionConfig {
		max_items: 50,
		fuzzy: false,
		keywords: false,
		argument_names: false,
	});
	assert!(!config.syntax.incremental);
	assert_eq!(config.protocol.position_encoding, OffsetEncoding::Utf8);
}

#[test]
fn test_unknown_entries_become_warnings() {
	let config = Config::parse(
		r#"
completion {
    max-items 10
    colour "blue"
}
theme {
    name "dark"
}
"#,
	)
	.unwrap();

	assert_eq!(config.completion.max_items, 10);
	assert_eq!(config.warnings, vec![
		ConfigWarning::UnknownKey {
			section: "completion".to_string(),
			key: "colour".to_string(),
		},
		ConfigWarning::UnknownSection("theme".to_string()),
	]);
}

#[test]
fn test_invalid_values_are_errors() {
	let err = Config::parse("completion { max-items 0 }").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "completion.max-items"));

	let err = Config::parse("completion { fuzzy \"yes\" }").unwrap_err();
	assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "completion.fuzzy"));

	let err = Config::parse("protocol { position-encoding \"latin-1\" }").unwrap_err();
	assert!(err.to_string().contains("utf-8, utf-16 or utf-32"));
}

#[test]
fn test_kdl_syntax_error() {
	assert!(matches!(Config::parse("completion {"), Err(ConfigError::Kdl(_))));
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "syntax {{ incremental #false; }}").unwrap();

	let config = Config::load(file.path()).unwrap();
	assert!(!config.syntax.incremental);

	let config = Config::load_or_default(Some(file.path())).unwrap();
	assert!(!config.syntax.incremental);
}

#[test]
fn test_load_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.kdl");
	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}

#[test]
fn test_config_path_prefers_xdg_config_home() {
	let dir = tempfile::tempdir().unwrap();
	assert_eq!(
		path_under(Some(dir.path().as_os_str().to_owned())),
		Some(dir.path().join("rsense").join("config.kdl"))
	);
	assert_eq!(
		path_under(Some(OsString::new())),
		dirs::config_dir().map(|base| base.join("rsense").join("config.kdl"))
	);
	assert_eq!(path_under(None), path_under(Some(OsString::new())));
}
