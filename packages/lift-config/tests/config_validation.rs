use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use lift_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("lift_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> lift_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = lift_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn validation_message(result: lift_config::Result<Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(err) => panic!("Expected a validation error, got {err:?}."),
		Ok(_) => panic!("Expected a validation error, got a config."),
	}
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.storage.embedding.vector_dim, 84);
	assert_eq!(cfg.search.max_page_size, 50);
	assert_eq!(cfg.search.fuzzy.trigger_below, 5);
	assert!((cfg.search.fuzzy.threshold - 0.3).abs() < f32::EPSILON);
}

#[test]
fn search_section_defaults_when_omitted() {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");

	root.as_table_mut().expect("Sample config must be a table.").remove("search");

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render config."))
		.expect("Config without [search] must load.");

	assert_eq!(cfg.search.default_page_size, 20);
	assert_eq!(cfg.search.max_page_size, 50);
	assert_eq!(cfg.search.autocomplete_limit, 20);
	assert_eq!(cfg.search.text_search_config, "english");
	assert_eq!(cfg.search.weights, lift_config::LexicalWeights { a: 1.0, b: 0.4, c: 0.2, d: 0.1 });
}

#[test]
fn text_search_config_is_normalized() {
	let payload = sample_with(&["search"], "text_search_config", Value::String(" English ".into()));
	let cfg = load_payload(payload).expect("Config must load.");

	assert_eq!(cfg.search.text_search_config, "english");
}

#[test]
fn text_search_config_rejects_non_identifiers() {
	let payload =
		sample_with(&["search"], "text_search_config", Value::String("english'); --".into()));

	assert!(validation_message(load_payload(payload)).contains("text_search_config"));
}

#[test]
fn vector_dim_must_match_catalog_layout() {
	let payload = sample_with(&["storage", "embedding"], "vector_dim", Value::Integer(128));

	assert_eq!(
		validation_message(load_payload(payload)),
		"storage.embedding.vector_dim must be 84."
	);
}

#[test]
fn max_page_size_cannot_lift_the_hard_cap() {
	let payload = sample_with(&["search"], "max_page_size", Value::Integer(500));

	assert_eq!(
		validation_message(load_payload(payload)),
		"search.max_page_size must be in the range 1-50."
	);

	let payload = sample_with(&["search"], "max_page_size", Value::Integer(50));
	let cfg = load_payload(payload).expect("A cap of 50 must load.");

	assert_eq!(cfg.search.max_page_size, lift_config::MAX_PAGE_SIZE);
}

#[test]
fn default_page_size_cannot_exceed_max() {
	let payload = sample_with(&["search"], "default_page_size", Value::Integer(80));

	assert!(validation_message(load_payload(payload)).contains("default_page_size"));
}

#[test]
fn fuzzy_threshold_must_be_a_fraction() {
	let payload = sample_with(&["search", "fuzzy"], "threshold", Value::Float(1.5));

	assert!(validation_message(load_payload(payload)).contains("search.fuzzy.threshold"));
}

#[test]
fn weights_must_be_in_range() {
	let payload = sample_with(&["search", "weights"], "b", Value::Float(-0.1));

	assert_eq!(
		validation_message(load_payload(payload)),
		"search.weights.b must be in the range 0.0-1.0."
	);
}

#[test]
fn pool_size_must_be_positive() {
	let payload = sample_with(&["storage", "postgres"], "pool_max_conns", Value::Integer(0));

	assert!(validation_message(load_payload(payload)).contains("pool_max_conns"));
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("lift_config_test_missing.toml");
	let err = lift_config::load(&path).expect_err("Missing config must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
	let err = load_payload("[service\nhttp_bind = 1".to_string()).expect_err("Must fail.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}
