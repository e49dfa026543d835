mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Embedding, LexicalWeights, Postgres, Search, SearchFuzzy, Security, Service, Storage,
};

use std::{fs, path::Path};

/// Embedding width the catalog schema is built for.
pub const MUSCLE_VECTOR_DIM: u32 = 84;
/// Hard ceiling for `pageSize` on every paginated endpoint.
pub const MAX_PAGE_SIZE: u32 = 50;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.embedding.vector_dim != MUSCLE_VECTOR_DIM {
		return Err(Error::Validation {
			message: format!("storage.embedding.vector_dim must be {MUSCLE_VECTOR_DIM}."),
		});
	}
	if cfg.search.max_page_size == 0 || cfg.search.max_page_size > MAX_PAGE_SIZE {
		return Err(Error::Validation {
			message: format!("search.max_page_size must be in the range 1-{MAX_PAGE_SIZE}."),
		});
	}
	if cfg.search.default_page_size == 0 || cfg.search.default_page_size > cfg.search.max_page_size
	{
		return Err(Error::Validation {
			message: "search.default_page_size must be in the range 1-search.max_page_size."
				.to_string(),
		});
	}
	if cfg.search.autocomplete_limit == 0 {
		return Err(Error::Validation {
			message: "search.autocomplete_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.text_search_config.is_empty()
		|| !cfg.search.text_search_config.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
	{
		return Err(Error::Validation {
			message: "search.text_search_config must be a bare identifier such as english."
				.to_string(),
		});
	}
	if !cfg.search.fuzzy.threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.fuzzy.threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..1.0).contains(&cfg.search.fuzzy.threshold) {
		return Err(Error::Validation {
			message: "search.fuzzy.threshold must be in the range 0.0-1.0 (exclusive of 1.0)."
				.to_string(),
		});
	}

	let weights = cfg.search.weights;

	for (label, weight) in [
		("search.weights.a", weights.a),
		("search.weights.b", weights.b),
		("search.weights.c", weights.c),
		("search.weights.d", weights.d),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.text_search_config = cfg.search.text_search_config.trim().to_ascii_lowercase();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
