use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read Lift config {path:?}.")]
	ReadConfig { path: PathBuf, source: io::Error },
	#[error("Config {path:?} is not valid TOML for Lift.")]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	/// A field parsed but holds a value the service cannot run with.
	#[error("{message}")]
	Validation { message: String },
}
