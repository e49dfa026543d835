use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	#[serde(default)]
	pub embedding: Embedding,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Embedding {
	/// Length of `workouts.muscle_vector`. One slot per muscle in layout order.
	pub vector_dim: u32,
}
impl Default for Embedding {
	fn default() -> Self {
		Self { vector_dim: crate::MUSCLE_VECTOR_DIM }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_page_size: u32,
	pub max_page_size: u32,
	pub autocomplete_limit: u32,
	/// PostgreSQL text search configuration used for both indexing and query parsing.
	pub text_search_config: String,
	pub fuzzy: SearchFuzzy,
	pub weights: LexicalWeights,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_page_size: 20,
			max_page_size: 50,
			autocomplete_limit: 20,
			text_search_config: "english".to_string(),
			fuzzy: SearchFuzzy::default(),
			weights: LexicalWeights::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchFuzzy {
	/// The fuzzy stage runs when the current lexical page holds fewer rows than this.
	pub trigger_below: u32,
	/// Strict lower bound on trigram similarity for a candidate to qualify.
	pub threshold: f32,
}
impl Default for SearchFuzzy {
	fn default() -> Self {
		Self { trigger_below: 5, threshold: 0.3 }
	}
}

/// Per-tier weights of the lexical index. Tier A is the name, B the description, C the
/// secondary muscles, D the categorical fields.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LexicalWeights {
	pub a: f32,
	pub b: f32,
	pub c: f32,
	pub d: f32,
}
impl Default for LexicalWeights {
	fn default() -> Self {
		Self { a: 1.0, b: 0.4, c: 0.2, d: 0.1 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
