use std::sync::Arc;

use lift_config::Config;
use lift_service::{LiftService, WorkoutStore};
use lift_storage::{db::Db, pg::PgWorkoutStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LiftService>,
}
impl AppState {
	/// Connects to PostgreSQL and makes sure the catalog schema exists.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.embedding.vector_dim).await?;

		let store = PgWorkoutStore::new(db, &config.search);

		Ok(Self::with_store(config, Arc::new(store)))
	}

	pub fn with_store(config: Config, store: Arc<dyn WorkoutStore>) -> Self {
		Self { service: Arc::new(LiftService::new(config, store)) }
	}
}
