use crate::{
	BoxFuture, Result, WorkoutStore,
	db::Db,
	embedding,
	models::{
		EmbeddingRebuild, Muscle, MuscleWorkout, NewMuscle, NewWorkout, ScoredWorkout, Workout,
	},
	queries::{self, TextSearch},
};

/// PostgreSQL store backed by `pg_trgm` and `pgvector`.
///
/// Nearest-neighbor queries go through the HNSW index and are approximate.
pub struct PgWorkoutStore {
	pub db: Db,
	text_search: TextSearch,
}
impl PgWorkoutStore {
	pub fn new(db: Db, search: &lift_config::Search) -> Self {
		let text_search =
			TextSearch { config: search.text_search_config.clone(), weights: search.weights };

		Self { db, text_search }
	}

	async fn insert_muscles_tx(&self, muscles: &[NewMuscle]) -> Result<Vec<Muscle>> {
		let mut tx = self.db.pool.begin().await?;
		let mut inserted = Vec::with_capacity(muscles.len());

		for muscle in muscles {
			inserted.push(queries::insert_muscle(&mut tx, muscle).await?);
		}

		tx.commit().await?;

		tracing::info!(count = inserted.len(), "Muscles inserted.");

		Ok(inserted)
	}

	async fn insert_workouts_tx(&self, workouts: &[NewWorkout]) -> Result<Vec<Workout>> {
		let mut tx = self.db.pool.begin().await?;
		let mut inserted = Vec::with_capacity(workouts.len());

		for workout in workouts {
			let row = queries::insert_workout(&mut tx, &self.text_search, workout).await?;

			for activation in &workout.activations {
				queries::insert_activation(&mut tx, row.id, activation).await?;
			}

			inserted.push(row);
		}

		tx.commit().await?;

		tracing::info!(count = inserted.len(), "Workouts inserted.");

		Ok(inserted)
	}

	async fn rebuild_embeddings_tx(&self, vector_dim: usize) -> Result<EmbeddingRebuild> {
		let mut tx = self.db.pool.begin().await?;
		let codes = queries::list_muscle_codes(&mut *tx).await?;
		let workout_ids = queries::list_workout_ids(&mut *tx).await?;
		let activations = queries::list_activations(&mut *tx).await?;
		let updates = embedding::plan(&codes, &workout_ids, &activations, vector_dim);

		for update in &updates {
			queries::write_embedding(&mut tx, update).await?;
		}

		tx.commit().await?;

		let summary = embedding::summarize(&updates);

		tracing::info!(
			rebuilt = summary.rebuilt,
			cleared = summary.cleared,
			"Muscle embeddings rebuilt."
		);

		Ok(summary)
	}
}

impl WorkoutStore for PgWorkoutStore {
	fn lexical_search<'a>(
		&'a self,
		query: &'a str,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(queries::lexical_search(&self.db.pool, &self.text_search, query, limit, offset))
	}

	fn fuzzy_search<'a>(
		&'a self,
		query: &'a str,
		threshold: f32,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(queries::fuzzy_search(&self.db.pool, query, threshold, limit))
	}

	fn fetch_embedding(&self, workout_id: i32) -> BoxFuture<'_, Result<Option<Vec<f32>>>> {
		Box::pin(queries::fetch_embedding(&self.db.pool, workout_id))
	}

	fn nearest_by_embedding<'a>(
		&'a self,
		vector: &'a [f32],
		exclude_id: i32,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(queries::nearest_by_embedding(&self.db.pool, vector, exclude_id, limit, offset))
	}

	fn find_muscle<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<Option<Muscle>>> {
		Box::pin(queries::find_muscle(&self.db.pool, code))
	}

	fn workouts_by_muscle<'a>(
		&'a self,
		code: &'a str,
		is_primary: Option<bool>,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<MuscleWorkout>>> {
		Box::pin(queries::workouts_by_muscle(&self.db.pool, code, is_primary, limit, offset))
	}

	fn insert_muscles<'a>(&'a self, muscles: &'a [NewMuscle]) -> BoxFuture<'a, Result<Vec<Muscle>>> {
		Box::pin(self.insert_muscles_tx(muscles))
	}

	fn insert_workouts<'a>(
		&'a self,
		workouts: &'a [NewWorkout],
	) -> BoxFuture<'a, Result<Vec<Workout>>> {
		Box::pin(self.insert_workouts_tx(workouts))
	}

	fn rebuild_embeddings(&self, vector_dim: usize) -> BoxFuture<'_, Result<EmbeddingRebuild>> {
		Box::pin(self.rebuild_embeddings_tx(vector_dim))
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(queries::ping(&self.db.pool))
	}
}
