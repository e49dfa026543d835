pub mod db;
pub mod embedding;
pub mod memory;
pub mod models;
pub mod pg;
pub mod queries;
pub mod schema;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin};

use crate::models::{
	EmbeddingRebuild, Muscle, MuscleWorkout, NewMuscle, NewWorkout, ScoredWorkout, Workout,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Data access for the workout catalog.
///
/// Read methods never open a transaction. Every write method is atomic: either the whole batch
/// is applied or none of it is.
pub trait WorkoutStore
where
	Self: Send + Sync,
{
	/// Plain full-text search. `score` is the tiered-weight rank, highest first.
	fn lexical_search<'a>(
		&'a self,
		query: &'a str,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>>;

	/// Trigram search over name and description. `score` is the better of the two similarities
	/// and every row has a field strictly above `threshold`.
	fn fuzzy_search<'a>(
		&'a self,
		query: &'a str,
		threshold: f32,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>>;

	/// `None` when the workout does not exist or has no embedding.
	fn fetch_embedding(&self, workout_id: i32) -> BoxFuture<'_, Result<Option<Vec<f32>>>>;

	/// Workouts with an embedding, nearest first. `score` is the cosine distance.
	fn nearest_by_embedding<'a>(
		&'a self,
		vector: &'a [f32],
		exclude_id: i32,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>>;

	fn find_muscle<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<Option<Muscle>>>;

	/// Workouts that activate `code`, by ascending activation then id.
	fn workouts_by_muscle<'a>(
		&'a self,
		code: &'a str,
		is_primary: Option<bool>,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<MuscleWorkout>>>;

	fn insert_muscles<'a>(&'a self, muscles: &'a [NewMuscle]) -> BoxFuture<'a, Result<Vec<Muscle>>>;

	/// Inserts workouts with their activations and lexical index.
	fn insert_workouts<'a>(
		&'a self,
		workouts: &'a [NewWorkout],
	) -> BoxFuture<'a, Result<Vec<Workout>>>;

	/// Recomputes every workout embedding from its activations. See [`embedding::plan`].
	fn rebuild_embeddings(&self, vector_dim: usize) -> BoxFuture<'_, Result<EmbeddingRebuild>>;

	fn ping(&self) -> BoxFuture<'_, Result<()>>;
}
