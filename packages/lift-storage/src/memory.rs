//! In-process store with exact (brute-force) search.
//!
//! Results match the PostgreSQL store for lexical, fuzzy and similarity queries up to tie order:
//! ties are broken by ascending id here. Every query scans the whole catalog.

use std::{cmp::Ordering, collections::HashSet};

use time::OffsetDateTime;
use tokio::sync::RwLock;

use lift_config::LexicalWeights;
use lift_domain::{
	lexical::{LexicalIndex, PlainQuery},
	muscle_vector, trigram,
};

use crate::{
	BoxFuture, Error, Result, WorkoutStore, embedding,
	models::{
		Activation, EmbeddingRebuild, Muscle, MuscleWorkout, NewMuscle, NewWorkout, ScoredWorkout,
		Workout,
	},
};

#[derive(Clone, Debug)]
struct StoredWorkout {
	workout: Workout,
	index: LexicalIndex,
	embedding: Option<Vec<f32>>,
}

#[derive(Clone, Debug, Default)]
struct State {
	next_muscle_id: i32,
	next_workout_id: i32,
	muscles: Vec<Muscle>,
	workouts: Vec<StoredWorkout>,
	activations: Vec<Activation>,
}
impl State {
	fn workout_mut(&mut self, workout_id: i32) -> Option<&mut StoredWorkout> {
		self.workouts.iter_mut().find(|stored| stored.workout.id == workout_id)
	}

	fn insert_muscle(&mut self, muscle: &NewMuscle, now: OffsetDateTime) -> Result<Muscle> {
		if self.muscles.iter().any(|existing| existing.code == muscle.code) {
			return Err(Error::Conflict(format!("muscle code {:?} already exists", muscle.code)));
		}

		self.next_muscle_id += 1;

		let row = Muscle {
			id: self.next_muscle_id,
			code: muscle.code.clone(),
			name: muscle.name.clone(),
			group_name: muscle.group_name.clone(),
			created_at: now,
			updated_at: now,
		};

		self.muscles.push(row.clone());

		Ok(row)
	}

	fn insert_workout(&mut self, workout: &NewWorkout, now: OffsetDateTime) -> Result<Workout> {
		if self.workouts.iter().any(|stored| stored.workout.external_id == workout.external_id) {
			return Err(Error::Conflict(format!(
				"workout external id {:?} already exists",
				workout.external_id
			)));
		}

		let mut seen = HashSet::new();

		for activation in &workout.activations {
			if !self.muscles.iter().any(|muscle| muscle.code == activation.muscle_code) {
				return Err(Error::InvalidArgument(format!(
					"unknown muscle code {:?}",
					activation.muscle_code
				)));
			}
			if !(0.0..=1.0).contains(&activation.activation) {
				return Err(Error::InvalidArgument(format!(
					"activation {} is outside [0, 1]",
					activation.activation
				)));
			}
			if !seen.insert(activation.muscle_code.as_str()) {
				return Err(Error::Conflict(format!(
					"muscle {:?} listed twice for workout {:?}",
					activation.muscle_code, workout.external_id
				)));
			}
		}

		self.next_workout_id += 1;

		let row = Workout {
			id: self.next_workout_id,
			external_id: workout.external_id.clone(),
			name: workout.name.clone(),
			description: workout.description.clone(),
			body_part: workout.body_part.clone(),
			equipment: workout.equipment.clone(),
			gif_url: workout.gif_url.clone(),
			target: workout.target.clone(),
			secondary_muscles: workout.secondary_muscles.clone(),
			instructions: workout.instructions.clone(),
			latest_instructions: workout.latest_instructions.clone(),
			is_public: workout.is_public,
			created_at: now,
			updated_at: now,
		};

		self.activations.extend(workout.activations.iter().map(|activation| Activation {
			workout_id: row.id,
			muscle_code: activation.muscle_code.clone(),
			is_primary: activation.is_primary,
			activation: activation.activation,
		}));
		self.workouts.push(StoredWorkout {
			workout: row.clone(),
			index: LexicalIndex::build(&workout.lexical),
			embedding: None,
		});

		Ok(row)
	}
}

pub struct MemoryWorkoutStore {
	weights: LexicalWeights,
	state: RwLock<State>,
}
impl MemoryWorkoutStore {
	pub fn new(weights: LexicalWeights) -> Self {
		Self { weights, state: RwLock::new(State::default()) }
	}

	/// Overwrites one embedding directly, bypassing the activation rebuild.
	pub async fn set_embedding(&self, workout_id: i32, vector: Option<Vec<f32>>) -> Result<()> {
		let mut state = self.state.write().await;
		let stored = state
			.workout_mut(workout_id)
			.ok_or_else(|| Error::NotFound(format!("workout {workout_id}")))?;

		stored.embedding = vector;

		Ok(())
	}

	async fn lexical(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<ScoredWorkout>> {
		let query = PlainQuery::parse(query);

		if query.is_empty() {
			return Ok(Vec::new());
		}

		let state = self.state.read().await;
		let scored = state
			.workouts
			.iter()
			.filter(|stored| stored.index.matches(&query))
			.map(|stored| ScoredWorkout {
				workout: stored.workout.clone(),
				score: stored.index.rank(&query, &self.weights),
			})
			.collect();

		Ok(window(sorted(scored, Ordering::reverse), limit, offset))
	}

	async fn fuzzy(&self, query: &str, threshold: f32, limit: i64) -> Result<Vec<ScoredWorkout>> {
		let state = self.state.read().await;
		let scored = state
			.workouts
			.iter()
			.filter_map(|stored| {
				let workout = &stored.workout;
				let score = trigram::best_field_similarity(
					query,
					&workout.name,
					workout.description.as_deref(),
				);

				(score > threshold).then(|| ScoredWorkout { workout: workout.clone(), score })
			})
			.collect();

		Ok(window(sorted(scored, Ordering::reverse), limit, 0))
	}

	async fn embedding_of(&self, workout_id: i32) -> Result<Option<Vec<f32>>> {
		let state = self.state.read().await;

		Ok(state
			.workouts
			.iter()
			.find(|stored| stored.workout.id == workout_id)
			.and_then(|stored| stored.embedding.clone()))
	}

	async fn nearest(
		&self,
		vector: &[f32],
		exclude_id: i32,
		limit: i64,
		offset: i64,
	) -> Result<Vec<ScoredWorkout>> {
		let state = self.state.read().await;
		let scored = state
			.workouts
			.iter()
			.filter(|stored| stored.workout.id != exclude_id)
			.filter_map(|stored| {
				let distance = muscle_vector::cosine_distance(vector, stored.embedding.as_deref()?)?;

				Some(ScoredWorkout { workout: stored.workout.clone(), score: distance })
			})
			.collect();

		Ok(window(sorted(scored, |ordering| ordering), limit, offset))
	}

	async fn muscle(&self, code: &str) -> Result<Option<Muscle>> {
		let state = self.state.read().await;

		Ok(state.muscles.iter().find(|muscle| muscle.code == code).cloned())
	}

	async fn by_muscle(
		&self,
		code: &str,
		is_primary: Option<bool>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<MuscleWorkout>> {
		let state = self.state.read().await;
		let mut rows: Vec<MuscleWorkout> = state
			.activations
			.iter()
			.filter(|activation| activation.muscle_code == code)
			.filter(|activation| is_primary.is_none_or(|flag| activation.is_primary == flag))
			.filter_map(|activation| {
				let stored =
					state.workouts.iter().find(|stored| stored.workout.id == activation.workout_id)?;

				Some(MuscleWorkout {
					workout: stored.workout.clone(),
					activation: activation.activation,
					is_primary: activation.is_primary,
				})
			})
			.collect();

		rows.sort_by(|a, b| {
			a.activation.total_cmp(&b.activation).then_with(|| a.workout.id.cmp(&b.workout.id))
		});

		Ok(rows.into_iter().skip(to_usize(offset)).take(to_usize(limit)).collect())
	}

	async fn add_muscles(&self, muscles: &[NewMuscle]) -> Result<Vec<Muscle>> {
		let mut guard = self.state.write().await;
		let mut next = guard.clone();
		let now = OffsetDateTime::now_utc();
		let inserted = muscles
			.iter()
			.map(|muscle| next.insert_muscle(muscle, now))
			.collect::<Result<Vec<_>>>()?;

		*guard = next;

		Ok(inserted)
	}

	async fn add_workouts(&self, workouts: &[NewWorkout]) -> Result<Vec<Workout>> {
		let mut guard = self.state.write().await;
		let mut next = guard.clone();
		let now = OffsetDateTime::now_utc();
		let inserted = workouts
			.iter()
			.map(|workout| next.insert_workout(workout, now))
			.collect::<Result<Vec<_>>>()?;

		*guard = next;

		Ok(inserted)
	}

	async fn rebuild(&self, vector_dim: usize) -> Result<EmbeddingRebuild> {
		let mut state = self.state.write().await;
		let codes: Vec<String> = state.muscles.iter().map(|muscle| muscle.code.clone()).collect();
		let workout_ids: Vec<i32> = state.workouts.iter().map(|stored| stored.workout.id).collect();
		let updates = embedding::plan(&codes, &workout_ids, &state.activations, vector_dim);
		let now = OffsetDateTime::now_utc();

		for update in &updates {
			if let Some(stored) = state.workout_mut(update.workout_id) {
				stored.embedding = update.vector.clone();
				stored.workout.updated_at = now;
			}
		}

		Ok(embedding::summarize(&updates))
	}
}

impl WorkoutStore for MemoryWorkoutStore {
	fn lexical_search<'a>(
		&'a self,
		query: &'a str,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(self.lexical(query, limit, offset))
	}

	fn fuzzy_search<'a>(
		&'a self,
		query: &'a str,
		threshold: f32,
		limit: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(self.fuzzy(query, threshold, limit))
	}

	fn fetch_embedding(&self, workout_id: i32) -> BoxFuture<'_, Result<Option<Vec<f32>>>> {
		Box::pin(self.embedding_of(workout_id))
	}

	fn nearest_by_embedding<'a>(
		&'a self,
		vector: &'a [f32],
		exclude_id: i32,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<ScoredWorkout>>> {
		Box::pin(self.nearest(vector, exclude_id, limit, offset))
	}

	fn find_muscle<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<Option<Muscle>>> {
		Box::pin(self.muscle(code))
	}

	fn workouts_by_muscle<'a>(
		&'a self,
		code: &'a str,
		is_primary: Option<bool>,
		limit: i64,
		offset: i64,
	) -> BoxFuture<'a, Result<Vec<MuscleWorkout>>> {
		Box::pin(self.by_muscle(code, is_primary, limit, offset))
	}

	fn insert_muscles<'a>(&'a self, muscles: &'a [NewMuscle]) -> BoxFuture<'a, Result<Vec<Muscle>>> {
		Box::pin(self.add_muscles(muscles))
	}

	fn insert_workouts<'a>(
		&'a self,
		workouts: &'a [NewWorkout],
	) -> BoxFuture<'a, Result<Vec<Workout>>> {
		Box::pin(self.add_workouts(workouts))
	}

	fn rebuild_embeddings(&self, vector_dim: usize) -> BoxFuture<'_, Result<EmbeddingRebuild>> {
		Box::pin(self.rebuild(vector_dim))
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async { Ok(()) })
	}
}

/// Sorts by score (after `direction`) and then by ascending id.
fn sorted(
	mut rows: Vec<ScoredWorkout>,
	direction: impl Fn(Ordering) -> Ordering,
) -> Vec<ScoredWorkout> {
	rows.sort_by(|a, b| {
		direction(a.score.total_cmp(&b.score)).then_with(|| a.workout.id.cmp(&b.workout.id))
	});

	rows
}

fn window(rows: Vec<ScoredWorkout>, limit: i64, offset: i64) -> Vec<ScoredWorkout> {
	rows.into_iter().skip(to_usize(offset)).take(to_usize(limit)).collect()
}

fn to_usize(value: i64) -> usize {
	usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}
