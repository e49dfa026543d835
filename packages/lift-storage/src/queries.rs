use sqlx::{PgExecutor, PgPool, Postgres, Transaction, types::Json};

use lift_config::LexicalWeights;
use lift_domain::muscle_vector;

use crate::{
	Error, Result,
	models::{
		Activation, EmbeddingUpdate, Muscle, MuscleWorkout, NewActivation, NewMuscle, NewWorkout,
		ScoredWorkout, Workout,
	},
};

macro_rules! workout_columns {
	() => {
		"\
w.id,
w.external_id,
w.name,
w.description,
w.body_part,
w.equipment,
w.gif_url,
w.target,
w.secondary_muscles,
w.instructions,
w.latest_instructions,
w.is_public,
w.created_at,
w.updated_at"
	};
}

/// Text search settings applied to both the indexing step and query parsing.
#[derive(Clone, Debug)]
pub struct TextSearch {
	pub config: String,
	pub weights: LexicalWeights,
}
impl TextSearch {
	/// `ts_rank` expects weights ordered `{D, C, B, A}`.
	pub fn rank_weights(&self) -> Vec<f32> {
		vec![self.weights.d, self.weights.c, self.weights.b, self.weights.a]
	}
}

pub async fn lexical_search(
	pool: &PgPool,
	text_search: &TextSearch,
	query: &str,
	limit: i64,
	offset: i64,
) -> Result<Vec<ScoredWorkout>> {
	let rows = sqlx::query_as::<_, ScoredWorkout>(concat!(
		"SELECT ",
		workout_columns!(),
		",
	ts_rank($1::float4[], w.search_vector, plainto_tsquery($2::text::regconfig, $3))::real AS score
FROM workouts w
WHERE w.search_vector @@ plainto_tsquery($2::text::regconfig, $3)
ORDER BY score DESC, w.id ASC
LIMIT $4
OFFSET $5",
	))
	.bind(text_search.rank_weights())
	.bind(text_search.config.as_str())
	.bind(query)
	.bind(limit)
	.bind(offset)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn fuzzy_search(
	pool: &PgPool,
	query: &str,
	threshold: f32,
	limit: i64,
) -> Result<Vec<ScoredWorkout>> {
	let rows = sqlx::query_as::<_, ScoredWorkout>(concat!(
		"SELECT ",
		workout_columns!(),
		",
	GREATEST(similarity(w.name, $1), COALESCE(similarity(w.description, $1), 0))::real AS score
FROM workouts w
WHERE similarity(w.name, $1) > $2 OR similarity(w.description, $1) > $2
ORDER BY score DESC, w.id ASC
LIMIT $3",
	))
	.bind(query)
	.bind(threshold)
	.bind(limit)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn fetch_embedding(pool: &PgPool, workout_id: i32) -> Result<Option<Vec<f32>>> {
	let text: Option<Option<String>> =
		sqlx::query_scalar("SELECT muscle_vector::text FROM workouts WHERE id = $1")
			.bind(workout_id)
			.fetch_optional(pool)
			.await?;
	let Some(text) = text.flatten() else {
		return Ok(None);
	};
	let vector = muscle_vector::parse_pg_vector(&text)
		.map_err(|err| Error::InvalidVector(format!("workout {workout_id}: {err:?}")))?;

	Ok(Some(vector))
}

/// `hnsw.ef_search` bounds how many candidates one HNSW scan can return.
const HNSW_EF_SEARCH_DEFAULT: i64 = 40;
const HNSW_EF_SEARCH_MAX: i64 = 1_000;

/// Nearest workouts by cosine distance, ties by ascending id.
///
/// The index scan is widened so it yields at least `offset + limit + 1` candidates (the `+ 1`
/// covers the excluded target). Windows past what HNSW can return fall back to an exact scan.
pub async fn nearest_by_embedding(
	pool: &PgPool,
	vector: &[f32],
	exclude_id: i32,
	limit: i64,
	offset: i64,
) -> Result<Vec<ScoredWorkout>> {
	let candidates = offset.saturating_add(limit).saturating_add(1);
	let mut tx = pool.begin().await?;

	if candidates > HNSW_EF_SEARCH_MAX {
		sqlx::query("SELECT set_config('enable_indexscan', 'off', true)").execute(&mut *tx).await?;
	} else {
		let ef_search = candidates.max(HNSW_EF_SEARCH_DEFAULT);

		sqlx::query("SELECT set_config('hnsw.ef_search', $1, true)")
			.bind(ef_search.to_string())
			.execute(&mut *tx)
			.await?;
	}

	let rows = sqlx::query_as::<_, ScoredWorkout>(concat!(
		"SELECT ",
		workout_columns!(),
		",
	w.distance::real AS score
FROM (
	SELECT *, muscle_vector <=> $1::text::vector AS distance
	FROM workouts
	WHERE muscle_vector IS NOT NULL
	ORDER BY muscle_vector <=> $1::text::vector
	LIMIT $5
) w
WHERE w.id <> $2 AND vector_norm(w.muscle_vector) > 0
ORDER BY w.distance ASC, w.id ASC
LIMIT $3
OFFSET $4",
	))
	.bind(muscle_vector::vector_to_pg(vector))
	.bind(exclude_id)
	.bind(limit)
	.bind(offset)
	.bind(candidates)
	.fetch_all(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(rows)
}

pub async fn find_muscle(pool: &PgPool, code: &str) -> Result<Option<Muscle>> {
	let muscle = sqlx::query_as::<_, Muscle>(
		"\
SELECT id, code, name, group_name, created_at, updated_at
FROM muscles
WHERE code = $1",
	)
	.bind(code)
	.fetch_optional(pool)
	.await?;

	Ok(muscle)
}

pub async fn workouts_by_muscle(
	pool: &PgPool,
	code: &str,
	is_primary: Option<bool>,
	limit: i64,
	offset: i64,
) -> Result<Vec<MuscleWorkout>> {
	let rows = sqlx::query_as::<_, MuscleWorkout>(concat!(
		"SELECT ",
		workout_columns!(),
		",
	a.activation,
	a.is_primary
FROM workout_muscle_activations a
JOIN workouts w ON w.id = a.workout_id
WHERE a.muscle_code = $1 AND ($2::boolean IS NULL OR a.is_primary = $2)
ORDER BY a.activation ASC, w.id ASC
LIMIT $3
OFFSET $4",
	))
	.bind(code)
	.bind(is_primary)
	.bind(limit)
	.bind(offset)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn insert_muscle(
	tx: &mut Transaction<'_, Postgres>,
	muscle: &NewMuscle,
) -> Result<Muscle> {
	sqlx::query_as::<_, Muscle>(
		"\
INSERT INTO muscles (code, name, group_name)
VALUES ($1, $2, $3)
RETURNING id, code, name, group_name, created_at, updated_at",
	)
	.bind(muscle.code.as_str())
	.bind(muscle.name.as_str())
	.bind(muscle.group_name.as_str())
	.fetch_one(&mut **tx)
	.await
	.map_err(Error::from_write)
}

/// Inserts one workout and writes its weighted lexical index in the same statement.
pub async fn insert_workout(
	tx: &mut Transaction<'_, Postgres>,
	text_search: &TextSearch,
	workout: &NewWorkout,
) -> Result<Workout> {
	let sql = concat!(
		"\
WITH inserted AS (
	INSERT INTO workouts (
		external_id,
		name,
		description,
		body_part,
		equipment,
		gif_url,
		target,
		secondary_muscles,
		instructions,
		latest_instructions,
		is_public,
		search_vector
	)
	VALUES (
		$1,
		$2,
		$3,
		$4,
		$5,
		$6,
		$7,
		$8,
		$9,
		$10,
		$11,
		setweight(to_tsvector($12::text::regconfig, $13), 'A')
			|| setweight(to_tsvector($12::text::regconfig, $14), 'B')
			|| setweight(to_tsvector($12::text::regconfig, $15), 'C')
			|| setweight(to_tsvector($12::text::regconfig, $16), 'D')
	)
	RETURNING *
)
SELECT ",
		workout_columns!(),
		"
FROM inserted w",
	);
	let lexical = &workout.lexical;

	sqlx::query_as::<_, Workout>(sql)
		.bind(workout.external_id.as_str())
		.bind(workout.name.as_str())
		.bind(workout.description.as_deref())
		.bind(workout.body_part.as_deref())
		.bind(workout.equipment.as_deref())
		.bind(workout.gif_url.as_deref())
		.bind(workout.target.as_deref())
		.bind(Json(&workout.secondary_muscles))
		.bind(Json(&workout.instructions))
		.bind(Json(&workout.latest_instructions))
		.bind(workout.is_public)
		.bind(text_search.config.as_str())
		.bind(lexical.name.as_str())
		.bind(lexical.description.as_str())
		.bind(lexical.muscles.as_str())
		.bind(lexical.categorical.as_str())
		.fetch_one(&mut **tx)
		.await
		.map_err(Error::from_write)
}

pub async fn insert_activation(
	tx: &mut Transaction<'_, Postgres>,
	workout_id: i32,
	activation: &NewActivation,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO workout_muscle_activations (workout_id, muscle_code, is_primary, activation)
VALUES ($1, $2, $3, $4)",
	)
	.bind(workout_id)
	.bind(activation.muscle_code.as_str())
	.bind(activation.is_primary)
	.bind(activation.activation)
	.execute(&mut **tx)
	.await
	.map_err(Error::from_write)?;

	Ok(())
}

pub async fn list_muscle_codes<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: PgExecutor<'e>,
{
	let codes = sqlx::query_scalar("SELECT code FROM muscles ORDER BY id ASC")
		.fetch_all(executor)
		.await?;

	Ok(codes)
}

pub async fn list_workout_ids<'e, E>(executor: E) -> Result<Vec<i32>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar("SELECT id FROM workouts ORDER BY id ASC")
		.fetch_all(executor)
		.await?;

	Ok(ids)
}

pub async fn list_activations<'e, E>(executor: E) -> Result<Vec<Activation>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Activation>(
		"\
SELECT workout_id, muscle_code, is_primary, activation
FROM workout_muscle_activations
ORDER BY workout_id ASC, muscle_code ASC",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn write_embedding(
	tx: &mut Transaction<'_, Postgres>,
	update: &EmbeddingUpdate,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE workouts
SET muscle_vector = $2::text::vector, updated_at = now()
WHERE id = $1",
	)
	.bind(update.workout_id)
	.bind(update.vector.as_deref().map(muscle_vector::vector_to_pg))
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn ping(pool: &PgPool) -> Result<()> {
	sqlx::query("SELECT 1").execute(pool).await?;

	Ok(())
}
