use time::OffsetDateTime;

use lift_domain::lexical::LexicalDocument;

/// A workout row without its lexical index or embedding.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Workout {
	pub id: i32,
	pub external_id: String,
	pub name: String,
	pub description: Option<String>,
	pub body_part: Option<String>,
	pub equipment: Option<String>,
	pub gif_url: Option<String>,
	pub target: Option<String>,
	#[sqlx(json)]
	pub secondary_muscles: Vec<String>,
	#[sqlx(json)]
	pub instructions: Vec<String>,
	#[sqlx(json)]
	pub latest_instructions: Vec<String>,
	pub is_public: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A workout with the score its producing query ordered by: lexical rank, trigram similarity or
/// cosine distance.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct ScoredWorkout {
	#[sqlx(flatten)]
	pub workout: Workout,
	pub score: f32,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct MuscleWorkout {
	#[sqlx(flatten)]
	pub workout: Workout,
	pub activation: f32,
	pub is_primary: bool,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Muscle {
	pub id: i32,
	pub code: String,
	pub name: String,
	pub group_name: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Activation {
	pub workout_id: i32,
	pub muscle_code: String,
	pub is_primary: bool,
	pub activation: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMuscle {
	pub code: String,
	pub name: String,
	pub group_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewActivation {
	pub muscle_code: String,
	pub is_primary: bool,
	pub activation: f32,
}

/// Insert payload for one workout. `lexical` is the output of the indexing step and is persisted
/// as the weighted lexical index.
#[derive(Clone, Debug, PartialEq)]
pub struct NewWorkout {
	pub external_id: String,
	pub name: String,
	pub description: Option<String>,
	pub body_part: Option<String>,
	pub equipment: Option<String>,
	pub gif_url: Option<String>,
	pub target: Option<String>,
	pub secondary_muscles: Vec<String>,
	pub instructions: Vec<String>,
	pub latest_instructions: Vec<String>,
	pub is_public: bool,
	pub lexical: LexicalDocument,
	pub activations: Vec<NewActivation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingUpdate {
	pub workout_id: i32,
	pub vector: Option<Vec<f32>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmbeddingRebuild {
	/// Workouts that now carry an embedding.
	pub rebuilt: u64,
	/// Workouts whose embedding was set to NULL.
	pub cleared: u64,
}
