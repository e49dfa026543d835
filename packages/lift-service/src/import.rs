//! Bulk catalog import. Every workout write runs the lexical indexing step before it reaches the
//! store.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use lift_domain::lexical::LexicalDocument;
use lift_storage::models::{NewActivation, NewMuscle, NewWorkout};

use crate::{Error, LiftService, MuscleView, Result, WorkoutView};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MuscleInput {
	pub code: String,
	pub muscle: String,
	pub group: String,
}

/// Upstream catalogs use both string and numeric workout ids.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkoutExternalId {
	Text(String),
	Number(i64),
}
impl fmt::Display for WorkoutExternalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(value) => f.write_str(value.trim()),
			Self::Number(value) => write!(f, "{value}"),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct MuscleActivationInput {
	pub code: String,
	pub activation: f32,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MuscleActivationSet {
	#[serde(default)]
	pub primary_muscle: Vec<MuscleActivationInput>,
	#[serde(default)]
	pub secondary_muscle: Vec<MuscleActivationInput>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWorkout {
	pub id: WorkoutExternalId,
	pub name: String,
	pub body_part: Option<String>,
	pub equipment: Option<String>,
	pub gif_url: Option<String>,
	pub target: Option<String>,
	#[serde(default)]
	pub secondary_muscles: Vec<String>,
	#[serde(default)]
	pub instructions: Vec<String>,
	#[serde(default, rename = "latest_instructions")]
	pub latest_instructions: Vec<String>,
	#[serde(default)]
	pub muscle_activation: MuscleActivationSet,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportResponse<T> {
	pub count: usize,
	pub data: Vec<T>,
}
impl<T> ImportResponse<T> {
	fn new(data: Vec<T>) -> Self {
		Self { count: data.len(), data }
	}
}

impl LiftService {
	pub async fn import_muscles(
		&self,
		muscles: Vec<MuscleInput>,
	) -> Result<ImportResponse<MuscleView>> {
		let mut rows = Vec::with_capacity(muscles.len());

		for (index, muscle) in muscles.into_iter().enumerate() {
			rows.push(NewMuscle {
				code: required_field(index, "Code", &muscle.code)?,
				name: required_field(index, "Muscle", &muscle.muscle)?,
				group_name: required_field(index, "Group", &muscle.group)?,
			});
		}

		if rows.is_empty() {
			return Ok(ImportResponse::new(Vec::new()));
		}

		let inserted = self.store.insert_muscles(&rows).await?;

		tracing::info!(imported = inserted.len(), "Muscles imported.");

		Ok(ImportResponse::new(inserted.into_iter().map(MuscleView::from).collect()))
	}

	pub async fn import_workouts(
		&self,
		workouts: Vec<BulkWorkout>,
	) -> Result<ImportResponse<WorkoutView>> {
		let rows = workouts
			.into_iter()
			.enumerate()
			.map(|(index, workout)| new_workout(index, workout))
			.collect::<Result<Vec<_>>>()?;

		if rows.is_empty() {
			return Ok(ImportResponse::new(Vec::new()));
		}

		let inserted = self.store.insert_workouts(&rows).await?;

		tracing::info!(imported = inserted.len(), "Workouts imported.");

		Ok(ImportResponse::new(inserted.into_iter().map(WorkoutView::from).collect()))
	}
}

fn new_workout(index: usize, workout: BulkWorkout) -> Result<NewWorkout> {
	let external_id = required_field(index, "id", &workout.id.to_string())?;
	let name = required_field(index, "name", &workout.name)?;
	let activations = activations(index, workout.muscle_activation)?;
	let lexical = LexicalDocument::from_fields(
		&name,
		None,
		&workout.secondary_muscles,
		workout.target.as_deref(),
		workout.body_part.as_deref(),
		workout.equipment.as_deref(),
	);

	Ok(NewWorkout {
		external_id,
		name,
		description: Some(String::new()),
		body_part: workout.body_part,
		equipment: workout.equipment,
		gif_url: workout.gif_url,
		target: workout.target,
		secondary_muscles: workout.secondary_muscles,
		instructions: workout.instructions,
		latest_instructions: workout.latest_instructions,
		is_public: true,
		lexical,
		activations,
	})
}

fn activations(index: usize, set: MuscleActivationSet) -> Result<Vec<NewActivation>> {
	let primary = set.primary_muscle.into_iter().map(|input| (input, true));
	let secondary = set.secondary_muscle.into_iter().map(|input| (input, false));
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for (input, is_primary) in primary.chain(secondary) {
		let code = required_field(index, "muscleActivation.code", &input.code)?;

		if !input.activation.is_finite() || !(0.0..=1.0).contains(&input.activation) {
			return Err(Error::InvalidRequest {
				message: format!(
					"Workout at index {index}: activation for {code:?} must be within [0, 1]."
				),
			});
		}
		if !seen.insert(code.clone()) {
			return Err(Error::InvalidRequest {
				message: format!("Workout at index {index}: muscle {code:?} is listed twice."),
			});
		}

		out.push(NewActivation { muscle_code: code, is_primary, activation: input.activation });
	}

	Ok(out)
}

fn required_field(index: usize, field: &str, value: &str) -> Result<String> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidRequest {
			message: format!("Item at index {index}: {field} must be non-empty."),
		});
	}

	Ok(trimmed.to_string())
}
