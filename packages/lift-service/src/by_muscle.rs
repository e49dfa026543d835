use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use lift_storage::models::{Muscle, MuscleWorkout};

use crate::{Error, LiftService, Result, WorkoutView};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleWorkoutsRequest {
	#[serde(default)]
	pub code: String,
	pub is_primary: Option<String>,
	pub page: Option<String>,
	pub page_size: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleView {
	pub id: i32,
	pub code: String,
	pub name: String,
	pub group_name: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Muscle> for MuscleView {
	fn from(muscle: Muscle) -> Self {
		Self {
			id: muscle.id,
			code: muscle.code,
			name: muscle.name,
			group_name: muscle.group_name,
			created_at: muscle.created_at,
			updated_at: muscle.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleWorkoutItem {
	#[serde(flatten)]
	pub workout: WorkoutView,
	pub activation: f32,
	pub is_primary: bool,
}
impl From<MuscleWorkout> for MuscleWorkoutItem {
	fn from(row: MuscleWorkout) -> Self {
		Self { workout: row.workout.into(), activation: row.activation, is_primary: row.is_primary }
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleWorkoutsPage {
	pub muscle: MuscleView,
	pub data: Vec<MuscleWorkoutItem>,
	pub page: u32,
	pub page_size: u32,
	pub total: usize,
}

impl LiftService {
	/// Workouts that activate one muscle, weakest activation first.
	pub async fn workouts_by_muscle(
		&self,
		req: MuscleWorkoutsRequest,
	) -> Result<MuscleWorkoutsPage> {
		let code = req.code.trim();
		let is_primary = parse_is_primary(req.is_primary.as_deref())?;
		let window = self.page_window(req.page.as_deref(), req.page_size.as_deref())?;

		if code.is_empty() {
			return Err(Error::InvalidRequest { message: "Muscle code is required.".to_string() });
		}

		let Some(muscle) = self.store.find_muscle(code).await? else {
			return Err(Error::NotFound { message: format!("Muscle {code:?} does not exist.") });
		};
		let rows = self
			.store
			.workouts_by_muscle(code, is_primary, window.limit(), window.offset())
			.await?;
		let data: Vec<MuscleWorkoutItem> = rows.into_iter().map(MuscleWorkoutItem::from).collect();

		Ok(MuscleWorkoutsPage {
			muscle: muscle.into(),
			total: data.len(),
			data,
			page: window.page,
			page_size: window.page_size,
		})
	}
}

fn parse_is_primary(raw: Option<&str>) -> Result<Option<bool>> {
	match raw.map(str::trim) {
		None | Some("") => Ok(None),
		Some("true") => Ok(Some(true)),
		Some("false") => Ok(Some(false)),
		Some(other) => Err(Error::InvalidRequest {
			message: format!("isPrimary must be true or false, got {other:?}."),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::parse_is_primary;

	#[test]
	fn is_primary_accepts_only_booleans() {
		assert_eq!(parse_is_primary(None).ok(), Some(None));
		assert_eq!(parse_is_primary(Some("true")).ok(), Some(Some(true)));
		assert_eq!(parse_is_primary(Some("false")).ok(), Some(Some(false)));
		assert!(parse_is_primary(Some("yes")).is_err());
	}
}
