use serde::{Deserialize, Serialize};

use lift_storage::models::ScoredWorkout;

use crate::{Error, LiftService, Page, Result, WorkoutView};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesRequest {
	/// Raw path segment; must parse as a workout id.
	#[serde(default)]
	pub id: String,
	pub page: Option<String>,
	pub page_size: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AlternativeItem {
	#[serde(flatten)]
	pub workout: WorkoutView,
	/// `1 - cosine distance` to the requested workout.
	pub similarity: f32,
}
impl From<ScoredWorkout> for AlternativeItem {
	fn from(row: ScoredWorkout) -> Self {
		Self { workout: row.workout.into(), similarity: 1.0 - row.score }
	}
}

impl LiftService {
	/// Workouts with the most similar muscle profile, nearest first.
	pub async fn alternatives(&self, req: AlternativesRequest) -> Result<Page<AlternativeItem>> {
		let workout_id = req.id.trim().parse::<i32>().map_err(|_| Error::InvalidRequest {
			message: format!("Workout id must be an integer, got {:?}.", req.id),
		})?;
		let window = self.page_window(req.page.as_deref(), req.page_size.as_deref())?;
		let Some(vector) = self.store.fetch_embedding(workout_id).await? else {
			return Err(Error::NotFound {
				message: format!("Workout {workout_id} does not exist or has no muscle embedding."),
			});
		};
		let rows = self
			.store
			.nearest_by_embedding(&vector, workout_id, window.limit(), window.offset())
			.await?;

		Ok(Page::new(rows.into_iter().map(AlternativeItem::from).collect(), window))
	}
}
