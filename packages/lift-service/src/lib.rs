pub mod admin;
pub mod alternatives;
pub mod by_muscle;
pub mod health;
pub mod import;
pub mod search;
pub mod time_serde;

mod error;

pub use admin::RebuildReport;
pub use alternatives::{AlternativeItem, AlternativesRequest};
pub use by_muscle::{MuscleView, MuscleWorkoutItem, MuscleWorkoutsPage, MuscleWorkoutsRequest};
pub use error::{Error, Result};
pub use health::PingResponse;
pub use import::{
	BulkWorkout, ImportResponse, MuscleActivationInput, MuscleActivationSet, MuscleInput,
	WorkoutExternalId,
};
pub use lift_storage::{BoxFuture, WorkoutStore};
pub use search::{AutocompleteRequest, SearchItem, SearchRequest};

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use lift_config::Config;
use lift_domain::paging::PageWindow;
use lift_storage::models::Workout;

pub struct LiftService {
	pub cfg: Config,
	pub store: Arc<dyn WorkoutStore>,
}
impl LiftService {
	pub fn new(cfg: Config, store: Arc<dyn WorkoutStore>) -> Self {
		Self { cfg, store }
	}

	pub(crate) fn page_window(
		&self,
		page: Option<&str>,
		page_size: Option<&str>,
	) -> Result<PageWindow> {
		let search = &self.cfg.search;

		Ok(PageWindow::resolve(page, page_size, search.default_page_size, search.max_page_size)?)
	}
}

/// Paginated response envelope. `total` counts the rows in `data`, not the matching corpus.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub data: Vec<T>,
	pub page: u32,
	pub page_size: u32,
	pub total: usize,
}
impl<T> Page<T> {
	pub fn new(data: Vec<T>, window: PageWindow) -> Self {
		let total = data.len();

		Self { data, page: window.page, page_size: window.page_size, total }
	}
}

/// Public shape of a workout. The lexical index and the embedding never leave the store.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutView {
	pub id: i32,
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
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Workout> for WorkoutView {
	fn from(workout: Workout) -> Self {
		Self {
			id: workout.id,
			external_id: workout.external_id,
			name: workout.name,
			description: workout.description,
			body_part: workout.body_part,
			equipment: workout.equipment,
			gif_url: workout.gif_url,
			target: workout.target,
			secondary_muscles: workout.secondary_muscles,
			instructions: workout.instructions,
			latest_instructions: workout.latest_instructions,
			is_public: workout.is_public,
			created_at: workout.created_at,
			updated_at: workout.updated_at,
		}
	}
}
