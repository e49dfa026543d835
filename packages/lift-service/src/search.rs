//! Hybrid workout search: a lexical stage, a fuzzy trigram fallback and a de-duplicating merge.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use lift_domain::paging::PageWindow;
use lift_storage::models::ScoredWorkout;

use crate::{Error, LiftService, Page, Result, WorkoutView};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub q: Option<String>,
	pub page: Option<String>,
	pub page_size: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AutocompleteRequest {
	pub q: Option<String>,
}

/// A search hit. `rank` is the lexical rank for lexical hits and the trigram similarity for
/// fuzzy hits.
#[derive(Clone, Debug, Serialize)]
pub struct SearchItem {
	#[serde(flatten)]
	pub workout: WorkoutView,
	pub rank: f32,
}
impl From<ScoredWorkout> for SearchItem {
	fn from(row: ScoredWorkout) -> Self {
		Self { workout: row.workout.into(), rank: row.score }
	}
}

impl LiftService {
	pub async fn search_workouts(&self, req: SearchRequest) -> Result<Page<SearchItem>> {
		let query = required_query(req.q.as_deref())?;
		let window = self.page_window(req.page.as_deref(), req.page_size.as_deref())?;
		let lexical = self.store.lexical_search(query, window.limit(), window.offset()).await?;
		let fuzzy_cfg = &self.cfg.search.fuzzy;
		let fuzzy = if should_run_fuzzy(lexical.len(), fuzzy_cfg.trigger_below) {
			tracing::debug!(
				lexical = lexical.len(),
				page = window.page,
				"Lexical page is sparse. Running fuzzy fallback."
			);

			self.store.fuzzy_search(query, fuzzy_cfg.threshold, window.limit()).await?
		} else {
			Vec::new()
		};
		let merged = merge(lexical, fuzzy);

		Ok(Page::new(merged.into_iter().map(SearchItem::from).collect(), window))
	}

	/// Lexical matches only, first page, capped at `search.autocomplete_limit`.
	pub async fn autocomplete(&self, req: AutocompleteRequest) -> Result<Vec<SearchItem>> {
		let query = required_query(req.q.as_deref())?;
		let window = PageWindow::first(self.cfg.search.autocomplete_limit);
		let rows = self.store.lexical_search(query, window.limit(), window.offset()).await?;

		Ok(rows.into_iter().map(SearchItem::from).collect())
	}
}

/// The fallback looks only at the size of the current lexical page, so a later page of a large
/// result set that holds few rows still triggers it.
pub fn should_run_fuzzy(lexical_page_len: usize, trigger_below: u32) -> bool {
	lexical_page_len < trigger_below as usize
}

/// Lexical rows in their order, then fuzzy rows whose id is not already present.
pub fn merge(lexical: Vec<ScoredWorkout>, fuzzy: Vec<ScoredWorkout>) -> Vec<ScoredWorkout> {
	let mut seen: HashSet<i32> = lexical.iter().map(|row| row.workout.id).collect();
	let mut merged = lexical;

	merged.extend(fuzzy.into_iter().filter(|row| seen.insert(row.workout.id)));

	merged
}

fn required_query(raw: Option<&str>) -> Result<&str> {
	match raw.map(str::trim) {
		Some(query) if !query.is_empty() => Ok(query),
		_ => Err(Error::InvalidRequest { message: "Search query is required.".to_string() }),
	}
}

#[cfg(test)]
mod tests {
	use super::{required_query, should_run_fuzzy};

	#[test]
	fn fuzzy_trigger_is_strictly_below() {
		assert!(should_run_fuzzy(4, 5));
		assert!(!should_run_fuzzy(5, 5));
		assert!(should_run_fuzzy(0, 5));
	}

	#[test]
	fn blank_queries_are_rejected() {
		assert!(required_query(None).is_err());
		assert!(required_query(Some("   ")).is_err());
		assert_eq!(required_query(Some(" bench ")).ok(), Some("bench"));
	}
}
