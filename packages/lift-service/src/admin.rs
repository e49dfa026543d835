use serde::Serialize;

use crate::{LiftService, Result};

#[derive(Clone, Debug, Serialize)]
pub struct RebuildReport {
	pub rebuilt_count: u64,
	pub cleared_count: u64,
}

impl LiftService {
	/// Recomputes every muscle embedding from the stored activations.
	///
	/// Slot `i` holds the activation of the muscle with the `i`-th smallest id. Workouts that
	/// activate no muscle inside the layout lose their embedding and drop out of alternatives.
	pub async fn rebuild_embeddings(&self) -> Result<RebuildReport> {
		let vector_dim = self.cfg.storage.embedding.vector_dim as usize;
		let summary = self.store.rebuild_embeddings(vector_dim).await?;

		tracing::info!(
			rebuilt = summary.rebuilt,
			cleared = summary.cleared,
			vector_dim,
			"Embedding rebuild finished."
		);

		Ok(RebuildReport { rebuilt_count: summary.rebuilt, cleared_count: summary.cleared })
	}
}
