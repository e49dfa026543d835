use serde::Serialize;
use tokio::time::Instant;

use crate::{LiftService, Result};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
	pub status: &'static str,
	pub latency_ms: u64,
}

impl LiftService {
	/// Round-trips the store and reports how long it took.
	pub async fn ping(&self) -> Result<PingResponse> {
		let started = Instant::now();

		self.store.ping().await?;

		let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

		Ok(PingResponse { status: "pong", latency_ms })
	}
}
