//! Muscle embedding rebuild planning shared by both stores.

use std::collections::HashMap;

use lift_domain::muscle_vector::MuscleLayout;

use crate::models::{Activation, EmbeddingRebuild, EmbeddingUpdate};

/// Computes the embedding of every workout in `workout_ids`.
///
/// `muscle_codes` must be ordered by ascending muscle id; slot `i` belongs to the `i`-th code.
/// Workouts without an activation inside the layout get `None`.
pub fn plan(
	muscle_codes: &[String],
	workout_ids: &[i32],
	activations: &[Activation],
	vector_dim: usize,
) -> Vec<EmbeddingUpdate> {
	let layout = MuscleLayout::new(muscle_codes.iter().map(String::as_str), vector_dim);
	let mut by_workout: HashMap<i32, Vec<(&str, f32)>> = HashMap::new();

	for activation in activations {
		by_workout
			.entry(activation.workout_id)
			.or_default()
			.push((activation.muscle_code.as_str(), activation.activation));
	}

	workout_ids
		.iter()
		.map(|&workout_id| {
			let vector = by_workout
				.get(&workout_id)
				.and_then(|pairs| layout.embed(pairs.iter().copied()));

			EmbeddingUpdate { workout_id, vector }
		})
		.collect()
}

pub fn summarize(updates: &[EmbeddingUpdate]) -> EmbeddingRebuild {
	let rebuilt = updates.iter().filter(|update| update.vector.is_some()).count() as u64;

	EmbeddingRebuild { rebuilt, cleared: updates.len() as u64 - rebuilt }
}

#[cfg(test)]
mod tests {
	use super::{plan, summarize};
	use crate::models::Activation;

	fn activation(workout_id: i32, code: &str, value: f32) -> Activation {
		Activation {
			workout_id,
			muscle_code: code.to_string(),
			is_primary: false,
			activation: value,
		}
	}

	#[test]
	fn workouts_without_layout_activations_are_cleared() {
		let codes = vec!["PEC".to_string(), "TRI".to_string(), "QUA".to_string()];
		let updates = plan(
			&codes,
			&[1, 2, 3],
			&[activation(1, "TRI", 0.5), activation(2, "QUA", 0.8), activation(1, "PEC", 1.0)],
			2,
		);

		assert_eq!(updates[0].vector, Some(vec![1.0, 0.5]));
		assert_eq!(updates[1].vector, None);
		assert_eq!(updates[2].vector, None);

		let summary = summarize(&updates);

		assert_eq!(summary.rebuilt, 1);
		assert_eq!(summary.cleared, 2);
	}
}
