//! Dense muscle-activation embeddings.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorTextError {
	NotBracketed,
	NonNumeric,
}

/// Maps muscle codes to embedding slots. Slot `i` belongs to the `i`-th muscle in layout order;
/// muscles past `dim` have no slot.
#[derive(Clone, Debug)]
pub struct MuscleLayout {
	dim: usize,
	slots: HashMap<String, usize>,
}
impl MuscleLayout {
	pub fn new<I, S>(ordered_codes: I, dim: usize) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut slots = HashMap::new();

		for code in ordered_codes.into_iter().map(Into::into) {
			if slots.len() >= dim {
				break;
			}

			let next = slots.len();

			slots.entry(code).or_insert(next);
		}

		Self { dim, slots }
	}

	pub fn dim(&self) -> usize {
		self.dim
	}

	pub fn slot(&self, code: &str) -> Option<usize> {
		self.slots.get(code).copied()
	}

	/// Builds the embedding of one workout. Returns `None` when no activation lands on a slot
	/// with a positive intensity, so the workout stays out of similarity queries.
	pub fn embed<'a, I>(&self, activations: I) -> Option<Vec<f32>>
	where
		I: IntoIterator<Item = (&'a str, f32)>,
	{
		let mut vec = vec![0.0_f32; self.dim];
		let mut any = false;

		for (code, activation) in activations {
			let Some(slot) = self.slot(code) else {
				continue;
			};

			if activation > 0.0 && activation > vec[slot] {
				vec[slot] = activation;
				any = true;
			}
		}

		any.then_some(vec)
	}
}

/// `1 - cos(a, b)`. `None` when the lengths differ or either vector has zero norm.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
	if a.len() != b.len() || a.is_empty() {
		return None;
	}

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return None;
	}

	let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);

	Some((1.0 - cosine) as f32)
}

/// Renders a vector in pgvector text form, e.g. `[0.5,0,1]`.
pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

pub fn parse_pg_vector(text: &str) -> Result<Vec<f32>, VectorTextError> {
	let trimmed = text.trim();
	let inner = trimmed
		.strip_prefix('[')
		.and_then(|s| s.strip_suffix(']'))
		.ok_or(VectorTextError::NotBracketed)?;

	if inner.trim().is_empty() {
		return Ok(Vec::new());
	}

	inner
		.split(',')
		.map(|part| part.trim().parse::<f32>().map_err(|_| VectorTextError::NonNumeric))
		.collect()
}
