use lift_config::LexicalWeights;
use lift_domain::{
	lexical::{LexicalDocument, LexicalIndex, PlainQuery, Tier},
	muscle_vector::{self, MuscleLayout, VectorTextError},
	paging::{PageWindow, PagingError},
	trigram,
};

fn bench_press() -> LexicalDocument {
	LexicalDocument::from_fields(
		"Barbell Bench Press",
		Some("Press the bar from the chest while lying on a flat bench."),
		&["triceps".to_string(), "delts".to_string()],
		Some("pectorals"),
		Some("chest"),
		Some("barbell"),
	)
}

#[test]
fn document_joins_categorical_fields_in_order() {
	let doc = LexicalDocument::from_fields("Squat", None, &[], Some("quads"), None, Some("barbell"));

	assert_eq!(doc.description, "");
	assert_eq!(doc.muscles, "");
	assert_eq!(doc.categorical, "quads  barbell");
}

#[test]
fn plain_query_drops_stop_words_and_duplicates() {
	let query = PlainQuery::parse("The bench and THE Benches");

	assert_eq!(query.terms(), ["bench".to_string()]);
	assert!(PlainQuery::parse("the and of").is_empty());
	assert!(PlainQuery::parse("  ").is_empty());
}

#[test]
fn index_records_every_tier_a_term_occurs_in() {
	let index = LexicalIndex::build(&bench_press());

	assert_eq!(index.tiers_of("bench"), Some([Tier::A, Tier::B].as_slice()));
	assert_eq!(index.tiers_of("barbell"), Some([Tier::A, Tier::D].as_slice()));
	assert_eq!(index.tiers_of("tricep"), Some([Tier::C].as_slice()));
	assert_eq!(index.tiers_of("chest"), Some([Tier::B, Tier::D].as_slice()));
	assert!(index.tiers_of("the").is_none());
}

#[test]
fn every_term_must_match() {
	let index = LexicalIndex::build(&bench_press());

	assert!(index.matches(&PlainQuery::parse("bench presses")));
	assert!(!index.matches(&PlainQuery::parse("bench squat")));
	assert!(!index.matches(&PlainQuery::parse("the")));
}

#[test]
fn higher_tiers_rank_higher() {
	let weights = LexicalWeights::default();
	let by_name = LexicalIndex::build(&LexicalDocument::from_fields(
		"Cable Row",
		None,
		&[],
		None,
		Some("back"),
		Some("cable"),
	));
	let by_equipment = LexicalIndex::build(&LexicalDocument::from_fields(
		"Lat Pulldown",
		None,
		&[],
		None,
		Some("back"),
		Some("cable"),
	));
	let query = PlainQuery::parse("cable");
	let name_rank = by_name.rank(&query, &weights);
	let equipment_rank = by_equipment.rank(&query, &weights);

	assert!(name_rank > equipment_rank);
	assert!((equipment_rank - weights.d).abs() < 1e-6);
	assert!((0.0..=1.0).contains(&name_rank));
	assert_eq!(by_name.rank(&PlainQuery::parse("squat"), &weights), 0.0);
}

#[test]
fn trigram_similarity_matches_pg_trgm() {
	assert!((trigram::similarity("word", "two words") - 4.0 / 11.0).abs() < 1e-6);
	assert_eq!(trigram::similarity("Bench Press", "bench press"), 1.0);
	assert_eq!(trigram::similarity("", "bench"), 0.0);
	assert_eq!(trigram::similarity("!!!", "bench"), 0.0);
}

#[test]
fn misspellings_stay_above_the_fuzzy_threshold() {
	assert!(trigram::similarity("Barbell Bench Press", "bench pres") > 0.3);
	assert!(trigram::similarity("Barbell Bench Press", "deadlift") < 0.3);
}

#[test]
fn best_field_similarity_takes_the_max() {
	let score = trigram::best_field_similarity("curl", "Hammer Curl", Some("curl"));

	assert_eq!(score, 1.0);
	assert_eq!(
		trigram::best_field_similarity("curl", "Hammer Curl", None),
		trigram::similarity("Hammer Curl", "curl")
	);
}

#[test]
fn cosine_distance_bounds() {
	let a = [1.0, 0.0, 0.0];
	let b = [0.0, 1.0, 0.0];
	let c = [2.0, 0.0, 0.0];

	assert!(muscle_vector::cosine_distance(&a, &c).unwrap().abs() < 1e-6);
	assert!((muscle_vector::cosine_distance(&a, &b).unwrap() - 1.0).abs() < 1e-6);
	assert_eq!(muscle_vector::cosine_distance(&a, &[0.0, 0.0, 0.0]), None);
	assert_eq!(muscle_vector::cosine_distance(&a, &[1.0, 0.0]), None);
}

#[test]
fn pg_vector_text_round_trips() {
	let text = muscle_vector::vector_to_pg(&[0.5, 0.0, 1.0]);

	assert_eq!(text, "[0.5,0,1]");
	assert_eq!(muscle_vector::parse_pg_vector(&text), Ok(vec![0.5, 0.0, 1.0]));
	assert_eq!(muscle_vector::parse_pg_vector("[]"), Ok(Vec::new()));
	assert_eq!(muscle_vector::parse_pg_vector("0.5,1"), Err(VectorTextError::NotBracketed));
	assert_eq!(muscle_vector::parse_pg_vector("[0.5,x]"), Err(VectorTextError::NonNumeric));
}

#[test]
fn layout_assigns_slots_in_order_and_respects_dim() {
	let layout = MuscleLayout::new(["PEC", "TRI", "DEL", "QUA"], 3);

	assert_eq!(layout.slot("PEC"), Some(0));
	assert_eq!(layout.slot("DEL"), Some(2));
	assert_eq!(layout.slot("QUA"), None);

	let vec = layout.embed([("TRI", 0.4), ("PEC", 0.9), ("QUA", 1.0), ("TRI", 0.6)]);

	assert_eq!(vec, Some(vec![0.9, 0.6, 0.0]));
	assert_eq!(layout.embed([("QUA", 1.0)]), None);
	assert_eq!(layout.embed([("PEC", 0.0)]), None);
}

#[test]
fn paging_defaults_and_clamps() {
	let window = PageWindow::resolve(None, None, 20, 50).unwrap();

	assert_eq!(window, PageWindow { page: 1, page_size: 20 });
	assert_eq!(window.offset(), 0);

	let window = PageWindow::resolve(Some("3"), Some("100"), 20, 50).unwrap();

	assert_eq!(window.page_size, 50);
	assert_eq!(window.offset(), 100);

	let window = PageWindow::resolve(Some("1"), Some("500"), 20, 500).unwrap();

	assert_eq!(window.page_size, 50);

	let window = PageWindow::resolve(Some("0"), Some("-5"), 20, 50).unwrap();

	assert_eq!(window, PageWindow { page: 1, page_size: 1 });
	assert_eq!(
		PageWindow::resolve(Some("two"), None, 20, 50),
		Err(PagingError::InvalidPage("two".to_string()))
	);
	assert_eq!(
		PageWindow::resolve(None, Some("1.5"), 20, 50),
		Err(PagingError::InvalidPageSize("1.5".to_string()))
	);
}
