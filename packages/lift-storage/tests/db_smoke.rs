use lift_config::{Postgres, Search};
use lift_domain::lexical::LexicalDocument;
use lift_storage::{
	Error, WorkoutStore,
	db::Db,
	models::{NewActivation, NewMuscle, NewWorkout},
	pg::PgWorkoutStore,
};
use lift_testkit::TestDatabase;

fn new_workout(external_id: &str, name: &str, description: &str, code: &str) -> NewWorkout {
	NewWorkout {
		external_id: external_id.to_string(),
		name: name.to_string(),
		description: Some(description.to_string()),
		body_part: Some("chest".to_string()),
		equipment: Some("barbell".to_string()),
		gif_url: None,
		target: Some("pectorals".to_string()),
		secondary_muscles: vec!["triceps".to_string()],
		instructions: vec!["Lie down.".to_string(), "Press.".to_string()],
		latest_instructions: Vec::new(),
		is_public: true,
		lexical: LexicalDocument::from_fields(
			name,
			Some(description),
			&["triceps".to_string()],
			Some("pectorals"),
			Some("chest"),
			Some("barbell"),
		),
		activations: vec![NewActivation {
			muscle_code: code.to_string(),
			is_primary: true,
			activation: 0.9,
		}],
	}
}

async fn bootstrap(test_db: &TestDatabase) -> PgWorkoutStore {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(84).await.expect("Failed to ensure schema.");

	PgWorkoutStore::new(db, &Search::default())
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LIFT_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = lift_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set LIFT_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = bootstrap(&test_db).await;

	store.db.ensure_schema(84).await.expect("Failed to ensure schema twice.");
	store.ping().await.expect("Failed to ping.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM pg_indexes WHERE indexname = 'workouts_muscle_vector_idx'",
	)
	.fetch_one(&store.db.pool)
	.await
	.expect("Failed to query indexes.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LIFT_PG_DSN to run."]
async fn indexed_workouts_are_searchable_and_similar() {
	let Some(base_dsn) = lift_testkit::env_dsn() else {
		eprintln!(
			"Skipping indexed_workouts_are_searchable_and_similar; set LIFT_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = bootstrap(&test_db).await;
	let muscles = [("PEC", "Pectorals", "Chest"), ("TRI", "Triceps", "Arms")].map(
		|(code, name, group)| NewMuscle {
			code: code.to_string(),
			name: name.to_string(),
			group_name: group.to_string(),
		},
	);

	store.insert_muscles(&muscles).await.expect("Failed to insert muscles.");

	let inserted = store
		.insert_workouts(&[
			new_workout("w-1", "Barbell Bench Press", "Press the bar from the chest.", "PEC"),
			new_workout("w-2", "Close Grip Bench Press", "Narrow grip press.", "PEC"),
			new_workout("w-3", "Triceps Pushdown", "Push the cable down.", "TRI"),
		])
		.await
		.expect("Failed to insert workouts.");

	assert_eq!(inserted.len(), 3);
	assert_eq!(inserted[0].instructions, vec!["Lie down.".to_string(), "Press.".to_string()]);

	let lexical = store.lexical_search("bench press", 20, 0).await.expect("Lexical search failed.");

	assert_eq!(lexical.len(), 2);
	assert!(lexical.iter().all(|row| row.score > 0.0));

	let fuzzy = store.fuzzy_search("bench pres", 0.3, 20).await.expect("Fuzzy search failed.");

	assert!(fuzzy.iter().all(|row| row.score > 0.3));

	let report = store.rebuild_embeddings(84).await.expect("Failed to rebuild embeddings.");

	assert_eq!(report.rebuilt, 3);

	let target = inserted[0].id;
	let vector = store
		.fetch_embedding(target)
		.await
		.expect("Failed to fetch embedding.")
		.expect("Missing embedding.");

	assert_eq!(vector.len(), 84);

	let nearest =
		store.nearest_by_embedding(&vector, target, 20, 0).await.expect("Nearest query failed.");

	assert!(nearest.iter().all(|row| row.workout.id != target));
	assert_eq!(nearest.first().map(|row| row.workout.id), Some(inserted[1].id));

	let duplicate = store
		.insert_workouts(&[new_workout("w-1", "Again", "Duplicate external id.", "PEC")])
		.await;

	assert!(matches!(duplicate, Err(Error::Conflict(_))));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LIFT_PG_DSN to run."]
async fn nearest_pages_continue_past_the_default_candidate_limit() {
	let Some(base_dsn) = lift_testkit::env_dsn() else {
		eprintln!(
			"Skipping nearest_pages_continue_past_the_default_candidate_limit; set LIFT_PG_DSN to \
			 run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = bootstrap(&test_db).await;
	let muscles = [("PEC", "Pectorals", "Chest"), ("TRI", "Triceps", "Arms")].map(
		|(code, name, group)| NewMuscle {
			code: code.to_string(),
			name: name.to_string(),
			group_name: group.to_string(),
		},
	);

	store.insert_muscles(&muscles).await.expect("Failed to insert muscles.");

	// Distance to the target grows with the triceps share, so insert order is distance order.
	let with_triceps = |external_id: String, triceps: f32| {
		let mut workout = new_workout(&external_id, "Press Variation", "Press.", "PEC");

		workout.activations[0].activation = 1.0;
		workout.activations.push(NewActivation {
			muscle_code: "TRI".to_string(),
			is_primary: false,
			activation: triceps,
		});

		workout
	};
	let mut batch = vec![new_workout("target", "Flat Press", "Press.", "PEC")];

	batch.extend((1..=60).map(|step| with_triceps(format!("step-{step}"), step as f32 / 100.0)));
	batch.push(with_triceps("twin-30".to_string(), 0.30));

	let inserted = store.insert_workouts(&batch).await.expect("Failed to insert workouts.");

	store.rebuild_embeddings(84).await.expect("Failed to rebuild embeddings.");

	let target = inserted[0].id;
	let vector = store
		.fetch_embedding(target)
		.await
		.expect("Failed to fetch embedding.")
		.expect("Missing embedding.");
	let twin = inserted[61].id;
	let mut expected: Vec<i32> = inserted[1..=60].iter().map(|workout| workout.id).collect();

	expected.insert(30, twin);

	let mut returned = Vec::new();

	for offset in [0, 20, 40, 60] {
		let page = store
			.nearest_by_embedding(&vector, target, 20, offset)
			.await
			.expect("Nearest query failed.");

		if offset == 40 {
			assert_eq!(page.len(), 20, "Third page must not be cut off by the index scan.");
		}

		returned.extend(page.into_iter().map(|row| row.workout.id));
	}

	assert_eq!(returned, expected);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
