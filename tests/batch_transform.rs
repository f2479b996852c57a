use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use geojson_transform::batch::{
    run_batch, BatchObserver, BatchOptions, BatchSeverity, DocumentContext, DocumentErrorPolicy,
    DocumentStats,
};
use geojson_transform::config::{load_config_from_str, Config, DirectorySet};
use geojson_transform::document::read_collection_from_path;
use geojson_transform::TransformError;

const MAPPING: &str = r#"{
    "properties": [
        { "name": "name", "type": "property", "value": "NAME" },
        { "name": "kind", "type": "constant", "value": "parcel" },
        { "name": "address", "type": "join", "value": {
            "delimiter": " ",
            "values": [
                { "type": "property", "value": "HOUSE_NO" },
                { "type": "property", "value": "STREET" }
            ] } }
    ]
}"#;

const DOC_A: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.65,39.78]},"properties":{"NAME":"Alpha","HOUSE_NO":"12","STREET":"Main St"}},
    {"type":"Feature","geometry":null,"properties":{"NAME":"Beta","HOUSE_NO":"","STREET":"Side St"}}
]}"#;

const DOC_B: &str = r#"{"type":"FeatureCollection","features":[
    {"type":"Feature","geometry":{"type":"Point","coordinates":[-89.60,39.80]},"properties":{"NAME":"Gamma","HOUSE_NO":"7","STREET":"North Ave"}}
]}"#;

fn tmp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("geojson-transform-batch-{label}-{nanos}"))
}

fn config_for(input: &Path, output: &Path) -> Config {
    let mut config = load_config_from_str(MAPPING).unwrap();
    config.directories = vec![DirectorySet {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
    }];
    config
}

fn seed_input(input: &Path) {
    fs::create_dir_all(input).unwrap();
    fs::write(input.join("a.geojson"), DOC_A).unwrap();
    fs::write(input.join("b.geojson"), DOC_B).unwrap();
}

fn output_file_names(output: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(output)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[test]
fn batch_writes_matching_documents_and_clears_stale_output() {
    let root = tmp_dir("consistency");
    let input = root.join("in");
    let output = root.join("out");
    seed_input(&input);
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("stale.txt"), "leftover").unwrap();

    let summary = run_batch(&config_for(&input, &output), &BatchOptions::default()).unwrap();
    assert_eq!(summary.documents_written, 2);
    assert_eq!(summary.features_transformed, 3);
    assert_eq!(summary.documents_skipped, 0);
    assert_eq!(output_file_names(&output), vec!["a.geojson", "b.geojson"]);

    let a = read_collection_from_path(output.join("a.geojson")).unwrap();
    assert_eq!(a.feature_count(), 2);

    let first = a.features[0].properties.as_ref().unwrap();
    assert_eq!(first["name"], "Alpha");
    assert_eq!(first["kind"], "parcel");
    assert_eq!(first["address"], "12 Main St");
    assert_eq!(
        a.features[0].geometry,
        serde_json::json!({ "type": "Point", "coordinates": [-89.65, 39.78] })
    );

    // Falsy house number vanishes from the join with no dangling delimiter.
    let second = a.features[1].properties.as_ref().unwrap();
    assert_eq!(second["address"], "Side St");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn runs_are_idempotent() {
    let root = tmp_dir("idempotent");
    let input = root.join("in");
    let output = root.join("out");
    seed_input(&input);
    let config = config_for(&input, &output);

    run_batch(&config, &BatchOptions::default()).unwrap();
    let first_a = fs::read(output.join("a.geojson")).unwrap();
    let first_b = fs::read(output.join("b.geojson")).unwrap();

    run_batch(&config, &BatchOptions::default()).unwrap();
    assert_eq!(fs::read(output.join("a.geojson")).unwrap(), first_a);
    assert_eq!(fs::read(output.join("b.geojson")).unwrap(), first_b);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn parallel_output_matches_sequential() {
    let root = tmp_dir("parallel");
    let input = root.join("in");
    seed_input(&input);

    let sequential_out = root.join("out-seq");
    run_batch(
        &config_for(&input, &sequential_out),
        &BatchOptions::default(),
    )
    .unwrap();

    let parallel_out = root.join("out-par");
    let options = BatchOptions {
        num_threads: Some(4),
        ..Default::default()
    };
    let summary = run_batch(&config_for(&input, &parallel_out), &options).unwrap();
    assert_eq!(summary.documents_written, 2);

    for name in output_file_names(&sequential_out) {
        assert_eq!(
            fs::read(parallel_out.join(&name)).unwrap(),
            fs::read(sequential_out.join(&name)).unwrap(),
            "content differs for {name}"
        );
    }

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn abort_policy_propagates_and_leaves_partial_output() {
    let root = tmp_dir("abort");
    let input = root.join("in");
    let output = root.join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.geojson"), DOC_A).unwrap();
    fs::write(input.join("b_bad.geojson"), "{ not a document").unwrap();
    fs::write(input.join("c.geojson"), DOC_B).unwrap();

    let err = run_batch(&config_for(&input, &output), &BatchOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::Document { .. }));

    // Files processed before the failure stay on disk; later ones were never reached.
    assert_eq!(output_file_names(&output), vec!["a.geojson"]);

    let _ = fs::remove_dir_all(&root);
}

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<PathBuf>>,
    failures: Mutex<Vec<(PathBuf, BatchSeverity)>>,
}

impl BatchObserver for RecordingObserver {
    fn on_success(&self, ctx: &DocumentContext, _stats: DocumentStats) {
        self.successes.lock().unwrap().push(ctx.input.clone());
    }

    fn on_failure(&self, ctx: &DocumentContext, severity: BatchSeverity, _error: &TransformError) {
        self.failures
            .lock()
            .unwrap()
            .push((ctx.input.clone(), severity));
    }
}

#[test]
fn skip_policy_reports_and_continues() {
    let root = tmp_dir("skip");
    let input = root.join("in");
    let output = root.join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.geojson"), DOC_A).unwrap();
    fs::write(input.join("b_bad.geojson"), "{ not a document").unwrap();
    fs::write(input.join("c.geojson"), DOC_B).unwrap();

    let observer = Arc::new(RecordingObserver::default());
    let options = BatchOptions {
        on_document_error: DocumentErrorPolicy::Skip,
        observer: Some(observer.clone()),
        ..Default::default()
    };

    let summary = run_batch(&config_for(&input, &output), &options).unwrap();
    assert_eq!(summary.documents_written, 2);
    assert_eq!(summary.documents_skipped, 1);
    assert_eq!(output_file_names(&output), vec!["a.geojson", "c.geojson"]);

    let failures = observer.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, input.join("b_bad.geojson"));
    assert_eq!(failures[0].1, BatchSeverity::Error);
    assert_eq!(observer.successes.lock().unwrap().len(), 2);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn directory_sets_are_processed_in_declared_order() {
    let root = tmp_dir("multi");
    let input_one = root.join("in1");
    let input_two = root.join("in2");
    fs::create_dir_all(&input_one).unwrap();
    fs::create_dir_all(&input_two).unwrap();
    fs::write(input_one.join("a.geojson"), DOC_A).unwrap();
    fs::write(input_two.join("b.geojson"), DOC_B).unwrap();

    let mut config = load_config_from_str(MAPPING).unwrap();
    config.directories = vec![
        DirectorySet {
            input: input_one.clone(),
            output: root.join("out1"),
        },
        DirectorySet {
            input: input_two.clone(),
            output: root.join("out2"),
        },
    ];

    let summary = run_batch(&config, &BatchOptions::default()).unwrap();
    assert_eq!(summary.documents_written, 2);
    assert_eq!(summary.features_transformed, 3);
    assert_eq!(output_file_names(&root.join("out1")), vec!["a.geojson"]);
    assert_eq!(output_file_names(&root.join("out2")), vec!["b.geojson"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn subdirectories_in_the_input_are_not_documents() {
    let root = tmp_dir("subdir");
    let input = root.join("in");
    let output = root.join("out");
    fs::create_dir_all(input.join("nested")).unwrap();
    fs::write(input.join("nested").join("x.geojson"), DOC_B).unwrap();
    fs::write(input.join("a.geojson"), DOC_A).unwrap();

    let summary = run_batch(&config_for(&input, &output), &BatchOptions::default()).unwrap();
    assert_eq!(summary.documents_written, 1);
    assert_eq!(output_file_names(&output), vec!["a.geojson"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_input_directory_is_an_io_error() {
    let root = tmp_dir("missing");
    let err = run_batch(
        &config_for(&root.join("in"), &root.join("out")),
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TransformError::Io(_)));

    let _ = fs::remove_dir_all(&root);
}
