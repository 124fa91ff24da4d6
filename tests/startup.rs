use heartai::config::AppConfig;
use heartai::error::{ArtifactKind, HeartError};
use heartai::server::build_state;
use std::path::Path;

fn write_artifacts(dir: &Path) {
    std::fs::write(
        dir.join("classifier.json"),
        r#"{"input_dim": 5, "layers": [
            {"weights": [[0.2, 0.1, 0.3, 0.5, -0.4], [0.1, -0.2, 0.2, 0.1, 0.3]], "bias": [0.0, 0.1], "activation": "relu"},
            {"weights": [[0.7, -0.3]], "bias": [-0.2], "activation": "sigmoid"}
        ]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("scaler.json"),
        r#"{"mean": [53.0, 126.0, 81.0], "scale": [6.8, 16.5, 9.3]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("threshold.json"), r#"{"threshold": 0.5}"#).unwrap();
}

fn write_dataset(path: &Path) {
    std::fs::write(
        path,
        "id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio\n\
         0;18393;2;168;62.0;110;80;1;1;0;0;1;0\n\
         1;20228;1;156;85.0;140;90;3;1;0;0;1;1\n",
    )
    .unwrap();
}

fn config(root: &Path) -> AppConfig {
    let mut config = AppConfig::load_from(root.join("no-config")).unwrap();
    config.artifacts.dir = root.join("artifacts");
    config.dataset.path = root.join("cardio_train.csv");
    config
}

#[test]
fn starts_with_artifacts_and_dataset() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("artifacts")).unwrap();
    write_artifacts(&root.path().join("artifacts"));
    write_dataset(&root.path().join("cardio_train.csv"));

    let state = build_state(&config(root.path())).unwrap();
    assert_eq!(state.analytics.dataset().len(), 2);
    assert_eq!(state.pipeline.artifacts().threshold().value(), 0.5);
}

#[test]
fn missing_artifacts_abort_startup() {
    let root = tempfile::tempdir().unwrap();
    write_dataset(&root.path().join("cardio_train.csv"));

    match build_state(&config(root.path())) {
        Err(HeartError::ArtifactLoad(err)) => assert_eq!(err.kind, ArtifactKind::Scaler),
        other => panic!("expected artifact failure, got {other:?}"),
    }
}

#[test]
fn corrupt_threshold_aborts_startup() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("artifacts")).unwrap();
    write_artifacts(&root.path().join("artifacts"));
    std::fs::write(root.path().join("artifacts/threshold.json"), "1.5").unwrap();
    write_dataset(&root.path().join("cardio_train.csv"));

    match build_state(&config(root.path())) {
        Err(HeartError::ArtifactLoad(err)) => assert_eq!(err.kind, ArtifactKind::Threshold),
        other => panic!("expected threshold failure, got {other:?}"),
    }
}

#[test]
fn missing_dataset_aborts_startup() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("artifacts")).unwrap();
    write_artifacts(&root.path().join("artifacts"));

    assert!(matches!(
        build_state(&config(root.path())),
        Err(HeartError::Dataset(_))
    ));
}
