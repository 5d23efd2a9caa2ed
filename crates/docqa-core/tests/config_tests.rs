use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tempfile::TempDir;

use docqa_core::config::{expand_path, resolve_with_base, Config, Settings};

// Tests in this binary mutate process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn load_with_env(dir: &TempDir, vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
    for (k, v) in vars {
        env::set_var(k, v);
    }
    let result = Config::load_from(dir.path()).and_then(|c| c.settings());
    for (k, _) in vars {
        env::remove_var(k);
    }
    result
}

fn write_layers(dir: &TempDir) {
    fs::write(
        dir.path().join("config.toml"),
        "[scoring]\ntop_k = 4\nkeyword_weight = 0.7\n\n[answer]\nacceptance_threshold = 0.2\n",
    )
    .expect("write config.toml");
    fs::write(
        dir.path().join("config.test.toml"),
        "[scoring]\ntop_k = 2\n\n[answer]\nacceptance_threshold = 0.3\n",
    )
    .expect("write config.test.toml");
}

#[test]
fn env_vars_override_environment_file_which_overrides_base_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let tmp = TempDir::new().expect("tmp");
    write_layers(&tmp);

    let settings =
        load_with_env(&tmp, &[("RUST_ENV", "test"), ("APP_SCORING__TOP_K", "3")]).expect("settings");

    assert_eq!(settings.scoring.top_k, 3);
    assert!((settings.answer.acceptance_threshold - 0.3).abs() < f32::EPSILON);
    assert!((settings.scoring.keyword_weight - 0.7).abs() < f32::EPSILON);
    assert!((settings.scoring.embedding_weight - 0.2).abs() < f32::EPSILON);
}

#[test]
fn environment_file_is_only_read_for_its_environment() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let tmp = TempDir::new().expect("tmp");
    write_layers(&tmp);

    let settings = load_with_env(&tmp, &[("RUST_ENV", "prod")]).expect("settings");

    assert_eq!(settings.scoring.top_k, 4);
    assert!((settings.answer.acceptance_threshold - 0.2).abs() < f32::EPSILON);
}

#[test]
fn invalid_env_override_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let tmp = TempDir::new().expect("tmp");

    let result = load_with_env(&tmp, &[("APP_CHUNKING__OVERLAP", "400")]);

    assert!(result.is_err());
}

#[test]
fn relative_model_dir_is_resolved_against_config_dir() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("config.toml"), "[embedding]\nmodel_dir = \"models/turkish-bert\"\n")
        .expect("write");

    let settings = load_with_env(&tmp, &[]).expect("settings");

    assert_eq!(PathBuf::from(&settings.embedding.model_dir), tmp.path().join("models/turkish-bert"));
}

#[test]
fn absolute_model_dir_is_kept() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let tmp = TempDir::new().expect("tmp");
    let models = TempDir::new().expect("models");
    fs::write(
        tmp.path().join("config.toml"),
        format!("[embedding]\nmodel_dir = '{}'\n", models.path().display()),
    )
    .expect("write");

    let settings = load_with_env(&tmp, &[]).expect("settings");

    assert_eq!(PathBuf::from(&settings.embedding.model_dir), models.path());
}

#[test]
fn path_helpers_expand_variables() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    env::set_var("DOCQA_MODELS_ROOT", "/opt/docqa");
    let expanded = expand_path("${DOCQA_MODELS_ROOT}/bert");
    let resolved = resolve_with_base(std::path::Path::new("/srv"), "$DOCQA_MODELS_ROOT/bert");
    env::remove_var("DOCQA_MODELS_ROOT");

    assert_eq!(expanded, PathBuf::from("/opt/docqa/bert"));
    assert_eq!(resolved, PathBuf::from("/opt/docqa/bert"));
    assert_eq!(resolve_with_base(std::path::Path::new("/srv"), "models"), PathBuf::from("/srv/models"));
}
