use std::fs;
use std::path::PathBuf;

use dissect::cli::OutputFormat;
use dissect::config::Config;
use dissect::test_utils::fixtures::UnitTestFixture;
use dissect::test_utils::{TestCase, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_sections_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase::new(
            "default",
            "tests/fixtures/configs/default.toml",
            (500usize, 20usize, true, None, 5_000_000u64, OutputFormat::Human),
        ),
        TestCase::new(
            "tight",
            "tests/fixtures/configs/tight.toml",
            (80, 20, true, Some(5usize), 5_000_000, OutputFormat::Jsonl),
        ),
        TestCase::new(
            "no_fallback",
            "tests/fixtures/configs/no_fallback.toml",
            (500, 20, false, None, 5_000_000, OutputFormat::Human),
        ),
    ];

    run_table_tests(cases, |relative_path| {
        let path = fixture_path(relative_path);
        let content = fs::read_to_string(&path).expect("read fixture");
        let config = Config::from_toml_str(&content).expect("parse config");
        (
            config.segmenter.long_segment_chars,
            config.segmenter.min_line_chars,
            config.segmenter.sentence_fallback,
            config.session.history_limit,
            config.input.max_bytes,
            config.robot.output_format(),
        )
    })
}

#[test]
fn explicit_path_skips_project_file() {
    let fixture = UnitTestFixture::new();
    let _project = fixture.create_file(
        "dissect.toml",
        "[segmenter]\nmin_line_chars = 3\n",
    );
    let explicit = fixture.create_file("custom.toml", "[segmenter]\nmin_line_chars = 7\n");

    let config = Config::load(Some(explicit.as_path()), &fixture.data_path).unwrap();
    assert_eq!(config.segmenter.min_line_chars, 7);
}

#[test]
fn missing_explicit_path_is_an_error() {
    let fixture = UnitTestFixture::new();
    let missing = fixture.data_path.join("absent.toml");
    let err = Config::load(Some(missing.as_path()), &fixture.data_path).unwrap_err();
    assert_eq!(err.code(), "missing_config");
}

#[test]
fn malformed_file_is_a_config_error() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file("broken.toml", "[segmenter\nmin_line_chars = 3");
    let err = Config::load(Some(path.as_path()), &fixture.data_path).unwrap_err();
    assert_eq!(err.code(), "config");
    assert!(err.to_string().contains("broken.toml"));
}
