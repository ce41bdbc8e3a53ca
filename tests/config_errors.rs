// tests/config_errors.rs

use std::io::Write;
use tempfile::NamedTempFile;
use cellgraph::config::load_and_validate;
use cellgraph::errors::CellgraphError;
use cellgraph::execution::ExecutionId;

fn session_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_out_of_order_ids_return_structured_error() {
    let file = session_file(
        r#"
[[execution]]
id = 3
observed_post = ["x"]

[[execution]]
id = 2
observed_pre = ["x"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::OutOfOrder { previous, current }) => {
            assert_eq!(previous, ExecutionId(3));
            assert_eq!(current, ExecutionId(2));
        }
        Err(e) => panic!("Expected OutOfOrder error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_session_returns_config_error() {
    let file = session_file(
        r#"
[config]
mode = "loose"
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::ConfigError(msg)) => {
            assert!(msg.contains("at least one [[execution]]"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_symbol_with_whitespace_returns_config_error() {
    let file = session_file(
        r#"
[[execution]]
id = 1
observed_post = ["two words"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::ConfigError(msg)) => {
            assert!(msg.contains("execution 1"));
            assert!(msg.contains("two words"));
            assert!(msg.contains("observed_post"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_bad_render_settings_return_config_error() {
    let file = session_file(
        r#"
[render]
padding = 0.5

[[execution]]
id = 1
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::ConfigError(msg)) => assert!(msg.contains("padding")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_pass_list_returns_config_error() {
    let file = session_file(
        r#"
[config]
passes = []

[[execution]]
id = 1
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::ConfigError(msg)) => assert!(msg.contains("passes")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_mode_returns_toml_error() {
    let file = session_file(
        r#"
[config]
mode = "paranoid"

[[execution]]
id = 1
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    match load_and_validate(dir.path().join("Cellgraph.toml")) {
        Err(CellgraphError::IoError(_)) => {}
        Err(e) => panic!("Expected IoError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_strict_fail_fast_undeclared_read_returns_precondition_violation() {
    let file = session_file(
        r#"
[config]
mode = "strict"
fail_fast = true

[[execution]]
id = 1
annotation = "pre(a) post(x)"
observed_pre = ["a", "secret"]
observed_post = ["x", "junk"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::PreconditionViolation {
            execution,
            undeclared,
        }) => {
            assert_eq!(execution, ExecutionId(1));
            assert!(undeclared.contains("secret"));
            assert_eq!(undeclared.len(), 1);
        }
        Err(e) => panic!("Expected PreconditionViolation, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_strict_fail_fast_undeclared_write_returns_postcondition_violation() {
    let file = session_file(
        r#"
[config]
mode = "strict"
fail_fast = true

[[execution]]
id = 1
annotation = "post(x)"
observed_post = ["x"]

[[execution]]
id = 2
annotation = "pre(x) post(y, z)"
observed_pre = ["x"]
observed_post = ["y", "junk"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(CellgraphError::PostconditionViolation {
            execution,
            missing,
            undeclared,
        }) => {
            assert_eq!(execution, ExecutionId(2));
            assert!(missing.contains("z"));
            assert_eq!(missing.len(), 1);
            assert!(undeclared.contains("junk"));
            assert_eq!(undeclared.len(), 1);
        }
        Err(e) => panic!("Expected PostconditionViolation, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_strict_without_fail_fast_loads_with_diagnostics() {
    let file = session_file(
        r#"
[config]
mode = "strict"

[[execution]]
id = 1
annotation = "pre(a) post(x)"
observed_pre = ["a", "secret"]
observed_post = ["x", "junk"]
"#,
    );

    let session = load_and_validate(file.path()).unwrap();
    assert!(session.executions[0].pruned.contains("junk"));
    assert_eq!(session.diagnostics.len(), 2);
}
