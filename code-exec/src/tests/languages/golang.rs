use super::super::fixtures::{
    code_samples::GO_HELLO,
    compile_errors::GO_SYNTAX_ERROR,
    infinite_loops::GO_LOOP,
    stderr_samples::GO_STDERR,
    test_scenarios::GO_READ_INPUT,
};
use super::*;
use crate::{languages::skip_if_not_available, ExecutionRequest};

const TOOLS: &[&str] = &["go"];

#[tokio::test]
async fn test_go_basic() -> Result<()> {
    test_language_execution("go", GO_HELLO, TOOLS, "Hello from Go!").await
}

#[tokio::test]
async fn test_go_input() -> Result<()> {
    test_language_with_input("go", GO_READ_INPUT, TOOLS, "gopher", "Hello, gopher!").await
}

#[tokio::test]
async fn test_go_stderr_fails() -> Result<()> {
    if skip_if_not_available(TOOLS) {
        return Ok(());
    }
    let (service, _dir) = test_service().await?;

    let request = ExecutionRequest::new(GO_STDERR, "go").with_time_limit(default_timeout());
    let result = service.execute(request).await?;

    // `go run` may add its own lines, so only the program's message is checked
    assert!(!result.success);
    assert!(result.error.unwrap_or_default().contains("warning"));
    Ok(())
}

#[tokio::test]
async fn test_go_syntax_error() -> Result<()> {
    test_language_compile_error("go", GO_SYNTAX_ERROR, TOOLS).await
}

#[tokio::test]
async fn test_go_timeout() -> Result<()> {
    if skip_if_not_available(TOOLS) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    // Includes the build inside `go run`, so only the verdict is checked
    let request = ExecutionRequest::new(GO_LOOP, "go").with_time_limit(Duration::from_secs(3));
    let result = service.execute(request).await?;

    assert!(!result.success);
    assert!(result.timed_out);
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}
