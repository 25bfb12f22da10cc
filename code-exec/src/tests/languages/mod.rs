use super::utils::defaults::*;
use crate::{languages::skip_if_not_available, ExecutionRequest, Result};
use tokio::time::Duration;

pub mod cpp;
pub mod golang;
pub mod java;
pub mod javascript;

// Common test utilities for language tests
pub(crate) async fn test_language_execution(
    language: &str,
    code: &str,
    tools: &[&str],
    expected: &str,
) -> Result<()> {
    if skip_if_not_available(tools) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let request = ExecutionRequest::new(code, language).with_time_limit(default_timeout());

    let result = service.execute(request).await?;
    assert!(result.success, "unexpected failure: {:?}", result);
    assert_eq!(result.output, expected);
    assert!(result.error.is_none());
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}

pub(crate) async fn test_language_with_input(
    language: &str,
    code: &str,
    tools: &[&str],
    stdin: &str,
    expected: &str,
) -> Result<()> {
    if skip_if_not_available(tools) {
        return Ok(());
    }
    let (service, _dir) = test_service().await?;

    let request = ExecutionRequest::new(code, language)
        .with_stdin(stdin)
        .with_time_limit(default_timeout());

    let result = service.execute(request).await?;
    assert!(result.success, "unexpected failure: {:?}", result);
    assert_eq!(result.output, expected);
    Ok(())
}

/// Exit code 0 is not enough: anything on stderr fails the run
pub(crate) async fn test_language_stderr(language: &str, code: &str, tools: &[&str]) -> Result<()> {
    if skip_if_not_available(tools) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let request = ExecutionRequest::new(code, language).with_time_limit(default_timeout());

    let result = service.execute(request).await?;
    assert!(!result.success);
    assert!(!result.timed_out);
    assert_eq!(result.error.as_deref(), Some("warning"));
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}

pub(crate) async fn test_language_compile_error(
    language: &str,
    code: &str,
    tools: &[&str],
) -> Result<()> {
    if skip_if_not_available(tools) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let request = ExecutionRequest::new(code, language).with_time_limit(default_timeout());

    let result = service.execute(request).await?;
    assert!(!result.success);
    assert!(result.output.is_empty());
    let error = result.error.expect("compiler diagnostics");
    assert!(!error.is_empty());
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}

pub(crate) async fn test_language_timeout(language: &str, code: &str, tools: &[&str]) -> Result<()> {
    if skip_if_not_available(tools) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let request = ExecutionRequest::new(code, language).with_time_limit(short_timeout());

    let result = service.execute(request).await?;
    assert!(!result.success);
    assert!(result.timed_out);
    assert!(result.execution_time < short_timeout() + Duration::from_secs(2));
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}
