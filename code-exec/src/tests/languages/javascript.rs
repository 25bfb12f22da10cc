use super::super::fixtures::{
    code_samples::JS_HELLO,
    infinite_loops::JS_LOOP,
    stderr_samples::JS_STDERR,
    test_scenarios::{JS_DEFERRED_LOG, JS_FORMATTED_LOG, JS_PROMPT_INPUT, JS_THROWS},
};
use super::*;
use crate::{languages::skip_if_not_available, ExecutionRequest};

const TOOLS: &[&str] = &["node"];

#[tokio::test]
async fn test_javascript_basic() -> Result<()> {
    test_language_execution("javascript", JS_HELLO, TOOLS, "Hello from JavaScript!").await
}

#[tokio::test]
async fn test_javascript_prompt_reads_lines() -> Result<()> {
    test_language_with_input("js", JS_PROMPT_INPUT, TOOLS, "2\n3\n", "5\nnull").await
}

#[tokio::test]
async fn test_javascript_formats_like_console() -> Result<()> {
    test_language_execution("js", JS_FORMATTED_LOG, TOOLS, "cart has 3 items { a: 1 }").await
}

/// Output is flushed once when the submission's synchronous code finishes, so
/// anything logged from a timer or promise callback is not captured
#[tokio::test]
async fn test_javascript_deferred_output_is_not_captured() -> Result<()> {
    test_language_execution("javascript", JS_DEFERRED_LOG, TOOLS, "now").await
}

#[tokio::test]
async fn test_javascript_thrown_error_becomes_output_line() -> Result<()> {
    if skip_if_not_available(TOOLS) {
        return Ok(());
    }
    let (service, _dir) = test_service().await?;

    let result = service
        .execute(ExecutionRequest::new(JS_THROWS, "javascript"))
        .await?;

    assert!(!result.success);
    assert_eq!(result.output, "before\nError: boom");
    assert!(result.error.is_none());
    Ok(())
}

#[tokio::test]
async fn test_javascript_stderr_fails() -> Result<()> {
    test_language_stderr("javascript", JS_STDERR, TOOLS).await
}

#[tokio::test]
async fn test_javascript_timeout() -> Result<()> {
    test_language_timeout("javascript", JS_LOOP, TOOLS).await
}
