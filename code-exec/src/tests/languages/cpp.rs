use super::super::fixtures::{
    code_samples::CPP_HELLO,
    compile_errors::CPP_SYNTAX_ERROR,
    infinite_loops::CPP_LOOP,
    stderr_samples::CPP_STDERR,
    test_scenarios::CPP_EXIT_ONE,
};
use super::*;
use crate::{languages::skip_if_not_available, ExecutionRequest};

const TOOLS: &[&str] = &["g++"];

#[tokio::test]
async fn test_cpp_basic() -> Result<()> {
    test_language_execution("cpp", CPP_HELLO, TOOLS, "Hello from C++!").await
}

#[tokio::test]
async fn test_cpp_nonzero_exit_fails_without_stderr() -> Result<()> {
    if skip_if_not_available(TOOLS) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let request = ExecutionRequest::new(CPP_EXIT_ONE, "cpp").with_time_limit(default_timeout());
    let result = service.execute(request).await?;

    assert!(!result.success);
    assert!(!result.timed_out);
    assert_eq!(result.output, "");
    assert!(result.error.is_none());
    assert!(result.execution_time > Duration::ZERO);
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}

#[tokio::test]
async fn test_cpp_stderr_fails() -> Result<()> {
    test_language_stderr("c++", CPP_STDERR, TOOLS).await
}

#[tokio::test]
async fn test_cpp_compile_error() -> Result<()> {
    test_language_compile_error("cpp", CPP_SYNTAX_ERROR, TOOLS).await
}

#[tokio::test]
async fn test_cpp_timeout() -> Result<()> {
    test_language_timeout("cpp", CPP_LOOP, TOOLS).await
}
