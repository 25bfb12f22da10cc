use super::super::fixtures::{
    code_samples::JAVA_HELLO,
    compile_errors::JAVA_SYNTAX_ERROR,
    infinite_loops::JAVA_LOOP,
    stderr_samples::JAVA_STDERR,
    test_scenarios::JAVA_NAMED_CLASS,
};
use super::*;
use crate::{languages::skip_if_not_available, ExecutionRequest};

const TOOLS: &[&str] = &["javac", "java"];

#[tokio::test]
async fn test_java_basic() -> Result<()> {
    test_language_execution("java", JAVA_HELLO, TOOLS, "Hello from Java!").await
}

#[tokio::test]
async fn test_java_class_name_from_source() -> Result<()> {
    test_language_with_input("Java", JAVA_NAMED_CLASS, TOOLS, "6 7", "42").await
}

#[tokio::test]
async fn test_java_stderr_fails() -> Result<()> {
    test_language_stderr("java", JAVA_STDERR, TOOLS).await
}

#[tokio::test]
async fn test_java_compile_error() -> Result<()> {
    test_language_compile_error("java", JAVA_SYNTAX_ERROR, TOOLS).await
}

#[tokio::test]
async fn test_java_timeout() -> Result<()> {
    test_language_timeout("java", JAVA_LOOP, TOOLS).await
}

#[tokio::test]
async fn test_java_concurrent_main_classes() -> Result<()> {
    if skip_if_not_available(TOOLS) {
        return Ok(());
    }
    let (service, dir) = test_service().await?;

    let mut handles = vec![];
    for i in 0..3 {
        let code = format!(
            "public class Main {{ public static void main(String[] a) {{ System.out.println({}); }} }}",
            i
        );
        let request = ExecutionRequest::new(code, "java").with_time_limit(default_timeout());
        let service = service.clone();
        handles.push(tokio::spawn(async move { (i, service.execute(request).await) }));
    }

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        let result = result?;
        assert!(result.success, "unexpected failure: {:?}", result);
        assert_eq!(result.output, i.to_string());
    }
    assert!(workspace_is_empty(dir.path()));
    Ok(())
}
