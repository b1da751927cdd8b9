//! Script-produced documents
//!
//! The script body becomes the body of an async function; the interpreter
//! receives the wrapped program on stdin and prints the resolved value as
//! JSON on stdout.

use std::process::Stdio;

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::DocumentError;

/// Wrap `code` so its return value is written to stdout as JSON
pub fn wrap_script(code: &str) -> String {
    format!(
        "(async () => {{\n\n{code}\n\n}})().then(\n    (result) => {{ process.stdout.write(JSON.stringify(result === undefined ? null : result)); }},\n    (err) => {{ console.error(err); process.exit(1); }}\n);\n"
    )
}

/// Run `code` with `interpreter` and decode its output
///
/// `interpreter` is a program followed by optional whitespace separated
/// arguments, e.g. `node --no-warnings`.
pub async fn execute_script(interpreter: &str, code: &str) -> Result<Value, DocumentError> {
    let mut parts = interpreter.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| DocumentError::Script("no script interpreter configured".to_string()))?;

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DocumentError::Script(format!("cannot start '{interpreter}': {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(wrap_script(code).as_bytes())
            .await
            .map_err(|e| DocumentError::Script(format!("cannot write to '{interpreter}': {e}")))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| DocumentError::Script(format!("'{interpreter}' did not finish: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DocumentError::Script(format!(
            "'{interpreter}' exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_script() {
        let wrapped = wrap_script("return { openapi: '3.0.0' };");
        assert!(wrapped.starts_with("(async () => {"));
        assert!(wrapped.contains("return { openapi: '3.0.0' };"));
        assert!(wrapped.contains("JSON.stringify(result"));
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let err = execute_script("definitely-not-an-interpreter-4711", "return 1;")
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Script(_)));
    }

    #[tokio::test]
    async fn test_empty_interpreter() {
        let err = execute_script("  ", "return 1;").await.unwrap_err();
        assert!(matches!(err, DocumentError::Script(_)));
    }

    /// A shell script standing in for the JavaScript interpreter
    #[cfg(unix)]
    fn fake_interpreter(dir: &tempfile::TempDir, body: &str) -> String {
        let fake = dir.path().join("fake-node.sh");
        std::fs::write(&fake, body).unwrap();
        format!("sh {}", fake.display())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interpreter_output_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let interpreter = fake_interpreter(
            &dir,
            "cat > /dev/null\nprintf '{\"openapi\":\"3.0.0\"}'\n",
        );

        let doc = execute_script(&interpreter, "return {};").await.unwrap();
        assert_eq!(doc["openapi"], "3.0.0");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_script() {
        let dir = tempfile::tempdir().unwrap();
        let interpreter = fake_interpreter(&dir, "cat > /dev/null\necho boom >&2\nexit 3\n");

        let err = execute_script(&interpreter, "throw 1;").await.unwrap_err();
        match err {
            DocumentError::Script(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
