//! Subprocess invocation of the uber-apk-signer CLI.
//!
//! The external tool is treated as an opaque black box: this module builds
//! its command line, runs it with the configured timeout, and hands the
//! captured output to the caller. Exactly one subprocess is spawned per
//! call; there are no retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::config::SignerConfig;
use crate::error::{ApkSignError, Result};
use crate::models::{KeystoreEntry, SignArgs, SignOutcome, VerifyOutcome};
use crate::signer::parser::{PatternParser, VerifyOutputParser};

/// File extensions recognized as keystores during directory scans.
const KEYSTORE_EXTENSIONS: [&str; 4] = ["jks", "keystore", "p12", "pfx"];

/// Wrapper around the external signing executable.
pub struct ApkSigner {
    config: SignerConfig,
    parser: Box<dyn VerifyOutputParser>,
}

impl ApkSigner {
    /// Creates a signer with the default pattern-matching verify parser.
    pub fn new(config: SignerConfig) -> Self {
        Self {
            config,
            parser: Box::new(PatternParser::new()),
        }
    }

    /// Creates a signer with a custom verify-output parser.
    pub fn with_parser(config: SignerConfig, parser: Box<dyn VerifyOutputParser>) -> Self {
        Self { config, parser }
    }

    /// Signs an APK and returns the output artifact's path and size.
    pub async fn sign_apk(&self, args: &SignArgs) -> Result<SignOutcome> {
        let keystore_path = expand_home(&args.keystore_path);

        validate_file_exists(Path::new(&args.apk_path), "APK file").await?;
        validate_file_exists(&keystore_path, "Keystore file").await?;

        let output_path = args
            .output_path
            .clone()
            .unwrap_or_else(|| generate_output_path(&args.apk_path));

        let keystore = keystore_path.to_string_lossy();
        self.invoke(
            "sign",
            &[
                ("--apk", args.apk_path.as_str()),
                ("--keystore", keystore.as_ref()),
                ("--keystore-pass", &args.keystore_password),
                ("--key-alias", &args.key_alias),
                ("--key-pass", &args.key_password),
                ("--output", &output_path),
            ],
        )
        .await
        .map_err(|e| ApkSignError::Execution(format!("Failed to sign APK: {e}")))?;

        // The tool reports success in prose; the produced file is the
        // ground truth.
        let metadata = tokio::fs::metadata(&output_path)
            .await
            .map_err(|e| ApkSignError::Execution(format!("Failed to sign APK: {e}")))?;

        Ok(SignOutcome {
            output_path,
            size: metadata.len(),
        })
    }

    /// Verifies an APK's signature and parses the tool's status text.
    pub async fn verify_apk_signature(&self, apk_path: &str) -> Result<VerifyOutcome> {
        validate_file_exists(Path::new(apk_path), "APK file").await?;

        let stdout = self
            .invoke("verify", &[("--apk", apk_path)])
            .await
            .map_err(|e| {
                ApkSignError::Execution(format!("Failed to verify APK signature: {e}"))
            })?;

        Ok(self.parser.parse(&stdout))
    }

    /// Lists keystore files in a directory, classified by extension.
    ///
    /// Entries are returned in the order the directory yields them.
    pub async fn list_keystores(&self, directory: &str) -> Result<Vec<KeystoreEntry>> {
        let mut entries = tokio::fs::read_dir(directory).await.map_err(|e| {
            ApkSignError::Execution(format!("Failed to list keystores: {e}"))
        })?;

        let mut keystores = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            ApkSignError::Execution(format!("Failed to list keystores: {e}"))
        })? {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            let ext = ext.to_lowercase();
            if KEYSTORE_EXTENSIONS.contains(&ext.as_str()) {
                keystores.push(KeystoreEntry {
                    path: path.to_string_lossy().into_owned(),
                    keystore_type: ext.to_uppercase(),
                });
            }
        }

        Ok(keystores)
    }

    /// Creates a new keystore. Refuses to overwrite an existing file.
    pub async fn create_keystore(
        &self,
        keystore_path: &str,
        keystore_password: &str,
        key_alias: &str,
        key_password: &str,
        common_name: &str,
        organization: &str,
    ) -> Result<()> {
        if tokio::fs::try_exists(keystore_path).await.unwrap_or(false) {
            return Err(ApkSignError::Validation(format!(
                "Keystore already exists at: {keystore_path}"
            )));
        }

        self.invoke(
            "create-keystore",
            &[
                ("--keystore", keystore_path),
                ("--keystore-pass", keystore_password),
                ("--key-alias", key_alias),
                ("--key-pass", key_password),
                ("--common-name", common_name),
                ("--organization", organization),
            ],
        )
        .await
        .map_err(|e| ApkSignError::Execution(format!("Failed to create keystore: {e}")))?;

        // Confirm the tool actually produced the file.
        validate_file_exists(Path::new(keystore_path), "Keystore file").await?;

        Ok(())
    }

    /// Checks whether the signing executable can be invoked at all.
    ///
    /// Used at startup for a diagnostic warning; tool calls do not depend
    /// on it.
    pub async fn check_availability(&self) -> bool {
        match self.invoke("--version", &[]).await {
            Ok(stdout) => {
                tracing::info!("uber-apk-signer version: {}", stdout.trim());
                true
            }
            Err(_) => false,
        }
    }

    /// Runs the signer with a verb and flag/value pairs, enforcing the
    /// configured timeout. Returns the captured stdout; stderr is logged
    /// here and folded into the error message on failure.
    async fn invoke(&self, verb: &str, flags: &[(&str, &str)]) -> Result<String> {
        let mut command = self.base_command();
        command.arg(verb);
        for (flag, value) in flags {
            command.arg(flag).arg(value);
        }

        tracing::debug!("Executing: {}", render_command(&self.config.path, verb, flags));

        // kill_on_drop reaps the child if the timeout fires while the
        // output future is in flight.
        command.kill_on_drop(true);

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                ApkSignError::Execution(format!(
                    "Failed to run {}: {e}",
                    self.config.path
                ))
            })?,
            Err(_) => {
                return Err(ApkSignError::Execution(format!(
                    "{} timed out after {}ms",
                    self.config.path, self.config.timeout_ms
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stderr.is_empty() {
            tracing::warn!("Stderr output: {stderr}");
        }
        tracing::debug!("Stdout output: {stdout}");

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() { &stdout } else { &stderr };
            return Err(ApkSignError::Execution(format!(
                "{} {verb} exited with {}: {}",
                self.config.path,
                output.status,
                detail.trim()
            )));
        }

        Ok(stdout)
    }

    /// Builds the base command, routing .jar paths through the JVM.
    fn base_command(&self) -> Command {
        if self.config.path.ends_with(".jar") {
            let mut command = Command::new("java");
            command.arg("-jar").arg(&self.config.path);
            command
        } else {
            Command::new(&self.config.path)
        }
    }
}

/// Derives `<stem>-signed<ext>` next to the input APK.
pub fn generate_output_path(apk_path: &str) -> String {
    let path = Path::new(apk_path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{stem}-signed");
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(name).to_string_lossy().into_owned()
        }
        _ => name,
    }
}

/// Expands a leading `~/` against the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

async fn validate_file_exists(path: &Path, file_type: &str) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(ApkSignError::Validation(format!(
            "{file_type} not found at: {}",
            path.display()
        )))
    }
}

fn render_command(program: &str, verb: &str, flags: &[(&str, &str)]) -> String {
    let mut rendered = format!("{program} {verb}");
    for (flag, value) in flags {
        rendered.push(' ');
        rendered.push_str(flag);
        rendered.push(' ');
        rendered.push_str(value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_signer() -> ApkSigner {
        ApkSigner::new(Config::default().signer)
    }

    #[test]
    fn output_path_is_derived_next_to_input() {
        assert_eq!(generate_output_path("foo/bar.apk"), "foo/bar-signed.apk");
        assert_eq!(generate_output_path("app.apk"), "app-signed.apk");
        assert_eq!(
            generate_output_path("/abs/path/release.apk"),
            "/abs/path/release-signed.apk"
        );
    }

    #[test]
    fn output_path_without_extension() {
        assert_eq!(generate_output_path("foo/bar"), "foo/bar-signed");
    }

    #[tokio::test]
    async fn sign_rejects_missing_apk_before_spawning() {
        let signer = test_signer();
        let args = SignArgs {
            apk_path: "/definitely/not/here.apk".to_string(),
            keystore_path: "/tmp/whatever.jks".to_string(),
            keystore_password: "android".to_string(),
            key_alias: "androiddebugkey".to_string(),
            key_password: "android".to_string(),
            output_path: None,
        };

        let err = signer.sign_apk(&args).await.unwrap_err();
        assert!(err.to_string().contains("APK file not found"));
    }

    #[tokio::test]
    async fn sign_rejects_missing_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("app.apk");
        std::fs::write(&apk, b"not a real apk").unwrap();

        let signer = test_signer();
        let args = SignArgs {
            apk_path: apk.to_string_lossy().into_owned(),
            keystore_path: dir.path().join("missing.jks").to_string_lossy().into_owned(),
            keystore_password: "android".to_string(),
            key_alias: "androiddebugkey".to_string(),
            key_password: "android".to_string(),
            output_path: None,
        };

        let err = signer.sign_apk(&args).await.unwrap_err();
        assert!(err.to_string().contains("Keystore file not found"));
    }

    #[tokio::test]
    async fn verify_rejects_missing_apk() {
        let signer = test_signer();
        let err = signer
            .verify_apk_signature("/definitely/not/here.apk")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("APK file not found"));
    }

    #[tokio::test]
    async fn create_keystore_refuses_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("existing.jks");
        std::fs::write(&keystore, b"keystore bytes").unwrap();

        let signer = test_signer();
        let err = signer
            .create_keystore(
                &keystore.to_string_lossy(),
                "pass",
                "alias",
                "pass",
                "APK Signer",
                "Your Organization",
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn list_keystores_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jks"), b"").unwrap();
        std::fs::write(dir.path().join("b.p12"), b"").unwrap();
        std::fs::write(dir.path().join("c.txt"), b"").unwrap();

        let signer = test_signer();
        let mut keystores = signer
            .list_keystores(&dir.path().to_string_lossy())
            .await
            .unwrap();
        keystores.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(keystores.len(), 2);
        assert!(keystores[0].path.ends_with("a.jks"));
        assert_eq!(keystores[0].keystore_type, "JKS");
        assert!(keystores[1].path.ends_with("b.p12"));
        assert_eq!(keystores[1].keystore_type, "P12");
    }

    #[tokio::test]
    async fn list_keystores_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.jks")).unwrap();
        std::fs::write(dir.path().join("real.pfx"), b"").unwrap();

        let signer = test_signer();
        let keystores = signer
            .list_keystores(&dir.path().to_string_lossy())
            .await
            .unwrap();

        assert_eq!(keystores.len(), 1);
        assert_eq!(keystores[0].keystore_type, "PFX");
    }

    #[tokio::test]
    async fn list_keystores_fails_on_missing_directory() {
        let signer = test_signer();
        let err = signer
            .list_keystores("/definitely/not/a/directory")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to list keystores"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn invoke_kills_subprocess_on_timeout() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-signer.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = Config::default().signer;
        config.path = script.to_string_lossy().into_owned();
        config.timeout_ms = 200;
        let signer = ApkSigner::new(config);

        let start = std::time::Instant::now();
        let err = signer.invoke("--version", &[]).await.unwrap_err();

        assert!(err.to_string().contains("timed out after 200ms"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn invoke_reports_spawn_failure() {
        let mut config = Config::default().signer;
        config.path = "/definitely/not/an/executable".to_string();
        let signer = ApkSigner::new(config);

        assert!(!signer.check_availability().await);
    }
}
