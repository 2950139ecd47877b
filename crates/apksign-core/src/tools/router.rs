//! Tool call routing.
//!
//! The router is the error boundary of the server: every failure below it,
//! from a bad argument to a dead subprocess, comes back as an error-flagged
//! envelope. Nothing propagates past `call_tool`.

use serde_json::Value;

use crate::config::Config;
use crate::models::{
    CreateKeystoreArgs, ListKeystoresArgs, SignArgs, ToolRequest, ToolResponse, VerifyArgs,
};
use crate::signer::ApkSigner;
use crate::tools::catalog::tool_definitions;

/// Routes named tool calls to signer operations.
pub struct ToolRouter {
    signer: ApkSigner,
}

impl ToolRouter {
    pub fn new(config: &Config) -> Self {
        Self {
            signer: ApkSigner::new(config.signer.clone()),
        }
    }

    /// Lists the tools supported by this server.
    pub fn list_tools(&self) -> Vec<Value> {
        tool_definitions()
    }

    /// Handles a tool call by name, always returning an envelope.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResponse {
        let result = match ToolRequest::parse(name, arguments) {
            Ok(ToolRequest::SignApk(args)) => self.handle_sign_apk(args).await,
            Ok(ToolRequest::VerifyApkSignature(args)) => self.handle_verify(args).await,
            Ok(ToolRequest::ListKeystores(args)) => self.handle_list_keystores(args).await,
            Ok(ToolRequest::CreateKeystore(args)) => self.handle_create_keystore(args).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Tool {name} failed: {e}");
                ToolResponse::error(format!("Error executing tool {name}: {e}"))
            }
        }
    }

    async fn handle_sign_apk(&self, args: SignArgs) -> crate::Result<ToolResponse> {
        let outcome = self.signer.sign_apk(&args).await?;
        Ok(ToolResponse::text(format!(
            "APK signed successfully!\nOutput: {}\nSize: {} bytes",
            outcome.output_path, outcome.size
        )))
    }

    async fn handle_verify(&self, args: VerifyArgs) -> crate::Result<ToolResponse> {
        let outcome = self.signer.verify_apk_signature(&args.apk_path).await?;
        Ok(ToolResponse::text(format!(
            "APK signature verification:\nValid: {}\nSigner: {}\nCertificate: {}",
            outcome.is_valid, outcome.signer, outcome.certificate
        )))
    }

    async fn handle_list_keystores(&self, args: ListKeystoresArgs) -> crate::Result<ToolResponse> {
        let keystores = self.signer.list_keystores(&args.directory).await?;
        let listing = keystores
            .iter()
            .map(|k| format!("- {} ({})", k.path, k.keystore_type))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolResponse::text(format!(
            "Found {} keystore(s):\n{listing}",
            keystores.len()
        )))
    }

    async fn handle_create_keystore(
        &self,
        args: CreateKeystoreArgs,
    ) -> crate::Result<ToolResponse> {
        self.signer
            .create_keystore(
                &args.keystore_path,
                &args.keystore_password,
                &args.key_alias,
                &args.key_password,
                &args.common_name,
                &args.organization,
            )
            .await?;
        Ok(ToolResponse::text(format!(
            "Keystore created successfully at: {}",
            args.keystore_path
        )))
    }
}
