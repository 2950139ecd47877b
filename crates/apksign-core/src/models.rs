//! Request and response models for the tool protocol.
//!
//! Each operation has its own typed argument struct; incoming `arguments`
//! maps are deserialized against the matching struct before any handler
//! logic runs, so malformed requests never reach the subprocess layer.

use serde::{Deserialize, Serialize};

use crate::error::{ApkSignError, Result};

fn default_keystore_path() -> String {
    "~/.android/debug.keystore".to_string()
}

fn default_keystore_password() -> String {
    "android".to_string()
}

fn default_key_alias() -> String {
    "androiddebugkey".to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_common_name() -> String {
    "APK Signer".to_string()
}

fn default_organization() -> String {
    "Your Organization".to_string()
}

/// Arguments for the `sign_apk` tool. Only `apkPath` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignArgs {
    pub apk_path: String,
    #[serde(default = "default_keystore_path")]
    pub keystore_path: String,
    #[serde(default = "default_keystore_password")]
    pub keystore_password: String,
    #[serde(default = "default_key_alias")]
    pub key_alias: String,
    #[serde(default = "default_keystore_password")]
    pub key_password: String,
    /// Auto-generated next to the input when not provided.
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Arguments for the `verify_apk_signature` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyArgs {
    pub apk_path: String,
}

/// Arguments for the `list_keystores` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListKeystoresArgs {
    #[serde(default = "default_directory")]
    pub directory: String,
}

/// Arguments for the `create_keystore` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeystoreArgs {
    pub keystore_path: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
    #[serde(default = "default_common_name")]
    pub common_name: String,
    #[serde(default = "default_organization")]
    pub organization: String,
}

/// A tool call decoded into its typed per-operation form.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    SignApk(SignArgs),
    VerifyApkSignature(VerifyArgs),
    ListKeystores(ListKeystoresArgs),
    CreateKeystore(CreateKeystoreArgs),
}

impl ToolRequest {
    /// Decodes a named tool call against the matching argument schema.
    ///
    /// Fails with `UnknownTool` for names outside the catalog and with
    /// `InvalidArguments` when required fields are missing or mistyped.
    pub fn parse(name: &str, arguments: serde_json::Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| ApkSignError::InvalidArguments(e.to_string());
        match name {
            "sign_apk" => Ok(Self::SignApk(serde_json::from_value(arguments).map_err(invalid)?)),
            "verify_apk_signature" => Ok(Self::VerifyApkSignature(
                serde_json::from_value(arguments).map_err(invalid)?,
            )),
            "list_keystores" => Ok(Self::ListKeystores(
                serde_json::from_value(arguments).map_err(invalid)?,
            )),
            "create_keystore" => Ok(Self::CreateKeystore(
                serde_json::from_value(arguments).map_err(invalid)?,
            )),
            other => Err(ApkSignError::UnknownTool(other.to_string())),
        }
    }
}

/// Result of a successful signing run, taken from the output file's metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutcome {
    pub output_path: String,
    pub size: u64,
}

/// Result of a signature verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    pub is_valid: bool,
    pub signer: String,
    pub certificate: String,
}

/// A keystore discovered by directory scan, classified by extension only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreEntry {
    pub path: String,
    /// Uppercase extension without the dot (JKS, KEYSTORE, P12, PFX).
    #[serde(rename = "type")]
    pub keystore_type: String,
}

/// A single content block in a tool response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Uniform response envelope returned for every tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl ToolResponse {
    /// Builds a success envelope with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Builds an error envelope with a single text block.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_args_apply_defaults() {
        let request =
            ToolRequest::parse("sign_apk", json!({ "apkPath": "/tmp/app.apk" })).unwrap();
        let ToolRequest::SignApk(args) = request else {
            panic!("expected sign_apk variant");
        };
        assert_eq!(args.apk_path, "/tmp/app.apk");
        assert_eq!(args.keystore_path, "~/.android/debug.keystore");
        assert_eq!(args.keystore_password, "android");
        assert_eq!(args.key_alias, "androiddebugkey");
        assert_eq!(args.key_password, "android");
        assert!(args.output_path.is_none());
    }

    #[test]
    fn sign_args_require_apk_path() {
        let err = ToolRequest::parse("sign_apk", json!({})).unwrap_err();
        assert!(matches!(err, ApkSignError::InvalidArguments(_)));
    }

    #[test]
    fn create_keystore_args_require_credentials() {
        let err = ToolRequest::parse(
            "create_keystore",
            json!({ "keystorePath": "/tmp/new.jks" }),
        )
        .unwrap_err();
        assert!(matches!(err, ApkSignError::InvalidArguments(_)));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = ToolRequest::parse("decode_apk", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: decode_apk");
    }

    #[test]
    fn list_keystores_defaults_to_current_directory() {
        let request = ToolRequest::parse("list_keystores", json!({})).unwrap();
        let ToolRequest::ListKeystores(args) = request else {
            panic!("expected list_keystores variant");
        };
        assert_eq!(args.directory, ".");
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let envelope = ToolResponse::error("boom");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["isError"], json!(true));
        assert_eq!(value["content"][0]["type"], json!("text"));
        assert_eq!(value["content"][0]["text"], json!("boom"));
    }
}
