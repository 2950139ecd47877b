//! Static tool catalog.
//!
//! The four descriptors below are a published client contract; their
//! names, descriptions, property types, defaults, and required lists must
//! stay stable across releases.

use serde_json::{json, Value};

/// Returns the fixed catalog of tool descriptors for `tools/list`.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "sign_apk",
            "description": "Sign an APK file using Uber APK Signer. Only apkPath is required - other parameters can use defaults or be configured.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "apkPath": {
                        "type": "string",
                        "description": "Path to the APK file to sign (required)",
                    },
                    "keystorePath": {
                        "type": "string",
                        "description": "Path to the keystore file (defaults to ~/.android/debug.keystore)",
                        "default": "~/.android/debug.keystore",
                    },
                    "keystorePassword": {
                        "type": "string",
                        "description": "Password for the keystore (defaults to \"android\")",
                        "default": "android",
                    },
                    "keyAlias": {
                        "type": "string",
                        "description": "Alias of the key to use for signing (defaults to \"androiddebugkey\")",
                        "default": "androiddebugkey",
                    },
                    "keyPassword": {
                        "type": "string",
                        "description": "Password for the key (defaults to \"android\")",
                        "default": "android",
                    },
                    "outputPath": {
                        "type": "string",
                        "description": "Output path for the signed APK (optional, auto-generated if not provided)",
                    },
                },
                "required": ["apkPath"],
            },
        }),
        json!({
            "name": "verify_apk_signature",
            "description": "Verify the signature of an APK file",
            "inputSchema": {
                "type": "object",
                "description": "Verify the signature of an APK file",
                "properties": {
                    "apkPath": {
                        "type": "string",
                        "description": "Path to the APK file to verify",
                    },
                },
                "required": ["apkPath"],
            },
        }),
        json!({
            "name": "list_keystores",
            "description": "List available keystores in a directory",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Directory to search for keystores",
                        "default": ".",
                    },
                },
                "required": [],
            },
        }),
        json!({
            "name": "create_keystore",
            "description": "Create a new keystore for APK signing",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "keystorePath": {
                        "type": "string",
                        "description": "Path where to create the keystore",
                    },
                    "keystorePassword": {
                        "type": "string",
                        "description": "Password for the keystore",
                    },
                    "keyAlias": {
                        "type": "string",
                        "description": "Alias for the key",
                    },
                    "keyPassword": {
                        "type": "string",
                        "description": "Password for the key",
                    },
                    "commonName": {
                        "type": "string",
                        "description": "Common name for the certificate",
                        "default": "APK Signer",
                    },
                    "organization": {
                        "type": "string",
                        "description": "Organization name",
                        "default": "Your Organization",
                    },
                },
                "required": ["keystorePath", "keystorePassword", "keyAlias", "keyPassword"],
            },
        }),
    ]
}
