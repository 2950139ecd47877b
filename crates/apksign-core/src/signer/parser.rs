//! Verification output parsing.
//!
//! uber-apk-signer prints human-readable status text with no structured
//! output mode, so verification results are extracted by pattern matching.
//! The heuristic is deliberately kept as-is: any change to the tool's
//! wording silently changes behavior, and its output contract is not
//! documented anywhere we can rely on.

use regex_lite::Regex;

use crate::models::VerifyOutcome;

/// Strategy for turning raw verifier stdout into a structured result.
///
/// Exists as a seam so a future structured-output mode from the external
/// tool can replace the pattern matching without touching the dispatcher.
pub trait VerifyOutputParser: Send + Sync {
    fn parse(&self, stdout: &str) -> VerifyOutcome;
}

/// Default parser: substring checks for validity, line-anchored patterns
/// for the signer and certificate fields.
pub struct PatternParser {
    signer: Regex,
    certificate: Regex,
}

impl PatternParser {
    pub fn new() -> Self {
        Self {
            signer: Regex::new(r"Signer:\s*(.+)").unwrap_or_else(|_| {
                Regex::new(r"$^").unwrap() // Never matches
            }),
            certificate: Regex::new(r"Certificate:\s*(.+)").unwrap_or_else(|_| {
                Regex::new(r"$^").unwrap()
            }),
        }
    }

    fn first_capture(&self, pattern: &Regex, stdout: &str) -> String {
        pattern
            .captures(stdout)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

impl Default for PatternParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyOutputParser for PatternParser {
    fn parse(&self, stdout: &str) -> VerifyOutcome {
        let is_valid = !stdout.contains("INVALID") && !stdout.contains("FAILED");

        VerifyOutcome {
            is_valid,
            signer: self.first_capture(&self.signer, stdout),
            certificate: self.first_capture(&self.certificate, stdout),
        }
    }
}
