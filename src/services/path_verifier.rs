// src/services/path_verifier.rs
//
// Path Verifier
//
// Read-only existence check, total over every string input.
// Filesystem errors mean "absent" to callers; the error text is kept so the
// engine can record a VERIFICATION_ERROR step.

use std::path::Path;

/// Result of one existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Present,
    Absent,
    /// Access failed (permission denied, invalid syntax, ...). Treated as absent.
    Error(String),
}

impl Verification {
    pub fn is_present(&self) -> bool {
        matches!(self, Verification::Present)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PathVerifier: Send + Sync {
    fn check(&self, path: &str) -> Verification;

    fn exists(&self, path: &str) -> bool {
        self.check(path).is_present()
    }
}

/// Verifier backed by the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPathVerifier;

impl FsPathVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl PathVerifier for FsPathVerifier {
    fn check(&self, path: &str) -> Verification {
        if path.is_empty() {
            return Verification::Absent;
        }
        if path.contains('\0') {
            return Verification::Error("path contains a NUL byte".to_string());
        }

        match Path::new(path).try_exists() {
            Ok(true) => Verification::Present,
            Ok(false) => Verification::Absent,
            Err(e) => {
                log::warn!("[VERIFY] existence check failed for {}: {}", path, e);
                Verification::Error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_is_present() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scene.usd");
        std::fs::write(&file, b"#usda 1.0").unwrap();

        let verifier = FsPathVerifier::new();
        assert_eq!(verifier.check(&file.to_string_lossy()), Verification::Present);
        assert!(verifier.exists(&file.to_string_lossy()));
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.usd");

        assert_eq!(FsPathVerifier.check(&file.to_string_lossy()), Verification::Absent);
    }

    #[test]
    fn test_check_is_total_over_odd_inputs() {
        let verifier = FsPathVerifier::new();
        assert_eq!(verifier.check(""), Verification::Absent);
        assert!(matches!(verifier.check("/tmp/\0bad"), Verification::Error(_)));
        assert!(!verifier.exists("::not a path::"));
    }
}
