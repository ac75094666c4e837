// src/services/resolution_service_hardening_tests.rs
//
// Hardening Tests
//
// Hostile or malformed descriptors must still produce exactly one outcome,
// never panic, and never resolve outside the configured candidate directories.

#[cfg(test)]
mod hostile_input_tests {
    use std::sync::Arc;

    use crate::config::CandidateDirectoryList;
    use crate::domain::{DropDescriptor, ResolutionErrorKind, ResolutionStage};
    use crate::services::path_verifier::{MockPathVerifier, PathVerifier, Verification};
    use crate::services::{FsPathVerifier, PathStyle, ResolutionEngine};

    fn fs_engine(dirs: Vec<String>) -> ResolutionEngine {
        ResolutionEngine::new(
            Arc::new(FsPathVerifier),
            CandidateDirectoryList::new(dirs),
            PathStyle::Posix,
        )
    }

    /// PROVES: a parent-directory key cannot escape the candidate directory
    #[test]
    fn test_parent_traversal_never_escapes_candidate_dir() {
        let root = tempfile::tempdir().unwrap();
        let library = root.path().join("library");
        std::fs::create_dir(&library).unwrap();
        std::fs::write(root.path().join("secret.usd"), b"").unwrap();

        let engine = fs_engine(vec![library.to_string_lossy().to_string()]);
        let outcome = engine.resolve(
            &DropDescriptor::new("secret.usd", "ui").with_relative_path("../secret.usd"),
        );

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(ResolutionErrorKind::SearchExhausted));
        assert!(outcome
            .trail()
            .iter()
            .any(|s| s.stage == ResolutionStage::Search && s.detail.contains("..")));
    }

    /// PROVES: a NUL byte is a verification error, treated as absence,
    /// and the dropped name still recovers the file
    #[test]
    fn test_nul_byte_in_raw_path_is_absent_not_fatal() {
        let library = tempfile::tempdir().unwrap();
        std::fs::write(library.path().join("scene.usd"), b"").unwrap();

        let engine = fs_engine(vec![library.path().to_string_lossy().to_string()]);
        let outcome = engine.resolve(
            &DropDescriptor::new("scene.usd", "ui").with_raw_path("/proj/sce\0ne.usd"),
        );

        let expected = library.path().join("scene.usd").to_string_lossy().to_string();
        assert_eq!(outcome.resolved_path(), Some(expected.as_str()));
        assert!(outcome
            .trail()
            .iter()
            .any(|s| s.detail.starts_with("VERIFICATION_ERROR")));
    }

    /// PROVES: undecodable percent escapes are carried through, not rejected
    #[test]
    fn test_malformed_percent_escape_still_yields_outcome() {
        let engine = fs_engine(Vec::new());
        let outcome = engine.resolve(
            &DropDescriptor::new("broken.usd", "ui").with_url("file:///proj/%ZZ%E9broken.usd"),
        );

        assert!(!outcome.is_success());
        assert!(outcome.original_path().is_some());
        assert!(!outcome.trail().is_empty());
    }

    /// PROVES: whitespace-only fields count as missing
    #[test]
    fn test_blank_fields_are_extraction_empty() {
        let engine = fs_engine(vec!["/lib".to_string()]);
        let outcome = engine.resolve(
            &DropDescriptor::new("   ", "ui")
                .with_raw_path(" ")
                .with_url("\t")
                .with_relative_path(""),
        );

        assert_eq!(outcome.error(), Some(ResolutionErrorKind::ExtractionEmpty));
        assert_eq!(outcome.original_path(), None);
    }

    /// PROVES: oversized names are handled like any other missing file
    #[test]
    fn test_oversized_name_does_not_panic() {
        let library = tempfile::tempdir().unwrap();
        let engine = fs_engine(vec![library.path().to_string_lossy().to_string()]);

        let name = format!("{}.usd", "x".repeat(10_000));
        let outcome = engine.resolve(&DropDescriptor::new(name, "ui"));

        assert!(!outcome.is_success());
    }

    /// PROVES: Windows urls lose the three-slash scheme and get backslashes
    #[test]
    fn test_windows_url_is_checked_in_native_form() {
        let mut verifier = MockPathVerifier::new();
        verifier
            .expect_check()
            .withf(|path| path.to_string() == "C:\\Proj\\My Scene.usd")
            .times(1)
            .returning(|_| Verification::Present);
        let verifier: Arc<dyn PathVerifier> = Arc::new(verifier);

        let engine = ResolutionEngine::new(verifier, CandidateDirectoryList::default(), PathStyle::Windows);
        let outcome = engine.resolve(
            &DropDescriptor::new("My Scene.usd", "ui").with_url("file:///C:/Proj/My%20Scene.usd"),
        );

        assert!(outcome.is_success());
        assert_eq!(outcome.resolved_path(), Some("C:\\Proj\\My Scene.usd"));
    }

    /// PROVES: a drive-less Windows candidate is never given a guessed drive
    #[test]
    fn test_windows_relative_candidate_gets_no_drive_letter() {
        let mut verifier = MockPathVerifier::new();
        verifier
            .expect_check()
            .withf(|path| path.starts_with("D:\\assets\\"))
            .returning(|_| Verification::Absent);

        let engine = ResolutionEngine::new(
            Arc::new(verifier),
            CandidateDirectoryList::new(["D:\\assets"]),
            PathStyle::Windows,
        );
        let outcome = engine.resolve(
            &DropDescriptor::new("scene.usd", "ui").with_url("file:///Proj/scene.usd"),
        );

        assert_eq!(outcome.error(), Some(ResolutionErrorKind::SearchExhausted));
        assert_eq!(outcome.original_path(), Some("Proj\\scene.usd"));
    }
}
