// src/services/resolution_service_tests.rs
//
// Resolution Engine properties against a real filesystem
//
// INVARIANTS TESTED:
// - An existing rawPath resolves to itself without any fallback probe
// - rawPath beats url when both are present
// - Fallback search picks the first configured directory holding the file
// - Search terminates after at most 2 * len(candidate_dirs) probes
// - Resolving twice yields the same success/resolvedPath/originalPath

#[cfg(test)]
mod engine_property_tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::config::CandidateDirectoryList;
    use crate::domain::{DropDescriptor, ResolutionErrorKind, ResolutionStage};
    use crate::services::{
        FsPathVerifier, PathStyle, PathVerifier, ResolutionEngine, Verification,
    };

    /// Real filesystem verifier that counts every check
    #[derive(Default)]
    struct CountingVerifier {
        checks: AtomicUsize,
    }

    impl PathVerifier for CountingVerifier {
        fn check(&self, path: &str) -> Verification {
            self.checks.fetch_add(1, Ordering::SeqCst);
            FsPathVerifier.check(path)
        }
    }

    fn touch(dir: &Path, name: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, b"#usda 1.0\n").unwrap();
        path.to_string_lossy().into_owned()
    }

    fn dir_string(dir: &Path) -> String {
        dir.to_string_lossy().into_owned()
    }

    fn engine(dirs: &[&Path], verifier: Arc<dyn PathVerifier>) -> ResolutionEngine {
        ResolutionEngine::new(
            verifier,
            CandidateDirectoryList::new(dirs.iter().map(|d| dir_string(d))),
            PathStyle::Posix,
        )
    }

    /// Scenario: {name:"scene.usd", rawPath:"/proj/scene.usd"}, file exists
    #[test]
    fn test_existing_raw_path_resolves_without_fallback() {
        let proj = tempfile::tempdir().unwrap();
        let lib = tempfile::tempdir().unwrap();
        let scene = touch(proj.path(), "scene.usd");

        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(&[lib.path()], verifier.clone());

        let outcome = engine.resolve(&DropDescriptor::new("scene.usd", "ui").with_raw_path(scene.clone()));

        assert!(outcome.is_success());
        assert_eq!(outcome.resolved_path(), Some(scene.as_str()));
        assert_eq!(outcome.original_path(), Some(scene.as_str()));
        assert_eq!(verifier.checks.load(Ordering::SeqCst), 1);
        assert!(outcome.trail().iter().all(|s| s.stage != ResolutionStage::Search));
    }

    #[test]
    fn test_raw_path_beats_url() {
        let proj = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let raw = touch(proj.path(), "scene.usd");
        let via_url = touch(other.path(), "scene.usd");

        let engine = engine(&[], Arc::new(FsPathVerifier));
        let descriptor = DropDescriptor::new("scene.usd", "ui")
            .with_raw_path(raw.clone())
            .with_url(format!("file://{}", via_url));

        let outcome = engine.resolve(&descriptor);
        assert_eq!(outcome.resolved_path(), Some(raw.as_str()));
    }

    /// Scenario: url decodes to a missing path, file lives in a candidate dir
    #[test]
    fn test_url_candidate_falls_back_to_candidate_directory() {
        let proj = tempfile::tempdir().unwrap();
        let lib = tempfile::tempdir().unwrap();
        let in_lib = touch(lib.path(), "my scene.usd");
        let missing = proj.path().join("my%20scene.usd");

        let engine = engine(&[lib.path()], Arc::new(FsPathVerifier));
        let descriptor = DropDescriptor::new("my scene.usd", "ui")
            .with_url(format!("file://{}", missing.to_string_lossy()));

        let outcome = engine.resolve(&descriptor);
        assert!(outcome.is_success());
        assert_eq!(outcome.resolved_path(), Some(in_lib.as_str()));
        assert_eq!(
            outcome.original_path(),
            Some(proj.path().join("my scene.usd").to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_file_only_in_second_directory_always_resolves_there() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let in_b = touch(b.path(), "scene.usd");

        let engine = engine(&[a.path(), b.path()], Arc::new(FsPathVerifier));
        for _ in 0..5 {
            let outcome = engine.resolve(&DropDescriptor::new("scene.usd", "ui"));
            assert_eq!(outcome.resolved_path(), Some(in_b.as_str()));
        }
    }

    /// Scenario: {name:"missing.usd"} with no directory holding it
    #[test]
    fn test_missing_file_exhausts_search_within_probe_bound() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let c = tempfile::tempdir().unwrap();

        let verifier = Arc::new(CountingVerifier::default());
        let engine = engine(&[a.path(), b.path(), c.path()], verifier.clone());

        let outcome = engine.resolve(
            &DropDescriptor::new("missing.usd", "ui").with_raw_path("/nowhere/renamed.usd"),
        );

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(ResolutionErrorKind::SearchExhausted));
        assert_eq!(outcome.original_path(), Some("/nowhere/renamed.usd"));
        // one direct verification + at most two passes over three directories
        let probes = verifier.checks.load(Ordering::SeqCst) - 1;
        assert!(probes <= 3 * 2, "{} probes", probes);
        assert_eq!(probes, 6);
    }

    #[test]
    fn test_name_only_missing_file_reports_search_exhausted() {
        let a = tempfile::tempdir().unwrap();
        let engine = engine(&[a.path()], Arc::new(FsPathVerifier));

        let outcome = engine.resolve(&DropDescriptor::new("missing.usd", "ui"));
        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(ResolutionErrorKind::SearchExhausted));
        assert!(outcome.message().unwrap().contains("missing.usd"));
    }

    #[test]
    fn test_relative_path_is_joined_under_candidate_dirs() {
        let lib = tempfile::tempdir().unwrap();
        std::fs::create_dir(lib.path().join("assets")).unwrap();
        let nested = touch(&lib.path().join("assets"), "scene.usd");

        let engine = engine(&[lib.path()], Arc::new(FsPathVerifier));
        let outcome = engine.resolve(
            &DropDescriptor::new("scene.usd", "ui").with_relative_path("assets/scene.usd"),
        );

        assert_eq!(outcome.resolved_path(), Some(nested.as_str()));
        assert_eq!(outcome.original_path(), Some("assets/scene.usd"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let a = tempfile::tempdir().unwrap();
        touch(a.path(), "scene.usd");
        let engine = engine(&[a.path()], Arc::new(FsPathVerifier));

        for descriptor in [
            DropDescriptor::new("scene.usd", "ui"),
            DropDescriptor::new("missing.usd", "ui"),
            DropDescriptor::new("scene.usd", "ui").with_url("file:///does/not/exist/scene.usd"),
        ] {
            let first = engine.resolve(&descriptor);
            let second = engine.resolve(&descriptor);
            assert!(first.same_resolution(&second));
            assert_eq!(first.trail().len(), second.trail().len());
        }
    }

    #[test]
    fn test_failed_outcome_keeps_full_trail() {
        let engine = engine(&[], Arc::new(FsPathVerifier));
        let outcome = engine.resolve(&DropDescriptor::new("scene.usd", "ui").with_raw_path("/nope/scene.usd"));

        let stages: Vec<ResolutionStage> = outcome.trail().iter().map(|s| s.stage).collect();
        assert_eq!(stages.first(), Some(&ResolutionStage::Received));
        assert!(stages.contains(&ResolutionStage::Normalize));
        assert!(stages.contains(&ResolutionStage::Verify));
        assert!(stages.contains(&ResolutionStage::Search));
        assert_eq!(
            outcome.trail().last().map(|s| s.detail.as_str()),
            Some("SEARCHED -> NOT_FOUND")
        );
    }
}
