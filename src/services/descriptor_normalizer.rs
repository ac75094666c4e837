// src/services/descriptor_normalizer.rs
//
// Descriptor Normalizer
//
// Turns a drop descriptor into a single candidate path string.
//
// CRITICAL RULES:
// - Priority: rawPath > url > relativePath > name
// - Never fails: malformed input is recorded and the next field is tried
// - Never invents a root or drive letter for a relative candidate
// - Every transformation is recorded in the trail

use serde::{Deserialize, Serialize};

use crate::domain::{DropDescriptor, ResolutionStage, ResolutionTrail};

// ============================================================================
// PATH STYLE
// ============================================================================

/// Separator conventions of the host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// `/` separators, `file:///abs/path` urls
    Posix,
    /// `\` separators, drive letters, `file:///C:/path` urls
    Windows,
}

impl PathStyle {
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub fn separator(&self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Path part of a `file://` url whose authority is empty or `localhost`.
    /// Windows drops the slash in front of the drive letter.
    fn file_url_path<'a>(&self, url: &'a str) -> Option<&'a str> {
        let rest = strip_prefix_ignore_case(url, "file://")?;
        let path = match rest.find('/') {
            Some(0) => rest,
            Some(end) if rest[..end].eq_ignore_ascii_case("localhost") => &rest[end..],
            _ => return None,
        };
        match self {
            PathStyle::Posix => Some(path),
            PathStyle::Windows => Some(&path[1..]),
        }
    }

    pub fn is_absolute(&self, path: &str) -> bool {
        match self {
            PathStyle::Posix => path.starts_with('/'),
            PathStyle::Windows => {
                let bytes = path.as_bytes();
                let drive = bytes.len() >= 3
                    && bytes[0].is_ascii_alphabetic()
                    && bytes[1] == b':'
                    && (bytes[2] == b'\\' || bytes[2] == b'/');
                drive || path.starts_with("\\\\")
            }
        }
    }

    /// Rewrite separators for this platform family (only Windows rewrites)
    pub fn normalize_separators(&self, path: &str) -> String {
        match self {
            PathStyle::Posix => path.to_string(),
            PathStyle::Windows => path.replace('/', "\\"),
        }
    }

    /// Join a directory and a relative key with exactly one separator
    pub fn join(&self, dir: &str, key: &str) -> String {
        let sep = self.separator();
        let dir = dir.trim_end_matches(|c| c == '/' || c == sep);
        let key = key.trim_start_matches(|c| c == '/' || c == sep);
        format!("{}{}{}", dir, sep, key)
    }
}

/// Last path component, accepting either separator
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
}

/// Percent-decode a url path; input without escapes is returned unchanged
pub fn decode_url_path(encoded: &str) -> Option<String> {
    urlencoding::decode(encoded).ok().map(|decoded| decoded.into_owned())
}

// ============================================================================
// NORMALIZED CANDIDATE
// ============================================================================

/// Which descriptor field produced the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    RawPath,
    Url,
    RelativePath,
    Name,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCandidate {
    pub path: String,
    pub source: CandidateSource,
    pub is_absolute: bool,
}

impl NormalizedCandidate {
    fn empty() -> Self {
        Self {
            path: String::new(),
            source: CandidateSource::None,
            is_absolute: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

// ============================================================================
// DESCRIPTOR NORMALIZER
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct DescriptorNormalizer {
    style: PathStyle,
}

impl Default for DescriptorNormalizer {
    fn default() -> Self {
        Self::new(PathStyle::native())
    }
}

impl DescriptorNormalizer {
    pub fn new(style: PathStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    pub fn normalize(
        &self,
        descriptor: &DropDescriptor,
        trail: &mut ResolutionTrail,
    ) -> NormalizedCandidate {
        let extracted = self
            .from_raw_path(descriptor, trail)
            .or_else(|| self.from_url(descriptor, trail))
            .or_else(|| self.from_field(descriptor.relative_path(), CandidateSource::RelativePath, "relativePath", trail))
            .or_else(|| self.from_field(Some(descriptor.name()), CandidateSource::Name, "name", trail));

        let Some((path, source)) = extracted else {
            trail.record(
                ResolutionStage::Normalize,
                "EXTRACTION_EMPTY: descriptor has no usable path-like field",
            );
            return NormalizedCandidate::empty();
        };

        let normalized = self.style.normalize_separators(&path);
        if normalized != path {
            trail.record(
                ResolutionStage::Normalize,
                format!("separators rewritten: '{}' -> '{}'", path, normalized),
            );
        }

        let is_absolute = self.style.is_absolute(&normalized);
        if !is_absolute {
            trail.record(
                ResolutionStage::Normalize,
                format!(
                    "candidate '{}' is relative; no root is inferred, fallback search will use it as a key",
                    normalized
                ),
            );
        }

        NormalizedCandidate {
            path: normalized,
            source,
            is_absolute,
        }
    }

    fn from_raw_path(
        &self,
        descriptor: &DropDescriptor,
        trail: &mut ResolutionTrail,
    ) -> Option<(String, CandidateSource)> {
        self.from_field(descriptor.raw_path(), CandidateSource::RawPath, "rawPath", trail)
    }

    fn from_url(
        &self,
        descriptor: &DropDescriptor,
        trail: &mut ResolutionTrail,
    ) -> Option<(String, CandidateSource)> {
        let url = descriptor.url()?.trim();
        if url.is_empty() {
            trail.record(ResolutionStage::Normalize, "url present but blank, skipped");
            return None;
        }

        let Some(stripped) = self.style.file_url_path(url) else {
            trail.record(
                ResolutionStage::Normalize,
                format!("url '{}' is not a file:// url on this host, skipped", url),
            );
            return None;
        };

        let decoded = match decode_url_path(stripped) {
            Some(decoded) => decoded,
            None => {
                trail.record(
                    ResolutionStage::Normalize,
                    format!("url '{}' does not decode to UTF-8, using it undecoded", stripped),
                );
                stripped.to_string()
            }
        };

        if decoded.is_empty() {
            trail.record(ResolutionStage::Normalize, format!("url '{}' has no path, skipped", url));
            return None;
        }

        trail.record(
            ResolutionStage::Normalize,
            format!("url '{}' decoded to '{}'", url, decoded),
        );
        Some((decoded, CandidateSource::Url))
    }

    fn from_field(
        &self,
        value: Option<&str>,
        source: CandidateSource,
        label: &str,
        trail: &mut ResolutionTrail,
    ) -> Option<(String, CandidateSource)> {
        let value = value?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            trail.record(
                ResolutionStage::Normalize,
                format!("{} present but blank, skipped", label),
            );
            return None;
        }

        trail.record(
            ResolutionStage::Normalize,
            format!("using {} '{}'", label, trimmed),
        );
        Some((trimmed.to_string(), source))
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(style: PathStyle, descriptor: &DropDescriptor) -> (NormalizedCandidate, ResolutionTrail) {
        let mut trail = ResolutionTrail::new();
        let candidate = DescriptorNormalizer::new(style).normalize(descriptor, &mut trail);
        (candidate, trail)
    }

    #[test]
    fn test_raw_path_wins_over_url() {
        let descriptor = DropDescriptor::new("scene.usd", "ui")
            .with_raw_path("/proj/scene.usd")
            .with_url("file:///other/scene.usd");

        let (candidate, _) = normalize(PathStyle::Posix, &descriptor);
        assert_eq!(candidate.path, "/proj/scene.usd");
        assert_eq!(candidate.source, CandidateSource::RawPath);
        assert!(candidate.is_absolute);
    }

    #[test]
    fn test_posix_url_strips_two_slashes_and_decodes() {
        let descriptor =
            DropDescriptor::new("my scene.usd", "ui").with_url("file:///proj/my%20scene.usd");

        let (candidate, trail) = normalize(PathStyle::Posix, &descriptor);
        assert_eq!(candidate.path, "/proj/my scene.usd");
        assert_eq!(candidate.source, CandidateSource::Url);
        assert!(trail.steps().iter().any(|s| s.detail.contains("decoded")));
    }

    #[test]
    fn test_windows_url_strips_three_slashes_and_rewrites_separators() {
        let descriptor =
            DropDescriptor::new("scene.usd", "ui").with_url("file:///C:/proj/scene.usd");

        let (candidate, _) = normalize(PathStyle::Windows, &descriptor);
        assert_eq!(candidate.path, "C:\\proj\\scene.usd");
        assert!(candidate.is_absolute);
    }

    #[test]
    fn test_localhost_authority_is_dropped() {
        let descriptor =
            DropDescriptor::new("scene.usd", "ui").with_url("file://localhost/proj/scene.usd");
        let (candidate, _) = normalize(PathStyle::Posix, &descriptor);
        assert_eq!(candidate.path, "/proj/scene.usd");
        assert!(candidate.is_absolute);

        let descriptor =
            DropDescriptor::new("scene.usd", "ui").with_url("FILE://LocalHost/C:/proj/scene.usd");
        let (candidate, _) = normalize(PathStyle::Windows, &descriptor);
        assert_eq!(candidate.path, "C:\\proj\\scene.usd");
        assert!(candidate.is_absolute);
    }

    #[test]
    fn test_remote_authority_is_not_a_local_path() {
        let descriptor = DropDescriptor::new("scene.usd", "ui").with_url("file://fileserver/proj/scene.usd");

        let (candidate, trail) = normalize(PathStyle::Posix, &descriptor);
        assert_eq!(candidate.source, CandidateSource::Name);
        assert_eq!(candidate.path, "scene.usd");
        assert!(trail.steps().iter().any(|s| s.detail.contains("not a file:// url")));
    }

    #[test]
    fn test_non_file_url_falls_through_to_relative_path() {
        let descriptor = DropDescriptor::new("scene.usd", "ui")
            .with_url("https://example.com/scene.usd")
            .with_relative_path("assets/scene.usd");

        let (candidate, trail) = normalize(PathStyle::Posix, &descriptor);
        assert_eq!(candidate.path, "assets/scene.usd");
        assert_eq!(candidate.source, CandidateSource::RelativePath);
        assert!(!candidate.is_absolute);
        assert!(trail.steps().iter().any(|s| s.detail.contains("not a file:// url")));
    }

    #[test]
    fn test_name_is_last_resort_and_no_root_is_invented() {
        let descriptor = DropDescriptor::new("scene.usd", "ui");

        let (candidate, trail) = normalize(PathStyle::Windows, &descriptor);
        assert_eq!(candidate.path, "scene.usd");
        assert_eq!(candidate.source, CandidateSource::Name);
        assert!(!candidate.is_absolute);
        assert!(trail.steps().iter().any(|s| s.detail.contains("no root is inferred")));
    }

    #[test]
    fn test_blank_fields_yield_empty_candidate() {
        let descriptor = DropDescriptor::new("  ", "ui").with_raw_path("");

        let (candidate, trail) = normalize(PathStyle::Posix, &descriptor);
        assert!(candidate.is_empty());
        assert_eq!(candidate.source, CandidateSource::None);
        assert!(trail.steps().iter().any(|s| s.detail.starts_with("EXTRACTION_EMPTY")));
    }

    #[test]
    fn test_decode_is_idempotent_on_decoded_input() {
        for input in ["/proj/scene.usd", "/proj/my scene.usd", "/proj/100%.usd", "/数据/场景.usd"] {
            let once = decode_url_path(input).unwrap();
            let twice = decode_url_path(&once).unwrap();
            assert_eq!(once, input);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_basename_accepts_both_separators() {
        assert_eq!(basename("/proj/scene.usd"), "scene.usd");
        assert_eq!(basename("C:\\proj\\scene.usd"), "scene.usd");
        assert_eq!(basename("scene.usd"), "scene.usd");
        assert_eq!(basename("/proj/dir/"), "dir");
    }

    #[test]
    fn test_join_uses_single_separator() {
        assert_eq!(PathStyle::Posix.join("/lib/", "scene.usd"), "/lib/scene.usd");
        assert_eq!(PathStyle::Windows.join("D:\\lib\\", "scene.usd"), "D:\\lib\\scene.usd");
    }

    #[test]
    fn test_windows_absolute_detection() {
        assert!(PathStyle::Windows.is_absolute("C:\\a.usd"));
        assert!(PathStyle::Windows.is_absolute("\\\\server\\share\\a.usd"));
        assert!(!PathStyle::Windows.is_absolute("a\\b.usd"));
        assert!(!PathStyle::Posix.is_absolute("C:\\a.usd"));
    }
}
