use std::path::{Path, PathBuf};

use crate::shared::constants::FONT_ENV;

/// Common install locations of a plain sans-serif TrueType font.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Resolve the overlay font file.
///
/// Resolution order:
/// 1. `explicit` (command line / settings)
/// 2. `FACECAM_FONT` environment variable
/// 3. Well-known system font paths
pub fn resolve(explicit: Option<&Path>) -> Option<PathBuf> {
    let env = std::env::var_os(FONT_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_with(explicit, env.as_deref(), SYSTEM_FONT_CANDIDATES)
}

fn resolve_with(
    explicit: Option<&Path>,
    env: Option<&Path>,
    candidates: &[&str],
) -> Option<PathBuf> {
    explicit
        .into_iter()
        .chain(env)
        .map(Path::to_path_buf)
        .chain(candidates.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("a.ttf");
        let env = dir.path().join("b.ttf");
        std::fs::write(&explicit, b"a").unwrap();
        std::fs::write(&env, b"b").unwrap();
        assert_eq!(
            resolve_with(Some(&explicit), Some(&env), &[]),
            Some(explicit)
        );
    }

    #[test]
    fn test_missing_explicit_falls_through_to_env() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join("b.ttf");
        std::fs::write(&env, b"b").unwrap();
        let missing = dir.path().join("missing.ttf");
        assert_eq!(resolve_with(Some(&missing), Some(&env), &[]), Some(env));
    }

    #[test]
    fn test_candidates_are_checked_last() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("c.ttf");
        std::fs::write(&candidate, b"c").unwrap();
        let candidate_str = candidate.to_str().unwrap();
        assert_eq!(
            resolve_with(None, None, &["/nonexistent/font.ttf", candidate_str]),
            Some(candidate.clone())
        );
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(resolve_with(None, None, &["/nonexistent/font.ttf"]), None);
    }
}
