use super::version::ReleaseKind;

/// Default commit-message prefix that turns a push into a formal release
pub const DEFAULT_GATE_PREFIX: &str = "release";

/// Decide the release kind from the triggering commit message
///
/// Only the subject line is inspected. A subject starting with `gate_prefix`
/// (case-insensitive, leading whitespace ignored) selects a formal release;
/// anything else builds a candidate.
pub fn release_kind_from_message(message: &str, gate_prefix: &str) -> ReleaseKind {
    let subject = message.lines().next().unwrap_or("").trim_start();

    if gate_prefix.is_empty() {
        return ReleaseKind::Candidate;
    }

    let matches = subject
        .get(..gate_prefix.len())
        .map(|head| head.eq_ignore_ascii_case(gate_prefix))
        .unwrap_or(false);

    if matches {
        ReleaseKind::Formal
    } else {
        ReleaseKind::Candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_prefix_is_formal() {
        assert_eq!(
            release_kind_from_message("release: 1.3.0", DEFAULT_GATE_PREFIX),
            ReleaseKind::Formal
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            release_kind_from_message("Release 1.3.0\n\nnotes", DEFAULT_GATE_PREFIX),
            ReleaseKind::Formal
        );
    }

    #[test]
    fn test_other_message_is_candidate() {
        assert_eq!(
            release_kind_from_message("fix: typo in docs", DEFAULT_GATE_PREFIX),
            ReleaseKind::Candidate
        );
    }

    #[test]
    fn test_prefix_in_body_ignored() {
        assert_eq!(
            release_kind_from_message("fix: typo\n\nrelease soon", DEFAULT_GATE_PREFIX),
            ReleaseKind::Candidate
        );
    }

    #[test]
    fn test_empty_message_and_prefix() {
        assert_eq!(
            release_kind_from_message("", DEFAULT_GATE_PREFIX),
            ReleaseKind::Candidate
        );
        assert_eq!(
            release_kind_from_message("release", ""),
            ReleaseKind::Candidate
        );
    }

    #[test]
    fn test_multibyte_subject_does_not_panic() {
        assert_eq!(
            release_kind_from_message("rélease", DEFAULT_GATE_PREFIX),
            ReleaseKind::Candidate
        );
    }
}
