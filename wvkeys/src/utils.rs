/// Const-compatible case-insensitive ASCII byte comparison.
pub(crate) const fn eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i].to_ascii_lowercase() != b[i].to_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}

/// Current Unix time in whole seconds, zero if the clock is before the epoch.
pub(crate) fn unix_time_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ignore_case_matching() {
        assert!(eq_ignore_ascii_case(b"android", b"ANDROID"));
        assert!(eq_ignore_ascii_case(b"Chrome", b"cHROME"));
        assert!(eq_ignore_ascii_case(b"", b""));
    }

    #[test]
    fn eq_ignore_case_mismatch() {
        assert!(!eq_ignore_ascii_case(b"a", b"b"));
        assert!(!eq_ignore_ascii_case(b"ab", b"a"));
        assert!(!eq_ignore_ascii_case(b"l1", b"l3"));
    }

    #[test]
    fn unix_time_is_after_2020() {
        assert!(unix_time_secs() > 1_577_836_800);
    }
}
