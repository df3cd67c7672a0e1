pub(crate) const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult<T> {
    /// No CRLF in the window yet. Nothing was consumed.
    NeedMore,
    Complete { value: T, consumed: usize },
}

impl<T> LineResult<T> {
    pub fn consumed(&self) -> usize {
        match self {
            LineResult::NeedMore => 0,
            LineResult::Complete { consumed, .. } => *consumed,
        }
    }
}

pub(crate) fn find_crlf(window: &[u8]) -> Option<usize> {
    twoway::find_bytes(window, CRLF)
}

#[cfg(test)]
mod tests {
    use super::find_crlf;

    #[test]
    fn finds_first_crlf() {
        assert_eq!(find_crlf(b"ab\r\ncd\r\n"), Some(2));
        assert_eq!(find_crlf(b"\r\n"), Some(0));
    }

    #[test]
    fn lone_cr_or_lf_is_not_a_terminator() {
        assert_eq!(find_crlf(b"ab\rcd\n"), None);
        assert_eq!(find_crlf(b"abc\r"), None);
        assert_eq!(find_crlf(b""), None);
    }
}
