/// Converts a string into a NUL terminated wide string as expected by `_TCHAR*` parameters.
#[inline]
pub(crate) fn str_to_wide(src: &str) -> Vec<u16> {
    src.encode_utf16()
        .chain(std::iter::once(0))
        .collect()
}
