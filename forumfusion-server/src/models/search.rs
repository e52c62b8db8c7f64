//! Substring search helpers

/// Build an `ILIKE` pattern that matches `needle` as a literal substring.
///
/// `%`, `_` and the escape character itself are escaped with `\`, which is
/// Postgres' default `LIKE` escape.
///
/// # Example
/// ```
/// use forumfusion_server::models::like_pattern;
///
/// assert_eq!(like_pattern("rust"), "%rust%");
/// assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Normalize an optional search query: blank means "no filter".
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
