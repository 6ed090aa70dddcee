/// Index just past the earliest boilerplate heading in `text`.
///
/// The earliest occurrence of any heading wins; the index then moves past the
/// next newline so the whole heading line is skipped. With no newline after
/// the heading the index stays on the heading itself.
pub fn find_heading_index<S: AsRef<str>>(text: &str, headings: &[S]) -> Option<usize> {
    let start = headings
        .iter()
        .map(AsRef::as_ref)
        .filter(|heading| !heading.is_empty())
        .filter_map(|heading| text.find(heading))
        .min()?;

    Some(match text[start..].find('\n') {
        Some(newline) => start + newline + 1,
        None => start,
    })
}

/// Drops everything up to and including the heading line, if one is present.
pub fn strip_heading<S: AsRef<str>>(text: String, headings: &[S]) -> String {
    match find_heading_index(&text, headings) {
        Some(index) => text[index..].to_string(),
        None => text,
    }
}
