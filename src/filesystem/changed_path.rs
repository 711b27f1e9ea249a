use std::fmt;

use derive_more::Deref;

pub const PATH_SEPARATOR: &str = "/";

/// A changed file as reported by the path source, split into its segments.
///
/// Segments are never empty and are ordered from the workspace root down to the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref)]
pub struct ChangedPath(Vec<String>);

impl ChangedPath {
    /// Parses one line of `git diff --name-only` output.
    ///
    /// Returns `None` when nothing is left after trimming. Empty segments caused by
    /// doubled, leading or trailing separators are dropped.
    pub fn parse(line: &str) -> Option<Self> {
        let segments = line
            .trim()
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        if segments.is_empty() {
            None
        } else {
            Some(ChangedPath(segments))
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The first `len` segments joined back into a path string.
    pub fn prefix(&self, len: usize) -> String {
        self.0[..len.min(self.0.len())].join(PATH_SEPARATOR)
    }
}

impl fmt::Display for ChangedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(PATH_SEPARATOR))
    }
}

/// Parses every non-empty line of the source output, skipping blank ones.
pub fn parse_changed_paths<I, S>(lines: I) -> Vec<ChangedPath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| ChangedPath::parse(line.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("src/docs/unit1.md", &["src", "docs", "unit1.md"])]
    #[case("README.md", &["README.md"])]
    #[case("  a/b.txt\n", &["a", "b.txt"])]
    #[case("/a//b/", &["a", "b"])]
    fn parse_splits_on_separator(#[case] line: &str, #[case] expected: &[&str]) {
        let path = ChangedPath::parse(line).expect("path should parse");
        assert_eq!(path.segments(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("/")]
    #[case("//")]
    fn parse_skips_empty_lines(#[case] line: &str) {
        assert!(ChangedPath::parse(line).is_none());
    }

    #[test]
    fn parse_changed_paths_drops_blank_lines() {
        let output = "a/b.txt\n\nc.txt\n";
        let paths = parse_changed_paths(output.lines());
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].to_string(), "a/b.txt");
        assert_eq!(paths[1].to_string(), "c.txt");
    }

    #[test]
    fn prefix_is_clamped_to_length() {
        let path = ChangedPath::parse("a/b/c").unwrap();
        assert_eq!(path.prefix(2), "a/b");
        assert_eq!(path.prefix(10), "a/b/c");
    }
}
