//! Ant-style path patterns.
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `/api/token` | exactly that path |
//! | `/files/*.png` | one segment ending in `.png` |
//! | `/v?/status` | `/v1/status`, `/v2/status`, ... |
//! | `/api-docs/**` | `/api-docs` and anything below it |
//! | `/swagger-ui.html**` | `**` inside a segment acts like `*` |
//!
//! Empty segments are ignored on both sides, so `/a//b/` is treated as `/a/b`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(Vec<char>),
    AnyDepth,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "**" {
            Segment::AnyDepth
        } else if raw.contains(['*', '?']) {
            Segment::Glob(raw.chars().collect())
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == segment,
            Segment::Glob(glob) => glob_match(glob, &segment.chars().collect::<Vec<_>>()),
            Segment::AnyDepth => true,
        }
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash);
        }

        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Wildcard match within one segment: `*` is any run of characters, `?` is
/// exactly one character.
fn glob_match(glob: &[char], text: &[char]) -> bool {
    let (mut g, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if g < glob.len() && (glob[g] == '?' || glob[g] == text[t]) {
            g += 1;
            t += 1;
        } else if g < glob.len() && glob[g] == '*' {
            // Collapse runs like `**` inside a segment.
            while g < glob.len() && glob[g] == '*' {
                g += 1;
            }
            backtrack = Some((g, t));
        } else if let Some((star_g, star_t)) = backtrack {
            g = star_g;
            t = star_t + 1;
            backtrack = Some((star_g, star_t + 1));
        } else {
            return false;
        }
    }

    glob[g..].iter().all(|&c| c == '*')
}
