use std::fmt;

use smallvec::SmallVec;

use crate::value::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object or map key.
    Key(String),
    /// An array, string or typed-array position.
    Index(usize),
}

impl Segment {
    /// The segment as an object key.
    pub(crate) fn key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    /// Looks the segment up in one container.
    pub(crate) fn lookup(&self, value: &Value) -> Option<Value> {
        match (value, self) {
            (Value::Object(entries), segment) => entries.get(segment.key().as_str()).cloned(),
            (Value::Map(entries), Self::Key(key)) => entries
                .get(&Value::from(key.as_str()))
                .or_else(|| key.parse::<i64>().ok().and_then(|number| entries.get(&Value::Int(number))))
                .cloned(),
            (Value::Map(entries), Self::Index(index)) => i64::try_from(*index)
                .ok()
                .and_then(|number| entries.get(&Value::Int(number)))
                .cloned(),
            (Value::Array(items), segment) => segment.position().and_then(|index| items.get(index)).cloned(),
            (Value::String(text), segment) => segment
                .position()
                .and_then(|index| text.chars().nth(index))
                .map(Value::from),
            (Value::Binary(array), segment) => segment.position().and_then(|index| array.get(index)),
            _ => None,
        }
    }

    pub(crate) fn position(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(key) => key.parse().ok(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => formatter.write_str(key),
            Self::Index(index) => write!(formatter, "[{index}]"),
        }
    }
}

/// A property path such as `user.addresses[0].city`.
///
/// Dots separate keys and brackets hold positions. A bracketed segment that
/// is not a number is a key, with surrounding quotes removed.
///
/// # Examples
///
/// ```rust
/// use tacit::accessor::{Path, Segment};
///
/// let path = Path::parse("a.b[0]['c.d']");
/// assert_eq!(
///     path.segments(),
///     &[
///         Segment::Key("a".to_string()),
///         Segment::Key("b".to_string()),
///         Segment::Index(0),
///         Segment::Key("c.d".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: SmallVec<[Segment; 4]>,
}

impl Path {
    /// Parses a dotted/bracketed path. Empty segments are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = SmallVec::new();
        let mut current = String::new();
        let mut characters = text.chars();
        while let Some(character) = characters.next() {
            match character {
                '.' => flush(&mut segments, &mut current),
                '[' => {
                    flush(&mut segments, &mut current);
                    let inner: String = characters.by_ref().take_while(|&next| next != ']').collect();
                    segments.push(bracketed(inner.trim()));
                }
                other => current.push(other),
            }
        }
        flush(&mut segments, &mut current);
        Self { segments }
    }

    /// Builds a path from explicit segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Segment>,
    {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// The segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` for the empty path, which resolves to the operand.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Follows the path; `None` when a step is missing.
    #[must_use]
    pub fn resolve(&self, value: &Value) -> Option<Value> {
        let Some((first, rest)) = self.segments.split_first() else {
            return Some(value.clone());
        };
        rest.iter()
            .try_fold(first.lookup(value)?, |current, segment| segment.lookup(&current))
    }
}

fn flush(segments: &mut SmallVec<[Segment; 4]>, current: &mut String) {
    if !current.is_empty() {
        segments.push(Segment::Key(std::mem::take(current)));
    }
}

fn bracketed(inner: &str) -> Segment {
    if let Ok(index) = inner.parse::<usize>() {
        return Segment::Index(index);
    }
    let unquoted = inner
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
        .unwrap_or(inner);
    Segment::Key(unquoted.to_string())
}

impl From<&str> for Path {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for Path {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Self::from_segments([Segment::Index(index)])
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self::from_segments(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 && matches!(segment, Segment::Key(_)) {
                formatter.write_str(".")?;
            }
            write!(formatter, "{segment}")?;
        }
        Ok(())
    }
}
