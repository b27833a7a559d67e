//! Optional generation features selected on the command line.

use std::{fmt, str::FromStr};

use indexmap::IndexSet;
use thiserror::Error;

/// A feature enabling one extra convenience setter per matching field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `SetXV(v T)` for `*T` fields.
    Ptr,
    /// `SetXV(v ...T)` for `[]T` fields.
    Arr,
    /// `SetXV(v T)` for `mo.Option[T]` fields.
    Opt,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Ptr, Feature::Arr, Feature::Opt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ptr => "ptr",
            Self::Arr => "arr",
            Self::Opt => "opt",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse feature='{0}'")]
pub struct FeatureError(pub String);

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| FeatureError(s.to_string()))
    }
}

/// The set of enabled features, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: IndexSet<Feature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Feature::ALL.into_iter().collect()
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl FromStr for FeatureSet {
    type Err = FeatureError;

    /// Parse a comma separated list such as `ptr,arr,opt`.
    ///
    /// Surrounding whitespace and trailing commas are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(',');
        if s.is_empty() {
            return Ok(Self::new());
        }

        s.split(',').map(|item| item.trim().parse()).collect()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|feature| feature.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Vec<Feature>, FeatureError> {
        s.parse::<FeatureSet>().map(|set| set.iter().collect())
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Ok(vec![]));
        assert_eq!(parse("  "), Ok(vec![]));
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(parse("ptr"), Ok(vec![Feature::Ptr]));
        assert_eq!(parse("arr"), Ok(vec![Feature::Arr]));
        assert_eq!(parse("opt"), Ok(vec![Feature::Opt]));
    }

    #[test]
    fn test_parse_keeps_order() {
        assert_eq!(
            parse("opt,arr,ptr"),
            Ok(vec![Feature::Opt, Feature::Arr, Feature::Ptr])
        );
    }

    #[test]
    fn test_parse_spaces_and_trailing_commas() {
        assert_eq!(
            parse(" opt,arr,ptr,,"),
            Ok(vec![Feature::Opt, Feature::Arr, Feature::Ptr])
        );
    }

    #[test]
    fn test_parse_duplicates_collapse() {
        assert_eq!(parse("ptr,ptr"), Ok(vec![Feature::Ptr]));
    }

    #[test]
    fn test_parse_unknown() {
        let err = parse("opt,arr,some").unwrap_err();
        assert_eq!(err, FeatureError("some".to_string()));
        assert_eq!(err.to_string(), "unable to parse feature='some'");
    }

    #[test]
    fn test_display() {
        assert_eq!(FeatureSet::all().to_string(), "ptr,arr,opt");
        assert_eq!(FeatureSet::new().to_string(), "");
    }
}
