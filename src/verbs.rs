//! HTTP verbs accepted by the generator and their partition into route groups.

use crate::error::ConfigError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 5] = [Verb::Get, Verb::Post, Verb::Patch, Verb::Put, Verb::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ConfigError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str() == upper)
            .ok_or(ConfigError::UnsupportedVerb(upper))
    }
}

/// Ordered verb set. Iteration order is GET, POST, PATCH, PUT, DELETE.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerbSet(BTreeSet<Verb>);

impl VerbSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw verb names. Duplicates collapse; any unknown verb rejects the whole set.
    pub fn parse<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| s.as_ref().parse::<Verb>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(VerbSet)
    }

    /// Read-only default: GET only.
    pub fn read_only() -> Self {
        [Verb::Get].into_iter().collect()
    }

    pub fn contains(&self, verb: Verb) -> bool {
        self.0.contains(&verb)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Verb> + '_ {
        self.0.iter().copied()
    }

    pub fn intersection(&self, allowed: &[Verb]) -> VerbSet {
        self.iter().filter(|v| allowed.contains(v)).collect()
    }

    pub fn union(&self, other: &VerbSet) -> VerbSet {
        self.iter().chain(other.iter()).collect()
    }

    pub fn is_subset(&self, other: &VerbSet) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl FromIterator<Verb> for VerbSet {
    fn from_iter<T: IntoIterator<Item = Verb>>(iter: T) -> Self {
        VerbSet(iter.into_iter().collect())
    }
}

impl fmt::Display for VerbSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|v| v.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

/// Normalized verb configuration for one registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbConfig {
    pub verbs: VerbSet,
    pub allow_bulk_patch: bool,
    pub allow_function_eval: bool,
}

impl Default for VerbConfig {
    fn default() -> Self {
        Self {
            verbs: VerbSet::read_only(),
            allow_bulk_patch: false,
            allow_function_eval: false,
        }
    }
}

/// Verbs grouped by the URL shape they bind to. Groups may overlap (GET usually sits in two).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbPartition {
    /// Collection path, no identifier.
    pub collection_only: VerbSet,
    /// Collection path, identifier optional and absent by default.
    pub mixed_arity: VerbSet,
    /// Instance path, identifier required.
    pub instance_only: VerbSet,
}

impl VerbPartition {
    pub fn partition(verbs: &VerbSet, allow_bulk_patch: bool) -> Self {
        let mixed: &[Verb] = if allow_bulk_patch {
            &[Verb::Get, Verb::Patch, Verb::Put]
        } else {
            &[Verb::Get]
        };
        Self {
            collection_only: verbs.intersection(&[Verb::Post]),
            mixed_arity: verbs.intersection(mixed),
            instance_only: verbs.intersection(&[Verb::Get, Verb::Patch, Verb::Put, Verb::Delete]),
        }
    }

    pub fn from_config(config: &VerbConfig) -> Self {
        Self::partition(&config.verbs, config.allow_bulk_patch)
    }

    /// Every verb that ends up bound somewhere.
    pub fn bound_verbs(&self) -> VerbSet {
        self.collection_only
            .union(&self.mixed_arity)
            .union(&self.instance_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[&str]) -> VerbSet {
        VerbSet::parse(raw).unwrap()
    }

    #[test]
    fn parse_is_case_insensitive_and_collapses_duplicates() {
        let verbs = set(&["get", "GET", " Post ", "delete"]);
        assert_eq!(verbs.len(), 3);
        assert_eq!(verbs.to_string(), "GET,POST,DELETE");
    }

    #[test]
    fn unsupported_verb_is_rejected() {
        let err = VerbSet::parse(["GET", "options"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVerb(ref v) if v == "OPTIONS"));
    }

    #[test]
    fn read_only_partition() {
        let p = VerbPartition::partition(&set(&["GET"]), false);
        assert!(p.collection_only.is_empty());
        assert_eq!(p.mixed_arity, set(&["GET"]));
        assert_eq!(p.instance_only, set(&["GET"]));
    }

    #[test]
    fn bulk_patch_widens_mixed_arity() {
        let verbs = set(&["GET", "POST", "PATCH", "PUT", "DELETE"]);
        let narrow = VerbPartition::partition(&verbs, false);
        let wide = VerbPartition::partition(&verbs, true);
        assert_eq!(narrow.mixed_arity, set(&["GET"]));
        assert_eq!(wide.mixed_arity, set(&["GET", "PATCH", "PUT"]));
        assert_eq!(wide.collection_only, set(&["POST"]));
        assert_eq!(wide.instance_only, set(&["GET", "PATCH", "PUT", "DELETE"]));
    }

    #[test]
    fn partitions_are_subsets_and_cover_every_verb() {
        let samples: [&[&str]; 5] = [
            &[],
            &["POST"],
            &["DELETE"],
            &["PUT", "POST"],
            &["GET", "POST", "PATCH", "PUT", "DELETE"],
        ];
        for raw in samples {
            let verbs = set(raw);
            for bulk in [false, true] {
                let p = VerbPartition::partition(&verbs, bulk);
                assert!(p.collection_only.is_subset(&verbs));
                assert!(p.mixed_arity.is_subset(&verbs));
                assert!(p.instance_only.is_subset(&verbs));
                assert_eq!(p.bound_verbs(), verbs);
            }
        }
    }
}
