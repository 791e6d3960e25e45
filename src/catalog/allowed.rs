//! Allowed-value catalog queried by the request filter.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::record::SwitchRecord;

/// Request parameters whose values are checked against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Runtime identifier, parameter `jdk`.
    Runtime,
    /// Operating system, parameter `os`.
    Platform,
    /// CPU architecture, parameter `arch`.
    Architecture,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Runtime, Self::Platform, Self::Architecture];

    /// Map a request parameter name to its category.
    ///
    /// Names are matched exactly; `None` means a free-form parameter.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "jdk" => Some(Self::Runtime),
            "os" => Some(Self::Platform),
            "arch" => Some(Self::Architecture),
            _ => None,
        }
    }

    /// Request parameter name for this category.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Runtime => "jdk",
            Self::Platform => "os",
            Self::Architecture => "arch",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Membership test over the allowed values of each category.
pub trait AllowedValueCatalog: Send + Sync {
    fn is_allowed(&self, category: Category, value: &str) -> bool;
}

/// In-memory catalog, immutable once shared with a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedValues {
    values: BTreeMap<Category, BTreeSet<String>>,
}

impl AllowedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect runtimes, platforms and architectures named by `records`.
    /// Empty platform or architecture fields mean "any" and add nothing.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SwitchRecord>,
    {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(Category::Runtime, &record.runtime);
            catalog.insert(Category::Platform, &record.platform);
            catalog.insert(Category::Architecture, &record.architecture);
        }
        catalog
    }

    /// Builder-style bulk insert.
    pub fn with_values<I, S>(mut self, category: Category, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            let value = value.into();
            self.insert(category, &value);
        }
        self
    }

    /// Add one value. Empty strings are ignored.
    pub fn insert(&mut self, category: Category, value: &str) {
        if value.is_empty() {
            return;
        }
        self.values
            .entry(category)
            .or_default()
            .insert(value.to_string());
    }

    /// Allowed values for `category`, sorted.
    pub fn values(&self, category: Category) -> impl Iterator<Item = &str> {
        self.values
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn runtimes(&self) -> impl Iterator<Item = &str> {
        self.values(Category::Runtime)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.values(Category::Platform)
    }

    pub fn architectures(&self) -> impl Iterator<Item = &str> {
        self.values(Category::Architecture)
    }

    /// Number of allowed values for `category`.
    pub fn len(&self, category: Category) -> usize {
        self.values.get(&category).map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeSet::is_empty)
    }
}

impl AllowedValueCatalog for AllowedValues {
    fn is_allowed(&self, category: Category, value: &str) -> bool {
        self.values
            .get(&category)
            .is_some_and(|set| set.contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SwitchKind;

    fn record(runtime: &str, platform: &str, architecture: &str) -> SwitchRecord {
        SwitchRecord {
            runtime: runtime.into(),
            platform: platform.into(),
            architecture: architecture.into(),
            prefix: "-XX:".into(),
            name: "UseCompressedOops".into(),
            kind: SwitchKind::Bool,
            default_value: "true".into(),
            availability: "product".into(),
            since: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
    }

    #[test]
    fn test_unknown_keys_are_free_form() {
        assert_eq!(Category::from_key("comment"), None);
        assert_eq!(Category::from_key("OS"), None);
        assert_eq!(Category::from_key(""), None);
    }

    #[test]
    fn test_from_records_collects_each_category() {
        let records = vec![
            record("OpenJDK8", "linux", "x86_64"),
            record("OpenJDK11", "windows", ""),
            record("OpenJDK11", "", "aarch64"),
        ];
        let catalog = AllowedValues::from_records(&records);

        assert_eq!(catalog.runtimes().collect::<Vec<_>>(), vec!["OpenJDK11", "OpenJDK8"]);
        assert_eq!(catalog.platforms().collect::<Vec<_>>(), vec!["linux", "windows"]);
        assert_eq!(catalog.architectures().collect::<Vec<_>>(), vec!["aarch64", "x86_64"]);
        assert!(!catalog.is_allowed(Category::Platform, ""));
    }

    #[test]
    fn test_membership_is_per_category() {
        let catalog = AllowedValues::new()
            .with_values(Category::Platform, ["linux", "windows", "macos"]);

        assert!(catalog.is_allowed(Category::Platform, "linux"));
        assert!(!catalog.is_allowed(Category::Platform, "solaris"));
        assert!(!catalog.is_allowed(Category::Architecture, "linux"));
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let catalog = AllowedValues::new().with_values(Category::Platform, ["linux"]);
        assert!(!catalog.is_allowed(Category::Platform, "Linux"));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = AllowedValues::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(Category::Runtime), 0);
        assert_eq!(catalog.values(Category::Runtime).count(), 0);
    }
}
