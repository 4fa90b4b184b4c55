//! Mapper configuration.
//!
//! Everything that used to be ambient default state (the culture used by
//! conversions, whether resolutions are cached, which concrete collection shape
//! backs each requested shape) is an explicit, serializable value passed to
//! [`Mapper`](crate::Mapper) at construction time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Result, types::CollectionShape};

/// Number formatting rules used by culture-aware conversions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    /// Culture identifier, empty for the invariant culture.
    pub name: String,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Culture {
    /// The invariant culture: `.` for decimals, `,` for groups.
    pub fn invariant() -> Self {
        Culture {
            name: String::new(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }

    /// A built-in culture by identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use graft::Culture;
    ///
    /// let german = Culture::named("de-DE").unwrap();
    /// assert_eq!(german.decimal_separator, ',');
    /// assert!(Culture::named("xx-XX").is_none());
    /// ```
    pub fn named(name: &str) -> Option<Self> {
        let (decimal_separator, group_separator) = match name {
            "" => return Some(Self::invariant()),
            "en-US" | "en-GB" => ('.', ','),
            "de-DE" => (',', '.'),
            "fr-FR" => (',', '\u{202f}'),
            _ => return None,
        };
        Some(Culture {
            name: name.to_string(),
            decimal_separator,
            group_separator,
        })
    }

    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// The default table mapping requested collection shapes to concrete shapes.
pub fn default_enumerable_shapes() -> BTreeMap<CollectionShape, CollectionShape> {
    BTreeMap::from([
        (CollectionShape::Sequence, CollectionShape::List),
        (CollectionShape::Collection, CollectionShape::List),
        (CollectionShape::List, CollectionShape::List),
        (CollectionShape::Set, CollectionShape::Set),
    ])
}

fn default_cache_resolutions() -> bool {
    true
}

/// Configuration for a [`Mapper`](crate::Mapper).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Culture used by convertible injections.
    #[serde(default)]
    pub culture: Culture,
    /// Wrap the store pipeline in a concurrent resolution cache.
    #[serde(default = "default_cache_resolutions")]
    pub cache_resolutions: bool,
    /// Concrete shape instantiated for each requested collection shape.
    #[serde(default = "default_enumerable_shapes")]
    pub enumerable_shapes: BTreeMap<CollectionShape, CollectionShape>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            culture: Culture::default(),
            cache_resolutions: default_cache_resolutions(),
            enumerable_shapes: default_enumerable_shapes(),
        }
    }
}

impl MapperConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn with_cache_resolutions(mut self, enabled: bool) -> Self {
        self.cache_resolutions = enabled;
        self
    }
}
