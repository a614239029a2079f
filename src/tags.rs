//! Log tag registry and tag selection
//!
//! A tag is a named category of log output. Test programs register the tags
//! they log under; the `--tags` option then selects which of them are active.
//! Every tag maps one-to-one onto a `tracing` target, so code logs under a tag
//! with `tracing::info!(target: "io", ...)`.

use std::collections::BTreeMap;

use tracing_subscriber::filter::Directive;

use crate::errors::{DriverError, Result};

/// Selection keyword enabling every registered tag
pub const ALL_TAGS: &str = "all";

/// Sentinel value of `--tags` requesting the tag listing
pub const LIST_TAGS: &str = "0";

/// Metadata attached to a registered tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub description: String,
}

/// Ordered mapping from tag name to its metadata
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, TagInfo>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag.
    ///
    /// Names must be non-empty, must not be the reserved words `all` or `0`,
    /// and must be usable as a `tracing` target in a filter directive: no
    /// whitespace, commas, `=`, brackets, braces or quotes.
    pub fn register(&mut self, name: &str, description: &str) -> Result<&mut Self> {
        validate_tag_name(name)?;

        if self.tags.contains_key(name) {
            return Err(DriverError::DuplicateTag(name.to_string()));
        }

        self.tags.insert(
            name.to_string(),
            TagInfo {
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        Ok(self)
    }

    /// Builder-style registration
    pub fn with_tag(mut self, name: &str, description: &str) -> Result<Self> {
        self.register(name, description)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TagInfo> {
        self.tags.get(name)
    }

    /// Iterate over registered tags in name order
    pub fn iter(&self) -> impl Iterator<Item = &TagInfo> {
        self.tags.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Characters the `--tags` list syntax or a filter directive would split on
const RESERVED_CHARS: &[char] = &[',', '=', '[', ']', '{', '}', '"'];

fn validate_tag_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == ALL_TAGS
        || name == LIST_TAGS
        || name.chars().any(|c| RESERVED_CHARS.contains(&c) || c.is_whitespace())
        || format!("{}=info", name).parse::<Directive>().is_err();

    if invalid {
        return Err(DriverError::InvalidTagName(name.to_string()));
    }
    Ok(())
}

/// Which tag groups are active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSelection {
    /// Every registered tag
    All,
    /// Only the listed tags, in the order given
    Only(Vec<String>),
}

impl TagSelection {
    /// Parse a `--tags` value such as `all` or `io,mesh`
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == ALL_TAGS {
            return Ok(TagSelection::All);
        }

        let mut names: Vec<String> = Vec::new();
        for part in raw.split(',') {
            let name = part.trim();
            if name.is_empty() {
                return Err(DriverError::EmptyTagSelection(raw.to_string()));
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        // "all" mixed into a list still means everything
        if names.iter().any(|n| n == ALL_TAGS) {
            return Ok(TagSelection::All);
        }

        Ok(TagSelection::Only(names))
    }

    /// Check every selected tag against the registry
    pub fn validate(&self, registry: &TagRegistry) -> Result<()> {
        if let TagSelection::Only(names) = self {
            if let Some(unknown) = names.iter().find(|n| !registry.contains(n)) {
                return Err(DriverError::UnknownTag(unknown.clone()));
            }
        }
        Ok(())
    }

    pub fn enables(&self, tag: &str) -> bool {
        match self {
            TagSelection::All => true,
            TagSelection::Only(names) => names.iter().any(|n| n == tag),
        }
    }
}
