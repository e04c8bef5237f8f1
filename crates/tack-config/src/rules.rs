//! Declarative transform rules.
//!
//! A rule pairs a path pattern with a loader chain. Rules are evaluated in
//! declaration order and every matching rule applies; inside a rule the chain
//! runs last-to-first, so `["style-loader", "css-loader"]` feeds the output of
//! `css-loader` into `style-loader`.

use indexmap::IndexMap;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A compiled regular expression that serializes as its source.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl FromStr for Pattern {
    type Err = regex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::new(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source)
            .map_err(|err| de::Error::custom(format!("invalid pattern `{source}`: {err}")))
    }
}

/// One step of a transform chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LoaderUseRepr")]
pub struct LoaderUse {
    pub loader: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, Value>,
}

impl LoaderUse {
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Loader entries accept the bare-name shorthand.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoaderUseRepr {
    Name(String),
    Full {
        loader: String,
        #[serde(default)]
        options: IndexMap<String, Value>,
    },
}

impl From<LoaderUseRepr> for LoaderUse {
    fn from(repr: LoaderUseRepr) -> Self {
        match repr {
            LoaderUseRepr::Name(loader) => LoaderUse::new(loader),
            LoaderUseRepr::Full { loader, options } => LoaderUse { loader, options },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(LoaderUse),
    Many(Vec<LoaderUse>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LoaderUse>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(single) => vec![single],
        OneOrMany::Many(chain) => chain,
    })
}

/// `(test, exclude, chain)` triple applied to matching source files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRule {
    /// Regex over the file path
    pub test: Pattern,

    /// When present the path must also match this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Pattern>,

    /// Paths matching this never match the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Pattern>,

    /// Loader chain, in authored order
    #[serde(rename = "use", default, deserialize_with = "one_or_many")]
    pub chain: Vec<LoaderUse>,
}

impl TransformRule {
    /// Build a rule from a pattern source.
    pub fn new(test: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            test: Pattern::new(test)?,
            include: None,
            exclude: None,
            chain: Vec::new(),
        })
    }

    pub fn exclude(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.exclude = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn include(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.include = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    pub fn then_use(mut self, loader: LoaderUse) -> Self {
        self.chain.push(loader);
        self
    }

    /// Does this rule apply to `path`?
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        let path = normalize(path.as_ref());
        self.test.is_match(&path)
            && self.include.as_ref().is_none_or(|p| p.is_match(&path))
            && !self.exclude.as_ref().is_some_and(|p| p.is_match(&path))
    }

    /// Loaders in the order they run over the source.
    pub fn application_order(&self) -> impl Iterator<Item = &LoaderUse> {
        self.chain.iter().rev()
    }

    pub fn loader_names(&self) -> Vec<&str> {
        self.chain.iter().map(|l| l.loader.as_str()).collect()
    }
}

/// Ordered rule table (`module.rules`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<TransformRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    /// Matching rules with their index, in declaration order.
    pub fn matching<'a>(
        &'a self,
        path: &'a Path,
    ) -> impl Iterator<Item = (usize, &'a TransformRule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.matches(path))
    }

    /// Full loader sequence for `path`, in application order.
    ///
    /// Chains of all matching rules are concatenated in declaration order and
    /// the combined list runs last-to-first.
    pub fn loaders_for(&self, path: &Path) -> Vec<&LoaderUse> {
        let mut loaders: Vec<&LoaderUse> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(path))
            .flat_map(|rule| rule.chain.iter())
            .collect();
        loaders.reverse();
        loaders
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Patterns are written against forward slashes.
fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
