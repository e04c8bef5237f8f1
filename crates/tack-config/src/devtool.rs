//! Source-map modes (`devtool`).
//!
//! Serialized as the conventional devtool strings; `false` disables source maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "DevtoolRepr", into = "DevtoolRepr")]
pub enum SourceMapMode {
    /// No source maps
    #[default]
    None,
    Eval,
    CheapEvalSourceMap,
    /// Line-only mappings to the original sources, evaluated inline; the usual development choice
    CheapModuleEvalSourceMap,
    EvalSourceMap,
    CheapSourceMap,
    CheapModuleSourceMap,
    /// Full separate `.map` file
    SourceMap,
    InlineSourceMap,
    HiddenSourceMap,
    NosourcesSourceMap,
}

const MODES: &[(SourceMapMode, &str)] = &[
    (SourceMapMode::Eval, "eval"),
    (SourceMapMode::CheapEvalSourceMap, "cheap-eval-source-map"),
    (
        SourceMapMode::CheapModuleEvalSourceMap,
        "cheap-module-eval-source-map",
    ),
    (SourceMapMode::EvalSourceMap, "eval-source-map"),
    (SourceMapMode::CheapSourceMap, "cheap-source-map"),
    (SourceMapMode::CheapModuleSourceMap, "cheap-module-source-map"),
    (SourceMapMode::SourceMap, "source-map"),
    (SourceMapMode::InlineSourceMap, "inline-source-map"),
    (SourceMapMode::HiddenSourceMap, "hidden-source-map"),
    (SourceMapMode::NosourcesSourceMap, "nosources-source-map"),
];

impl SourceMapMode {
    /// Devtool string, or `None` when source maps are disabled.
    pub fn as_str(self) -> Option<&'static str> {
        MODES
            .iter()
            .find(|(mode, _)| *mode == self)
            .map(|(_, name)| *name)
    }

    pub fn is_enabled(self) -> bool {
        self != SourceMapMode::None
    }

    /// Module code is wrapped in `eval()` with inline mappings.
    pub fn is_eval(self) -> bool {
        self.as_str().is_some_and(|name| name.contains("eval"))
    }

    /// A separate `.map` file lands next to the bundle.
    pub fn emits_map_file(self) -> bool {
        matches!(
            self,
            SourceMapMode::CheapSourceMap
                | SourceMapMode::CheapModuleSourceMap
                | SourceMapMode::SourceMap
                | SourceMapMode::HiddenSourceMap
                | SourceMapMode::NosourcesSourceMap
        )
    }

    /// Suitable for shipping: no eval wrappers and no inlined maps.
    pub fn is_production_safe(self) -> bool {
        !self.is_eval() && self != SourceMapMode::InlineSourceMap
    }
}

impl FromStr for SourceMapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "false" || s == "none" {
            return Ok(SourceMapMode::None);
        }
        MODES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(mode, _)| *mode)
            .ok_or_else(|| format!("unknown devtool `{s}`"))
    }
}

impl fmt::Display for SourceMapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("false"))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DevtoolRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<DevtoolRepr> for SourceMapMode {
    type Error = String;

    fn try_from(repr: DevtoolRepr) -> Result<Self, Self::Error> {
        match repr {
            DevtoolRepr::Flag(false) => Ok(SourceMapMode::None),
            DevtoolRepr::Flag(true) => Err("devtool `true` is ambiguous, name a mode".to_string()),
            DevtoolRepr::Name(name) => name.parse(),
        }
    }
}

impl From<SourceMapMode> for DevtoolRepr {
    fn from(mode: SourceMapMode) -> Self {
        match mode.as_str() {
            Some(name) => DevtoolRepr::Name(name.to_string()),
            None => DevtoolRepr::Flag(false),
        }
    }
}
