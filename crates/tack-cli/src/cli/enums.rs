use clap::ValueEnum;
use tack_config::Preset;

/// Built-in configuration to start from
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum PresetArg {
    /// Entry, output and source maps only
    #[value(name = "basic")]
    Basic,

    /// Basic plus script, stylesheet and image transform rules
    #[value(name = "loaders", alias = "with-loaders")]
    Loaders,

    /// Loaders plus the HTML shell plugin
    #[value(name = "html", alias = "with-html")]
    Html,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Basic => Preset::Basic,
            PresetArg::Loaders => Preset::Loaders,
            PresetArg::Html => Preset::Html,
        }
    }
}

/// Serialization used by `tack show`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum ShowFormat {
    #[default]
    #[value(name = "json")]
    Json,

    #[value(name = "toml")]
    Toml,
}
