//! Rules command implementation.

use std::path::Path;

use tack_config::{BuildConfig, LoaderUse};

use crate::cli::RulesArgs;
use crate::commands::utils::{self, LoadedConfig};
use crate::error::Result;
use crate::ui;

/// Print the matching rules and loader order for each path.
///
/// Output goes to stdout, one block per path:
///
/// ```text
/// src/app.css
///   rule 1 /\.css$/ (exclude /node_modules/)
///   loaders: css-loader -> style-loader
/// ```
pub fn execute(args: RulesArgs) -> Result<()> {
    let LoadedConfig { config, .. } = utils::load_config(&args.config)?;
    tack_config::validate_schema(&config)?;

    let mut unmatched = 0;
    for path in &args.paths {
        let report = describe(&config, path);
        if report.rules.is_empty() {
            unmatched += 1;
        }
        print!("{}", report.render());
    }

    if unmatched > 0 {
        ui::warning(&format!(
            "{} of {} paths match no rule and are bundled as-is",
            unmatched,
            args.paths.len()
        ));
    }
    Ok(())
}

/// Rules and loaders that apply to one path.
#[derive(Debug, PartialEq)]
struct PathReport {
    path: String,
    /// `(index, test, exclude)` per matching rule
    rules: Vec<(usize, String, Option<String>)>,
    loaders: Vec<String>,
}

impl PathReport {
    fn render(&self) -> String {
        let mut out = format!("{}\n", self.path);
        if self.rules.is_empty() {
            out.push_str("  no matching rule\n");
            return out;
        }
        for (index, test, exclude) in &self.rules {
            match exclude {
                Some(exclude) => {
                    out.push_str(&format!("  rule {index} /{test}/ (exclude /{exclude}/)\n"))
                }
                None => out.push_str(&format!("  rule {index} /{test}/\n")),
            }
        }
        out.push_str(&format!("  loaders: {}\n", self.loaders.join(" -> ")));
        out
    }
}

fn describe(config: &BuildConfig, path: &Path) -> PathReport {
    let rules = config
        .module
        .matching(path)
        .map(|(index, rule)| {
            (
                index,
                rule.test.as_str().to_string(),
                rule.exclude.as_ref().map(|p| p.as_str().to_string()),
            )
        })
        .collect();

    let loaders = config
        .module
        .loaders_for(path)
        .into_iter()
        .map(loader_label)
        .collect();

    PathReport {
        path: path.display().to_string(),
        rules,
        loaders,
    }
}

fn loader_label(loader: &LoaderUse) -> String {
    if loader.options.is_empty() {
        loader.loader.clone()
    } else {
        let options = serde_json::to_string(&loader.options).unwrap_or_default();
        format!("{}{}", loader.loader, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_config::presets;

    #[test]
    fn stylesheet_loaders_run_css_first() {
        let report = describe(&presets::with_loaders(), Path::new("src/app.css"));
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].0, 1);
        assert!(report.loaders[0].starts_with("css-loader"));
        assert_eq!(report.loaders[1], "style-loader");
    }

    #[test]
    fn vendor_paths_match_nothing() {
        let report = describe(&presets::with_loaders(), Path::new("node_modules/lib/index.js"));
        assert!(report.rules.is_empty());
        assert!(report.render().contains("no matching rule"));
    }

    #[test]
    fn render_lists_exclude_and_loader_order() {
        let report = describe(&presets::with_loaders(), Path::new("src/index.js"));
        let rendered = report.render();
        assert!(rendered.starts_with("src/index.js\n"));
        assert!(rendered.contains("(exclude /node_modules/)"));
        assert!(rendered.contains("loaders: babel-loader"));
    }

    #[test]
    fn url_loader_options_are_shown() {
        let report = describe(&presets::with_loaders(), Path::new("src/logo.png"));
        assert_eq!(report.loaders.len(), 1);
        assert!(report.loaders[0].starts_with("url-loader{"));
        assert!(report.loaders[0].contains("\"limit\":8000"));
    }
}
