//! Emit command implementation.
//!
//! Takes artifacts produced by the bundler, names them with the configured
//! output templates, writes them and runs the post-build plugins.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tack_build::{AssetInliner, AssetOutput, BuildError, BuildSession, ChunkSource, Emission};

use crate::cli::EmitArgs;
use crate::commands::utils::{self, LoadedConfig};
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the emit command.
///
/// # Errors
///
/// Fails before writing anything when the configuration is invalid, an
/// input file is missing, or two outputs would share a file name.
pub fn execute(args: EmitArgs) -> Result<()> {
    let LoadedConfig { config, root } = utils::load_config(&args.config)?;
    let session = BuildSession::new(config, &root)?.with_overwrite(!args.no_overwrite);

    let bundle = fs::read(&args.bundle).with_path(&args.bundle)?;
    let mut chunks = Vec::with_capacity(args.chunks.len());
    for (id, file) in &args.chunks {
        let contents = fs::read(file).with_path(file)?;
        let mut chunk = ChunkSource::new(id.clone(), contents);
        if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
            chunk = chunk.with_name(stem);
        }
        chunks.push(chunk);
    }

    let mut emission = session.plan(bundle, chunks)?;
    for asset in &args.assets {
        emission = add_asset(&session, emission, asset)?;
    }

    let report = session.finish(emission)?;
    ui::success(&format!(
        "Wrote {} files to {}",
        report.emitted.len() + report.plugin_outputs.len(),
        report.output_dir.display()
    ));
    ui::print_build_report(&report);
    Ok(())
}

/// Run one asset through the url-loader rule that matches it.
///
/// Inlined assets only print their data URI size; emitted ones join the
/// emission. Assets no url-loader rule matches are skipped with a warning.
fn add_asset(session: &BuildSession, emission: Emission, path: &Path) -> Result<Emission> {
    let Some(inliner) = AssetInliner::for_path(session.config(), path)? else {
        ui::warning(&format!(
            "{} matches no url-loader rule, skipping",
            path.display()
        ));
        return Ok(emission);
    };

    let bytes = fs::read(path).with_path(path)?;
    let (output, file) = inliner.process_file(path, bytes);

    match (&output, file) {
        (AssetOutput::Emit { url, .. }, Some(file)) => {
            let taken: HashSet<String> = emission.file_names().into_iter().collect();
            if taken.contains(&file.file_name) {
                return Err(BuildError::DuplicateOutput {
                    file_name: file.file_name,
                }
                .into());
            }
            ui::info(&format!("{} -> {}", path.display(), url));
            Ok(emission.with_asset(file))
        }
        (AssetOutput::Inline(uri), _) => {
            ui::info(&format!(
                "{} inlined ({} data URI)",
                path.display(),
                ui::format_size(uri.len() as u64)
            ));
            Ok(emission)
        }
        (AssetOutput::Emit { .. }, None) => Ok(emission),
    }
}
