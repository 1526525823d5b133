use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    branches, depth, detached_ids, duplicate_ids, make, make_strict, walk, Identifiable,
};
use crate::record::RecordNode;
use crate::render::{forest_json, node_line, TreeNodeConvert, MAX_RENDER_DEPTH};

/// Applies command line overrides on top of loaded settings.
pub fn effective_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(root_id) = cli.root_id {
        settings.root_id = root_id;
    }
    if cli.strict {
        settings.strict = true;
    }
    settings
}

pub fn execute_command<W: Write>(cli: &Cli, settings: &Settings, out: &mut W) -> CliResult<()> {
    match &cli.command {
        Commands::Tree { file } => _tree(file, settings, out),
        Commands::Json { file } => _json(file, settings, out),
        Commands::Walk { file, stop_at } => _walk(file, *stop_at, settings, out),
        Commands::Branches { file } => _branches(file, settings, out),
        Commands::Check { file } => _check(file, out),
        Commands::Config { command } => _config(command, settings, out),
        Commands::Completion { shell } => _completion(*shell, out),
    }
}

/// Reads a JSON array of records from `path`, or from stdin for `-`.
#[instrument(level = "debug")]
pub fn load_records(path: &Path) -> CliResult<Vec<RecordNode>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buffer
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };
    let records: Vec<RecordNode> =
        serde_json::from_str(&content).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("records: {}", records.len());
    Ok(records)
}

/// Links `records` into a forest honoring the `strict` setting.
///
/// Outside strict mode, duplicate ids and nodes lost to parent cycles are reported
/// as warnings and the forest is built anyway.
#[instrument(level = "debug", skip(records))]
pub fn build_forest(records: &[RecordNode], settings: &Settings) -> CliResult<Vec<RecordNode>> {
    if settings.strict {
        return Ok(make_strict(records)?);
    }

    let duplicates = duplicate_ids(records);
    if !duplicates.is_empty() {
        warn!(?duplicates, "duplicate ids, later records win");
        output::warning(&format!(
            "duplicate ids, later records win: {}",
            duplicates.iter().join(", ")
        ));
    }

    let roots = make(records);
    let detached = detached_ids(records);
    if !detached.is_empty() {
        warn!(?detached, "records unreachable from any root");
        output::warning(&format!(
            "records caught in parent cycles: {}",
            detached.iter().join(", ")
        ));
    }
    Ok(roots)
}

fn forest_from(file: &Path, settings: &Settings) -> CliResult<Vec<RecordNode>> {
    let records = load_records(file)?;
    build_forest(&records, settings)
}

/// Refuses forests deeper than the recursive renderers can handle.
fn ensure_renderable(roots: &[RecordNode]) -> CliResult<()> {
    let depth = depth(roots);
    if depth > MAX_RENDER_DEPTH {
        warn!(depth, limit = MAX_RENDER_DEPTH, "forest too deep to render");
        return Err(CliError::TooDeep {
            depth,
            limit: MAX_RENDER_DEPTH,
        });
    }
    Ok(())
}

#[instrument(skip(out))]
fn _tree<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> CliResult<()> {
    let roots = forest_from(file, settings)?;
    ensure_renderable(&roots)?;
    for root in &roots {
        let rendered = root.to_tree_string().to_string();
        writeln!(out, "{}", rendered.trim_end())?;
    }
    Ok(())
}

#[instrument(skip(out))]
fn _json<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> CliResult<()> {
    let roots = forest_from(file, settings)?;
    ensure_renderable(&roots)?;
    let json = forest_json(&roots, settings.json_indent).map_err(CliError::Render)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[instrument(skip(out))]
fn _walk<W: Write>(
    file: &Path,
    stop_at: Option<i64>,
    settings: &Settings,
    out: &mut W,
) -> CliResult<()> {
    let roots = forest_from(file, settings)?;

    let mut lines = Vec::new();
    let completed = walk(&roots, &settings.root_id, |index, node, parent_id| {
        {
            let mut record = node.borrow_mut();
            record.seq = index + 1;
            record.parent_id = *parent_id;
        }
        lines.push(node_line(node));
        Some(node.id()) != stop_at
    });

    for line in lines {
        writeln!(out, "{}", line.map_err(CliError::Render)?)?;
    }
    if !completed {
        info!(?stop_at, "walk stopped early");
    }
    Ok(())
}

#[instrument(skip(out))]
fn _branches<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> CliResult<()> {
    let roots = forest_from(file, settings)?;
    for path in branches(&roots) {
        writeln!(out, "{}", path.iter().join(" -> "))?;
    }
    Ok(())
}

#[instrument(skip(out))]
fn _check<W: Write>(file: &Path, out: &mut W) -> CliResult<()> {
    let records = load_records(file)?;
    let duplicates = duplicate_ids(&records);
    let roots = make(&records);
    let detached = detached_ids(&records);

    writeln!(
        out,
        "records: {}, roots: {}, depth: {}",
        records.len(),
        roots.len(),
        depth(&roots)
    )?;
    if !duplicates.is_empty() {
        writeln!(out, "duplicate ids: {}", duplicates.iter().join(", "))?;
    }
    if !detached.is_empty() {
        writeln!(out, "detached (parent cycles): {}", detached.iter().join(", "))?;
    }

    if duplicates.is_empty() && detached.is_empty() {
        writeln!(out, "ok")?;
        Ok(())
    } else {
        Err(CliError::Check {
            duplicates: duplicates.len(),
            detached: detached.len(),
        })
    }
}

#[instrument(skip(out))]
fn _config<W: Write>(command: &ConfigCommands, settings: &Settings, out: &mut W) -> CliResult<()> {
    match command {
        ConfigCommands::Show => write!(out, "{}", settings.to_toml()?)?,
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => writeln!(out, "global: {}", path.display())?,
                None => writeln!(out, "global: <no config directory>")?,
            }
            let cwd = std::env::current_dir().map_err(CliError::CurrentDir)?;
            writeln!(out, "local:  {}", local_config_path(&cwd).display())?;
        }
        ConfigCommands::Template => write!(out, "{}", Settings::template())?,
    }
    Ok(())
}

fn _completion<W: Write>(shell: Shell, out: &mut W) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}
