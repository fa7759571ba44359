use std::fmt::Write;

use anstream::{eprintln, println};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use u440_version::{Incomparable, MaskScheme, PackedVersion, SortedVersions, VersionOrder};

use crate::cli::OutputFormat;
use crate::commands::ExitStatus;
use crate::printer::Printer;

/// Pack each version under `scheme`, then show the versions in ascending order.
///
/// All inputs are parsed before anything is printed, so one invalid version aborts the whole
/// batch.
#[instrument(skip_all, fields(scheme = %scheme))]
pub(crate) fn pack(
    inputs: &[String],
    scheme: MaskScheme,
    output_format: OutputFormat,
    printer: Printer,
) -> Result<ExitStatus> {
    let versions = inputs
        .iter()
        .map(|input| {
            u440_version::parse(input).with_context(|| format!("Failed to parse `{input}`"))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("Packing {} versions under `{scheme}`", versions.len());

    // Pack each version once, for both its row and the ordering.
    let order = VersionOrder::new(scheme);
    let keyed: Vec<_> = versions
        .into_iter()
        .map(|version| (order.key(&version), version))
        .collect();
    let rows: Vec<Row> = inputs
        .iter()
        .zip(&keyed)
        .map(|(input, (key, version))| Row {
            input: input.as_str(),
            normalized: version.normalize(),
            packed: key.as_ref().ok().copied(),
        })
        .collect();
    let ordering = order.sort_keyed(keyed);

    match output_format {
        OutputFormat::Text => write_table(&rows, printer)?,
        OutputFormat::Json => {
            let report = Report {
                scheme,
                versions: &rows,
                ordering: ordering.as_ref().ok().map(ToString::to_string),
            };
            #[allow(clippy::print_stdout)]
            {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    match ordering {
        Ok(sorted) => {
            if output_format == OutputFormat::Text {
                write_ordering(&sorted);
            }
            Ok(ExitStatus::Success)
        }
        Err(err) => {
            write_incomparable(err);
            Ok(ExitStatus::Failure)
        }
    }
}

/// One input with its normalized form and packed value.
#[derive(Debug, Serialize)]
struct Row<'a> {
    input: &'a str,
    normalized: String,
    /// `None` when the version has no representation under the scheme.
    packed: Option<PackedVersion>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    scheme: MaskScheme,
    versions: &'a [Row<'a>],
    /// `None` when at least one version can't be ordered.
    ordering: Option<String>,
}

/// Print the normalized versions, padded to the widest one, next to their packed bits.
fn write_table(rows: &[Row], printer: Printer) -> Result<()> {
    let width = rows
        .iter()
        .map(|row| row.normalized.len())
        .max()
        .unwrap_or_default();
    let mut stdout = printer.stdout();
    for row in rows {
        match row.packed {
            Some(packed) => writeln!(stdout, "{:<width$} {packed:064b}", row.normalized)?,
            None => writeln!(
                stdout,
                "{:<width$} {}",
                row.normalized,
                "no representation".yellow()
            )?,
        }
    }
    Ok(())
}

/// The ordering is the primary output, so it's shown even with `--quiet`.
#[allow(clippy::print_stdout)]
fn write_ordering(sorted: &SortedVersions) {
    println!("{sorted}");
}

#[allow(clippy::print_stderr)]
fn write_incomparable(err: Incomparable) {
    let err = anyhow::Error::new(err);
    eprintln!("{}: {}", "error".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {}: {}", "Caused by".red().bold(), cause);
    }
}
