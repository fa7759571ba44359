#![allow(dead_code, unreachable_pub)]

use std::borrow::BorrowMut;
use std::path::PathBuf;
use std::process::{Command, Output};

use regex::Regex;

use u440_static::EnvVars;

/// Filters applied to every snapshot.
pub const INSTA_FILTERS: &[(&str, &str)] = &[
    // Log timestamps
    (
        r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z",
        "[TIME]",
    ),
    // Rewrite Windows output to Unix output
    (r"u440\.exe", "u440"),
];

/// Returns the u440 binary that cargo built before launching the tests.
///
/// <https://doc.rust-lang.org/cargo/reference/environment-variables.html#environment-variables-cargo-sets-for-crates>
pub fn get_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_u440"))
}

/// A `u440` command isolated from the configuration of the calling environment.
pub fn u440_command() -> Command {
    let mut command = Command::new(get_bin());
    command
        .env_remove(EnvVars::U440_SCHEME)
        .env_remove(EnvVars::U440_OUTPUT_FORMAT)
        .env_remove(EnvVars::RUST_LOG);
    command
}

pub fn apply_filters<T: AsRef<str>>(mut snapshot: String, filters: impl AsRef<[(T, T)]>) -> String {
    for (matcher, replacement) in filters.as_ref() {
        let re = Regex::new(matcher.as_ref()).expect("Do you need to regex::escape your filter?");
        if re.is_match(&snapshot) {
            snapshot = re.replace_all(&snapshot, replacement.as_ref()).to_string();
        }
    }
    snapshot
}

/// Execute the command and format its output status, stdout and stderr into a snapshot string.
///
/// This function is derived from `insta_cmd`s `spawn_with_info`.
pub fn run_and_format<T: AsRef<str>>(
    mut command: impl BorrowMut<Command>,
    filters: impl AsRef<[(T, T)]>,
) -> (String, Output) {
    let program = command
        .borrow_mut()
        .get_program()
        .to_string_lossy()
        .to_string();

    let output = command
        .borrow_mut()
        .output()
        .unwrap_or_else(|err| panic!("Failed to spawn {program}: {err}"));

    let snapshot = apply_filters(
        format!(
            "success: {:?}\nexit_code: {}\n----- stdout -----\n{}\n----- stderr -----\n{}",
            output.status.success(),
            output.status.code().unwrap_or(!0),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ),
        filters,
    );

    (snapshot, output)
}

/// Run the command and snapshot its status and output, with default filters or with custom
/// filters.
#[allow(unused_macros)]
macro_rules! u440_snapshot {
    ($spawnable:expr, @$snapshot:literal) => {{
        u440_snapshot!($crate::common::INSTA_FILTERS.to_vec(), $spawnable, @$snapshot)
    }};
    ($filters:expr, $spawnable:expr, @$snapshot:literal) => {{
        let (snapshot, output) = $crate::common::run_and_format($spawnable, &$filters);
        ::insta::assert_snapshot!(snapshot, @$snapshot);
        output
    }};
}

/// <https://stackoverflow.com/a/31749071/3549270>
#[allow(unused_imports)]
pub(crate) use u440_snapshot;
