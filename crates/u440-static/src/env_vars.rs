/// Declares all environment variables read by `u440` and its crates.
pub struct EnvVars;

impl EnvVars {
    /// Equivalent to the `--scheme` command-line argument. For example, if set to `uv64`, u440
    /// will pack versions with the uv layout.
    pub const U440_SCHEME: &'static str = "U440_SCHEME";

    /// Equivalent to the `--output-format` command-line argument. If set to `json`, u440 will
    /// print a single JSON document instead of the text table.
    pub const U440_OUTPUT_FORMAT: &'static str = "U440_OUTPUT_FORMAT";

    /// If set, u440 will use this value as the log level for its `--verbose` output. Accepts
    /// any filter compatible with the `tracing_subscriber` crate.
    ///
    /// For example:
    /// * `RUST_LOG=u440=debug` is the equivalent of adding `--verbose` to the command line
    /// * `RUST_LOG=trace` will enable trace-level logging, including every packed value.
    ///
    /// See the [tracing documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#example-syntax)
    /// for more.
    pub const RUST_LOG: &'static str = "RUST_LOG";
}
