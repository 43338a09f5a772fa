//! Declarative macros for generating CLI parsing and output tests.
//!
//! CLI parsing tests expect `crate::cli::Args`, `clap::Parser` and `rstest` in
//! scope; output tests expect `rstest` and a fixture returning the result type.

/// Parse `hrm_schema <argv...>` and unwrap the given `Command` variant.
#[doc(hidden)]
#[macro_export]
macro_rules! __parse_subcommand {
    ($variant:ident, [$($argv:expr),+ $(,)?]) => {{
        let parsed = Args::try_parse_from(["hrm_schema", $($argv),+])
            .unwrap_or_else(|e| panic!("argument parsing failed: {}", e));
        match parsed.command {
            crate::commands::Command::$variant(cmd) => cmd,
            other => panic!(
                concat!("parsed {:?}, wanted the ", stringify!($variant), " subcommand"),
                other
            ),
        }
    }};
}

/// Assert that every needle occurs in `haystack`.
#[doc(hidden)]
#[macro_export]
macro_rules! __assert_contains_all {
    ($what:literal, $haystack:expr, [$($needle:literal),*]) => {{
        let haystack: String = $haystack;
        $(
            assert!(
                haystack.contains($needle),
                "{} is missing {:?}:\n{}",
                $what,
                $needle,
                haystack
            );
        )*
    }};
}

/// Field values of a subcommand parsed with only its required arguments.
///
/// ```ignore
/// cli_defaults_test! {
///     command: "plan",
///     variant: Plan,
///     required_args: [],
///     defaults: { direction: Direction::Up },
/// }
/// ```
#[macro_export]
macro_rules! cli_defaults_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        required_args: [$($req_arg:literal),*],
        defaults: {
            $($field:ident : $expected:expr),* $(,)?
        } $(,)?
    ) => {
        #[rstest]
        fn test_defaults() {
            let cmd = $crate::__parse_subcommand!($variant, [$cmd $(, $req_arg)*]);
            $(
                assert_eq!(cmd.$field, $expected, concat!("default of --", stringify!($field)));
            )*
        }
    };
}

/// One option parsed into one field.
#[macro_export]
macro_rules! cli_option_test {
    (
        command: $cmd:literal,
        variant: $variant:ident,
        test_name: $test_name:ident,
        args: [$($arg:literal),+],
        field: $field:ident,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let cmd = $crate::__parse_subcommand!($variant, [$cmd, $($arg),+]);
            assert_eq!(cmd.$field, $expected, concat!("value of ", stringify!($field)));
        }
    };
}

/// Arguments clap must reject.
///
/// ```ignore
/// cli_error_test! {
///     command: "plan",
///     test_name: test_rejects_unknown_direction,
///     args: ["--direction", "sideways"],
/// }
/// ```
#[macro_export]
macro_rules! cli_error_test {
    (
        command: $cmd:literal,
        test_name: $test_name:ident,
        args: [$($arg:literal),+] $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let argv = ["hrm_schema", $cmd, $($arg),+];
            assert!(
                Args::try_parse_from(argv).is_err(),
                "expected {:?} to be rejected",
                argv
            );
        }
    };
}

/// Exact rendering of a fixture, as a table or in the given format.
#[macro_export]
macro_rules! output_table_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr,
        format: $format:ident $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{OutputFormat, Outputable};
            assert_eq!($fixture.format(OutputFormat::$format), $expected);
        }
    };
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr $(,)?
    ) => {
        $crate::output_table_test! {
            test_name: $test_name,
            fixture: $fixture,
            fixture_type: $fixture_type,
            expected: $expected,
            format: Table,
        }
    };
}

/// Substrings the table rendering must contain.
#[macro_export]
macro_rules! output_table_contains_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        contains: [$($needle:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::Outputable;
            $crate::__assert_contains_all!("table output", $fixture.to_table(), [$($needle),*]);
        }
    };
}

/// Top-level JSON fields and their values.
///
/// ```ignore
/// output_json_test! {
///     test_name: test_format_json,
///     fixture: applied,
///     fixture_type: UpResult,
///     assertions: { "backend": "Memory", "dry_run": false },
/// }
/// ```
#[macro_export]
macro_rules! output_json_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        assertions: { $($field:literal : $expected:expr),* $(,)? } $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{OutputFormat, Outputable};
            let json: serde_json::Value = serde_json::from_str(&$fixture.format(OutputFormat::Json))
                .unwrap_or_else(|e| panic!("invalid JSON output: {}", e));
            $(
                assert_eq!(json[$field], $expected, concat!("JSON field ", $field));
            )*
        }
    };
}

/// Substrings the toon rendering must contain.
#[macro_export]
macro_rules! output_toon_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        contains: [$($needle:literal),* $(,)?] $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use crate::output::{OutputFormat, Outputable};
            $crate::__assert_contains_all!(
                "toon output",
                $fixture.format(OutputFormat::Toon),
                [$($needle),*]
            );
        }
    };
}
