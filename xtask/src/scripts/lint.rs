use crate::cli::LintArgs;
use color_eyre::eyre::{eyre, Result};
use duct::cmd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckId {
    Fmt,
    Clippy,
    Test,
    Typos,
}

struct Check {
    id: CheckId,
    program: &'static str,
    args: &'static [&'static str],
    /// Args used instead of `args` under `--fix`
    fix_args: Option<&'static [&'static str]>,
}

const CHECKS: &[Check] = &[
    Check {
        id: CheckId::Fmt,
        program: "cargo",
        args: &["fmt", "--all", "--check"],
        fix_args: Some(&["fmt", "--all"]),
    },
    Check {
        id: CheckId::Clippy,
        program: "cargo",
        args: &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        fix_args: Some(&[
            "clippy",
            "--workspace",
            "--all-targets",
            "--fix",
            "--allow-dirty",
            "--",
            "-D",
            "warnings",
        ]),
    },
    Check {
        id: CheckId::Test,
        program: "cargo",
        args: &["test", "--workspace"],
        fix_args: None,
    },
    Check {
        id: CheckId::Typos,
        program: "typos",
        args: &[],
        fix_args: Some(&["--write-changes"]),
    },
];

fn should_skip(id: CheckId, args: &LintArgs) -> bool {
    match id {
        CheckId::Fmt => args.no_fmt,
        CheckId::Clippy => args.no_clippy,
        CheckId::Test => args.no_test,
        CheckId::Typos => args.no_typos,
    }
}

fn effective_args(check: &Check, fix: bool) -> &'static [&'static str] {
    match (fix, check.fix_args) {
        (true, Some(args)) => args,
        _ => check.args,
    }
}

fn display_name(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Run every check in order, stopping at the first failure
pub fn run(args: &LintArgs) -> Result<()> {
    for check in CHECKS {
        if should_skip(check.id, args) {
            continue;
        }

        let check_args = effective_args(check, args.fix);
        let name = display_name(check.program, check_args);
        println!("==> {name}");

        let output = cmd(check.program, check_args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()?;

        let text = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            print!("{text}");
            return Err(eyre!("lint failed at: {name}"));
        }

        if args.verbose {
            print!("{text}");
        }
    }

    println!("All checks passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_mode_swaps_args() {
        let fmt = &CHECKS[0];
        assert_eq!(effective_args(fmt, false), &["fmt", "--all", "--check"]);
        assert_eq!(effective_args(fmt, true), &["fmt", "--all"]);

        let test = &CHECKS[2];
        assert_eq!(effective_args(test, true), test.args);
    }

    #[test]
    fn test_skip_flags() {
        let args = LintArgs {
            no_test: true,
            ..Default::default()
        };
        assert!(should_skip(CheckId::Test, &args));
        assert!(!should_skip(CheckId::Fmt, &args));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("typos", &[]), "typos");
        assert_eq!(
            display_name("cargo", &["test", "--workspace"]),
            "cargo test --workspace"
        );
    }
}
