use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use inflatekit_io_fs::{N_COPIES_DEFAULT, ReportReplicate, SpecReplicateOptions, replicate_tree};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inflatekit")]
#[command(
    about = "Inflate a dataset by replicating a directory tree with index-suffixed file names",
    long_about = None
)]
struct Cli {
    /// Directory tree to replicate
    #[arg(short, long, default_value = "DATA")]
    source: PathBuf,
    /// Directory receiving the renamed copies (created if missing)
    #[arg(short, long, default_value = "DATA_100GB")]
    target: PathBuf,
    /// Number of full copies; copy `i` is named `<stem>_copy<i><ext>`
    #[arg(short = 'n', long, default_value_t = N_COPIES_DEFAULT)]
    copies: usize,
    /// Do not print the completion summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!(
        source = %cli.source.display(),
        target = %cli.target.display(),
        copies = cli.copies,
        "Inflating dataset"
    );
    let report = replicate_tree(
        &cli.source,
        &cli.target,
        SpecReplicateOptions {
            num_copies: cli.copies,
        },
    )
    .with_context(|| {
        format!(
            "replicating {} into {}",
            cli.source.display(),
            cli.target.display()
        )
    })?;
    warn_if_nothing_replicated(&report, &cli.source);

    if !cli.quiet {
        println!(
            "Dataset replicated {} times into {} with unique filenames.",
            cli.copies,
            cli.target.display()
        );
        println!("{report}");
    }
    Ok(())
}

/// Warn when copies were requested but no source file was visited, which
/// usually means `--source` points at a missing or empty directory.
fn warn_if_nothing_replicated(report: &ReportReplicate, source: &Path) -> bool {
    if report.cnt_passes == 0 || report.cnt_scanned > 0 {
        return false;
    }
    warn!(
        source = %source.display(),
        "No source files found; nothing was replicated"
    );
    true
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};
    use inflatekit_io_fs::ReportReplicate;

    use super::{Cli, warn_if_nothing_replicated};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults_match_original_constants() {
        let cli = Cli::try_parse_from(["inflatekit"]).expect("parse defaults");
        assert_eq!(cli.source, PathBuf::from("DATA"));
        assert_eq!(cli.target, PathBuf::from("DATA_100GB"));
        assert_eq!(cli.copies, 20);
        assert!(!cli.quiet);
    }

    #[test]
    fn cli_accepts_explicit_paths_and_count() {
        let cli = Cli::try_parse_from(["inflatekit", "-s", "in", "--target", "out", "-n", "3", "-q"])
            .expect("parse args");
        assert_eq!(cli.source, PathBuf::from("in"));
        assert_eq!(cli.target, PathBuf::from("out"));
        assert_eq!(cli.copies, 3);
        assert!(cli.quiet);
    }

    #[test]
    fn cli_rejects_negative_count() {
        assert!(Cli::try_parse_from(["inflatekit", "-n", "-1"]).is_err());
    }

    #[test]
    fn warns_only_when_passes_ran_without_files() {
        let path_source = PathBuf::from("DATA");
        let report_empty = ReportReplicate {
            cnt_passes: 3,
            ..ReportReplicate::default()
        };
        assert!(warn_if_nothing_replicated(&report_empty, &path_source));

        let report_zero_copies = ReportReplicate::default();
        assert!(!warn_if_nothing_replicated(&report_zero_copies, &path_source));

        let report_copied = ReportReplicate {
            cnt_passes: 1,
            cnt_scanned: 2,
            cnt_copied: 2,
            ..ReportReplicate::default()
        };
        assert!(!warn_if_nothing_replicated(&report_copied, &path_source));
    }
}
