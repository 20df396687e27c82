//! CLI entry points for the extraction binary.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, error::ErrorKind};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::{ColumnMap, OutputLayout};
use crate::constants::fetch::FALLBACK_SHARD_NAME;
use crate::constants::output::DEFAULT_OUTPUT_ROOT;
use crate::errors::ExtractError;
use crate::extract::ParquetExtractor;
use crate::fetch::download_to;

#[derive(Debug, Parser)]
#[command(
    name = "prodeval",
    disable_help_subcommand = true,
    about = "Extract product-evaluation parquet shards into images and CSV metadata",
    long_about = "Read product-search evaluation parquet shards, re-encode embedded product \
                  images as WebP artifacts, and write one aligned CSV metadata table per \
                  input file.",
    after_help = "Directory inputs are scanned recursively for *.parquet files and shards \
                  are processed strictly in sorted order. A failing shard is logged and the \
                  remaining inputs still run."
)]
struct ExtractCli {
    #[arg(
        value_name = "PATH",
        required_unless_present = "fetch",
        help = "Parquet files or directories to extract"
    )]
    inputs: Vec<PathBuf>,
    #[arg(
        long = "fetch",
        value_name = "URL",
        help = "Pre-signed shard URL downloaded into the shard directory before extraction, repeat as needed"
    )]
    fetch: Vec<String>,
    #[arg(
        long = "shard-dir",
        value_name = "DIR",
        default_value = "output/parquet",
        help = "Directory where fetched shards are stored"
    )]
    shard_dir: PathBuf,
    #[arg(
        long = "output-root",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_ROOT,
        help = "Root directory for images/ and metadata/ outputs"
    )]
    output_root: PathBuf,
}

/// Run the extraction CLI over explicit arguments (including `argv[0]`).
///
/// Fetches any `--fetch` URLs first, then extracts every resolved parquet
/// input in order. A failing download or shard is logged and the batch
/// continues; the run only errors when no input could be processed at all.
pub fn run<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    let Some(cli) = parse_cli::<ExtractCli, _>(args_iter)? else {
        return Ok(());
    };

    let mut inputs = Vec::new();
    let mut failures = 0usize;

    for url in &cli.fetch {
        let target = cli.shard_dir.join(shard_filename(url));
        match download_to(url, &target) {
            Ok(_) => inputs.push(target),
            Err(err) => {
                error!("[prodeval:app] {err}");
                failures += 1;
            }
        }
    }

    for path in &cli.inputs {
        if let Err(err) = collect_parquet_inputs(path, &mut inputs) {
            error!("[prodeval:app] {err}");
            failures += 1;
        }
    }

    if inputs.is_empty() {
        return Err(Box::new(ExtractError::Configuration(
            "no parquet inputs resolved from arguments".to_string(),
        )));
    }

    let extractor = ParquetExtractor::new(ColumnMap::default(), OutputLayout::new(&cli.output_root));
    let mut extracted = 0usize;
    for input in &inputs {
        match extractor.extract_file(input) {
            Ok(result) => {
                extracted += 1;
                info!(
                    "[prodeval:app] metadata table written: {}",
                    result.metadata_path.display()
                );
            }
            Err(err) => {
                error!("[prodeval:app] {err}");
                failures += 1;
            }
        }
    }

    if extracted == 0 {
        return Err(Box::new(ExtractError::Configuration(format!(
            "all {failures} input(s) failed"
        ))));
    }
    if failures > 0 {
        warn!(
            "[prodeval:app] finished with {failures} failure(s) out of {} task(s)",
            extracted + failures
        );
    } else {
        info!("[prodeval:app] finished: {extracted} input(s) extracted");
    }
    Ok(())
}

/// Resolve one CLI path into parquet inputs, scanning directories
/// recursively and appending files in sorted order.
fn collect_parquet_inputs(path: &Path, inputs: &mut Vec<PathBuf>) -> Result<(), ExtractError> {
    if path.is_dir() {
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .filter(|candidate| is_parquet_file(candidate))
            .collect();
        found.sort();
        if found.is_empty() {
            warn!(
                "[prodeval:app] no parquet files found under {}",
                path.display()
            );
        }
        inputs.extend(found);
        return Ok(());
    }
    if path.is_file() {
        inputs.push(path.to_path_buf());
        return Ok(());
    }
    Err(ExtractError::InputUnavailable {
        path: path.display().to_string(),
        reason: "path does not exist".to_string(),
    })
}

/// True if the path has a `.parquet` extension (case-insensitive).
fn is_parquet_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("parquet"))
        .unwrap_or(false)
}

/// Local filename for a fetched shard, from the URL's final path segment
/// with any query string stripped.
fn shard_filename(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let after_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);
    after_scheme
        .split_once('/')
        .and_then(|(_, path)| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_SHARD_NAME)
        .to_string()
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn shard_filename_strips_query_and_falls_back() {
        assert_eq!(
            shard_filename("https://host/container/test-00000-of-00003.parquet?sv=abc&sig=def"),
            "test-00000-of-00003.parquet"
        );
        assert_eq!(shard_filename("https://host/"), "shard.parquet");
        assert_eq!(shard_filename("https://host"), "shard.parquet");
    }

    #[test]
    fn is_parquet_file_matches_extension_case_insensitively() {
        assert!(is_parquet_file(Path::new("a/b/shard.parquet")));
        assert!(is_parquet_file(Path::new("a/b/SHARD.PARQUET")));
        assert!(!is_parquet_file(Path::new("a/b/shard.csv")));
        assert!(!is_parquet_file(Path::new("a/b/parquet")));
    }

    #[test]
    fn directory_inputs_are_discovered_in_sorted_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.parquet"), b"").unwrap();
        fs::write(dir.path().join("a.parquet"), b"").unwrap();
        fs::write(dir.path().join("nested/c.parquet"), b"").unwrap();
        fs::write(dir.path().join("ignored.txt"), b"").unwrap();

        let mut inputs = Vec::new();
        collect_parquet_inputs(dir.path(), &mut inputs).unwrap();

        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.parquet"),
                PathBuf::from("b.parquet"),
                PathBuf::from("nested/c.parquet"),
            ]
        );
    }

    #[test]
    fn missing_input_path_is_reported() {
        let mut inputs = Vec::new();
        let err = collect_parquet_inputs(Path::new("definitely/not/here"), &mut inputs)
            .unwrap_err();
        assert!(matches!(err, ExtractError::InputUnavailable { .. }));
    }

    #[test]
    fn help_short_circuits_without_error() {
        let parsed = parse_cli::<ExtractCli, _>(["prodeval", "--help"]).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn cli_requires_inputs_unless_fetch_is_given() {
        assert!(parse_cli::<ExtractCli, _>(["prodeval"]).is_err());
        let parsed = parse_cli::<ExtractCli, _>(["prodeval", "--fetch", "http://host/a.parquet"])
            .unwrap()
            .unwrap();
        assert!(parsed.inputs.is_empty());
        assert_eq!(parsed.fetch.len(), 1);
    }
}
