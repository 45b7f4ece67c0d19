//! Graph pipeline: reduce a CSV, hand it to a renderer, clean up.
//!
//! Most callers should use [`create_graph`], which:
//!
//! - derives the output paths from the input path ([`GraphPaths::for_input`])
//! - reduces the input into `<stem>_graph.csv` next to it
//! - calls the [`ChartRenderer`] with the secondary-axis positions
//! - removes the intermediate CSV (unless [`GraphOptions::keep_reduced_csv`] is set)
//! - reports success/failure/alerts to the configured observer

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::GraphConfig;
use crate::error::{ReduceError, ReduceResult};
use crate::observability::{NullObserver, ReductionContext, ReductionObserver, ReductionSeverity};
use crate::processing::reduce_file;
use crate::processing::reducer::discard_file;
use crate::render::ChartRenderer;
use crate::types::{DataStats, ReductionSummary};

/// Files produced for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPaths {
    /// Intermediate projected CSV: `<dir>/<stem>_graph.csv`.
    pub reduced_csv: PathBuf,
    /// Workbook: `<reduced_csv>.xlsx`.
    pub workbook: PathBuf,
    /// Image: `<workbook>.png`.
    pub image: PathBuf,
}

impl GraphPaths {
    /// Derive output paths for `input`. Relative inputs are made absolute against the current
    /// directory when possible.
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        let joined = dir.join(format!("{stem}_graph.csv"));
        let reduced_csv = std::path::absolute(&joined).unwrap_or(joined);

        let workbook = append_extension(&reduced_csv, "xlsx");
        let image = append_extension(&workbook, "png");
        Self {
            reduced_csv,
            workbook,
            image,
        }
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Whether every path in a non-empty list has extension `ext` (case-sensitive, no dot).
pub fn all_have_extension<P: AsRef<Path>>(paths: &[P], ext: &str) -> bool {
    !paths.is_empty()
        && paths
            .iter()
            .all(|p| p.as_ref().extension().is_some_and(|e| e == ext))
}

/// Options controlling pipeline behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct GraphOptions {
    /// Observer for warnings, success/failure and alerts.
    pub observer: Arc<dyn ReductionObserver>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReductionSeverity,
    /// Leave the intermediate projected CSV on disk after rendering.
    pub keep_reduced_csv: bool,
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("keep_reduced_csv", &self.keep_reduced_csv)
            .finish()
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            observer: Arc::new(NullObserver),
            alert_at_or_above: ReductionSeverity::Critical,
            keep_reduced_csv: false,
        }
    }
}

/// What [`create_graph`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOutput {
    /// Output locations (the reduced CSV is gone unless it was kept).
    pub paths: GraphPaths,
    /// Reduction summary, including the secondary positions passed to the renderer.
    pub summary: ReductionSummary,
}

/// Reduce `input` into `output` without rendering, reporting to `options.observer`.
pub fn reduce_from_path(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &GraphConfig,
    options: &GraphOptions,
) -> ReduceResult<ReductionSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let ctx = ReductionContext::new(input, output);
    let result = reduce_file(&config.to_projection(), input, output, Arc::clone(&options.observer));
    report(&ctx, options, result.as_ref().map(|s| s.stats));
    result
}

/// Reduce `input`, render it, and remove the intermediate CSV.
///
/// The intermediate CSV is removed whether or not rendering succeeds; a failed removal is
/// reported through `on_cleanup_failure` and does not change the result.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use csv_graph_reducer::config::GraphConfig;
/// use csv_graph_reducer::pipeline::{create_graph, GraphOptions};
/// use csv_graph_reducer::ReduceResult;
///
/// # fn main() -> Result<(), csv_graph_reducer::ReduceError> {
/// let config = GraphConfig::from_path("graph.json")?;
/// let renderer = |csv: &Path, _wb: &Path, _img: &Path, secondary: &[usize]| -> ReduceResult<()> {
///     println!("render {} secondary={secondary:?}", csv.display());
///     Ok(())
/// };
/// let out = create_graph("measurements.csv", &config, &renderer, &GraphOptions::default())?;
/// println!("{}", out.paths.image.display());
/// # Ok(())
/// # }
/// ```
pub fn create_graph(
    input: impl AsRef<Path>,
    config: &GraphConfig,
    renderer: &dyn ChartRenderer,
    options: &GraphOptions,
) -> ReduceResult<GraphOutput> {
    let input = input.as_ref();
    let paths = GraphPaths::for_input(input);
    let ctx = ReductionContext::new(input, &paths.reduced_csv);

    let result = reduce_and_render(&ctx, &paths, config, renderer, options);
    report(&ctx, options, result.as_ref().map(|s| s.stats));

    result.map(|summary| GraphOutput { paths, summary })
}

fn reduce_and_render(
    ctx: &ReductionContext,
    paths: &GraphPaths,
    config: &GraphConfig,
    renderer: &dyn ChartRenderer,
    options: &GraphOptions,
) -> ReduceResult<ReductionSummary> {
    let summary = reduce_file(
        &config.to_projection(),
        &ctx.input,
        &paths.reduced_csv,
        Arc::clone(&options.observer),
    )?;

    let rendered = renderer.render_chart(
        &paths.reduced_csv,
        &paths.workbook,
        &paths.image,
        summary.secondary_positions(),
    );
    if !options.keep_reduced_csv {
        discard_file(ctx, &paths.reduced_csv, options.observer.as_ref());
    }
    rendered?;
    Ok(summary)
}

fn report(ctx: &ReductionContext, options: &GraphOptions, result: Result<DataStats, &ReduceError>) {
    let obs = &options.observer;
    match result {
        Ok(stats) => obs.on_success(ctx, stats),
        Err(e) => {
            let sev = ReductionSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Owned pipeline request, e.g. for a job queue.
#[derive(Debug, Clone)]
pub struct GraphRequest {
    /// Input CSV.
    pub input: PathBuf,
    /// Graph configuration.
    pub config: GraphConfig,
    /// Pipeline options.
    pub options: GraphOptions,
}

impl GraphRequest {
    /// Execute the request by calling [`create_graph`].
    pub fn run(&self, renderer: &dyn ChartRenderer) -> ReduceResult<GraphOutput> {
        create_graph(&self.input, &self.config, renderer, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{all_have_extension, GraphPaths};

    #[cfg(unix)]
    #[test]
    fn paths_follow_naming_scheme() {
        let p = GraphPaths::for_input("/data/run 1.csv");
        assert_eq!(p.reduced_csv, PathBuf::from("/data/run 1_graph.csv"));
        assert_eq!(p.workbook, PathBuf::from("/data/run 1_graph.csv.xlsx"));
        assert_eq!(p.image, PathBuf::from("/data/run 1_graph.csv.xlsx.png"));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let p = GraphPaths::for_input("log.csv");
        assert!(p.reduced_csv.is_absolute());
        assert!(p.reduced_csv.ends_with("log_graph.csv"));
    }

    #[test]
    fn extension_check() {
        assert!(all_have_extension(&["a.csv", "b/c.csv"], "csv"));
        assert!(!all_have_extension(&["a.csv", "b.txt"], "csv"));
        assert!(!all_have_extension(&["a.CSV"], "csv"));
        assert!(!all_have_extension::<&Path>(&[], "csv"));
    }
}
