//! Command implementations. Each returns a serializable report; printing is
//! left to [`crate::summary`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use insight_ingest::{find_default_dataset, list_datasets, load_table};
use insight_map::{ColumnRoleMapper, RoleMapRepository, dataset_id};
use insight_model::{AnalysisOptions, Column, Role, RoleMap, Table};
use insight_stats::{
    Anova, ChiSquare, ColumnProfile, ConfidenceInterval, CorrelationMatrix, Insufficient,
    LinearTrend, MannWhitney, NumericSummary, OneSampleT, Pearson, Significance, TestOutcome,
    WelchT, chi_square_independence, confidence_interval_mean, correlation_matrix,
    describe_table, linear_trend, mann_whitney_u, one_sample_t, one_way_anova, pearson, profile,
    two_sample_t,
};

/// Directory searched for the default dataset when no file is given.
pub const DEFAULT_DATA_DIR: &str = "data";

/// The given dataset, or the default one under [`DEFAULT_DATA_DIR`].
pub fn dataset_path(file: Option<&Path>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path.to_path_buf()),
        None => default_dataset(Path::new(DEFAULT_DATA_DIR)),
    }
}

/// The default dataset in `dir`. When there is none, the error names the
/// datasets that are there.
pub fn default_dataset(dir: &Path) -> Result<PathBuf> {
    let error = match find_default_dataset(dir) {
        Ok(path) => return Ok(path),
        Err(error) => error,
    };
    let available = list_datasets(dir).unwrap_or_default();
    if available.is_empty() {
        return Err(error).context("no dataset given and no default dataset found");
    }
    let names: Vec<String> = available
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    Err(error).with_context(|| {
        format!(
            "no dataset given; pass one of: {} (in {})",
            names.join(", "),
            dir.display()
        )
    })
}

pub fn load_dataset(path: &Path) -> Result<Table> {
    load_table(path).with_context(|| format!("load dataset {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub dataset: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoryLevels>,
}

/// Distinct non-missing labels of a categorical column.
#[derive(Debug, Serialize)]
pub struct CategoryLevels {
    pub column: String,
    pub levels: usize,
}

pub fn run_profile(path: &Path) -> Result<ProfileReport> {
    let span = info_span!("profile", dataset = %path.display());
    let _guard = span.enter();
    let table = load_dataset(path)?;
    Ok(ProfileReport {
        dataset: path.to_path_buf(),
        rows: table.row_count(),
        columns: profile(&table),
        numeric: describe_table(&table),
        categorical: table
            .categorical_columns()
            .map(|column| CategoryLevels {
                column: column.name().to_string(),
                levels: column.distinct_labels().len(),
            })
            .collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct CorrelationReport {
    pub dataset: PathBuf,
    pub matrix: CorrelationMatrix,
}

pub fn run_corr(path: &Path) -> Result<CorrelationReport> {
    let span = info_span!("corr", dataset = %path.display());
    let _guard = span.enter();
    let table = load_dataset(path)?;
    Ok(CorrelationReport {
        dataset: path.to_path_buf(),
        matrix: correlation_matrix(&table),
    })
}

/// Inputs of the `roles` command.
#[derive(Debug, Default)]
pub struct RolesRequest {
    pub pins: Vec<(Role, String)>,
    pub unpins: Vec<Role>,
    pub repo: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RolesReport {
    pub dataset: PathBuf,
    pub columns: Vec<String>,
    pub roles: RoleMap,
    pub unresolved: Vec<Role>,
    /// Where the map was saved, when a repository was given.
    pub saved_to: Option<PathBuf>,
}

/// Resolves roles for a dataset.
///
/// A stored map (if a repository is given) is released for `unpins`,
/// refreshed against the current columns, then `pins` are applied on top and
/// the result is saved back.
pub fn run_roles(path: &Path, request: &RolesRequest) -> Result<RolesReport> {
    let span = info_span!("roles", dataset = %path.display());
    let _guard = span.enter();
    let table = load_dataset(path)?;
    let columns = table.column_names();
    let dataset = dataset_id(path);

    let repo = request
        .repo
        .as_deref()
        .map(RoleMapRepository::new)
        .transpose()?;
    let mut stored = match &repo {
        Some(repo) => repo.load(&dataset)?.unwrap_or_default(),
        None => RoleMap::new(),
    };
    for role in &request.unpins {
        if !stored.unpin(*role) {
            warn!(role = %role, "role was not pinned");
        }
    }

    let mapper = ColumnRoleMapper::new();
    let mut roles = mapper.refresh(&stored, &columns);
    for (role, column) in &request.pins {
        roles
            .pin(*role, column, &columns)
            .with_context(|| format!("pin {role} to `{column}`"))?;
        debug!(role = %role, column = %column, "role pinned");
    }

    let saved_to = match &repo {
        Some(repo) => Some(repo.save(&dataset, &roles)?),
        None => None,
    };
    Ok(RolesReport {
        dataset: path.to_path_buf(),
        unresolved: roles.unresolved(),
        columns,
        roles,
        saved_to,
    })
}

/// A statistical test to run and the columns (or role names) it reads.
#[derive(Debug, Clone)]
pub enum TestRequest {
    Pearson { x: String, y: String },
    ConfidenceInterval { column: String },
    OneSampleT { column: String, mu: f64 },
    WelchT { value: String, group: String },
    MannWhitney { value: String, group: String },
    Anova { value: String, group: String },
    ChiSquare { a: String, b: String },
    Trend { x: String, y: String },
}

impl TestRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pearson { .. } => "pearson",
            Self::ConfidenceInterval { .. } => "ci",
            Self::OneSampleT { .. } => "ttest1",
            Self::WelchT { .. } => "ttest2",
            Self::MannWhitney { .. } => "mann-whitney",
            Self::Anova { .. } => "anova",
            Self::ChiSquare { .. } => "chi2",
            Self::Trend { .. } => "trend",
        }
    }
}

/// Outcome of one test, tagged by test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    Pearson(TestOutcome<Pearson>),
    ConfidenceInterval(TestOutcome<ConfidenceInterval>),
    OneSampleT(TestOutcome<OneSampleT>),
    WelchT(TestOutcome<WelchT>),
    MannWhitney(TestOutcome<MannWhitney>),
    Anova(TestOutcome<Anova>),
    ChiSquare(TestOutcome<ChiSquare>),
    Trend(TestOutcome<LinearTrend>),
}

impl TestResult {
    /// The p-value, for tests that have one and produced a result.
    pub fn p_value(&self) -> Option<f64> {
        match self {
            Self::Pearson(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::OneSampleT(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::WelchT(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::MannWhitney(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::Anova(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::ChiSquare(r) => r.as_ref().ok().map(|r| r.p_value),
            Self::ConfidenceInterval(_) | Self::Trend(_) => None,
        }
    }

    pub fn insufficient(&self) -> Option<&Insufficient> {
        match self {
            Self::Pearson(r) => r.as_ref().err(),
            Self::ConfidenceInterval(r) => r.as_ref().err(),
            Self::OneSampleT(r) => r.as_ref().err(),
            Self::WelchT(r) => r.as_ref().err(),
            Self::MannWhitney(r) => r.as_ref().err(),
            Self::Anova(r) => r.as_ref().err(),
            Self::ChiSquare(r) => r.as_ref().err(),
            Self::Trend(r) => r.as_ref().err(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub dataset: PathBuf,
    pub test: &'static str,
    pub alpha: f64,
    pub result: TestResult,
    /// Decision at `alpha`; absent when there is no p-value.
    pub decision: Option<Significance>,
}

/// Loads the dataset and runs one test on it.
pub fn run_test(
    path: &Path,
    request: &TestRequest,
    options: &AnalysisOptions,
) -> Result<TestReport> {
    let span = info_span!("test", test = request.name(), dataset = %path.display());
    let _guard = span.enter();
    let started = Instant::now();
    let table = load_dataset(path)?;
    let result = evaluate(&table, request, options)?;
    if let Some(reason) = result.insufficient() {
        warn!(test = request.name(), %reason, "insufficient data");
    }
    let decision = result
        .p_value()
        .map(|p| Significance::decide(p, options.alpha));
    info!(
        test = request.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "test finished"
    );
    Ok(TestReport {
        dataset: path.to_path_buf(),
        test: request.name(),
        alpha: options.alpha,
        result,
        decision,
    })
}

/// Runs `request` against an already loaded table.
pub fn evaluate(
    table: &Table,
    request: &TestRequest,
    options: &AnalysisOptions,
) -> Result<TestResult> {
    let selector = ColumnSelector::new(table);
    let result = match request {
        TestRequest::Pearson { x, y } => {
            TestResult::Pearson(pearson(selector.get(x)?, selector.get(y)?))
        }
        TestRequest::ConfidenceInterval { column } => TestResult::ConfidenceInterval(
            confidence_interval_mean(selector.get(column)?, options.confidence),
        ),
        TestRequest::OneSampleT { column, mu } => {
            TestResult::OneSampleT(one_sample_t(selector.get(column)?, *mu))
        }
        TestRequest::WelchT { value, group } => {
            TestResult::WelchT(two_sample_t(selector.get(value)?, selector.get(group)?))
        }
        TestRequest::MannWhitney { value, group } => {
            TestResult::MannWhitney(mann_whitney_u(selector.get(value)?, selector.get(group)?))
        }
        TestRequest::Anova { value, group } => {
            TestResult::Anova(one_way_anova(selector.get(value)?, selector.get(group)?))
        }
        TestRequest::ChiSquare { a, b } => {
            TestResult::ChiSquare(chi_square_independence(selector.get(a)?, selector.get(b)?))
        }
        TestRequest::Trend { x, y } => {
            TestResult::Trend(linear_trend(selector.get(x)?, selector.get(y)?))
        }
    };
    Ok(result)
}

/// Looks columns up by name, falling back to automatically resolved roles.
struct ColumnSelector<'t> {
    table: &'t Table,
    roles: RoleMap,
}

impl<'t> ColumnSelector<'t> {
    fn new(table: &'t Table) -> Self {
        Self {
            table,
            roles: ColumnRoleMapper::new().resolve(&table.column_names()),
        }
    }

    fn get(&self, name: &str) -> Result<&'t Column> {
        if let Some(column) = self.table.column(name) {
            return Ok(column);
        }
        if let Ok(role) = name.parse::<Role>()
            && let Some(column) = self.roles.get(role).and_then(|c| self.table.column(c))
        {
            debug!(role = %role, column = column.name(), "column selected by role");
            return Ok(column);
        }
        Err(anyhow!(
            "no column or resolved role named `{name}` (columns: {})",
            self.table.column_names().join(", ")
        ))
    }
}
