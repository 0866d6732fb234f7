use std::fs;
use std::path::{Path, PathBuf};

use insight_cli::commands::{
    RolesRequest, TestRequest, TestResult, dataset_path, default_dataset, run_corr, run_profile,
    run_roles, run_test,
};
use insight_cli::summary::{correlation_table, levels_table, result_table, roles_table};
use insight_model::{AnalysisOptions, Role, RoleOrigin};
use insight_stats::{Insufficient, Significance};
use tempfile::TempDir;

const SALES: &str = "\
Amount,Category,Region,Units
10,A,North,5
12,A,South,5
11,A,North,5
20,B,South,5
22,B,North,5
21,B,South,5
";

fn write_sales(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sales.csv");
    fs::write(&path, SALES).expect("write csv");
    path
}

fn test(path: &Path, request: &TestRequest) -> insight_cli::commands::TestReport {
    run_test(path, request, &AnalysisOptions::default()).expect("run test")
}

#[test]
fn explicit_dataset_path_is_used_as_is() {
    let path = Path::new("somewhere/else.csv");
    assert_eq!(dataset_path(Some(path)).expect("path"), path);
}

#[test]
fn profile_reports_every_column() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let report = run_profile(&path).expect("profile");
    assert_eq!(report.rows, 6);
    let names: Vec<_> = report.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Amount", "Category", "Region", "Units"]);
    let numeric: Vec<_> = report.numeric.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(numeric, ["Amount", "Units"]);
    let levels: Vec<_> = report
        .categorical
        .iter()
        .map(|c| (c.column.as_str(), c.levels))
        .collect();
    assert_eq!(levels, [("Category", 2), ("Region", 2)]);
    assert!(levels_table(&report).to_string().contains("Region"));
}

#[test]
fn default_dataset_is_found_in_directory() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("df_selecionado.csv");
    fs::write(&path, SALES).expect("write csv");
    assert_eq!(default_dataset(dir.path()).expect("default"), path);
}

#[test]
fn missing_default_dataset_names_available_files() {
    let dir = TempDir::new().expect("temp dir");
    write_sales(&dir);
    let err = default_dataset(dir.path()).expect_err("no default");
    assert!(err.to_string().contains("sales.csv"));

    let empty = TempDir::new().expect("temp dir");
    let err = default_dataset(empty.path()).expect_err("no default");
    assert!(err.to_string().contains("no default dataset"));
}

#[test]
fn welch_rejects_for_separated_groups() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let report = test(
        &path,
        &TestRequest::WelchT {
            value: "Amount".into(),
            group: "Category".into(),
        },
    );
    assert_eq!(report.test, "ttest2");
    assert_eq!(report.decision, Some(Significance::Reject));
    match &report.result {
        TestResult::WelchT(Ok(res)) => {
            assert!(res.t < 0.0);
            assert!((res.df - 4.0).abs() < 1e-9);
            assert_eq!(res.groups[0].label, "A");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn role_names_select_resolved_columns() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let by_role = test(
        &path,
        &TestRequest::WelchT {
            value: "valor_pedido".into(),
            group: "categoria".into(),
        },
    );
    let by_name = test(
        &path,
        &TestRequest::WelchT {
            value: "Amount".into(),
            group: "Category".into(),
        },
    );
    assert_eq!(by_role.result.p_value(), by_name.result.p_value());
}

#[test]
fn insufficient_data_is_a_result_not_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let report = test(
        &path,
        &TestRequest::OneSampleT {
            column: "Units".into(),
            mu: 3.0,
        },
    );
    assert_eq!(report.result.insufficient(), Some(&Insufficient::ZeroVariance));
    assert!(report.result.p_value().is_none());
    assert!(report.decision.is_none());
}

#[test]
fn unknown_column_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let err = run_test(
        &path,
        &TestRequest::Pearson {
            x: "Amount".into(),
            y: "Discount".into(),
        },
        &AnalysisOptions::default(),
    )
    .expect_err("missing column");
    assert!(err.to_string().contains("Discount"));
}

#[test]
fn missing_dataset_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    assert!(run_profile(&dir.path().join("absent.csv")).is_err());
}

#[test]
fn pinned_roles_are_saved_and_reloaded() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let repo = dir.path().join("roles");

    let pinned = run_roles(
        &path,
        &RolesRequest {
            pins: vec![(Role::Produto, "Region".into())],
            unpins: Vec::new(),
            repo: Some(repo.clone()),
        },
    )
    .expect("pin");
    let saved = pinned.saved_to.clone().expect("saved");
    assert!(saved.exists());
    assert_eq!(pinned.roles.get(Role::Produto), Some("Region"));
    assert_eq!(pinned.roles.get(Role::ValorPedido), Some("Amount"));

    let reloaded = run_roles(
        &path,
        &RolesRequest {
            repo: Some(repo.clone()),
            ..RolesRequest::default()
        },
    )
    .expect("reload");
    let binding = reloaded.roles.binding(Role::Produto).expect("binding");
    assert_eq!(binding.origin, RoleOrigin::Pinned);

    let released = run_roles(
        &path,
        &RolesRequest {
            unpins: vec![Role::Produto],
            repo: Some(repo),
            ..RolesRequest::default()
        },
    )
    .expect("unpin");
    assert!(released.roles.get(Role::Produto).is_none());
    assert!(released.unresolved.contains(&Role::Produto));
}

#[test]
fn pin_to_unknown_column_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);
    let request = RolesRequest {
        pins: vec![(Role::Produto, "Nope".into())],
        ..RolesRequest::default()
    };
    assert!(run_roles(&path, &request).is_err());
}

#[test]
fn tables_render_report_content() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_sales(&dir);

    let roles = run_roles(&path, &RolesRequest::default()).expect("roles");
    let rendered = roles_table(&roles).to_string();
    assert!(rendered.contains("valor_pedido"));
    assert!(rendered.contains("Amount"));
    assert!(rendered.contains("auto"));

    let corr = run_corr(&path).expect("corr");
    let rendered = correlation_table(&corr.matrix).to_string();
    assert!(rendered.contains("Amount"));
    assert!(rendered.contains("1.000"));

    let report = test(
        &path,
        &TestRequest::Pearson {
            x: "Amount".into(),
            y: "Amount".into(),
        },
    );
    let rendered = result_table(&report).to_string();
    assert!(rendered.contains("p-value"));
    assert!(rendered.contains("reject H0"));
}
