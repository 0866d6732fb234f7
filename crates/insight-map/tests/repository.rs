use std::path::Path;

use insight_map::{RoleMapRepository, dataset_id};
use insight_model::{Role, RoleMap};

fn sample_map() -> RoleMap {
    let columns = vec!["Date".to_string(), "Amount".to_string()];
    let mut map = RoleMap::new();
    map.set_auto(Role::DataPedido, "Date");
    map.pin(Role::ValorPedido, "Amount", &columns)
        .expect("pin");
    map
}

#[test]
fn repository_save_and_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = RoleMapRepository::new(dir.path()).expect("create repo");

    let path = repo.save("Sales 2024", &sample_map()).expect("save");
    assert!(path.exists());
    assert!(path.to_string_lossy().ends_with("sales_2024.roles.json"));

    let loaded = repo
        .load("Sales 2024")
        .expect("load")
        .expect("map should exist");
    assert_eq!(loaded, sample_map());
    assert!(loaded.is_pinned(Role::ValorPedido));

    let stored = repo
        .load_stored("Sales 2024")
        .expect("load stored")
        .expect("stored");
    assert_eq!(stored.version, "1.0");
    assert!(stored.saved_at.is_some());
}

#[test]
fn repository_load_nonexistent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = RoleMapRepository::new(dir.path()).expect("create repo");
    assert!(repo.load("missing").expect("load attempt").is_none());
    assert!(!repo.exists("missing"));
}

#[test]
fn repository_list_and_delete() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = RoleMapRepository::new(dir.path()).expect("create repo");
    repo.save("b", &sample_map()).expect("save b");
    repo.save("a", &RoleMap::new()).expect("save a");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let listed = repo.list().expect("list");
    let names: Vec<&str> = listed.iter().map(|m| m.dataset.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(listed[1].role_count, 2);

    assert!(repo.delete("a").expect("delete"));
    assert!(!repo.delete("a").expect("delete again"));
    assert!(!repo.exists("a"));
}

#[test]
fn dataset_id_uses_file_stem() {
    assert_eq!(dataset_id(Path::new("data/df_selecionado.csv")), "df_selecionado");
}
