use insight_map::{ColumnRoleMapper, MatchKind};
use insight_model::{Role, RoleMap, RoleOrigin};
use proptest::prelude::*;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn exact_match_beats_substring_in_either_order() {
    let mapper = ColumnRoleMapper::new();
    for columns in [
        cols(&["Date", "Order Date Extra"]),
        cols(&["Order Date Extra", "Date"]),
    ] {
        let map = mapper.resolve(&columns);
        assert_eq!(map.get(Role::DataPedido), Some("Date"));
    }
}

#[test]
fn data_pedido_patterns_include_documented_ones() {
    let mapper = ColumnRoleMapper::new();
    let patterns = mapper.patterns_for(Role::DataPedido).expect("patterns");
    assert!(patterns.iter().any(|p| p == r"^date$"));
    assert!(patterns.iter().any(|p| p == r"order[\s_]*date"));
}

#[test]
fn unmatched_columns_leave_every_role_absent() {
    let mapper = ColumnRoleMapper::new();
    let map = mapper.resolve(&cols(&["foo", "bar"]));
    assert!(map.is_empty());
    for role in Role::ALL {
        assert!(map.get(role).is_none());
    }
}

#[test]
fn resolves_typical_sales_export() {
    let mapper = ColumnRoleMapper::new();
    let columns = cols(&[
        "Order ID",
        "Date",
        "Status",
        "Fulfilment",
        "ship-service-level",
        "Category",
        "Size",
        "Courier Status",
        "Qty",
        "Amount",
        "ship-state",
        "promotion-ids",
        "B2B",
    ]);
    let matches = mapper.resolve_detailed(&columns);
    let map = mapper.resolve(&columns);

    assert_eq!(map.get(Role::DataPedido), Some("Date"));
    assert_eq!(map.get(Role::StatusPedido), Some("Status"));
    assert_eq!(map.get(Role::TipoEnvio), Some("Fulfilment"));
    assert_eq!(map.get(Role::Categoria), Some("Category"));
    assert_eq!(map.get(Role::Tamanho), Some("Size"));
    assert_eq!(map.get(Role::CourierStatus), Some("Courier Status"));
    assert_eq!(map.get(Role::Quantidade), Some("Qty"));
    assert_eq!(map.get(Role::ValorPedido), Some("Amount"));
    assert_eq!(map.get(Role::Regiao), Some("ship-state"));
    assert_eq!(map.get(Role::TemPromocao), Some("promotion-ids"));
    assert_eq!(map.get(Role::TipoCliente), Some("B2B"));
    assert!(map.get(Role::DataEntrega).is_none());

    let status = matches
        .iter()
        .find(|m| m.role == Role::StatusPedido)
        .expect("status match");
    assert_eq!(status.kind, MatchKind::Exact);
}

#[test]
fn pinned_role_survives_refresh() {
    let mapper = ColumnRoleMapper::new();
    let columns = cols(&["Date", "Created At", "Amount"]);
    let mut map = mapper.resolve(&columns);
    map.pin(Role::DataPedido, "Created At", &columns)
        .expect("pin");

    let refreshed = mapper.refresh(&map, &columns);
    assert_eq!(refreshed.get(Role::DataPedido), Some("Created At"));
    assert!(refreshed.is_pinned(Role::DataPedido));

    let merged = ColumnRoleMapper::merge(&refreshed, &mapper.resolve(&columns));
    assert_eq!(merged.get(Role::DataPedido), Some("Created At"));
}

#[test]
fn merge_keeps_present_auto_entries() {
    let mut existing = RoleMap::new();
    existing.set_auto(Role::ValorPedido, "Total");
    let mapper = ColumnRoleMapper::new();
    let fresh = mapper.resolve(&cols(&["Amount", "Qty"]));

    let merged = ColumnRoleMapper::merge(&existing, &fresh);
    assert_eq!(merged.get(Role::ValorPedido), Some("Total"));
    assert_eq!(merged.get(Role::Quantidade), Some("Qty"));
}

#[test]
fn refresh_drops_pins_to_removed_columns() {
    let mapper = ColumnRoleMapper::new();
    let old_columns = cols(&["Created At", "Qty"]);
    let mut map = RoleMap::new();
    map.pin(Role::DataPedido, "Created At", &old_columns)
        .expect("pin");

    let refreshed = mapper.refresh(&map, &cols(&["Order Date", "Qty"]));
    let binding = refreshed.binding(Role::DataPedido).expect("re-resolved");
    assert_eq!(binding.column, "Order Date");
    assert_eq!(binding.origin, RoleOrigin::Auto);
}

#[test]
fn role_map_json_shape() {
    let columns = cols(&["Date", "Total"]);
    let mut map = RoleMap::new();
    map.set_auto(Role::DataPedido, "Date");
    map.pin(Role::ValorPedido, "Total", &columns).expect("pin");
    let value = serde_json::to_value(&map).expect("serialize");
    insta::assert_json_snapshot!(value, @r#"
    {
      "data_pedido": {
        "column": "Date",
        "origin": "auto"
      },
      "valor_pedido": {
        "column": "Total",
        "origin": "pinned"
      }
    }
    "#);
}

fn column_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Date".to_string()),
        Just("Order Date".to_string()),
        Just("Amount".to_string()),
        Just("Região".to_string()),
        Just("qty".to_string()),
        Just("Courier Status".to_string()),
        "[A-Za-z _-]{1,12}",
    ]
}

proptest! {
    #[test]
    fn resolve_is_idempotent(columns in proptest::collection::vec(column_name(), 0..8)) {
        let mapper = ColumnRoleMapper::new();
        prop_assert_eq!(mapper.resolve(&columns), mapper.resolve(&columns));
    }

    #[test]
    fn resolved_columns_exist(columns in proptest::collection::vec(column_name(), 0..8)) {
        let mapper = ColumnRoleMapper::new();
        let map = mapper.resolve(&columns);
        for (_, binding) in map.iter() {
            prop_assert!(columns.contains(&binding.column));
        }
    }

    #[test]
    fn pins_are_sticky(columns in proptest::collection::vec(column_name(), 1..8), pick in 0usize..8) {
        let mapper = ColumnRoleMapper::new();
        let chosen = columns[pick % columns.len()].clone();
        let mut map = mapper.resolve(&columns);
        map.pin(Role::Produto, &chosen, &columns).expect("pin existing column");
        let refreshed = mapper.refresh(&map, &columns);
        prop_assert_eq!(refreshed.get(Role::Produto), Some(chosen.as_str()));
        prop_assert!(refreshed.is_pinned(Role::Produto));
    }
}
