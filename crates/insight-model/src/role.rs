//! Semantic column roles and the per-table role map.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Fixed semantic roles a raw column may be assigned to.
///
/// The serialized names are stable: saved role maps use them as keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DataPedido,
    ValorPedido,
    Categoria,
    Produto,
    TipoCliente,
    Regiao,
    Quantidade,
    StatusPedido,
    TipoEnvio,
    CourierStatus,
    Tamanho,
    ValorUnitario,
    TemPromocao,
    DataEntrega,
}

impl Role {
    /// Every role in resolution order.
    pub const ALL: [Role; 14] = [
        Role::DataPedido,
        Role::ValorPedido,
        Role::Categoria,
        Role::Produto,
        Role::TipoCliente,
        Role::Regiao,
        Role::Quantidade,
        Role::StatusPedido,
        Role::TipoEnvio,
        Role::CourierStatus,
        Role::Tamanho,
        Role::ValorUnitario,
        Role::TemPromocao,
        Role::DataEntrega,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataPedido => "data_pedido",
            Self::ValorPedido => "valor_pedido",
            Self::Categoria => "categoria",
            Self::Produto => "produto",
            Self::TipoCliente => "tipo_cliente",
            Self::Regiao => "regiao",
            Self::Quantidade => "quantidade",
            Self::StatusPedido => "status_pedido",
            Self::TipoEnvio => "tipo_envio",
            Self::CourierStatus => "courier_status",
            Self::Tamanho => "tamanho",
            Self::ValorUnitario => "valor_unitario",
            Self::TemPromocao => "tem_promocao",
            Self::DataEntrega => "data_entrega",
        }
    }

    /// Short English description, used in CLI listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::DataPedido => "order date",
            Self::ValorPedido => "order amount",
            Self::Categoria => "category",
            Self::Produto => "product",
            Self::TipoCliente => "customer type",
            Self::Regiao => "region",
            Self::Quantidade => "quantity",
            Self::StatusPedido => "order status",
            Self::TipoEnvio => "shipment type",
            Self::CourierStatus => "courier status",
            Self::Tamanho => "size",
            Self::ValorUnitario => "unit price",
            Self::TemPromocao => "promotion flag",
            Self::DataEntrega => "delivery date",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}

/// How a binding entered the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleOrigin {
    /// Filled by automatic resolution.
    Auto,
    /// Chosen explicitly; never replaced by automatic resolution.
    Pinned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub column: String,
    pub origin: RoleOrigin,
}

/// Assignment of roles to column names for one table.
///
/// Absent roles have no entry. Callers own the map and pass it explicitly;
/// nothing here is shared or global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMap {
    entries: BTreeMap<Role, RoleBinding>,
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column bound to `role`, if any.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.entries.get(&role).map(|b| b.column.as_str())
    }

    pub fn binding(&self, role: Role) -> Option<&RoleBinding> {
        self.entries.get(&role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.entries.contains_key(&role)
    }

    pub fn is_pinned(&self, role: Role) -> bool {
        self.entries
            .get(&role)
            .is_some_and(|b| b.origin == RoleOrigin::Pinned)
    }

    /// Records an automatic match. A pinned entry for the role is left alone.
    pub fn set_auto(&mut self, role: Role, column: impl Into<String>) {
        if self.is_pinned(role) {
            return;
        }
        self.entries.insert(
            role,
            RoleBinding {
                column: column.into(),
                origin: RoleOrigin::Auto,
            },
        );
    }

    /// Pins `role` to `column`, which must be one of `columns`.
    pub fn pin(&mut self, role: Role, column: &str, columns: &[String]) -> Result<()> {
        if !columns.iter().any(|c| c == column) {
            return Err(ModelError::ColumnNotFound(column.to_string()));
        }
        self.entries.insert(
            role,
            RoleBinding {
                column: column.to_string(),
                origin: RoleOrigin::Pinned,
            },
        );
        Ok(())
    }

    /// Clears a pinned binding. Returns false if the role was not pinned.
    pub fn unpin(&mut self, role: Role) -> bool {
        if self.is_pinned(role) {
            self.entries.remove(&role);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, role: Role) -> Option<RoleBinding> {
        self.entries.remove(&role)
    }

    /// Copies entries from `other` for roles absent here. Returns the roles filled.
    pub fn fill_absent(&mut self, other: &RoleMap) -> Vec<Role> {
        let mut filled = Vec::new();
        for (role, binding) in &other.entries {
            if !self.entries.contains_key(role) {
                self.entries.insert(*role, binding.clone());
                filled.push(*role);
            }
        }
        filled
    }

    /// Drops entries whose column is not in `columns` and returns their roles.
    pub fn retain_existing(&mut self, columns: &[String]) -> Vec<Role> {
        let stale: Vec<Role> = self
            .entries
            .iter()
            .filter(|(_, b)| !columns.iter().any(|c| c == &b.column))
            .map(|(role, _)| *role)
            .collect();
        for role in &stale {
            self.entries.remove(role);
        }
        stale
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &RoleBinding)> {
        self.entries.iter().map(|(role, b)| (*role, b))
    }

    /// Roles with no binding, in [`Role::ALL`] order.
    pub fn unresolved(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.entries.contains_key(role))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
