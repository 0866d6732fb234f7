//! Role pattern table.
//!
//! Patterns are tested against names produced by
//! [`normalize_column_name`](crate::utils::normalize_column_name): lowercase
//! ASCII, words separated by single spaces or underscores. Accented letters
//! are already separators at that point, so `"Região"` arrives as `"regi o"`
//! and patterns allow an optional space where an accent used to be.

use regex::{Regex, RegexBuilder};

use insight_model::Role;

use crate::error::MappingError;

/// Default patterns per role, in role resolution order.
pub fn default_patterns() -> Vec<(Role, Vec<&'static str>)> {
    vec![
        (
            Role::DataPedido,
            vec![
                r"^date$",
                r"^data$",
                r"order[\s_]*date",
                r"data[\s_]*(do[\s_]*)?pedido",
                r"dt[\s_]*pedido",
                r"order[\s_]*dt",
                r"purchase[\s_]*date",
                r"data[\s_]*(da[\s_]*)?compra",
            ],
        ),
        (
            Role::ValorPedido,
            vec![
                r"^amount$",
                r"^valor$",
                r"^total$",
                r"valor[\s_]*(do[\s_]*)?pedido",
                r"valor[\s_]*total",
                r"order[\s_]*(amount|value|total)",
                r"total[\s_]*amount",
                r"^sales$",
                r"^revenue$",
                r"^receita$",
                r"^faturamento$",
            ],
        ),
        (
            Role::Categoria,
            vec![r"^category$", r"^categoria$", r"^cat$", r"categor(y|ia)"],
        ),
        (
            Role::Produto,
            vec![
                r"^product$",
                r"^produto$",
                r"^sku$",
                r"^item$",
                r"product[\s_]*name",
                r"nome[\s_]*(do[\s_]*)?produto",
                r"produto",
                r"product",
            ],
        ),
        (
            Role::TipoCliente,
            vec![
                r"tipo[\s_]*(de[\s_]*)?cliente",
                r"customer[\s_]*(type|segment)",
                r"client[\s_]*type",
                r"^segment$",
                r"^segmento$",
                r"b2b",
            ],
        ),
        (
            Role::Regiao,
            vec![
                r"^region$",
                r"^regi ?a?o$",
                r"^state$",
                r"^estado$",
                r"^uf$",
                r"ship[\s_]*state",
                r"region",
                r"regi ?a?o",
            ],
        ),
        (
            Role::Quantidade,
            vec![
                r"^qty$",
                r"^quantity$",
                r"^quantidade$",
                r"^qtde?$",
                r"^pcs$",
                r"quantity",
                r"quantidade",
                r"qtd",
            ],
        ),
        (
            Role::StatusPedido,
            vec![
                r"^status$",
                r"order[\s_]*status",
                r"status[\s_]*(do[\s_]*)?pedido",
                r"^situa ?c?a?o$",
            ],
        ),
        (
            Role::TipoEnvio,
            vec![
                r"tipo[\s_]*(de[\s_]*)?envio",
                r"ship[\s_]*service[\s_]*level",
                r"shipping[\s_]*(type|method|mode)",
                r"ship[\s_]*mode",
                r"fulfil+ment",
                r"^envio$",
                r"^frete$",
            ],
        ),
        (
            Role::CourierStatus,
            vec![
                r"courier[\s_]*status",
                r"status[\s_]*(da[\s_]*)?transportadora",
                r"delivery[\s_]*status",
                r"^courier$",
            ],
        ),
        (
            Role::Tamanho,
            vec![r"^size$", r"^tamanho$", r"^tam$", r"size", r"tamanho"],
        ),
        (
            Role::ValorUnitario,
            vec![
                r"unit[\s_]*price",
                r"valor[\s_]*unit ?a?rio",
                r"pre ?c?o[\s_]*unit ?a?rio",
                r"^price$",
                r"^pre ?c?o$",
                r"^rate$",
            ],
        ),
        (
            Role::TemPromocao,
            vec![
                r"tem[\s_]*promo ?c?a?o",
                r"^promo$",
                r"promo ?c?a?o",
                r"promotion",
                r"promo[\s_]*ids?",
                r"discount[\s_]*flag",
                r"on[\s_]*sale",
            ],
        ),
        (
            Role::DataEntrega,
            vec![
                r"data[\s_]*(de[\s_]*|da[\s_]*)?entrega",
                r"dt[\s_]*entrega",
                r"delivery[\s_]*date",
                r"delivered[\s_]*(at|on|date)",
                r"ship[\s_]*date",
            ],
        ),
    ]
}

/// Compiled patterns for one role.
///
/// `exact` holds each source pattern anchored at both ends; `search` holds it
/// unanchored, in the same order.
#[derive(Debug, Clone)]
pub struct RolePatterns {
    pub role: Role,
    pub sources: Vec<String>,
    pub exact: Vec<Regex>,
    pub search: Vec<Regex>,
}

impl RolePatterns {
    pub fn compile<S: AsRef<str>>(role: Role, sources: &[S]) -> Result<Self, MappingError> {
        let mut exact = Vec::with_capacity(sources.len());
        let mut search = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.as_ref();
            exact.push(build(role, source, &format!("^(?:{source})$"))?);
            search.push(build(role, source, source)?);
        }
        Ok(Self {
            role,
            sources: sources.iter().map(|s| s.as_ref().to_string()).collect(),
            exact,
            search,
        })
    }
}

fn build(role: Role, source: &str, pattern: &str) -> Result<Regex, MappingError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| MappingError::InvalidPattern {
            role: role.to_string(),
            pattern: source.to_string(),
            message: e.to_string(),
        })
}
