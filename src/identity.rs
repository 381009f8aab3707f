//! Stable edge identifiers derived from edge endpoints.
//!
//! Identifiers are order-sensitive: `order -> address` and `address -> order`
//! are different edges. Two refs between the same pair of tables share an id.

pub fn edge_id(source_table: &str, target_table: &str) -> String {
    format!("{source_table}/{target_table}")
}

/// Identifier for a column-level relationship.
pub fn column_edge_id(
    source_table: &str,
    source_column: &str,
    target_table: &str,
    target_column: &str,
) -> String {
    format!("{source_table}.{source_column}-{target_table}.{target_column}")
}
