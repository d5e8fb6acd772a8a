//! Wire types exchanged with the statistics service.

use serde::{Deserialize, Serialize};

/// Statistics computed downstream over a rotated matrix.
///
/// Field names follow the statistics service's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStats {
    /// Largest cell value.
    #[serde(rename = "valorMaximo")]
    pub max_value: i64,
    /// Smallest cell value.
    #[serde(rename = "valorMinimo")]
    pub min_value: i64,
    /// Mean of all cells.
    #[serde(rename = "promedio")]
    pub average: f64,
    /// Sum of all cells.
    #[serde(rename = "sumaTotal")]
    pub total_sum: i64,
    /// Whether the matrix is diagonal.
    #[serde(rename = "matrizDiagonal")]
    pub is_diagonal: bool,
}

/// Envelope returned by the statistics service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Free-form status message.
    #[serde(default)]
    pub message: String,
    /// Computed statistics.
    pub stats: MatrixStats,
}
