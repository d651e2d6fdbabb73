//! Nearest-neighbor graph export

use serde::{Deserialize, Serialize};

use crate::error::FusionError;
use crate::fusion::neighbor_kernel;
use crate::graph::colormap::{position_index, spectral_color};
use crate::matrix::{DenseMatrix, MatrixRows};

/// One node of the exported graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier (downsampled frame index as a string)
    pub id: String,
    /// RGB color in 0..=255, sampled from the Spectral colormap by position
    pub color: [u8; 3],
}

/// One edge of the exported graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Edge weight scaled by 10, formatted to 3 significant digits
    pub value: String,
}

/// A downsampled nearest-neighbor graph of a fused similarity matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborGraph {
    /// Graph nodes, one per downsampled frame
    pub nodes: Vec<GraphNode>,
    /// Directed edges from the sparse neighbor kernel
    pub links: Vec<GraphLink>,
    /// Downsampling factor applied to the input matrix
    pub fac: usize,
}

/// Export a fused similarity matrix as a visualization-ready graph
///
/// The matrix is block-averaged down by `fac = round(n / res)`, its
/// diagonal zeroed, and both one-off-diagonal bands forced to the matrix
/// maximum so the rendered graph always shows a visible temporal path.
/// Edges come from a sparse neighbor kernel with an effective neighbor
/// count `k' = min(round(k·2 / fac), res)`.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty matrix, a non-square matrix, or
/// `res == 0`.
pub fn neighbor_graph(
    w: &DenseMatrix,
    k: usize,
    res: usize,
) -> Result<NeighborGraph, FusionError> {
    let n = w.rows();
    if n == 0 || !w.is_square() {
        return Err(FusionError::InvalidInput(format!(
            "Expected non-empty square matrix, got {}x{}",
            w.rows(),
            w.cols()
        )));
    }
    if res == 0 {
        return Err(FusionError::InvalidInput(
            "Target resolution must be positive".to_string(),
        ));
    }

    let fac = ((n as f32 / res as f32).round() as usize).max(1);
    let res = (n / fac).max(1);
    let mut wres = downsample_mean(w, res, fac);

    wres.zero_diagonal();
    let max = wres.max_value();
    for i in 0..res.saturating_sub(1) {
        wres.set(i, i + 1, max);
        wres.set(i + 1, i, max);
    }

    // Slightly more edges than the caller's k, rescaled to the new
    // resolution. A k that rounds to 0 yields an edgeless graph.
    let k_eff = ((k as f32 * 2.0 / fac as f32).round() as usize).min(res);
    log::debug!("Graph export: res = {}, fac = {}, k' = {}", res, fac, k_eff);
    let kernel = neighbor_kernel(&wres, k_eff);

    let nodes = (0..res)
        .map(|i| GraphNode {
            id: i.to_string(),
            color: spectral_color(position_index(i, res)),
        })
        .collect();
    let links = kernel
        .triplets()
        .into_iter()
        .map(|(i, j, v)| GraphLink {
            source: i.to_string(),
            target: j.to_string(),
            value: format_sig3(v * 10.0),
        })
        .collect();

    Ok(NeighborGraph { nodes, links, fac })
}

/// Block-mean downsample of the leading `res·fac` square of `w`
fn downsample_mean(w: &DenseMatrix, res: usize, fac: usize) -> DenseMatrix {
    if fac == 1 && res == w.rows() {
        return w.clone();
    }
    let n = w.rows();
    let mut out = DenseMatrix::zeros(res, res);
    for bi in 0..res {
        for bj in 0..res {
            let mut sum = 0.0f32;
            let mut count = 0usize;
            for i in (bi * fac)..((bi + 1) * fac).min(n) {
                for j in (bj * fac)..((bj + 1) * fac).min(n) {
                    sum += w.get(i, j);
                    count += 1;
                }
            }
            if count > 0 {
                out.set(bi, bj, sum / count as f32);
            }
        }
    }
    out
}

/// Format a value to 3 significant digits
///
/// Fixed-point inside [1e-4, 1e3), exponent notation outside, mirroring
/// printf `%g` selection (minus its trailing-zero trimming).
fn format_sig3(v: f32) -> String {
    if v == 0.0 || !v.is_finite() {
        return "0".to_string();
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-4..3).contains(&exp) {
        return format!("{:.2e}", v);
    }
    let decimals = (2 - exp).max(0) as usize;
    format!("{:.*}", decimals, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(n: usize) -> DenseMatrix {
        let mut w = DenseMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let v = if (i / 10) % 2 == (j / 10) % 2 { 0.9 } else { 0.1 };
                w.set(i, j, v);
            }
        }
        w
    }

    #[test]
    fn test_node_count_matches_resolution() {
        let w = checker(100);
        let graph = neighbor_graph(&w, 10, 50).unwrap();
        assert_eq!(graph.nodes.len(), 50);
        assert_eq!(graph.fac, 2);
        // k' = min(round(10*2/2), 50) = 10, directed edges, at most res*k'
        assert!(graph.links.len() <= 50 * 10);
        assert!(!graph.links.is_empty());
    }

    #[test]
    fn test_colors_span_colormap() {
        let w = checker(100);
        let graph = neighbor_graph(&w, 10, 50).unwrap();
        assert_eq!(graph.nodes[0].color, [158, 1, 66]);
        assert_eq!(graph.nodes[49].color, [94, 79, 162]);
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let w = checker(10);
        assert!(neighbor_graph(&w, 3, 0).is_err());
    }

    #[test]
    fn test_serializes_to_expected_shape() {
        let w = checker(20);
        let graph = neighbor_graph(&w, 3, 10).unwrap();
        let json = serde_json::to_value(&graph).unwrap();
        assert!(json["nodes"].as_array().unwrap().len() == 10);
        assert!(json["links"].is_array());
        assert_eq!(json["fac"], 2);
        let node = &json["nodes"][0];
        assert_eq!(node["id"], "0");
        assert_eq!(node["color"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_zero_effective_k_yields_edgeless_graph() {
        // n = 100, res = 10 gives fac = 10; k = 2 rounds k' = 0.4 to 0,
        // so the exported graph keeps its nodes but has no edges
        let w = checker(100);
        let graph = neighbor_graph(&w, 2, 10).unwrap();
        assert_eq!(graph.nodes.len(), 10);
        assert_eq!(graph.fac, 10);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_format_sig3() {
        assert_eq!(format_sig3(0.0), "0");
        assert_eq!(format_sig3(1.2345), "1.23");
        assert_eq!(format_sig3(0.012345), "0.0123");
        assert_eq!(format_sig3(12.345), "12.3");
        assert_eq!(format_sig3(0.00012345), "0.000123");
    }

    #[test]
    fn test_format_sig3_exponent_fallback() {
        assert_eq!(format_sig3(12345.0), "1.23e4");
        assert_eq!(format_sig3(0.000012345), "1.23e-5");
        assert_eq!(format_sig3(-12345.0), "-1.23e4");
    }
}
