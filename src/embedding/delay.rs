//! Delay embedding and distance matrix construction

use crate::matrix::DenseMatrix;

/// Stack each frame with its preceding history into one vector
///
/// Frame `t` becomes the concatenation of frames `t, t−1, …, t−(n_steps−1)`,
/// with indices clamped to the first frame (edge padding). The result
/// encodes short-term temporal context directly in the geometry, so frame
/// similarity compares whole local passages rather than instants.
pub fn delay_embed(frames: &[Vec<f32>], n_steps: usize) -> Vec<Vec<f32>> {
    let dim = frames.first().map(|f| f.len()).unwrap_or(0);
    frames
        .iter()
        .enumerate()
        .map(|(t, _)| {
            let mut v = Vec::with_capacity(dim * n_steps.max(1));
            for s in 0..n_steps.max(1) {
                v.extend_from_slice(&frames[t.saturating_sub(s)]);
            }
            v
        })
        .collect()
}

/// Pairwise Euclidean distance matrix
pub fn euclidean_distances(x: &[Vec<f32>]) -> DenseMatrix {
    let n = x.len();
    let mut d = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let sq: f32 = x[i]
                .iter()
                .zip(x[j].iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            let dist = sq.max(0.0).sqrt();
            d.set(i, j, dist);
            d.set(j, i, dist);
        }
    }
    d
}

/// Pairwise cosine distance matrix, `1 − cos(xᵢ, xⱼ)`
///
/// Zero-norm vectors substitute norm 1 (crate-wide zero-denominator
/// policy), yielding distance 1 against everything and 0 against
/// themselves on the diagonal.
pub fn cosine_distances(x: &[Vec<f32>]) -> DenseMatrix {
    let n = x.len();
    let norms: Vec<f32> = x
        .iter()
        .map(|v| {
            let norm = v.iter().map(|a| a * a).sum::<f32>().sqrt();
            if norm == 0.0 {
                1.0
            } else {
                norm
            }
        })
        .collect();
    let mut d = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let dot: f32 = x[i].iter().zip(x[j].iter()).map(|(a, b)| a * b).sum();
            let dist = (1.0 - dot / (norms[i] * norms[j])).max(0.0);
            d.set(i, j, dist);
            d.set(j, i, dist);
        }
    }
    d
}

/// Zero-pad a distance matrix into at least `min_size`×`min_size`
///
/// The original matrix lands in the top-left corner. Applied when a track
/// yields fewer frames than the diffusion stage's neighbor preconditions
/// need; deliberately a silent recovery rather than an error.
pub fn pad_to_min(d: &DenseMatrix, min_size: usize) -> DenseMatrix {
    use crate::matrix::MatrixRows;
    let n = d.rows();
    if n >= min_size {
        return d.clone();
    }
    let mut out = DenseMatrix::zeros(min_size, min_size);
    for i in 0..n {
        for j in 0..n {
            out.set(i, j, d.get(i, j));
        }
    }
    out
}
