//! Feature synchronization to coarse intervals

use crate::error::FusionError;

/// Features aggregated onto a common coarse time grid
#[derive(Debug, Clone)]
pub struct SyncedFeatures {
    /// Median-aggregated chroma frames
    pub chroma: Vec<Vec<f32>>,
    /// Mean-aggregated MFCC frames
    pub mfcc: Vec<Vec<f32>>,
    /// Mean-aggregated tempogram frames
    pub tempogram: Vec<Vec<f32>>,
    /// Time in seconds of each synchronized frame (left interval edge)
    pub times: Vec<f32>,
}

/// Partition frames into fixed-width intervals and aggregate each feature
///
/// Interval boundaries fall every `win_fac` hops over the usable hop count
/// `(n_samples − hop_length·win_fac·wins_per_block) / hop_length`, clamped
/// into the common frame range and closed with the first and last frame.
/// Chroma is aggregated by per-bin median (robust to transients and
/// passing tones), MFCC and tempogram by mean. All features are first
/// truncated to the shortest feature's frame count.
///
/// Features are frame-major: one inner vector per time frame.
///
/// # Errors
///
/// Returns `InvalidInput` if any feature is empty, frames within a feature
/// have inconsistent lengths, or the audio is shorter than one
/// synchronization window (`hop_length·win_fac·wins_per_block` samples).
#[allow(clippy::too_many_arguments)]
pub fn synchronize(
    chroma: &[Vec<f32>],
    mfcc: &[Vec<f32>],
    tempogram: &[Vec<f32>],
    hop_length: usize,
    n_samples: usize,
    sample_rate: u32,
    win_fac: usize,
    wins_per_block: usize,
) -> Result<SyncedFeatures, FusionError> {
    if hop_length == 0 || sample_rate == 0 || win_fac == 0 || wins_per_block == 0 {
        return Err(FusionError::InvalidInput(
            "hop_length, sample_rate, win_fac and wins_per_block must be positive".to_string(),
        ));
    }
    let n_frames = chroma.len().min(mfcc.len()).min(tempogram.len());
    if n_frames == 0 {
        return Err(FusionError::InvalidInput(
            "All three features must have at least one frame".to_string(),
        ));
    }
    let window = hop_length * win_fac * wins_per_block;
    if n_samples < window {
        return Err(FusionError::InvalidInput(format!(
            "Audio too short: {} samples, need at least {} for one synchronization window",
            n_samples, window
        )));
    }
    let n_hops = (n_samples - window) / hop_length;

    // Boundary every win_fac hops, clamped to the frame range and closed
    // with both endpoints
    let mut boundaries: Vec<usize> = (0..n_hops.max(1))
        .step_by(win_fac)
        .map(|b| b.min(n_frames))
        .collect();
    boundaries.push(0);
    boundaries.push(n_frames);
    boundaries.sort_unstable();
    boundaries.dedup();

    let n_out = boundaries.len() - 1;
    let mut out = SyncedFeatures {
        chroma: Vec::with_capacity(n_out),
        mfcc: Vec::with_capacity(n_out),
        tempogram: Vec::with_capacity(n_out),
        times: Vec::with_capacity(n_out),
    };
    for w in boundaries.windows(2) {
        let (a, b) = (w[0], w[1]);
        out.chroma.push(aggregate_median(&chroma[a..b])?);
        out.mfcc.push(aggregate_mean(&mfcc[a..b])?);
        out.tempogram.push(aggregate_mean(&tempogram[a..b])?);
        out.times
            .push(a as f32 * hop_length as f32 / sample_rate as f32);
    }
    log::debug!(
        "Synchronized {} frames into {} intervals (win_fac = {})",
        n_frames,
        n_out,
        win_fac
    );
    Ok(out)
}

fn aggregate_mean(frames: &[Vec<f32>]) -> Result<Vec<f32>, FusionError> {
    let dim = check_dims(frames)?;
    let mut out = vec![0.0f32; dim];
    for frame in frames {
        for (o, v) in out.iter_mut().zip(frame.iter()) {
            *o += *v;
        }
    }
    for o in out.iter_mut() {
        *o /= frames.len() as f32;
    }
    Ok(out)
}

fn aggregate_median(frames: &[Vec<f32>]) -> Result<Vec<f32>, FusionError> {
    let dim = check_dims(frames)?;
    let mut out = vec![0.0f32; dim];
    let mut column = Vec::with_capacity(frames.len());
    for (d, o) in out.iter_mut().enumerate() {
        column.clear();
        column.extend(frames.iter().map(|f| f[d]));
        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = column.len() / 2;
        *o = if column.len() % 2 == 1 {
            column[mid]
        } else {
            0.5 * (column[mid - 1] + column[mid])
        };
    }
    Ok(out)
}

fn check_dims(frames: &[Vec<f32>]) -> Result<usize, FusionError> {
    let dim = frames
        .first()
        .map(|f| f.len())
        .ok_or_else(|| FusionError::ProcessingError("Empty aggregation interval".to_string()))?;
    for frame in frames {
        if frame.len() != dim {
            return Err(FusionError::InvalidInput(format!(
                "Inconsistent feature dimension: {} vs {}",
                frame.len(),
                dim
            )));
        }
    }
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(values: &[f32]) -> Vec<Vec<f32>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_median_vs_mean_aggregation() {
        // 8 frames, boundary every 4 hops
        let chroma = frames(&[0.0, 0.0, 0.0, 10.0, 1.0, 1.0, 1.0, 1.0]);
        let mfcc = frames(&[0.0, 0.0, 0.0, 10.0, 1.0, 1.0, 1.0, 1.0]);
        let tempogram = mfcc.clone();
        // window = 1 * 4 * 1 = 4 samples; n_hops = (12 - 4) / 1 = 8
        let out = synchronize(&chroma, &mfcc, &tempogram, 1, 12, 1, 4, 1).unwrap();
        assert_eq!(out.chroma.len(), 2);
        // Median suppresses the 10.0 outlier, mean does not
        assert!((out.chroma[0][0] - 0.0).abs() < 1e-6);
        assert!((out.mfcc[0][0] - 2.5).abs() < 1e-6);
        assert_eq!(out.times[0], 0.0);
        assert_eq!(out.times[1], 4.0);
    }

    #[test]
    fn test_truncates_to_shortest_feature() {
        let chroma = frames(&[1.0, 2.0, 3.0, 4.0]);
        let mfcc = frames(&[1.0, 2.0]);
        let tempogram = frames(&[1.0, 2.0, 3.0]);
        let out = synchronize(&chroma, &mfcc, &tempogram, 1, 100, 1, 1, 1).unwrap();
        assert_eq!(out.chroma.len(), out.mfcc.len());
        assert_eq!(out.chroma.len(), 2);
    }

    #[test]
    fn test_too_short_audio_is_an_error() {
        let f = frames(&[1.0, 2.0]);
        let err = synchronize(&f, &f, &f, 512, 100, 44100, 10, 20);
        assert!(matches!(err, Err(FusionError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_feature_is_an_error() {
        let f = frames(&[1.0, 2.0]);
        let empty: Vec<Vec<f32>> = vec![];
        assert!(synchronize(&f, &empty, &f, 1, 100, 1, 1, 1).is_err());
    }
}
