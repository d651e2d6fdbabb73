//! Spectral perceptual colormap
//!
//! A 256-entry table interpolated from the 11 ColorBrewer "Spectral"
//! anchors. Node colors index this table by temporal position, so the
//! rendered graph encodes time order as a red-to-violet sweep.

/// ColorBrewer Spectral-11 anchor colors
const ANCHORS: [[f32; 3]; 11] = [
    [158.0, 1.0, 66.0],
    [213.0, 62.0, 79.0],
    [244.0, 109.0, 67.0],
    [253.0, 174.0, 97.0],
    [254.0, 224.0, 139.0],
    [255.0, 255.0, 191.0],
    [230.0, 245.0, 152.0],
    [171.0, 221.0, 164.0],
    [102.0, 194.0, 165.0],
    [50.0, 136.0, 189.0],
    [94.0, 79.0, 162.0],
];

/// Color at table index `idx` (clamped to 0..=255)
pub fn spectral_color(idx: usize) -> [u8; 3] {
    let idx = idx.min(255);
    let t = idx as f32 / 255.0 * (ANCHORS.len() - 1) as f32;
    let lo = t.floor() as usize;
    let hi = (lo + 1).min(ANCHORS.len() - 1);
    let frac = t - lo as f32;
    let mut rgb = [0u8; 3];
    for c in 0..3 {
        let v = ANCHORS[lo][c] + (ANCHORS[hi][c] - ANCHORS[lo][c]) * frac;
        rgb[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    rgb
}

/// Table index for node `i` of `n`, spread evenly over the full colormap
pub fn position_index(i: usize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (i as f32 * 255.0 / (n - 1) as f32).round() as usize
}
