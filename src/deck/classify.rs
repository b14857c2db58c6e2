use super::types::Decision;

/// Only horizontal travel decides; ties at the boundary and NaN stay `Cancel`.
pub fn classify(dx: f32, threshold: f32) -> Decision {
    if dx > threshold {
        Decision::Like
    } else if dx < -threshold {
        Decision::Pass
    } else {
        Decision::Cancel
    }
}
