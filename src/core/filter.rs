// Causal low-pass ("synaptic") filter applied while samples are ingested.
//
// The filter is a first-order exponential: between two samples `dt` seconds
// apart the previous output decays by `exp(-dt / synapse)` and the new input
// fills the remainder. It is stateless; the store keeps the previous output.

/// Decay factor between two samples `dt` seconds apart.
///
/// Returns `0.0` (no memory of the previous value) when filtering is off.
#[inline]
pub fn decay(dt: f64, synapse: f64) -> f64 {
    if synapse <= 0.0 {
        return 0.0;
    }
    (-dt / synapse).exp()
}

/// Blend `new` with the previous filtered output.
///
/// The first sample of a dimension (`previous == None`) and any sample with
/// `synapse <= 0` pass through unchanged.
#[inline]
pub fn filter(previous: Option<f64>, new: f64, dt: f64, synapse: f64) -> f64 {
    match previous {
        Some(prev) if synapse > 0.0 => blend(prev, new, decay(dt, synapse)),
        _ => new,
    }
}

/// `new * (1 - decay) + previous * decay`, with `decay == 0` short-circuited
/// so raw values survive bit-for-bit.
#[inline]
pub fn blend(previous: f64, new: f64, decay: f64) -> f64 {
    if decay == 0.0 {
        return new;
    }
    new * (1.0 - decay) + previous * decay
}
