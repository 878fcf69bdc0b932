//! Centered moving-average filter applied to the raw brightness scanline.

/// Smooths `samples` with a centered moving average reaching
/// `window / 2` positions to either side.
///
/// The window is truncated at both ends of the sequence, so boundary samples
/// average over fewer neighbours. Averages round half up. A window of 0 or 1
/// returns the input unchanged.
pub fn moving_average(samples: &[u8], window: usize) -> Vec<u8> {
    let half = window / 2;
    let len = samples.len();

    let mut prefix = Vec::with_capacity(len + 1);
    prefix.push(0_u64);
    for &sample in samples {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + u64::from(sample));
    }

    (0..len)
        .map(|index| {
            let start = index.saturating_sub(half);
            let end = (index + half + 1).min(len);
            let sum = prefix[end] - prefix[start];
            let count = (end - start) as u64;
            let rounded = (2 * sum + count) / (2 * count);
            rounded.min(u64::from(u8::MAX)) as u8
        })
        .collect()
}
