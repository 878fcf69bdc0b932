use serde::{Deserialize, Serialize};

/// Direction of a brightness threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    DarkToLight,
    LightToDark,
}

/// A threshold crossing between two adjacent smoothed samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Index of the first sample in the new state.
    pub position: usize,
    pub transition: Transition,
    /// Samples since the previous edge, or since the start of the scanline
    /// for the first edge.
    pub distance: usize,
}

impl Edge {
    pub fn is_dark_to_light(&self) -> bool {
        self.transition == Transition::DarkToLight
    }
}

/// Scans `samples` for crossings of `threshold`.
///
/// A sample is light when it is strictly greater than the threshold. Edges are
/// returned in increasing position order. Sequences shorter than two samples
/// or without any crossing produce no edges.
pub fn detect_edges(samples: &[u8], threshold: u8) -> Vec<Edge> {
    let mut edges = Vec::new();
    let Some((&first, rest)) = samples.split_first() else {
        return edges;
    };

    let mut previous_light = first > threshold;
    let mut last_position = 0;

    for (offset, &sample) in rest.iter().enumerate() {
        let position = offset + 1;
        let light = sample > threshold;
        if light == previous_light {
            continue;
        }

        edges.push(Edge {
            position,
            transition: if light {
                Transition::DarkToLight
            } else {
                Transition::LightToDark
            },
            distance: position - last_position,
        });
        last_position = position;
        previous_light = light;
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_has_no_edges() {
        for len in 1..16 {
            assert!(detect_edges(&vec![200; len], 128).is_empty());
            assert!(detect_edges(&vec![10; len], 128).is_empty());
        }
    }

    #[test]
    fn degenerate_inputs_have_no_edges() {
        assert!(detect_edges(&[], 128).is_empty());
        assert!(detect_edges(&[255], 128).is_empty());
    }

    #[test]
    fn single_rising_edge() {
        let edges = detect_edges(&[0, 0, 200, 200], 128);
        assert_eq!(
            edges,
            vec![Edge {
                position: 2,
                transition: Transition::DarkToLight,
                distance: 2,
            }]
        );
    }

    #[test]
    fn threshold_value_itself_is_dark() {
        assert!(detect_edges(&[128, 128, 128], 128).is_empty());
        let edges = detect_edges(&[129, 128], 128);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].transition, Transition::LightToDark);
    }

    #[test]
    fn distances_accumulate_to_positions() {
        let samples = [0, 255, 255, 0, 0, 0, 255, 0, 255, 255, 255, 0];
        let edges = detect_edges(&samples, 128);
        assert_eq!(edges.len(), 6);

        let mut cumulative = 0;
        for edge in &edges {
            cumulative += edge.distance;
            assert_eq!(cumulative, edge.position);
        }
    }

    #[test]
    fn positions_strictly_increase_and_alternate() {
        let samples = [255, 0, 255, 0, 255, 0];
        let edges = detect_edges(&samples, 128);
        assert_eq!(edges.len(), 5);
        for pair in edges.windows(2) {
            assert!(pair[0].position < pair[1].position);
            assert_ne!(pair[0].transition, pair[1].transition);
        }
        assert_eq!(edges[0].transition, Transition::LightToDark);
        assert!(edges.iter().all(|edge| edge.distance == 1));
    }
}
