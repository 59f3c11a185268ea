use crate::core::models::domain::{RigidBody, RigidDomain};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Repeats full passes until same-segment domains sit at least `min_gap` apart.
/// Collapsed domains stay in place and are skipped. Returns the adjustment count.
pub fn resolve_gaps(bodies: &mut [RigidBody], min_gap: i64) -> usize {
    let positions: Vec<(usize, usize)> = bodies
        .iter()
        .enumerate()
        .flat_map(|(b, body)| (0..body.len()).map(move |d| (b, d)))
        .collect();

    let domain = |bodies: &[RigidBody], idx: usize| -> RigidDomain {
        let (b, d) = positions[idx];
        bodies[b].domains[d].clone()
    };

    let mut total = 0;
    let mut pass = 0;
    loop {
        pass += 1;
        let mut adjusted: HashSet<(usize, usize)> = HashSet::new();

        for i in 0..positions.len() {
            for j in 0..positions.len() {
                if i == j || adjusted.contains(&(i.min(j), i.max(j))) {
                    continue;
                }
                let a = domain(bodies, i);
                let b = domain(bodies, j);
                if a.segment_id != b.segment_id || a.is_collapsed() || b.is_collapsed() {
                    continue;
                }
                let gap = b.start - a.end;
                if gap < 1 || gap >= min_gap {
                    continue;
                }

                let (ab, ad) = positions[i];
                let (bb, bd) = positions[j];
                bodies[ab].domains[ad].end -= 1;
                bodies[bb].domains[bd].start += 1;
                adjusted.insert((i.min(j), i.max(j)));
                trace!(pass, earlier = %a, later = %b, "Widened gap between domains.");
            }
        }

        debug!(pass, adjustments = adjusted.len(), "Gap resolution pass finished.");
        if adjusted.is_empty() {
            break;
        }
        total += adjusted.len();
    }
    total
}
