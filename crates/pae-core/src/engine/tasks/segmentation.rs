use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub first: usize,
    pub last: usize,
}

pub fn segment(cluster: &[usize], boundaries: &BTreeSet<usize>) -> Vec<Region> {
    let mut members = cluster.to_vec();
    members.sort_unstable();
    members.dedup();

    let mut regions = Vec::new();
    let mut iter = members.into_iter();
    let Some(first) = iter.next() else {
        return regions;
    };

    let mut current = Region { first, last: first };
    for member in iter {
        if member != current.last + 1 || boundaries.contains(&current.last) {
            regions.push(current);
            current = Region {
                first: member,
                last: member,
            };
        } else {
            current.last = member;
        }
    }
    regions.push(current);
    regions
}
