use crate::{
    constants::{MAX_LEGS_PER_MATCH, MAX_PARLAY_LEGS, MIN_PARLAY_LEGS},
    leg::Leg,
};

/// Keeps the strongest legs of a match, highest probability first. Ties keep
/// extraction order.
pub fn cap_legs(mut legs: Vec<Leg>) -> Vec<Leg> {
    legs.sort_by(|left, right| right.probability.total_cmp(&left.probability));
    legs.truncate(MAX_LEGS_PER_MATCH);
    legs
}

pub fn is_compatible(legs: &[Leg]) -> bool {
    legs.iter().enumerate().all(|(index, leg)| {
        legs[index + 1..]
            .iter()
            .all(|other| !leg.contradicts(other))
    })
}

/// Every valid pair followed by every valid triple of the capped legs.
pub fn combinations(legs: &[Leg]) -> Vec<Vec<Leg>> {
    let legs = cap_legs(legs.to_vec());
    let mut out = Vec::new();
    for size in MIN_PARLAY_LEGS..=MAX_PARLAY_LEGS {
        let mut picked = Vec::with_capacity(size);
        push_subsets(&legs, size, 0, &mut picked, &mut out);
    }
    out
}

/// Emits compatible subsets of `size` legs in lexicographic index order.
fn push_subsets(
    legs: &[Leg],
    size: usize,
    start: usize,
    picked: &mut Vec<Leg>,
    out: &mut Vec<Vec<Leg>>,
) {
    if picked.len() == size {
        if is_compatible(picked) {
            out.push(picked.clone());
        }
        return;
    }
    for index in start..legs.len() {
        picked.push(legs[index].clone());
        push_subsets(legs, size, index + 1, picked, out);
        picked.pop();
    }
}
