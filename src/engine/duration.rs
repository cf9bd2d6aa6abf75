//! Greedy shortest-first packing toward a target playtime.

use crate::dataset::Track;

/// Allowed distance from the target total, in minutes.
pub const DURATION_TOLERANCE_MINUTES: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub enum PackOutcome<'d> {
    /// No candidate carried a positive duration.
    EmptyPool,
    Packed(Vec<&'d Track>),
}

impl<'d> PackOutcome<'d> {
    #[cfg(test)]
    pub fn total_minutes(&self) -> f64 {
        match self {
            PackOutcome::EmptyPool => 0.0,
            PackOutcome::Packed(tracks) => tracks.iter().filter_map(|t| t.duration_minutes()).sum(),
        }
    }
}

/// Adds tracks shortest first while the running total stays within
/// `target + 0.5`, stopping once it reaches `target - 0.5`.
///
/// This approximates the target and is not optimal. If even the shortest
/// track overshoots, that single track is returned.
pub fn pack<'d>(tracks: &[&'d Track], target_minutes: f64) -> PackOutcome<'d> {
    let mut pool: Vec<(&'d Track, f64)> = tracks
        .iter()
        .filter_map(|t| t.duration_minutes().filter(|m| *m > 0.0).map(|m| (*t, m)))
        .collect();
    if pool.is_empty() {
        return PackOutcome::EmptyPool;
    }
    pool.sort_by(|a, b| a.1.total_cmp(&b.1));

    let upper = target_minutes + DURATION_TOLERANCE_MINUTES;
    let lower = target_minutes - DURATION_TOLERANCE_MINUTES;

    let mut selected = Vec::new();
    let mut total = 0.0;
    for (track, minutes) in &pool {
        if total >= lower {
            break;
        }
        if total + minutes <= upper {
            selected.push(*track);
            total += minutes;
        }
    }

    if selected.is_empty() {
        selected.push(pool[0].0);
    }
    PackOutcome::Packed(selected)
}
