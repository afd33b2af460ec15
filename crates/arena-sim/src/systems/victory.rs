//! Victory check: a team holding every capture point wins.

use hecs::World;
use tracing::info;

use arena_core::components::CapturePoint;
use arena_core::events::AudioEvent;
use arena_core::types::TeamId;

use crate::context::SimContext;

/// The team owning all of `owners`, if any. No points means no winner.
pub fn winner(owners: &[Option<TeamId>], num_teams: usize) -> Option<TeamId> {
    let first = (*owners.first()?)?;
    if (first as usize) < num_teams && owners.iter().all(|o| *o == Some(first)) {
        Some(first)
    } else {
        None
    }
}

pub fn run(world: &mut World, ctx: &mut SimContext) -> Option<TeamId> {
    let owners: Vec<Option<TeamId>> = world.query_mut::<&CapturePoint>().into_iter().map(|(_, cp)| cp.owner).collect();
    let team = winner(&owners, ctx.config.num_teams)?;
    info!(team, points = owners.len(), "team holds every point");
    ctx.events.push(AudioEvent::Victory { team });
    Some(team)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_points_required() {
        assert_eq!(winner(&[Some(1), Some(1), Some(1), Some(1)], 2), Some(1));
        assert_eq!(winner(&[Some(1), Some(1), Some(1), None], 2), None);
        assert_eq!(winner(&[Some(1), Some(0), Some(1), Some(1)], 2), None);
    }

    #[test]
    fn test_no_points_no_winner() {
        assert_eq!(winner(&[], 2), None);
    }

    #[test]
    fn test_owner_outside_team_range_ignored() {
        assert_eq!(winner(&[Some(4), Some(4)], 2), None);
    }
}
