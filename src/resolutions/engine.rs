//! Completion decision logic. Pure functions of the resolution and the
//! supplied clock; no store access, no hidden state.

use time::OffsetDateTime;

use super::repo::{Resolution, ResolutionKind, ResolutionStatus};

/// Fields the complete operation writes back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub last_completed_at: OffsetDateTime,
    pub status: Option<ResolutionStatus>,
}

/// Whether the resolution counts as done for the calendar date of `now`.
///
/// Daily resolutions derive done-ness purely from `last_completed_at`;
/// their status stays `active` forever. Onetime resolutions are done once
/// their status is `completed`, regardless of the clock.
pub fn is_done_today(resolution: &Resolution, now: OffsetDateTime) -> bool {
    match resolution.kind {
        ResolutionKind::Daily => resolution
            .last_completed_at
            .map(|t| t.date() == now.date())
            .unwrap_or(false),
        ResolutionKind::Onetime => resolution.status == ResolutionStatus::Completed,
    }
}

/// Compute the state transition and point award for a completion request.
///
/// Caller has already established existence and ownership. No check is
/// made against prior done-state: completing an already-done resolution
/// awards its points again.
pub fn complete(resolution: &Resolution, now: OffsetDateTime) -> (CompletionUpdate, i32) {
    let status = match resolution.kind {
        ResolutionKind::Daily => None,
        ResolutionKind::Onetime => Some(ResolutionStatus::Completed),
    };
    (
        CompletionUpdate {
            last_completed_at: now,
            status,
        },
        resolution.points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn resolution(kind: ResolutionKind) -> Resolution {
        Resolution {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Drink water".into(),
            description: None,
            points: 10,
            kind,
            target_date: None,
            status: ResolutionStatus::Active,
            last_completed_at: None,
            created_at: datetime!(2026-01-01 00:00 UTC),
        }
    }

    fn apply(resolution: &mut Resolution, update: CompletionUpdate) {
        resolution.last_completed_at = Some(update.last_completed_at);
        if let Some(status) = update.status {
            resolution.status = status;
        }
    }

    #[test]
    fn daily_is_not_done_before_any_completion() {
        let r = resolution(ResolutionKind::Daily);
        assert!(!is_done_today(&r, datetime!(2026-01-02 09:00 UTC)));
    }

    #[test]
    fn daily_is_done_for_the_rest_of_the_calendar_date() {
        let mut r = resolution(ResolutionKind::Daily);
        let (update, points) = complete(&r, datetime!(2026-01-02 09:00 UTC));
        apply(&mut r, update);

        assert_eq!(points, 10);
        assert_eq!(r.status, ResolutionStatus::Active);
        assert!(is_done_today(&r, datetime!(2026-01-02 09:00 UTC)));
        assert!(is_done_today(&r, datetime!(2026-01-02 23:59 UTC)));
    }

    #[test]
    fn daily_resets_on_the_next_calendar_date() {
        let mut r = resolution(ResolutionKind::Daily);
        let (update, _) = complete(&r, datetime!(2026-01-02 23:59 UTC));
        apply(&mut r, update);

        // One minute later, but a new date
        assert!(!is_done_today(&r, datetime!(2026-01-03 00:00 UTC)));
        assert!(!is_done_today(&r, datetime!(2026-02-02 09:00 UTC)));
    }

    #[test]
    fn onetime_completion_is_terminal() {
        let mut r = resolution(ResolutionKind::Onetime);
        assert!(!is_done_today(&r, datetime!(2026-01-02 09:00 UTC)));

        let (update, points) = complete(&r, datetime!(2026-01-02 09:00 UTC));
        apply(&mut r, update);

        assert_eq!(points, 10);
        assert_eq!(r.status, ResolutionStatus::Completed);
        // Done on any later date, the clock no longer matters
        assert!(is_done_today(&r, datetime!(2026-01-02 09:00 UTC)));
        assert!(is_done_today(&r, datetime!(2027-06-15 12:00 UTC)));
    }

    #[test]
    fn onetime_status_never_reverts_through_the_completion_path() {
        let mut r = resolution(ResolutionKind::Onetime);
        let (update, _) = complete(&r, datetime!(2026-01-02 09:00 UTC));
        apply(&mut r, update);

        let (update, _) = complete(&r, datetime!(2026-03-01 09:00 UTC));
        apply(&mut r, update);
        assert_eq!(r.status, ResolutionStatus::Completed);
    }

    #[test]
    fn repeated_completion_awards_points_each_time() {
        let mut r = resolution(ResolutionKind::Daily);
        r.points = 25;

        let (update, first) = complete(&r, datetime!(2026-01-02 09:00 UTC));
        apply(&mut r, update);
        let (update, second) = complete(&r, datetime!(2026-01-02 10:00 UTC));
        apply(&mut r, update);

        assert_eq!(first, 25);
        assert_eq!(second, 25);
    }

    #[test]
    fn award_equals_the_resolution_points_value() {
        let mut r = resolution(ResolutionKind::Onetime);
        r.points = 50;
        let (_, points) = complete(&r, datetime!(2026-01-02 09:00 UTC));
        assert_eq!(points, 50);
    }

    #[test]
    fn daily_status_is_ignored_for_doneness() {
        // Even a (hypothetically) completed-status daily derives done-ness
        // from the timestamp alone.
        let mut r = resolution(ResolutionKind::Daily);
        r.status = ResolutionStatus::Completed;
        assert!(!is_done_today(&r, datetime!(2026-01-02 09:00 UTC)));
    }
}
