use roomdesk_shared::RoomStatus;

/// Derive a booking's overall status from its room statuses.
///
/// Approval must be unanimous; otherwise a single cancelled room marks the
/// whole booking cancelled, even while other rooms are still pending. An
/// empty booking is pending.
pub fn overall_status<I>(statuses: I) -> RoomStatus
where
    I: IntoIterator<Item = RoomStatus>,
{
    let mut seen_any = false;
    let mut all_approved = true;
    let mut any_cancelled = false;

    for status in statuses {
        seen_any = true;
        all_approved &= status == RoomStatus::Approved;
        any_cancelled |= status == RoomStatus::Cancelled;
    }

    if seen_any && all_approved {
        RoomStatus::Approved
    } else if any_cancelled {
        RoomStatus::Cancelled
    } else {
        RoomStatus::Pending
    }
}
