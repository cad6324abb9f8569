//! Self-action guard for user and channel block commands.

/// Whether a block/unblock request targets the actor itself or the channel
/// it was issued from while self-operation is disallowed.
///
/// Keyword commands never consult this: keywords have no "self".
pub fn is_self_action(
    actor_user_id: &str,
    actor_channel_id: &str,
    target_id: &str,
    self_operation_allowed: bool,
) -> bool {
    if self_operation_allowed {
        return false;
    }
    target_id == actor_user_id || target_id == actor_channel_id
}
