use uuid::Uuid;

/// The authenticated user an operation runs on behalf of. Passed explicitly
/// into every use case instead of being read from request-global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Caller {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_staff: false,
        }
    }

    pub fn staff(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_staff: true,
        }
    }

    /// Staff can act for anyone; everyone else only for themselves.
    pub fn can_act_for(&self, user_id: Uuid) -> bool {
        self.is_staff || self.user_id == user_id
    }
}
