use coffeedocket_auth::Role;
use coffeedocket_core::StaffId;

/// Authenticated staff context for a request.
///
/// This is immutable and must be present for all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StaffContext {
    staff_id: StaffId,
    role: Role,
}

impl StaffContext {
    pub fn new(staff_id: StaffId, role: Role) -> Self {
        Self { staff_id, role }
    }

    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
