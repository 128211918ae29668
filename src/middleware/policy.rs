//! The authorization policy table.
//!
//! Every protected operation is listed once in [`Operation::policy`] with the
//! roles allowed to call it and the instance checks its handler must run.
//! The role half is enforced by the extractors in [`crate::middleware::role`]
//! before the handler body runs; the instance half lives in
//! [`crate::middleware::ownership`] and is invoked by the services named in
//! each check's documentation.

use schoolhouse_core::AppError;
use schoolhouse_models::{Role, UserRecord};

use crate::metrics;

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Teacher, Role::Student, Role::Parent];
const ADMIN: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Teacher];
const CLASS_READERS: &[Role] = &[Role::Admin, Role::Teacher, Role::Student];
const PARENT: &[Role] = &[Role::Parent];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetMe,
    UpdateProfile,

    ListUsers,
    CreateUser,
    GetUser,
    UpdateUser,
    DeleteUser,

    ListClasses,
    CreateClass,
    GetClass,
    UpdateSchedule,
    AddStudent,
    RemoveStudent,
    DeleteClass,

    CreateGrade,
    ClassGrades,
    StudentGrades,

    MarkAttendance,
    ClassAttendance,
    StudentAttendance,

    CreateConversation,
    ListConversations,
    ListMessages,
    SendMessage,

    ListEvents,
    CreateEvent,
    DeleteEvent,

    ChildProfile,
    ChildGrades,
    ChildAttendance,
}

/// Checks scoped to one resource instance, run after the role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceCheck {
    /// Admin, or the teacher who owns the class.
    ClassOwner,
    /// Admin, the owning teacher, or an enrolled student. Listings are
    /// narrowed the same way.
    ClassMember,
    /// The target student must be enrolled in the class.
    Enrollment,
    /// Admin, teacher, the student themself, or the student's parent.
    SelfOrGuardian,
    /// The caller must be a participant of the conversation.
    ConversationParticipant,
    /// Admin, or the creator of the event.
    EventCreator,
    /// The parent's declared child must resolve to exactly one student.
    ChildLink,
    /// Results are restricted to the caller's own records.
    CallerScoped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub roles: &'static [Role],
    pub checks: &'static [InstanceCheck],
}

const fn policy(roles: &'static [Role], checks: &'static [InstanceCheck]) -> Policy {
    Policy { roles, checks }
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::GetMe,
        Operation::UpdateProfile,
        Operation::ListUsers,
        Operation::CreateUser,
        Operation::GetUser,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::ListClasses,
        Operation::CreateClass,
        Operation::GetClass,
        Operation::UpdateSchedule,
        Operation::AddStudent,
        Operation::RemoveStudent,
        Operation::DeleteClass,
        Operation::CreateGrade,
        Operation::ClassGrades,
        Operation::StudentGrades,
        Operation::MarkAttendance,
        Operation::ClassAttendance,
        Operation::StudentAttendance,
        Operation::CreateConversation,
        Operation::ListConversations,
        Operation::ListMessages,
        Operation::SendMessage,
        Operation::ListEvents,
        Operation::CreateEvent,
        Operation::DeleteEvent,
        Operation::ChildProfile,
        Operation::ChildGrades,
        Operation::ChildAttendance,
    ];

    pub const fn policy(self) -> Policy {
        use InstanceCheck::*;

        match self {
            Operation::GetMe | Operation::UpdateProfile => policy(ALL_ROLES, &[CallerScoped]),

            Operation::ListUsers
            | Operation::CreateUser
            | Operation::GetUser
            | Operation::UpdateUser
            | Operation::DeleteUser => policy(ADMIN, &[]),

            Operation::ListClasses | Operation::GetClass => policy(CLASS_READERS, &[ClassMember]),
            Operation::CreateClass => policy(ADMIN, &[]),
            Operation::UpdateSchedule
            | Operation::AddStudent
            | Operation::RemoveStudent
            | Operation::DeleteClass => policy(STAFF, &[ClassOwner]),

            Operation::CreateGrade | Operation::MarkAttendance => {
                policy(STAFF, &[ClassOwner, Enrollment])
            }
            Operation::ClassGrades | Operation::ClassAttendance => policy(STAFF, &[ClassOwner]),
            Operation::StudentGrades | Operation::StudentAttendance => {
                policy(ALL_ROLES, &[SelfOrGuardian])
            }

            Operation::CreateConversation | Operation::ListConversations => {
                policy(ALL_ROLES, &[CallerScoped])
            }
            Operation::ListMessages | Operation::SendMessage => {
                policy(ALL_ROLES, &[ConversationParticipant])
            }

            Operation::ListEvents => policy(ALL_ROLES, &[]),
            Operation::CreateEvent => policy(STAFF, &[]),
            Operation::DeleteEvent => policy(STAFF, &[EventCreator]),

            Operation::ChildProfile | Operation::ChildGrades | Operation::ChildAttendance => {
                policy(PARENT, &[ChildLink])
            }
        }
    }

    /// Method and route template, for rejection messages and logs.
    pub const fn route(self) -> &'static str {
        match self {
            Operation::GetMe => "GET /api/auth/me",
            Operation::UpdateProfile => "PUT /api/auth/profile",
            Operation::ListUsers => "GET /api/users",
            Operation::CreateUser => "POST /api/users",
            Operation::GetUser => "GET /api/users/{id}",
            Operation::UpdateUser => "PUT /api/users/{id}",
            Operation::DeleteUser => "DELETE /api/users/{id}",
            Operation::ListClasses => "GET /api/classes",
            Operation::CreateClass => "POST /api/classes",
            Operation::GetClass => "GET /api/classes/{id}",
            Operation::UpdateSchedule => "PUT /api/classes/{id}/schedule",
            Operation::AddStudent => "POST /api/classes/{id}/students",
            Operation::RemoveStudent => "DELETE /api/classes/{id}/students/{student_id}",
            Operation::DeleteClass => "DELETE /api/classes/{id}",
            Operation::CreateGrade => "POST /api/grades",
            Operation::ClassGrades => "GET /api/grades/class/{class_id}",
            Operation::StudentGrades => "GET /api/grades/student/{student_id}",
            Operation::MarkAttendance => "POST /api/attendance",
            Operation::ClassAttendance => "GET /api/attendance/class/{class_id}",
            Operation::StudentAttendance => "GET /api/attendance/student/{student_id}",
            Operation::CreateConversation => "POST /api/conversations",
            Operation::ListConversations => "GET /api/conversations",
            Operation::ListMessages => "GET /api/conversations/{id}/messages",
            Operation::SendMessage => "POST /api/conversations/{id}/messages",
            Operation::ListEvents => "GET /api/events",
            Operation::CreateEvent => "POST /api/events",
            Operation::DeleteEvent => "DELETE /api/events/{id}",
            Operation::ChildProfile => "GET /api/parents/child",
            Operation::ChildGrades => "GET /api/parents/child/grades",
            Operation::ChildAttendance => "GET /api/parents/child/attendance",
        }
    }

    pub fn allows(self, role: Role) -> bool {
        self.policy().roles.contains(&role)
    }

    pub fn requires(self, check: InstanceCheck) -> bool {
        self.policy().checks.contains(&check)
    }
}

/// The role gate: rejects with 403 when the caller's role is not listed for
/// `operation`.
pub fn authorize_role(user: &UserRecord, operation: Operation) -> Result<(), AppError> {
    let role = user.role();
    let allowed = operation.allows(role);

    metrics::track_authorization_check(allowed, role.as_str(), operation.route());

    if allowed {
        return Ok(());
    }

    tracing::warn!(
        user_id = %user.id,
        role = %role,
        route = operation.route(),
        "Role not permitted"
    );
    Err(AppError::forbidden(format!(
        "Role '{}' is not authorized to access {}",
        role,
        operation.route()
    )))
}
