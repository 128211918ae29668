//! # Schoolhouse Models
//!
//! Domain documents and DTOs for the Schoolhouse API.
//!
//! Every persisted type implements [`schoolhouse_db::Document`] and is stored
//! as JSON in its collection. Field names are camelCase on the wire and in
//! storage, so store filters use the same names the API exposes.
//!
//! # Modules
//!
//! - [`users`]: Identities, roles and the role-specific profile
//! - [`auth`]: Login and registration payloads
//! - [`classes`]: Classes, enrollment and schedules
//! - [`grades`]: Grade records
//! - [`attendance`]: Attendance records keyed by class, student and day
//! - [`conversations`]: Conversations and messages
//! - [`events`]: School events
//! - [`value_types`]: Validated primitives such as [`Email`]

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod conversations;
pub mod events;
pub mod grades;
pub mod users;
pub mod value_types;

pub use attendance::{
    AttendanceEntryDto, AttendanceRecord, AttendanceStatus, AttendanceSummary,
    MarkAttendanceDto, StudentAttendanceResponse,
};
pub use auth::{AuthResponse, LoginRequest};
pub use classes::{
    AddStudentDto, Class, CreateClassDto, DayOfWeek, ScheduleEntry, UpdateScheduleDto,
};
pub use conversations::{Conversation, CreateConversationDto, Message, SendMessageDto};
pub use events::{CreateEventDto, Event};
pub use grades::{
    AssessmentType, CreateGradeDto, GradeRecord, StudentGradesResponse, SubjectAverage,
    subject_averages,
};
pub use users::{
    PaginatedUsersResponse, ProfileError, Role, RoleAttributes, RoleProfile, UpdateProfileDto, UpdateUserDto,
    User, UserFilterParams, UserRecord, UserRequest,
};
pub use value_types::{Email, ValueTypeError};
