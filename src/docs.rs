use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use schoolhouse_core::{MessageResponse, PaginationMeta};
use schoolhouse_models::{
    AddStudentDto, AssessmentType, AttendanceEntryDto, AttendanceRecord, AttendanceStatus,
    AttendanceSummary, AuthResponse, Class, Conversation, CreateClassDto, CreateConversationDto,
    CreateEventDto, CreateGradeDto, DayOfWeek, Event, GradeRecord, LoginRequest,
    MarkAttendanceDto, Message, PaginatedUsersResponse, Role, RoleAttributes, RoleProfile,
    ScheduleEntry, SendMessageDto, StudentAttendanceResponse, StudentGradesResponse,
    SubjectAverage, UpdateProfileDto, UpdateScheduleDto, UpdateUserDto, User, UserRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::update_profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_schedule,
        crate::modules::classes::controller::add_student,
        crate::modules::classes::controller::remove_student,
        crate::modules::classes::controller::delete_class,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::get_class_grades,
        crate::modules::grades::controller::get_student_grades,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_class_attendance,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::conversations::controller::create_conversation,
        crate::modules::conversations::controller::get_conversations,
        crate::modules::conversations::controller::get_messages,
        crate::modules::conversations::controller::send_message,
        crate::modules::events::controller::get_events,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::delete_event,
        crate::modules::parents::controller::get_child,
        crate::modules::parents::controller::get_child_grades,
        crate::modules::parents::controller::get_child_attendance,
    ),
    components(
        schemas(
            MessageResponse,
            PaginationMeta,
            Role,
            RoleProfile,
            RoleAttributes,
            User,
            UserRequest,
            UpdateUserDto,
            UpdateProfileDto,
            PaginatedUsersResponse,
            LoginRequest,
            AuthResponse,
            DayOfWeek,
            ScheduleEntry,
            Class,
            CreateClassDto,
            UpdateScheduleDto,
            AddStudentDto,
            AssessmentType,
            GradeRecord,
            CreateGradeDto,
            SubjectAverage,
            StudentGradesResponse,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceEntryDto,
            MarkAttendanceDto,
            AttendanceSummary,
            StudentAttendanceResponse,
            Conversation,
            Message,
            CreateConversationDto,
            SendMessageDto,
            Event,
            CreateEventDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the caller's own profile"),
        (name = "Users", description = "User administration (admin only)"),
        (name = "Classes", description = "Classes, enrollment and schedules"),
        (name = "Grades", description = "Grade records"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Messaging", description = "Conversations between users"),
        (name = "Events", description = "School events"),
        (name = "Parents", description = "A parent's view of their child")
    ),
    info(
        title = "Schoolhouse API",
        version = "0.1.0",
        description = "School management REST API: JWT authentication, role gates and per-resource ownership checks.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/users/{id}",
            "/api/classes/{id}/students/{student_id}",
            "/api/attendance/class/{class_id}",
            "/api/conversations/{id}/messages",
            "/api/parents/child/grades",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
