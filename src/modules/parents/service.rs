use schoolhouse_core::AppError;
use schoolhouse_db::Store;
use schoolhouse_models::{StudentAttendanceResponse, StudentGradesResponse, User, UserRecord};
use tracing::instrument;

use crate::middleware::ownership::resolve_child;
use crate::modules::attendance::AttendanceService;
use crate::modules::grades::GradeService;

/// Read-only views of a parent's own child.
pub struct ParentService;

impl ParentService {
    #[instrument(skip(store, parent), fields(parent_id = %parent.id))]
    pub async fn child(store: &Store, parent: &UserRecord) -> Result<User, AppError> {
        Ok(resolve_child(store, parent).await?.into())
    }

    #[instrument(skip(store, parent), fields(parent_id = %parent.id))]
    pub async fn child_grades(
        store: &Store,
        parent: &UserRecord,
    ) -> Result<StudentGradesResponse, AppError> {
        let child = resolve_child(store, parent).await?;
        GradeService::report(store, child).await
    }

    #[instrument(skip(store, parent), fields(parent_id = %parent.id))]
    pub async fn child_attendance(
        store: &Store,
        parent: &UserRecord,
    ) -> Result<StudentAttendanceResponse, AppError> {
        let child = resolve_child(store, parent).await?;
        AttendanceService::report(store, child).await
    }
}
