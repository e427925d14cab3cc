use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::entities::{
    attendance::{Attendance, AttendanceStatus, WorkMode},
    shift::Shift,
    time_zone::TimeZone,
    user::{Role, User},
};
use crate::filtering::SearchMode;
use crate::models::BulkDeleteResult;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "Attendance API", description = "Paginated, filterable HR attendance records"),
    paths(
        routes::shifts::list,
        routes::shifts::get_one,
        routes::shifts::delete,
        routes::shifts::bulk_delete,
        routes::time_zones::list,
        routes::time_zones::get_one,
        routes::time_zones::delete,
        routes::time_zones::bulk_delete,
        routes::attendance_history,
        routes::admin_attendances,
        routes::admin_users,
    ),
    components(schemas(
        Attendance,
        AttendanceStatus,
        WorkMode,
        Shift,
        TimeZone,
        User,
        Role,
        SearchMode,
        BulkDeleteResult,
    )),
    modifiers(&BearerToken),
    tags(
        (name = "master-data", description = "Shifts and time zones"),
        (name = "attendances", description = "The caller's own records"),
        (name = "admin", description = "Admin-only listings"),
    )
)]
pub struct ApiDoc;

struct BearerToken;

impl Modify for BearerToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
