use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    services::{
        attendance::{AttendanceService, AttendanceServiceTrait},
        punch::PunchService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub attendance: Arc<dyn AttendanceServiceTrait>,
    pub punches: PunchService,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let attendance = Arc::new(AttendanceService::new(
            pool.clone(),
            config.batch_concurrency,
        ));
        Self::with_attendance(pool, config, attendance)
    }

    /// State with a custom attendance service, e.g. one backed by in-memory sources.
    pub fn with_attendance(
        pool: DbPool,
        config: Config,
        attendance: Arc<dyn AttendanceServiceTrait>,
    ) -> Self {
        let punches = PunchService::new(pool, config.time_zone);
        Self {
            config,
            attendance,
            punches,
        }
    }
}
