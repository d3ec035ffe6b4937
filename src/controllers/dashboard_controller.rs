use sqlx::MySqlPool;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::dashboard::DashboardStats;
use crate::models::reservation::ReservationDetail;
use crate::models::role::{Action, Module};
use crate::repositories::dashboard_repository::DashboardRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::utils::errors::AppResult;

const RECENT_RESERVATIONS: i64 = 5;

pub struct DashboardController {
    dashboard: DashboardRepository,
    reservations: ReservationRepository,
}

impl DashboardController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            dashboard: DashboardRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }

    pub async fn stats(&self, auth: &AuthenticatedUser) -> AppResult<DashboardStats> {
        auth.require(Module::Dashboard, Action::View)?;

        self.dashboard.stats().await
    }

    pub async fn recent_reservations(&self, auth: &AuthenticatedUser) -> AppResult<Vec<ReservationDetail>> {
        auth.require(Module::Dashboard, Action::View)?;

        self.reservations.recent(RECENT_RESERVATIONS).await
    }
}
