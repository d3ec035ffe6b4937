use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{types::Json, MySql, MySqlPool, QueryBuilder};

use crate::models::reservation::ReservationStatus;
use crate::models::vehicle::{Vehicle, VehicleFilters, VehicleStatus};
use crate::utils::errors::AppError;

/// Datos para insertar un vehículo
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub vehicle_type: String,
    pub daily_rate: Decimal,
    pub features: Vec<String>,
}

pub struct VehicleRepository {
    pool: MySqlPool,
}

impl VehicleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vehicles (brand, model, year, plate, vehicle_type, daily_rate, status, features)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.plate)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.daily_rate)
        .bind(VehicleStatus::Available.as_str())
        .bind(Json(&vehicle.features))
        .execute(&self.pool)
        .await?;

        self.fetch(result.last_insert_id() as i64).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut query = QueryBuilder::<MySql>::new("SELECT * FROM vehicles WHERE 1 = 1");

        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(vehicle_type) = &filters.vehicle_type {
            query.push(" AND vehicle_type = ").push_bind(vehicle_type.clone());
        }
        if let Some(brand) = &filters.brand {
            query.push(" AND brand LIKE ").push_bind(format!("%{}%", brand));
        }
        query.push(" ORDER BY brand, model");

        let vehicles = query.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;
        Ok(vehicles)
    }

    /// Vehículos disponibles sin reservas activas que se traslapen con el rango
    pub async fn find_available(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.* FROM vehicles v
            WHERE v.status = ?
            AND NOT EXISTS (
                SELECT 1 FROM reservations r
                WHERE r.vehicle_id = v.id
                AND r.status IN (?, ?)
                AND r.start_date <= ?
                AND r.end_date >= ?
            )
            ORDER BY v.daily_rate
            "#,
        )
        .bind(VehicleStatus::Available.as_str())
        .bind(ReservationStatus::Pending.as_str())
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Persistir todos los campos editables
    pub async fn save(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET brand = ?, model = ?, year = ?, plate = ?, vehicle_type = ?,
                daily_rate = ?, status = ?, features = ?
            WHERE id = ?
            "#,
        )
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.plate)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.daily_rate)
        .bind(vehicle.status.as_str())
        .bind(&vehicle.features)
        .bind(vehicle.id)
        .execute(&self.pool)
        .await?;

        self.fetch(vehicle.id).await
    }

    pub async fn update_status(&self, id: i64, status: VehicleStatus) -> Result<Vehicle, AppError> {
        sqlx::query("UPDATE vehicles SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.fetch(id).await
    }

    pub async fn plate_exists(&self, plate: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE plate = ? AND id <> ?")
            .bind(plate)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Reservas pendientes o confirmadas que usan el vehículo
    pub async fn count_active_reservations(&self, id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE vehicle_id = ? AND status IN (?, ?)",
        )
        .bind(id)
        .bind(ReservationStatus::Pending.as_str())
        .bind(ReservationStatus::Confirmed.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, id: i64) -> Result<Vehicle, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Vehículo {} desapareció tras escribirlo", id)))
    }
}
