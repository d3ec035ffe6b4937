//! Flujos de reservas, contratos y facturas contra MySQL.
//!
//! Cada prueba recibe una base de datos nueva con las migraciones aplicadas.
//! Requieren `DATABASE_URL` con permisos para crear bases:
//! `cargo test --test repository_tests -- --ignored`

use axum::http::StatusCode;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use car_rental_api::models::contract::ContractStatus;
use car_rental_api::models::invoice::{invoice_number, InvoiceStatus};
use car_rental_api::models::reservation::{Reservation, ReservationStatus};
use car_rental_api::models::vehicle::VehicleStatus;
use car_rental_api::repositories::contract_repository::ContractRepository;
use car_rental_api::repositories::invoice_repository::InvoiceRepository;
use car_rental_api::repositories::reservation_repository::{NewReservation, ReservationRepository, StatusChange};
use car_rental_api::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use car_rental_api::services::billing_service::invoice_amounts;
use car_rental_api::utils::errors::AppError;

const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgo=";

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn new_vehicle(plate: &str) -> NewVehicle {
    NewVehicle {
        brand: "Nissan".to_string(),
        model: "Versa".to_string(),
        year: 2024,
        plate: plate.to_string(),
        vehicle_type: "sedan".to_string(),
        daily_rate: Decimal::new(85_000, 2),
        features: vec!["A/C".to_string()],
    }
}

async fn insert_user(pool: &MySqlPool, email: &str) -> anyhow::Result<i64> {
    let result = sqlx::query("INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)")
        .bind("Gerente")
        .bind(email)
        .bind("$2b$12$hash")
        .bind("ADMIN")
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i64)
}

async fn insert_client(pool: &MySqlPool) -> anyhow::Result<i64> {
    let result = sqlx::query("INSERT INTO clients (name, email, phone, status) VALUES (?, ?, ?, ?)")
        .bind("Ana López")
        .bind("ana@example.com")
        .bind("+52 55 1234 5678")
        .bind("active")
        .execute(pool)
        .await?;
    Ok(result.last_insert_id() as i64)
}

async fn vehicle_status(pool: &MySqlPool, id: i64) -> anyhow::Result<VehicleStatus> {
    let vehicle = VehicleRepository::new(pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("vehículo {} no existe", id))?;
    Ok(vehicle.status)
}

fn booking(client_id: i64, vehicle_id: i64, start: NaiveDate, end: NaiveDate) -> NewReservation {
    NewReservation {
        client_id,
        vehicle_id,
        start_date: start,
        end_date: end,
        days: (end - start).num_days().max(1) as i32,
        daily_rate: Decimal::new(85_000, 2),
        total_amount: Decimal::new(85_000, 2) * Decimal::from((end - start).num_days().max(1)),
        notes: None,
    }
}

fn approval(approver: i64) -> StatusChange {
    StatusChange {
        from: ReservationStatus::Pending,
        to: ReservationStatus::Confirmed,
        approved_by: Some(approver),
        vehicle_status: Some(VehicleStatus::Reserved),
    }
}

/// Cliente, vehículo y una reserva pendiente del 1 al 4 de julio
async fn pending_reservation(pool: &MySqlPool) -> anyhow::Result<Reservation> {
    let client_id = insert_client(pool).await?;
    let vehicle = VehicleRepository::new(pool.clone()).create(new_vehicle("ABC-123")).await?;
    let reservation = ReservationRepository::new(pool.clone())
        .create(booking(client_id, vehicle.id, date(7, 1), date(7, 4)))
        .await?;
    Ok(reservation)
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_approval_stamps_approver_and_reserves_vehicle(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;

    let repo = ReservationRepository::new(pool.clone());
    let confirmed = repo.change_status(&reservation, approval(approver)).await?;

    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert_eq!(confirmed.approved_by, Some(approver));
    assert_eq!(vehicle_status(&pool, reservation.vehicle_id).await?, VehicleStatus::Reserved);

    // La segunda aprobación encuentra la reserva ya confirmada
    let err = repo.change_status(&reservation, approval(approver)).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_status_change_keeps_vehicle_in_maintenance(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;
    VehicleRepository::new(pool.clone())
        .update_status(reservation.vehicle_id, VehicleStatus::Maintenance)
        .await?;

    ReservationRepository::new(pool.clone())
        .change_status(&reservation, approval(approver))
        .await?;

    assert_eq!(vehicle_status(&pool, reservation.vehicle_id).await?, VehicleStatus::Maintenance);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_overlapping_reservation_is_rejected(pool: MySqlPool) -> anyhow::Result<()> {
    let reservation = pending_reservation(&pool).await?;
    let repo = ReservationRepository::new(pool.clone());

    let err = repo
        .create(booking(reservation.client_id, reservation.vehicle_id, date(7, 4), date(7, 6)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let later = repo
        .create(booking(reservation.client_id, reservation.vehicle_id, date(7, 5), date(7, 6)))
        .await?;
    assert_eq!(later.status, ReservationStatus::Pending);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_cancelling_reservation_terminates_contract(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;
    let reservations = ReservationRepository::new(pool.clone());
    let confirmed = reservations.change_status(&reservation, approval(approver)).await?;

    let contracts = ContractRepository::new(pool.clone());
    let draft = contracts
        .create(confirmed.id, vec!["Devolver con tanque lleno".to_string()])
        .await?;

    reservations
        .change_status(
            &confirmed,
            StatusChange {
                from: ReservationStatus::Confirmed,
                to: ReservationStatus::Cancelled,
                approved_by: None,
                vehicle_status: Some(VehicleStatus::Available),
            },
        )
        .await?;

    let voided = contracts.find_by_id(draft.id).await?.unwrap();
    assert_eq!(voided.status, ContractStatus::Terminated);
    assert_eq!(vehicle_status(&pool, reservation.vehicle_id).await?, VehicleStatus::Available);

    // El borrador ya no se puede firmar
    let err = contracts
        .sign(&draft, reservation.vehicle_id, SIGNATURE, None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert_eq!(vehicle_status(&pool, reservation.vehicle_id).await?, VehicleStatus::Available);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_sign_then_complete_contract(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;
    let confirmed = ReservationRepository::new(pool.clone())
        .change_status(&reservation, approval(approver))
        .await?;

    let contracts = ContractRepository::new(pool.clone());
    let draft = contracts.create(confirmed.id, vec!["Sin mascotas".to_string()]).await?;
    let signed = contracts
        .sign(&draft, confirmed.vehicle_id, SIGNATURE, Some(SIGNATURE))
        .await?;

    assert_eq!(signed.status, ContractStatus::Active);
    assert!(signed.signed_at.is_some());
    assert_eq!(vehicle_status(&pool, confirmed.vehicle_id).await?, VehicleStatus::Rented);

    let completed = contracts.complete(&signed, &confirmed).await?;
    assert_eq!(completed.status, ContractStatus::Completed);

    let reservation = ReservationRepository::new(pool.clone())
        .find_by_id(confirmed.id)
        .await?
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Completed);
    assert_eq!(vehicle_status(&pool, confirmed.vehicle_id).await?, VehicleStatus::Available);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_complete_rolls_back_when_reservation_is_not_confirmed(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;
    let confirmed = ReservationRepository::new(pool.clone())
        .change_status(&reservation, approval(approver))
        .await?;

    let contracts = ContractRepository::new(pool.clone());
    let draft = contracts.create(confirmed.id, vec!["Sin mascotas".to_string()]).await?;
    let signed = contracts.sign(&draft, confirmed.vehicle_id, SIGNATURE, None).await?;

    sqlx::query("UPDATE reservations SET status = 'cancelled' WHERE id = ?")
        .bind(confirmed.id)
        .execute(&pool)
        .await?;

    let err = contracts.complete(&signed, &confirmed).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);

    let contract = contracts.find_by_id(signed.id).await?.unwrap();
    assert_eq!(contract.status, ContractStatus::Active);
    assert_eq!(vehicle_status(&pool, confirmed.vehicle_id).await?, VehicleStatus::Rented);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_invoice_gets_sequential_number(pool: MySqlPool) -> anyhow::Result<()> {
    let reservation = pending_reservation(&pool).await?;
    let issue = date(7, 4);

    let invoice = InvoiceRepository::new(pool.clone())
        .create(
            reservation.id,
            invoice_amounts(reservation.total_amount, Decimal::new(16, 2)),
            issue,
            date(7, 19),
        )
        .await?;

    assert_eq!(invoice.invoice_number, Some(invoice_number(issue.year(), invoice.id)));
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.total, invoice.amount + invoice.tax);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_reservation_with_invoice_cannot_be_deleted(pool: MySqlPool) -> anyhow::Result<()> {
    let reservation = pending_reservation(&pool).await?;
    InvoiceRepository::new(pool.clone())
        .create(
            reservation.id,
            invoice_amounts(reservation.total_amount, Decimal::new(16, 2)),
            date(7, 4),
            date(7, 19),
        )
        .await?;

    let repo = ReservationRepository::new(pool.clone());
    let err = repo.delete(&reservation).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert!(repo.find_by_id(reservation.id).await?.is_some());
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_deleting_confirmed_reservation_releases_vehicle(pool: MySqlPool) -> anyhow::Result<()> {
    let approver = insert_user(&pool, "gerente@rentacar.mx").await?;
    let reservation = pending_reservation(&pool).await?;
    let repo = ReservationRepository::new(pool.clone());
    let confirmed = repo.change_status(&reservation, approval(approver)).await?;

    repo.delete(&confirmed).await?;

    assert!(repo.find_by_id(confirmed.id).await?.is_none());
    assert_eq!(vehicle_status(&pool, confirmed.vehicle_id).await?, VehicleStatus::Available);
    Ok(())
}

#[sqlx::test]
#[ignore = "requiere MySQL en DATABASE_URL"]
async fn test_duplicate_plate_is_conflict(pool: MySqlPool) -> anyhow::Result<()> {
    let repo = VehicleRepository::new(pool.clone());
    repo.create(new_vehicle("XYZ-987")).await?;

    let err = repo.create(new_vehicle("XYZ-987")).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    Ok(())
}
