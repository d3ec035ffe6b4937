use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::controllers::{client_scope, ensure_in_scope};
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::invoice::{Invoice, InvoiceFilters, InvoiceStatus};
use crate::models::reservation::ReservationStatus;
use crate::models::role::{Action, Module};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::billing_service::invoice_amounts;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct InvoiceController {
    invoices: InvoiceRepository,
    reservations: ReservationRepository,
    clients: ClientRepository,
    tax_rate: Decimal,
    default_due_days: i64,
}

impl InvoiceController {
    pub fn new(pool: MySqlPool, config: &EnvironmentConfig) -> Self {
        Self {
            invoices: InvoiceRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
            tax_rate: config.tax_rate,
            default_due_days: config.invoice_due_days,
        }
    }

    pub async fn list(&self, auth: &AuthenticatedUser, filters: InvoiceFilters) -> AppResult<Vec<Invoice>> {
        auth.require(Module::Facturacion, Action::View)?;

        self.refresh_overdue().await?;
        let scope = client_scope(&self.clients, auth).await?;
        self.invoices.list(&filters, scope).await
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<Invoice> {
        auth.require(Module::Facturacion, Action::View)?;

        self.refresh_overdue().await?;
        let invoice = self.find(id).await?;

        if let Some(client_id) = client_scope(&self.clients, auth).await? {
            let reservation = self.reservations.find_by_id(invoice.reservation_id).await?;
            let owner = reservation.map(|r| r.client_id).unwrap_or_default();
            ensure_in_scope(Some(client_id), owner, not_found_error("Factura", id))?;
        }

        Ok(invoice)
    }

    /// Factura una reserva confirmada o completada
    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateInvoiceRequest,
    ) -> AppResult<ApiResponse<Invoice>> {
        auth.require(Module::Facturacion, Action::Create)?;
        request.validate()?;

        let reservation = self
            .reservations
            .find_by_id(request.reservation_id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", request.reservation_id))?;

        if !matches!(
            reservation.status,
            ReservationStatus::Confirmed | ReservationStatus::Completed
        ) {
            return Err(AppError::Conflict(format!(
                "La reserva {} está {} y no se puede facturar",
                reservation.id, reservation.status
            )));
        }

        if let Some(existing) = self.invoices.find_open_for_reservation(reservation.id).await? {
            return Err(AppError::Conflict(format!(
                "La reserva {} ya tiene la factura {}",
                reservation.id,
                existing.invoice_number.unwrap_or_else(|| existing.id.to_string())
            )));
        }

        let amounts = invoice_amounts(reservation.total_amount, self.tax_rate);
        let issue_date = Utc::now().date_naive();
        let due_date = issue_date + Duration::days(request.due_days.unwrap_or(self.default_due_days));

        let invoice = self
            .invoices
            .create(reservation.id, amounts, issue_date, due_date)
            .await?;

        info!(
            "💰 Factura {} emitida: {} + {} = {}",
            invoice.invoice_number.as_deref().unwrap_or("-"),
            invoice.amount,
            invoice.tax,
            invoice.total
        );
        Ok(ApiResponse::success_with_message(invoice, "Factura creada exitosamente"))
    }

    pub async fn update_status(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateInvoiceStatusRequest,
    ) -> AppResult<ApiResponse<Invoice>> {
        auth.require(Module::Facturacion, Action::Edit)?;

        let invoice = self.find(id).await?;
        if invoice.status.is_final() {
            return Err(AppError::Conflict(format!(
                "La factura {} está {} y ya no puede cambiar",
                id, invoice.status
            )));
        }

        let paid_at = match request.status {
            InvoiceStatus::Paid => Some(Utc::now()),
            _ => None,
        };
        let updated = self.invoices.update_status(id, request.status, paid_at).await?;

        info!("💰 Factura {}: {} → {}", id, invoice.status, updated.status);
        Ok(ApiResponse::success_with_message(updated, "Estado actualizado exitosamente"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Facturacion, Action::Delete)?;

        self.find(id).await?;
        self.invoices.delete(id).await?;
        info!("🗑️ Factura {} eliminada por {}", id, auth.email);
        Ok(())
    }

    async fn refresh_overdue(&self) -> AppResult<()> {
        let marked = self.invoices.mark_overdue(Utc::now().date_naive()).await?;
        if marked > 0 {
            info!("⏰ {} facturas marcadas como vencidas", marked);
        }
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<Invoice> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Factura", id))
    }
}
