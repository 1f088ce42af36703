//! ListAppointmentsHandler - role-scoped listing with optional pagination.
//!
//! Unpaginated calls return the full scoped result ordered by date
//! ascending; paginated calls return most-recent-first with a pagination
//! envelope. The page and the count are independent reads issued
//! concurrently and joined.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, Requester, TenantId, Timestamp};
use crate::domain::scheduling::{list_scope, Appointment};
use crate::ports::{AppointmentQuery, AppointmentRepository, Page};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query for the scoped listing.
#[derive(Debug, Clone)]
pub struct ListAppointmentsQuery {
    pub tenant_id: TenantId,
    pub date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub requester: Requester,
}

/// Pagination envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Listing result: the full ordered set, or one page with its envelope.
#[derive(Debug, Clone)]
pub enum ListAppointmentsResult {
    Full(Vec<Appointment>),
    Paginated {
        data: Vec<Appointment>,
        meta: PageMeta,
    },
}

/// Handler for the role-scoped appointment listing.
pub struct ListAppointmentsHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl ListAppointmentsHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    pub async fn handle(
        &self,
        query: ListAppointmentsQuery,
    ) -> Result<ListAppointmentsResult, DomainError> {
        // 1. Role determines the visible slice.
        let scope = list_scope(&query.requester)?;
        let repo_query = AppointmentQuery {
            scope,
            window: query.date.map(Timestamp::day_bounds),
        };

        // 2. Unpaginated: the whole scoped set, oldest first.
        if query.page.is_none() && query.limit.is_none() {
            let data = self
                .appointments
                .list_asc(query.tenant_id, &repo_query)
                .await?;
            return Ok(ListAppointmentsResult::Full(data));
        }

        // 3. Paginated: page and count fetched concurrently.
        let page = Page {
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        };
        let (data, total) = futures::try_join!(
            self.appointments
                .list_page_desc(query.tenant_id, &repo_query, page),
            self.appointments.count(query.tenant_id, &repo_query),
        )?;

        let total_pages = ((total + page.limit as u64 - 1) / page.limit as u64) as u32;
        Ok(ListAppointmentsResult::Paginated {
            data,
            meta: PageMeta {
                total,
                page: page.page,
                limit: page.limit,
                total_pages,
            },
        })
    }
}
