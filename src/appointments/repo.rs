use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::appointments::repo_types::{
    Appointment, AppointmentChanges, AppointmentFilter, SortOrder,
};

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, apt: &Appointment) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;
    async fn find_many(
        &self,
        filter: &AppointmentFilter,
        order: SortOrder,
    ) -> anyhow::Result<Vec<Appointment>>;
    /// Applies `changes` to a single record; `None` when the id is unknown.
    async fn update(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
    ) -> anyhow::Result<Option<Appointment>>;
}

#[derive(Clone)]
pub struct PgAppointmentStore {
    db: PgPool,
}

impl PgAppointmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, patient_name, start_time, end_time, service, status";

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn insert(&self, apt: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments (id, patient_id, patient_name, start_time, end_time, service, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(apt.id)
        .bind(apt.patient_id)
        .bind(&apt.patient_name)
        .bind(apt.start_time)
        .bind(apt.end_time)
        .bind(&apt.service)
        .bind(&apt.status)
        .execute(&self.db)
        .await
        .context("insert appointment")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let apt = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find appointment by id")?;
        Ok(apt)
    }

    async fn find_many(
        &self,
        filter: &AppointmentFilter,
        order: SortOrder,
    ) -> anyhow::Result<Vec<Appointment>> {
        let mut qb = select_query(filter, order);
        let rows = qb
            .build_query_as::<Appointment>()
            .fetch_all(&self.db)
            .await
            .context("list appointments")?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
    ) -> anyhow::Result<Option<Appointment>> {
        anyhow::ensure!(!changes.is_empty(), "no appointment fields to update");

        let mut qb = update_query(id, changes);
        let apt = qb
            .build_query_as::<Appointment>()
            .fetch_optional(&self.db)
            .await
            .context("update appointment")?;
        Ok(apt)
    }
}

/// `SELECT` with one bound predicate per present filter field.
fn select_query(filter: &AppointmentFilter, order: SortOrder) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE TRUE"
    ));
    if let Some(patient_id) = filter.patient_id {
        qb.push(" AND patient_id = ").push_bind(patient_id);
    }
    if let Some(from) = filter.starts_from {
        qb.push(" AND start_time >= ").push_bind(from);
    }
    if let Some(until) = filter.starts_until {
        qb.push(" AND start_time <= ").push_bind(until);
    }
    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.as_str().to_owned());
    }
    qb.push(match order {
        SortOrder::StartAscending => " ORDER BY start_time ASC",
        SortOrder::StartDescending => " ORDER BY start_time DESC",
    });
    qb
}

/// `UPDATE ... RETURNING` writing only the columns present in `changes`.
fn update_query(id: Uuid, changes: &AppointmentChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE appointments SET ");
    let mut set = qb.separated(", ");
    if let Some(t) = changes.start_time {
        set.push("start_time = ").push_bind_unseparated(t);
    }
    if let Some(t) = changes.end_time {
        set.push("end_time = ").push_bind_unseparated(t);
    }
    if let Some(service) = &changes.service {
        set.push("service = ").push_bind_unseparated(service.clone());
    }
    if let Some(status) = &changes.status {
        set.push("status = ").push_bind_unseparated(status.as_str().to_owned());
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(format!(" RETURNING {APPOINTMENT_COLUMNS}"));
    qb
}
