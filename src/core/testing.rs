//! In-memory `EntityStore` over shifts that records every call.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sea_orm::{Condition, DbErr, Order};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use super::store::EntityStore;
use crate::entities::shift::{self, Shift};

#[derive(Debug, Clone)]
pub enum Call {
    FindMany {
        condition: String,
        offset: u64,
        limit: u64,
        ordering: String,
    },
    Count {
        condition: String,
    },
    FindUnique(Uuid),
    Delete(Uuid),
}

pub struct RecordingStore {
    rows: Mutex<Vec<shift::Model>>,
    calls: Mutex<Vec<Call>>,
    failing_reads: bool,
    failing_lookups: HashSet<Uuid>,
    failing_deletes: HashSet<Uuid>,
}

pub fn shift_row(n: usize) -> shift::Model {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
        + Duration::minutes(i64::try_from(n).unwrap());
    shift::Model {
        id: Uuid::new_v4(),
        name: format!("Shift {n}"),
        clock_in: "08:00".to_string(),
        clock_out: "17:00".to_string(),
        is_active: true,
        created_at: created,
        updated_at: created,
    }
}

impl RecordingStore {
    pub fn new(rows: Vec<shift::Model>) -> Self {
        Self {
            rows: Mutex::new(rows),
            calls: Mutex::new(Vec::new()),
            failing_reads: false,
            failing_lookups: HashSet::new(),
            failing_deletes: HashSet::new(),
        }
    }

    pub fn with_shifts(count: usize) -> Self {
        Self::new((0..count).map(shift_row).collect())
    }

    pub fn failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    pub fn failing_lookup(mut self, id: Uuid) -> Self {
        self.failing_lookups.insert(id);
        self
    }

    pub fn failing_delete(mut self, id: Uuid) -> Self {
        self.failing_deletes.insert(id);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.rows.lock().unwrap().iter().map(|r| r.id).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EntityStore<Shift> for RecordingStore {
    async fn find_many(
        &self,
        condition: Condition,
        offset: u64,
        limit: u64,
        ordering: Vec<(shift::Column, Order)>,
    ) -> Result<Vec<shift::Model>, DbErr> {
        self.record(Call::FindMany {
            condition: format!("{condition:?}"),
            offset,
            limit,
            ordering: format!("{ordering:?}"),
        });
        if self.failing_reads {
            return Err(DbErr::Custom("connection reset".into()));
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .skip(usize::try_from(offset).unwrap())
            .take(usize::try_from(limit).unwrap())
            .cloned()
            .collect())
    }

    async fn count(&self, condition: Condition) -> Result<u64, DbErr> {
        self.record(Call::Count {
            condition: format!("{condition:?}"),
        });
        if self.failing_reads {
            return Err(DbErr::Custom("connection reset".into()));
        }
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<shift::Model>, DbErr> {
        self.record(Call::FindUnique(id));
        if self.failing_lookups.contains(&id) {
            return Err(DbErr::Custom("lookup failed".into()));
        }
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbErr> {
        self.record(Call::Delete(id));
        if self.failing_deletes.contains(&id) {
            return Err(DbErr::Custom("FOREIGN KEY constraint failed".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DbErr::RecordNotFound("Shift not found".into()));
        }
        Ok(())
    }
}
