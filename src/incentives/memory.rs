//! In-memory repository implementations.
//!
//! These back the served binary and the test suites alike. Each store is a
//! mutex-guarded map behind an `Arc`, so clones share state across handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::incentives::domain::{Technician, TechnicianId, WeekKey};
use crate::incentives::gamification::{BadgeCode, BadgeSpec};
use crate::incentives::repository::{
    BadgeGrant, BadgeRepository, PerformanceRepository, RepositoryError, TechnicianRepository,
    WeeklyPerformance,
};

/// Technician roster held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryTechnicianRepository {
    records: Arc<Mutex<HashMap<TechnicianId, Technician>>>,
}

impl TechnicianRepository for InMemoryTechnicianRepository {
    fn insert(&self, technician: Technician) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("technician store mutex poisoned");
        if guard.contains_key(&technician.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(technician.id.clone(), technician);
        Ok(())
    }

    fn fetch(&self, id: &TechnicianId) -> Result<Option<Technician>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("technician store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn roster(&self) -> Result<Vec<Technician>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("technician store mutex poisoned");
        let mut technicians: Vec<Technician> = guard
            .values()
            .filter(|technician| technician.is_active)
            .cloned()
            .collect();
        technicians.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(technicians)
    }

    fn set_streak(&self, id: &TechnicianId, streak: u32) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("technician store mutex poisoned");
        let technician = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        technician.current_streak = streak;
        Ok(())
    }
}

/// Weekly performance records held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryPerformanceRepository {
    records: Arc<Mutex<HashMap<(TechnicianId, WeekKey), WeeklyPerformance>>>,
}

impl PerformanceRepository for InMemoryPerformanceRepository {
    fn upsert(&self, record: WeeklyPerformance) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("performance store mutex poisoned");
        guard.insert((record.technician_id.clone(), record.week), record);
        Ok(())
    }

    fn fetch(
        &self,
        id: &TechnicianId,
        week: WeekKey,
    ) -> Result<Option<WeeklyPerformance>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("performance store mutex poisoned");
        Ok(guard.get(&(id.clone(), week)).cloned())
    }

    fn history(&self, id: &TechnicianId) -> Result<Vec<WeeklyPerformance>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("performance store mutex poisoned");
        let mut records: Vec<WeeklyPerformance> = guard
            .values()
            .filter(|record| record.technician_id == *id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.week);
        Ok(records)
    }
}

/// Badge catalog and grants held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryBadgeRepository {
    catalog: Arc<Mutex<HashMap<BadgeCode, BadgeSpec>>>,
    grants: Arc<Mutex<Vec<BadgeGrant>>>,
}

impl BadgeRepository for InMemoryBadgeRepository {
    fn seed(&self, specs: &[BadgeSpec]) -> Result<(), RepositoryError> {
        let mut guard = self.catalog.lock().expect("badge catalog mutex poisoned");
        for spec in specs {
            guard.entry(spec.code).or_insert_with(|| spec.clone());
        }
        Ok(())
    }

    fn find(&self, code: BadgeCode) -> Result<Option<BadgeSpec>, RepositoryError> {
        let guard = self.catalog.lock().expect("badge catalog mutex poisoned");
        Ok(guard.get(&code).cloned())
    }

    fn grant(&self, grant: BadgeGrant) -> Result<bool, RepositoryError> {
        let mut guard = self.grants.lock().expect("badge grant mutex poisoned");
        let held = guard.iter().any(|existing| {
            existing.technician_id == grant.technician_id && existing.badge == grant.badge
        });
        if held {
            return Ok(false);
        }
        guard.push(grant);
        Ok(true)
    }

    fn granted(&self, id: &TechnicianId) -> Result<Vec<BadgeGrant>, RepositoryError> {
        let guard = self.grants.lock().expect("badge grant mutex poisoned");
        Ok(guard
            .iter()
            .filter(|grant| grant.technician_id == *id)
            .cloned()
            .collect())
    }
}
