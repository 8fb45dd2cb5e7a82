use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BatteryPassport, PassportData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("battery passport not found")]
    NotFound,

    #[error("a passport with this battery identifier already exists")]
    DuplicateIdentifier,
}

#[derive(Debug, Default, Clone)]
pub struct PassportFilter {
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Boundary to the passport document database.
///
/// Soft-deleted passports behave as absent for reads and updates. The
/// battery identifier is unique among active passports.
#[async_trait]
pub trait PassportStore: Send + Sync {
    async fn insert(&self, passport: BatteryPassport) -> Result<BatteryPassport, StoreError>;
    async fn get(&self, id: Uuid) -> Result<BatteryPassport, StoreError>;
    async fn update(
        &self,
        id: Uuid,
        data: PassportData,
        updated_by: Uuid,
    ) -> Result<BatteryPassport, StoreError>;
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> Result<BatteryPassport, StoreError>;
    /// Returns the page of matching active passports plus the total match
    /// count, newest first.
    async fn list(&self, filter: PassportFilter, page: Page) -> (Vec<BatteryPassport>, usize);
}

/// In-memory store used in development and tests.
#[derive(Default)]
pub struct MemoryPassportStore {
    passports: DashMap<Uuid, BatteryPassport>,
}

impl MemoryPassportStore {
    fn identifier_taken(&self, identifier: &str, exclude: Option<Uuid>) -> bool {
        self.passports.iter().any(|entry| {
            entry.is_active
                && entry.battery_identifier() == identifier
                && Some(entry.id) != exclude
        })
    }
}

#[async_trait]
impl PassportStore for MemoryPassportStore {
    async fn insert(&self, passport: BatteryPassport) -> Result<BatteryPassport, StoreError> {
        if self.identifier_taken(passport.battery_identifier(), None) {
            return Err(StoreError::DuplicateIdentifier);
        }
        self.passports.insert(passport.id, passport.clone());
        Ok(passport)
    }

    async fn get(&self, id: Uuid) -> Result<BatteryPassport, StoreError> {
        self.passports
            .get(&id)
            .filter(|p| p.is_active)
            .map(|p| p.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: Uuid,
        data: PassportData,
        updated_by: Uuid,
    ) -> Result<BatteryPassport, StoreError> {
        let identifier = data.general_information.battery_identifier.clone();
        if self.identifier_taken(&identifier, Some(id)) {
            return Err(StoreError::DuplicateIdentifier);
        }

        let mut entry = self.passports.get_mut(&id).ok_or(StoreError::NotFound)?;
        if !entry.is_active {
            return Err(StoreError::NotFound);
        }

        entry.data = data;
        entry.updated_by = Some(updated_by);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn soft_delete(
        &self,
        id: Uuid,
        deleted_by: Uuid,
    ) -> Result<BatteryPassport, StoreError> {
        let mut entry = self.passports.get_mut(&id).ok_or(StoreError::NotFound)?;
        if !entry.is_active {
            return Err(StoreError::NotFound);
        }

        entry.is_active = false;
        entry.updated_by = Some(deleted_by);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn list(&self, filter: PassportFilter, page: Page) -> (Vec<BatteryPassport>, usize) {
        let mut matches: Vec<BatteryPassport> = self
            .passports
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| match &filter.category {
                Some(category) => {
                    p.data.general_information.battery_category.as_deref() == Some(category)
                }
                None => true,
            })
            .filter(|p| match &filter.status {
                Some(status) => {
                    p.data.general_information.battery_status.as_deref() == Some(status)
                }
                None => true,
            })
            .map(|p| p.clone())
            .collect();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len();
        let limit = page.limit.max(1);
        let skip = page.page.saturating_sub(1) * limit;
        let items = matches.into_iter().skip(skip).take(limit).collect();

        (items, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneralInformation;

    fn passport(identifier: &str, category: Option<&str>) -> BatteryPassport {
        BatteryPassport::new(
            PassportData {
                general_information: GeneralInformation {
                    battery_identifier: identifier.to_string(),
                    battery_category: category.map(String::from),
                    battery_status: Some("original".to_string()),
                    manufacturer: None,
                },
                sections: Default::default(),
            },
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn duplicate_identifier_is_rejected() {
        let store = MemoryPassportStore::default();
        store.insert(passport("BATT-001", None)).await.unwrap();

        let err = store.insert(passport("BATT-001", None)).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateIdentifier);
    }

    #[tokio::test]
    async fn soft_deleted_passport_reads_as_absent() {
        let store = MemoryPassportStore::default();
        let created = store.insert(passport("BATT-001", None)).await.unwrap();

        store.soft_delete(created.id, Uuid::new_v4()).await.unwrap();

        assert_eq!(store.get(created.id).await.unwrap_err(), StoreError::NotFound);
        // Second delete behaves like a missing record.
        assert_eq!(
            store
                .soft_delete(created.id, Uuid::new_v4())
                .await
                .unwrap_err(),
            StoreError::NotFound
        );
        // The identifier is free for reuse once the passport is gone.
        store.insert(passport("BATT-001", None)).await.unwrap();
    }

    #[tokio::test]
    async fn update_rejects_identifier_collision_with_other_passport() {
        let store = MemoryPassportStore::default();
        store.insert(passport("BATT-001", None)).await.unwrap();
        let other = store.insert(passport("BATT-002", None)).await.unwrap();

        let err = store
            .update(other.id, passport("BATT-001", None).data, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateIdentifier);

        // Re-submitting the passport's own identifier is fine.
        store
            .update(other.id, passport("BATT-002", None).data, Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let store = MemoryPassportStore::default();
        for i in 0..15 {
            store
                .insert(passport(&format!("BATT-{i:03}"), Some("EV")))
                .await
                .unwrap();
        }
        store
            .insert(passport("BATT-LMT", Some("LMT")))
            .await
            .unwrap();

        let (items, total) = store
            .list(
                PassportFilter {
                    category: Some("EV".to_string()),
                    status: None,
                },
                Page { page: 2, limit: 10 },
            )
            .await;

        assert_eq!(total, 15);
        assert_eq!(items.len(), 5);
    }
}
