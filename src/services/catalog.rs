//! Catalog service: offices, halls, session masters and entities

use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::HallCategory,
        hall::{
            CategoryChoice, CreateHall, CreateOffice, CreateSessionMaster, Entity, Hall, Office, SessionMaster,
            UpdateHall, UpdateOffice, UpdateSessionMaster,
        },
    },
    repository::CatalogBackend,
};

/// Keep the halls of one category, or all of them
pub fn filter_by_category(halls: Vec<Hall>, category: Option<HallCategory>) -> Vec<Hall> {
    match category {
        Some(category) => halls.into_iter().filter(|h| h.category == category).collect(),
        None => halls,
    }
}

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn CatalogBackend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    // ---- Offices ----

    pub async fn offices(&self) -> AppResult<Vec<Office>> {
        self.backend.list_offices().await
    }

    pub async fn create_office(&self, data: &CreateOffice) -> AppResult<Office> {
        data.validate()?;
        let office = self.backend.create_office(data).await?;
        tracing::info!("Office {} created", office.office_code);
        Ok(office)
    }

    pub async fn update_office(&self, id: i64, data: &UpdateOffice) -> AppResult<Office> {
        self.backend.update_office(id, data).await
    }

    pub async fn delete_office(&self, id: i64) -> AppResult<()> {
        self.backend.delete_office(id).await?;
        tracing::info!("Office {} deleted", id);
        Ok(())
    }

    // ---- Halls ----

    /// Halls of one office (frozen ones excluded by the backend), or every hall
    pub async fn halls(&self, office: Option<i64>) -> AppResult<Vec<Hall>> {
        match office {
            Some(id) => self.backend.office_halls(id).await,
            None => self.backend.list_halls().await,
        }
    }

    pub async fn hall(&self, id: i64) -> AppResult<Hall> {
        self.backend.get_hall(id).await
    }

    pub async fn categories(&self) -> AppResult<Vec<CategoryChoice>> {
        self.backend.hall_categories().await
    }

    pub async fn create_hall(&self, data: &CreateHall) -> AppResult<Hall> {
        data.validate()?;
        let hall = self.backend.create_hall(data).await?;
        tracing::info!("Hall {} created", hall.hall_code);
        Ok(hall)
    }

    pub async fn update_hall(&self, id: i64, data: &UpdateHall) -> AppResult<Hall> {
        self.backend.update_hall(id, data).await
    }

    /// Flip the freeze flag of a hall and return its new state
    pub async fn toggle_freeze(&self, id: i64) -> AppResult<Hall> {
        let hall = self.backend.get_hall(id).await?;
        let changes = UpdateHall {
            is_freeze: Some(!hall.is_freeze),
            ..Default::default()
        };
        let hall = self.backend.update_hall(id, &changes).await?;
        tracing::info!("Hall {} is_freeze={}", id, hall.is_freeze);
        Ok(hall)
    }

    // ---- Session masters ----

    pub async fn sessions(&self) -> AppResult<Vec<SessionMaster>> {
        self.backend.list_sessions().await
    }

    pub async fn create_session(&self, data: &CreateSessionMaster) -> AppResult<SessionMaster> {
        data.validate()?;
        self.backend.create_session(data).await
    }

    pub async fn update_session(&self, id: i64, data: &UpdateSessionMaster) -> AppResult<SessionMaster> {
        self.backend.update_session(id, data).await
    }

    pub async fn delete_session(&self, id: i64) -> AppResult<()> {
        self.backend.delete_session(id).await
    }

    /// Set or clear one of the three preferred halls of a session
    pub async fn set_preferred_hall(&self, session: i64, level: u8, hall: Option<i64>) -> AppResult<SessionMaster> {
        let mut changes = UpdateSessionMaster::default();
        match level {
            1 => changes.preferred_hall_1 = Some(hall),
            2 => changes.preferred_hall_2 = Some(hall),
            3 => changes.preferred_hall_3 = Some(hall),
            _ => {
                return Err(AppError::Validation(format!(
                    "Preference level must be 1, 2 or 3 (got {})",
                    level
                )))
            }
        }
        self.backend.update_session(session, &changes).await
    }

    // ---- Entities ----

    pub async fn entities(&self) -> AppResult<Vec<Entity>> {
        self.backend.list_entities().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::catalog::MockCatalogBackend;
    use serde_json::json;

    fn hall(id: i64, category: &str, frozen: bool) -> Hall {
        serde_json::from_value(json!({
            "id": id, "office": 1, "office_name": "Chennai", "hall_code": format!("H{}", id),
            "hall_name": format!("Hall {}", id), "about": null, "image": null,
            "capacity": 10, "category": category, "is_freeze": frozen
        }))
        .unwrap()
    }

    fn session() -> SessionMaster {
        SessionMaster {
            id: 4,
            session_code: "TRN".into(),
            session_type: "Training".into(),
            hall: None,
            preferred_hall_1: None,
            preferred_hall_2: Some(7),
            preferred_hall_3: None,
        }
    }

    #[test]
    fn test_filter_by_category() {
        let halls = vec![hall(1, "ROOM", false), hall(2, "HALL", false), hall(3, "ROOM", false)];
        let rooms = filter_by_category(halls.clone(), Some(HallCategory::Room));
        assert_eq!(rooms.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(filter_by_category(halls, None).len(), 3);
    }

    #[tokio::test]
    async fn test_halls_by_office_or_all() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_office_halls()
            .withf(|id| *id == 1)
            .returning(|_| Ok(vec![hall(1, "ROOM", false)]));
        backend
            .expect_list_halls()
            .returning(|| Ok(vec![hall(1, "ROOM", false), hall(2, "HALL", true)]));
        let service = CatalogService::new(Arc::new(backend));

        assert_eq!(service.halls(Some(1)).await.unwrap().len(), 1);
        assert_eq!(service.halls(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_freeze_flips_flag() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_get_hall().returning(|id| Ok(hall(id, "ROOM", false)));
        backend
            .expect_update_hall()
            .withf(|id, changes| *id == 5 && changes.is_freeze == Some(true) && changes.hall_name.is_none())
            .returning(|id, _| Ok(hall(id, "ROOM", true)));
        let service = CatalogService::new(Arc::new(backend));

        assert!(service.toggle_freeze(5).await.unwrap().is_freeze);
    }

    #[tokio::test]
    async fn test_set_preferred_hall_levels() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_update_session()
            .withf(|id, changes| {
                *id == 4
                    && changes.preferred_hall_2 == Some(None)
                    && changes.preferred_hall_1.is_none()
                    && changes.preferred_hall_3.is_none()
            })
            .returning(|_, _| Ok(session()));
        let service = CatalogService::new(Arc::new(backend));

        service.set_preferred_hall(4, 2, None).await.unwrap();
        assert!(matches!(
            service.set_preferred_hall(4, 4, Some(1)).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_office_validates_first() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_create_office().never();
        let service = CatalogService::new(Arc::new(backend));

        let err = service.create_office(&CreateOffice::default()).await.unwrap_err();
        assert_eq!(err.user_message(), "Office code is required, Office name is required");
    }
}
