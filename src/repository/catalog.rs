//! Offices, halls, categories, session masters and entities

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::AppResult,
    models::hall::{
        CategoryChoice, CreateHall, CreateOffice, CreateSessionMaster, Entity, Hall, Office,
        SessionMaster, UpdateHall, UpdateOffice, UpdateSessionMaster,
    },
};

/// Reference data and its admin masters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    // ---- Offices ----
    async fn list_offices(&self) -> AppResult<Vec<Office>>;
    async fn create_office(&self, data: &CreateOffice) -> AppResult<Office>;
    async fn update_office(&self, id: i64, data: &UpdateOffice) -> AppResult<Office>;
    async fn delete_office(&self, id: i64) -> AppResult<()>;
    /// Unfrozen halls of one office
    async fn office_halls(&self, office_id: i64) -> AppResult<Vec<Hall>>;

    // ---- Halls ----
    async fn list_halls(&self) -> AppResult<Vec<Hall>>;
    async fn get_hall(&self, id: i64) -> AppResult<Hall>;
    async fn create_hall(&self, data: &CreateHall) -> AppResult<Hall>;
    async fn update_hall(&self, id: i64, data: &UpdateHall) -> AppResult<Hall>;
    async fn hall_categories(&self) -> AppResult<Vec<CategoryChoice>>;

    // ---- Session masters ----
    async fn list_sessions(&self) -> AppResult<Vec<SessionMaster>>;
    async fn create_session(&self, data: &CreateSessionMaster) -> AppResult<SessionMaster>;
    async fn update_session(&self, id: i64, data: &UpdateSessionMaster) -> AppResult<SessionMaster>;
    async fn delete_session(&self, id: i64) -> AppResult<()>;

    async fn list_entities(&self) -> AppResult<Vec<Entity>>;
}

#[async_trait]
impl CatalogBackend for Repository {
    async fn list_offices(&self) -> AppResult<Vec<Office>> {
        self.get("/offices/").await
    }

    async fn create_office(&self, data: &CreateOffice) -> AppResult<Office> {
        self.post("/offices/", data).await
    }

    async fn update_office(&self, id: i64, data: &UpdateOffice) -> AppResult<Office> {
        self.patch(&format!("/offices/{}/", id), data).await
    }

    async fn delete_office(&self, id: i64) -> AppResult<()> {
        self.delete(&format!("/offices/{}/", id)).await
    }

    async fn office_halls(&self, office_id: i64) -> AppResult<Vec<Hall>> {
        self.get(&format!("/offices/{}/halls/", office_id)).await
    }

    async fn list_halls(&self) -> AppResult<Vec<Hall>> {
        self.get("/halls/").await
    }

    async fn get_hall(&self, id: i64) -> AppResult<Hall> {
        self.get(&format!("/halls/{}/", id)).await
    }

    async fn create_hall(&self, data: &CreateHall) -> AppResult<Hall> {
        self.post("/halls/", data).await
    }

    async fn update_hall(&self, id: i64, data: &UpdateHall) -> AppResult<Hall> {
        self.patch(&format!("/halls/{}/", id), data).await
    }

    async fn hall_categories(&self) -> AppResult<Vec<CategoryChoice>> {
        self.get("/hall-categories/").await
    }

    async fn list_sessions(&self) -> AppResult<Vec<SessionMaster>> {
        self.get("/sessions/").await
    }

    async fn create_session(&self, data: &CreateSessionMaster) -> AppResult<SessionMaster> {
        self.post("/sessions/", data).await
    }

    async fn update_session(&self, id: i64, data: &UpdateSessionMaster) -> AppResult<SessionMaster> {
        self.patch(&format!("/sessions/{}/", id), data).await
    }

    async fn delete_session(&self, id: i64) -> AppResult<()> {
        self.delete(&format!("/sessions/{}/", id)).await
    }

    async fn list_entities(&self) -> AppResult<Vec<Entity>> {
        self.get("/entities/").await
    }
}
