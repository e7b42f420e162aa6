//! Servicio de personal
//!
//! CRUD sobre la colección `staff` más una búsqueda de texto libre.

use std::sync::Arc;

use futures::TryStreamExt;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::database::{DocumentStore, FieldFilter, StoreError};
use crate::models::record;
use crate::models::staff::{
    StaffCreate, StaffFilters, StaffMember, StaffUpdate, COLLECTION_NAME, FIELD_MAPPING,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct StaffService {
    store: Arc<dyn DocumentStore>,
}

impl StaffService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: StaffCreate) -> AppResult<StaffMember> {
        let mut member = StaffMember::new(input)?;
        member.id = self.store.put(COLLECTION_NAME, member.to_record()).await?;

        info!("👤 Miembro del personal creado: {} ({})", member.name, member.id);
        Ok(member)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> AppResult<Option<StaffMember>> {
        let data = self.store.get(COLLECTION_NAME, id).await?;
        Ok(data.map(|data| StaffMember::from_record(&data, id)))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filters: StaffFilters) -> AppResult<Vec<StaffMember>> {
        let conditions: Vec<FieldFilter> = filters
            .status
            .map(|status| FieldFilter::eq("status", status))
            .into_iter()
            .collect();

        let members: Vec<StaffMember> = self
            .store
            .stream(COLLECTION_NAME, conditions, filters.limit)
            .map_ok(|doc| StaffMember::from_record(&doc.data, &doc.id))
            .try_collect()
            .await?;

        debug!("📋 {} miembros del personal listados", members.len());
        Ok(members)
    }

    /// Búsqueda por subcadena en nombre, email, ciudad y teléfono.
    /// Recorre la colección completa: O(n) por llamada, sin índice.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> AppResult<Vec<StaffMember>> {
        let query_lower = query.to_lowercase();

        let matches: Vec<StaffMember> = self
            .store
            .stream(COLLECTION_NAME, Vec::new(), None)
            .map_ok(|doc| StaffMember::from_record(&doc.data, &doc.id))
            .try_filter(|member| futures::future::ready(member.matches_query(query, &query_lower)))
            .try_collect()
            .await?;

        debug!("🔎 Búsqueda '{}': {} resultados", query, matches.len());
        Ok(matches)
    }

    /// Actualización parcial; ver `VehicleService::update` para la secuencia de llamadas
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: StaffUpdate) -> AppResult<Option<StaffMember>> {
        patch.validate()?;

        if self.store.get(COLLECTION_NAME, id).await?.is_none() {
            debug!("🔍 Miembro {} no existe, nada que actualizar", id);
            return Ok(None);
        }

        let fields = record::to_store_fields(FIELD_MAPPING, patch.into_fields());
        if !fields.is_empty() {
            match self.store.update(COLLECTION_NAME, id, fields).await {
                Ok(()) => {}
                Err(StoreError::NotFound { .. }) => {
                    warn!("⚠️ Miembro {} eliminado durante la actualización", id);
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let updated = self.get(id).await?;
        match &updated {
            Some(_) => info!("✏️ Miembro del personal actualizado: {}", id),
            None => warn!("⚠️ Miembro {} desapareció tras la actualización", id),
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let deleted = self.store.delete(COLLECTION_NAME, id).await?;
        if deleted {
            info!("🗑️ Miembro del personal eliminado: {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDocumentStore;
    use crate::models::staff::StaffStatus;
    use crate::services::test_support::{Vanish, VanishingStore};
    use rust_decimal::Decimal;

    fn setup() -> (StaffService, InMemoryDocumentStore) {
        let store = InMemoryDocumentStore::new();
        (StaffService::new(Arc::new(store.clone())), store)
    }

    fn member(name: &str, email: &str, city: &str, status: StaffStatus) -> StaffCreate {
        StaffCreate {
            name: name.to_string(),
            inn: "500100732259".to_string(),
            phone: "+82 10-5555-0101".to_string(),
            email: email.to_string(),
            city: city.to_string(),
            status,
            registered_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, _) = setup();
        let created = service
            .create(member("Olga Petrova", "olga@dealer.kr", "Seoul", StaffStatus::New))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(service.get(&created.id).await.unwrap(), Some(created));
        assert_eq!(service.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_by_status_and_limit() {
        let (service, _) = setup();
        service.create(member("A", "a@x.com", "Seoul", StaffStatus::Active)).await.unwrap();
        service.create(member("B", "b@x.com", "Seoul", StaffStatus::Active)).await.unwrap();
        service.create(member("C", "c@x.com", "Seoul", StaffStatus::Inactive)).await.unwrap();

        let active = service
            .list(StaffFilters::by_status(StaffStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let limited = service.list(StaffFilters { status: None, limit: Some(1) }).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_any_field_case_insensitively() {
        let (service, _) = setup();
        service.create(member("John Smith", "smith@mail.com", "Incheon", StaffStatus::Active)).await.unwrap();
        service.create(member("Kim Min-jun", "info@JOHNS.com", "Daegu", StaffStatus::Active)).await.unwrap();
        service.create(member("Park Ji-woo", "park@mail.com", "Busan", StaffStatus::Active)).await.unwrap();

        let mut names: Vec<String> = service
            .search("john")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["John Smith", "Kim Min-jun"]);

        assert_eq!(service.search("BUSAN").await.unwrap().len(), 1);
        assert_eq!(service.search("5555-0101").await.unwrap().len(), 3);
        assert!(service.search("vladivostok").await.unwrap().is_empty());
        assert_eq!(service.search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_counters_with_zero_values() {
        let (service, store) = setup();
        let created = service
            .create(member("Olga Petrova", "olga@dealer.kr", "Seoul", StaffStatus::Active))
            .await
            .unwrap();

        let patch = StaffUpdate {
            total_orders: Some(7),
            total_spent: Some(Decimal::new(125_050, 2)),
            ..Default::default()
        };
        let updated = service.update(&created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.total_orders, 7);
        assert_eq!(updated.total_spent, Decimal::new(125_050, 2));
        assert_eq!(updated.name, created.name);

        let reset = StaffUpdate { total_orders: Some(0), ..Default::default() };
        let updated = service.update(&created.id, reset).await.unwrap().unwrap();
        assert_eq!(updated.total_orders, 0);

        let raw = store.get(COLLECTION_NAME, &created.id).await.unwrap().unwrap();
        assert_eq!(raw["totalOrders"], serde_json::json!(0));
    }

    #[tokio::test]
    async fn test_update_missing_member_returns_none() {
        let (service, store) = setup();
        let patch = StaffUpdate { city: Some("Ulsan".to_string()), ..Default::default() };

        assert_eq!(service.update("missing", patch).await.unwrap(), None);
        assert_eq!(store.count(COLLECTION_NAME).await, 0);
    }

    #[tokio::test]
    async fn test_update_member_deleted_concurrently() {
        for vanish in [Vanish::BeforeWrite, Vanish::AfterWrite] {
            let service = StaffService::new(Arc::new(VanishingStore::new(vanish)));
            let created = service
                .create(member("Olga Petrova", "olga@dealer.kr", "Seoul", StaffStatus::Active))
                .await
                .unwrap();

            let patch = StaffUpdate { city: Some("Ulsan".to_string()), ..Default::default() };
            let result = service.update(&created.id, patch).await.unwrap();
            assert_eq!(result, None, "{:?}", vanish);
        }
    }

    #[tokio::test]
    async fn test_delete_once() {
        let (service, _) = setup();
        let created = service
            .create(member("Olga Petrova", "olga@dealer.kr", "Seoul", StaffStatus::Active))
            .await
            .unwrap();

        assert!(service.delete(&created.id).await.unwrap());
        assert!(!service.delete(&created.id).await.unwrap());
    }
}
