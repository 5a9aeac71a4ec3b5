// src/infrastructure/memory/properties.rs
use crate::application::ports::time::Clock;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::news::{
    PropertyItem, PropertyKey, PropertyMap, PropertyObjectType, PropertyStore, UserId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Embedded property store: one bag per key, guarded by a plain mutex.
pub struct InMemoryPropertyStore {
    clock: Arc<dyn Clock>,
    items: Mutex<HashMap<PropertyKey, PropertyItem>>,
}

impl InMemoryPropertyStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            items: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn create_item(
        &self,
        key: PropertyKey,
        properties: PropertyMap,
        creator: &UserId,
    ) -> DomainResult<PropertyItem> {
        let mut items = self.items.lock().expect("property store poisoned");
        if items.contains_key(&key) {
            return Err(DomainError::Conflict(format!(
                "property item already exists for {} {}",
                key.object_type.as_str(),
                key.object_id
            )));
        }
        let now = self.clock.now();
        let item = PropertyItem {
            key: key.clone(),
            properties,
            created_by: creator.clone(),
            created_at: now,
            updated_at: now,
        };
        items.insert(key, item.clone());
        Ok(item)
    }

    async fn get_item(&self, key: &PropertyKey) -> DomainResult<Option<PropertyItem>> {
        let items = self.items.lock().expect("property store poisoned");
        Ok(items.get(key).cloned())
    }

    async fn update_item(
        &self,
        key: &PropertyKey,
        properties: PropertyMap,
        _updater: &UserId,
    ) -> DomainResult<PropertyItem> {
        let mut items = self.items.lock().expect("property store poisoned");
        let item = items.get_mut(key).ok_or_else(|| {
            DomainError::NotFound(format!(
                "no property item for {} {}",
                key.object_type.as_str(),
                key.object_id
            ))
        })?;
        item.properties = properties;
        item.updated_at = self.clock.now();
        Ok(item.clone())
    }

    async fn delete_item(&self, key: &PropertyKey) -> DomainResult<()> {
        let mut items = self.items.lock().expect("property store poisoned");
        items.remove(key);
        Ok(())
    }

    async fn delete_items_for_object(
        &self,
        object_type: PropertyObjectType,
        object_id: &str,
    ) -> DomainResult<u64> {
        let mut items = self.items.lock().expect("property store poisoned");
        let before = items.len();
        items.retain(|key, _| {
            !(key.object_type == object_type && key.object_id == object_id)
        });
        Ok((before - items.len()) as u64)
    }

    async fn find_items_for_object(
        &self,
        object_type: PropertyObjectType,
        object_id: &str,
    ) -> DomainResult<Vec<PropertyItem>> {
        let items = self.items.lock().expect("property store poisoned");
        Ok(items
            .values()
            .filter(|item| {
                item.key.object_type == object_type && item.key.object_id == object_id
            })
            .cloned()
            .collect())
    }

    async fn find_items_for_parent(
        &self,
        object_type: PropertyObjectType,
        parent_id: &str,
    ) -> DomainResult<Vec<PropertyItem>> {
        let items = self.items.lock().expect("property store poisoned");
        Ok(items
            .values()
            .filter(|item| {
                item.key.object_type == object_type
                    && item.key.parent_id.as_deref() == Some(parent_id)
            })
            .cloned()
            .collect())
    }

    async fn find_items_by_property(
        &self,
        object_type: PropertyObjectType,
        name: &str,
        value: &str,
    ) -> DomainResult<Vec<PropertyItem>> {
        let items = self.items.lock().expect("property store poisoned");
        Ok(items
            .values()
            .filter(|item| {
                item.key.object_type == object_type
                    && item.properties.get(name).map(String::as_str) == Some(value)
            })
            .cloned()
            .collect())
    }

    async fn list_items(&self, object_type: PropertyObjectType) -> DomainResult<Vec<PropertyItem>> {
        let items = self.items.lock().expect("property store poisoned");
        Ok(items
            .values()
            .filter(|item| item.key.object_type == object_type)
            .cloned()
            .collect())
    }
}
