use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use sqlx::MySqlPool;

use crate::error::StoreResult;
use crate::model::employee::{EmployeeNameRow, EmployeeSnapshot};

/// Read-only view of the employee directory.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<EmployeeSnapshot>>;
}

#[derive(Clone)]
pub struct MySqlEmployeeDirectory {
    pool: MySqlPool,
}

impl MySqlEmployeeDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlEmployeeDirectory {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<EmployeeSnapshot>> {
        let row = sqlx::query_as::<_, EmployeeNameRow>(
            r#"
            SELECT first_name, last_name, email
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EmployeeSnapshot::from))
    }
}

/// Keeps recently seen employees in memory in front of another directory.
///
/// Only hits are cached, so a newly created employee is visible right away.
/// A rename or email change reaches new attendance snapshots only after the
/// entry's TTL runs out; keep the TTL short where snapshots must be current.
pub struct CachedDirectory {
    inner: Arc<dyn EmployeeDirectory>,
    cache: Cache<u64, EmployeeSnapshot>,
}

impl CachedDirectory {
    pub fn new(inner: Arc<dyn EmployeeDirectory>, capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for CachedDirectory {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<EmployeeSnapshot>> {
        if let Some(hit) = self.cache.get(&employee_id).await {
            return Ok(Some(hit));
        }

        let found = self.inner.find_by_id(employee_id).await?;
        if let Some(employee) = &found {
            self.cache.insert(employee_id, employee.clone()).await;
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryDirectory;

    #[actix_web::test]
    async fn cached_directory_serves_repeat_lookups_from_cache() {
        let inner = Arc::new(InMemoryDirectory::new().with(1, "John Doe", "john@company.com"));
        let cached = CachedDirectory::new(inner.clone(), 16, Duration::from_secs(60));

        let first = cached.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(first.name, "John Doe");

        inner.rename(1, "Johnny Doe");
        let second = cached.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(second.name, "John Doe");
    }

    #[actix_web::test]
    async fn renamed_employee_shows_after_ttl() {
        let inner = Arc::new(InMemoryDirectory::new().with(1, "John Doe", "john@company.com"));
        let cached = CachedDirectory::new(inner.clone(), 16, Duration::from_millis(50));

        cached.find_by_id(1).await.unwrap();
        inner.rename(1, "Johnny Doe");
        actix_web::rt::time::sleep(Duration::from_millis(120)).await;

        let fresh = cached.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(fresh.name, "Johnny Doe");
    }

    #[actix_web::test]
    async fn cached_directory_does_not_remember_misses() {
        let inner = Arc::new(InMemoryDirectory::new());
        let cached = CachedDirectory::new(inner.clone(), 16, Duration::from_secs(60));

        assert!(cached.find_by_id(9).await.unwrap().is_none());

        inner.add(9, "Asha Rao", "asha@company.com");
        let hired = cached.find_by_id(9).await.unwrap().unwrap();
        assert_eq!(hired.email, "asha@company.com");
    }
}
