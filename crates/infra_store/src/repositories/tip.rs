//! Tip repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, TipId};
use domain_tips::{Tip, TipPort, TipQuery};

/// In-memory store of advisory tips
#[derive(Debug, Clone, Default)]
pub struct InMemoryTipRepository {
    tips: Arc<RwLock<HashMap<TipId, Tip>>>,
}

impl InMemoryTipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryTipRepository {}

#[async_trait]
impl HealthCheckable for InMemoryTipRepository {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "in-memory-tips".to_string(),
            status: AdapterHealth::Healthy,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TipPort for InMemoryTipRepository {
    async fn get(&self, id: TipId) -> Result<Tip, PortError> {
        self.tips
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Tip", id))
    }

    async fn list(&self, query: TipQuery) -> Result<Vec<Tip>, PortError> {
        let tips = self.tips.read().await;
        let mut results: Vec<Tip> = tips.values().filter(|t| query.matches(t)).cloned().collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = query.offset.unwrap_or(0) as usize;
        let results = results.into_iter().skip(offset);
        Ok(match query.limit {
            Some(limit) => results.take(limit as usize).collect(),
            None => results.collect(),
        })
    }

    async fn create(&self, tip: Tip) -> Result<Tip, PortError> {
        let mut tips = self.tips.write().await;
        if tips.contains_key(&tip.id) {
            return Err(PortError::conflict(format!("tip {} already exists", tip.id)));
        }
        tips.insert(tip.id, tip.clone());
        Ok(tip)
    }

    async fn update(&self, tip: Tip) -> Result<Tip, PortError> {
        let mut tips = self.tips.write().await;
        if !tips.contains_key(&tip.id) {
            return Err(PortError::not_found("Tip", tip.id));
        }
        tips.insert(tip.id, tip.clone());
        Ok(tip)
    }

    async fn delete(&self, id: TipId) -> Result<(), PortError> {
        self.tips
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Tip", id))
    }
}
