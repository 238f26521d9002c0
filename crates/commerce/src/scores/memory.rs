//! In-memory score store for tests and embedded use.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ScoreStore;
use crate::error::Result;

/// In-memory sorted sets: key -> member -> score.
///
/// Descending ranges break score ties by ascending member, so results are
/// deterministic under test.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    sets: Mutex<HashMap<String, HashMap<String, f64>>>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<()> {
        let mut sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *sets
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0) += delta;
        Ok(())
    }

    async fn members_by_score_desc(&self, key: &str) -> Result<Vec<String>> {
        let sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };

        let mut pairs: Vec<(&String, f64)> = set.iter().map(|(m, &s)| (m, s)).collect();
        pairs.sort_by(|(am, asc), (bm, bsc)| {
            bsc.partial_cmp(asc)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| am.cmp(bm))
        });

        Ok(pairs.into_iter().map(|(m, _)| m.clone()).collect())
    }

    async fn union_into(&self, dest: &str, keys: &[String]) -> Result<()> {
        let mut sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut union: HashMap<String, f64> = HashMap::new();
        for key in keys {
            if let Some(set) = sets.get(key) {
                for (member, score) in set {
                    *union.entry(member.clone()).or_insert(0.0) += score;
                }
            }
        }

        sets.insert(dest.to_string(), union);
        Ok(())
    }

    async fn remove_members(&self, key: &str, members: &[String]) -> Result<()> {
        let mut sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(set) = sets.get_mut(key) {
            for member in members {
                set.remove(member);
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut sets = self
            .sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sets.remove(key);
        Ok(())
    }
}
