//! Per-profile persistence of reconciled holdings, goals and policies.

use crate::store::KeyValueStore;
use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

/// Data-kind labels under which a profile's blobs are saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Holdings,
    Goals,
    Insurance,
}

impl DataKind {
    const ALL: [DataKind; 3] = [DataKind::Holdings, DataKind::Goals, DataKind::Insurance];

    pub fn label(&self) -> &'static str {
        match self {
            DataKind::Holdings => "holdings",
            DataKind::Goals => "goals",
            DataKind::Insurance => "insurance",
        }
    }
}

/// Saves and loads one JSON blob per (profile, data kind).
pub struct UserData {
    store: Arc<KeyValueStore>,
}

impl UserData {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save<T: Serialize>(&self, profile: &str, kind: DataKind, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store
            .collection(kind.label(), true)
            .put(profile.as_bytes(), &bytes, None)
            .await;
        debug!("Saved {} data for profile {}", kind.label(), profile);
        Ok(())
    }

    pub async fn load<T: DeserializeOwned>(
        &self,
        profile: &str,
        kind: DataKind,
    ) -> Result<Option<T>> {
        match self
            .store
            .collection(kind.label(), true)
            .get(profile.as_bytes())
            .await
        {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Removes every saved blob for the profile.
    pub async fn clear(&self, profile: &str) {
        for kind in DataKind::ALL {
            self.store
                .collection(kind.label(), true)
                .remove(profile.as_bytes())
                .await;
        }
        debug!("Cleared saved data for profile {}", profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::SchemePosition;
    use std::collections::HashMap;

    fn userdata() -> UserData {
        UserData::new(Arc::new(KeyValueStore::in_memory()))
    }

    #[tokio::test]
    async fn test_round_trip_holdings() {
        let userdata = userdata();
        let mut positions = HashMap::new();
        positions.insert(
            "Alpha Fund".to_string(),
            SchemePosition {
                scheme_name: "Alpha Fund".to_string(),
                isin: None,
                units: 120.0,
                last_price: 15.0,
            },
        );

        userdata
            .save("9999988888", DataKind::Holdings, &positions)
            .await
            .unwrap();

        let loaded: HashMap<String, SchemePosition> = userdata
            .load("9999988888", DataKind::Holdings)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, positions);
    }

    #[tokio::test]
    async fn test_profiles_are_isolated() {
        let userdata = userdata();
        userdata
            .save("alice", DataKind::Goals, &vec!["goal"])
            .await
            .unwrap();

        let other: Option<Vec<String>> = userdata.load("bob", DataKind::Goals).await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_every_kind() {
        let userdata = userdata();
        userdata
            .save("alice", DataKind::Holdings, &vec![1, 2, 3])
            .await
            .unwrap();
        userdata
            .save("alice", DataKind::Insurance, &vec![4])
            .await
            .unwrap();

        userdata.clear("alice").await;

        let holdings: Option<Vec<i32>> = userdata.load("alice", DataKind::Holdings).await.unwrap();
        let insurance: Option<Vec<i32>> =
            userdata.load("alice", DataKind::Insurance).await.unwrap();
        assert!(holdings.is_none());
        assert!(insurance.is_none());
    }
}
