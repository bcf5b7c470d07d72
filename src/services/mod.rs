//! Services Layer
//!
//! Business rules on top of the repository traits. Every operation is a free
//! async function taking the shared [`AppState`](crate::infrastructure::AppState),
//! so handlers stay thin and tests can call the rules directly.

pub mod address_service;
pub mod category_service;
pub mod discussion_service;
pub mod location_service;
pub mod marketplace_service;
pub mod product_service;
pub mod shop_service;
pub mod user_service;

use serde::{Deserialize, Deserializer};

/// Tell an absent field (`None`) apart from an explicit `null` (`Some(None)`)
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i32>>,
    }

    #[test]
    fn double_option_distinguishes_null_from_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"parent_id": 3}"#).unwrap();
        assert_eq!(missing.parent_id, None);
        assert_eq!(null.parent_id, Some(None));
        assert_eq!(set.parent_id, Some(Some(3)));
    }
}
