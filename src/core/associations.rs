//! HubSpot association handling. Other providers ignore the association
//! query parameters.

use serde_json::{Map, Value};

/// Association object types HubSpot can resolve alongside a record.
const VALID_ASSOCIATION_TYPES: &[&str] = &[
    "contact", "company", "deal", "ticket", "note", "task", "meeting", "call", "email",
];

pub fn is_valid_association_type(requested: &str) -> bool {
    VALID_ASSOCIATION_TYPES.contains(&requested)
}

/// Keeps only association types HubSpot understands. Unknown types never
/// reach the vendor URL.
pub fn filter_valid(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|item| is_valid_association_type(item))
        .cloned()
        .collect()
}

/// Collects association result ids from a raw HubSpot payload into a
/// `{type: [ids]}` map. Returns None when the payload carries none.
pub fn collect_association_ids(raw: &Value) -> Option<Value> {
    let associations = raw.get("associations")?.as_object()?;
    let mut collected = Map::new();

    for (assoc_type, payload) in associations {
        let ids: Vec<Value> = payload
            .get("results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .filter_map(|entry| entry.get("id").cloned())
                    .collect()
            })
            .unwrap_or_default();

        if !ids.is_empty() {
            collected.insert(assoc_type.clone(), Value::Array(ids));
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(Value::Object(collected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_valid_drops_unknown_types() {
        let requested = vec![
            "contact".to_string(),
            "invoice".to_string(),
            "deal".to_string(),
        ];
        assert_eq!(filter_valid(&requested), vec!["contact", "deal"]);
    }

    #[test]
    fn test_collect_association_ids() {
        let raw = json!({
            "id": "1",
            "associations": {
                "contacts": {"results": [{"id": "101", "type": "deal_to_contact"}, {"id": "102"}]},
                "companies": {"results": []}
            }
        });

        let collected = collect_association_ids(&raw).unwrap();
        assert_eq!(collected, json!({"contacts": ["101", "102"]}));
    }

    #[test]
    fn test_collect_association_ids_absent() {
        assert!(collect_association_ids(&json!({"id": "1"})).is_none());
        assert!(collect_association_ids(&json!({"associations": {}})).is_none());
    }
}
