//! Pagination-cursor normalization. Each provider reports paging state in
//! its own vocabulary (cursor tokens, offsets, follow-up links); these
//! helpers translate every raw list payload into one next/previous pair of
//! opaque strings.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursors {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageCursors {
    pub fn none() -> Self {
        Self::default()
    }
}

fn value_to_cursor(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// HubSpot: forward-only token under `paging.next.after`.
pub fn hubspot(raw: &Value) -> PageCursors {
    PageCursors {
        next: value_to_cursor(raw.pointer("/paging/next/after")),
        previous: None,
    }
}

/// Zoho: bidirectional page tokens under `info`.
pub fn zoho(raw: &Value) -> PageCursors {
    PageCursors {
        next: value_to_cursor(raw.pointer("/info/next_page_token")),
        previous: value_to_cursor(raw.pointer("/info/previous_page_token")),
    }
}

/// Salesforce: SOQL OFFSET arithmetic. The caller cursor is a row offset;
/// the next offset advances by the page's `totalSize`.
pub fn sfdc(raw: &Value, page_size: Option<usize>, cursor: Option<&str>) -> PageCursors {
    let total_size = raw
        .get("totalSize")
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let offset = cursor.and_then(|c| c.parse::<i64>().ok()).unwrap_or(0);

    PageCursors {
        next: page_size.map(|_| (total_size + offset).to_string()),
        previous: (offset > 0).then(|| (offset - total_size).to_string()),
    }
}

/// Pipedrive: forward-only offset under `additional_data.pagination.next_start`.
pub fn pipedrive(raw: &Value) -> PageCursors {
    PageCursors {
        next: value_to_cursor(raw.pointer("/additional_data/pagination/next_start")),
        previous: None,
    }
}

/// Close: `_skip` offset arithmetic driven by the vendor's `has_more` flag.
pub fn closecrm(raw: &Value, page_size: Option<usize>, cursor: Option<&str>) -> PageCursors {
    let has_more = raw
        .get("has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let offset = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
    let page = page_size.unwrap_or(0);

    PageCursors {
        next: has_more.then(|| (offset + page).to_string()),
        previous: (offset > 0).then(|| offset.saturating_sub(page).to_string()),
    }
}

/// MS Dynamics: the vendor's full `@odata.nextLink` URL is the cursor.
pub fn ms_dynamics(raw: &Value) -> PageCursors {
    PageCursors {
        next: value_to_cursor(raw.get("@odata.nextLink")),
        previous: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hubspot_next_token() {
        let raw = json!({"results": [], "paging": {"next": {"after": "1357"}}});
        assert_eq!(
            hubspot(&raw),
            PageCursors {
                next: Some("1357".to_string()),
                previous: None,
            }
        );

        assert_eq!(hubspot(&json!({"results": []})), PageCursors::none());
    }

    #[test]
    fn test_zoho_page_tokens() {
        let raw = json!({
            "data": [],
            "info": {"next_page_token": "nxt", "previous_page_token": "prv"}
        });
        let cursors = zoho(&raw);
        assert_eq!(cursors.next.as_deref(), Some("nxt"));
        assert_eq!(cursors.previous.as_deref(), Some("prv"));
    }

    #[test]
    fn test_sfdc_offset_math() {
        let raw = json!({"totalSize": 50, "records": []});

        // First page with page size: next offset is the page total.
        let first = sfdc(&raw, Some(50), None);
        assert_eq!(first.next.as_deref(), Some("50"));
        assert_eq!(first.previous, None);

        // Later page: next advances, previous steps back.
        let later = sfdc(&raw, Some(50), Some("100"));
        assert_eq!(later.next.as_deref(), Some("150"));
        assert_eq!(later.previous.as_deref(), Some("50"));

        // No page size requested: no next cursor.
        let unpaged = sfdc(&raw, None, None);
        assert_eq!(unpaged.next, None);
    }

    #[test]
    fn test_pipedrive_next_start() {
        let raw = json!({
            "data": [],
            "additional_data": {"pagination": {"next_start": 20, "more_items_in_collection": true}}
        });
        assert_eq!(pipedrive(&raw).next.as_deref(), Some("20"));
        assert_eq!(pipedrive(&json!({"data": []})), PageCursors::none());
    }

    #[test]
    fn test_closecrm_skip_math() {
        let more = json!({"data": [], "has_more": true});
        let done = json!({"data": [], "has_more": false});

        let first = closecrm(&more, Some(25), None);
        assert_eq!(first.next.as_deref(), Some("25"));
        assert_eq!(first.previous, None);

        let middle = closecrm(&more, Some(25), Some("25"));
        assert_eq!(middle.next.as_deref(), Some("50"));
        assert_eq!(middle.previous.as_deref(), Some("0"));

        let last = closecrm(&done, Some(25), Some("75"));
        assert_eq!(last.next, None);
        assert_eq!(last.previous.as_deref(), Some("50"));
    }

    #[test]
    fn test_ms_dynamics_next_link() {
        let raw = json!({
            "value": [],
            "@odata.nextLink": "https://org.crm.dynamics.com/api/data/v9.2/leads?$skiptoken=abc"
        });
        assert_eq!(
            ms_dynamics(&raw).next.as_deref(),
            Some("https://org.crm.dynamics.com/api/data/v9.2/leads?$skiptoken=abc")
        );
    }
}
