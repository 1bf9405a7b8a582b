// ── Fleet-status document schemas ──
//
// Three map-server generations publish three incompatible JSON shapes.
// Each shape gets its own serde document type; `FeedSchema` selects one
// and drives the hostname lookup. Records without a usable name are
// skipped rather than failing the whole document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::error::DocumentError;
use crate::model::RouterStatus;

/// Which upstream document shape to expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedSchema {
    /// `{"nodes": [{"name", "id", "flags": {"online"}, "clientcount"}, ..]}`
    #[default]
    NodeList,
    /// `{"nodes": [{"nodeinfo": {..}, "flags": {..}, "statistics": {..}}, ..]}`
    NodeInfo,
    /// `{"<mac>": {"hostname", "status", "clients": {"total"}}, ..}`
    MacMap,
}

impl FeedSchema {
    /// Parse `raw` as this schema and return the first record whose name
    /// equals `name` exactly (case-sensitive), or `None` when the router
    /// does not appear in the document.
    pub fn locate(self, raw: &[u8], name: &str) -> Result<Option<RouterStatus>, DocumentError> {
        trace!(schema = %self, router = name, "decoding fleet-status document");
        let found = match self {
            Self::NodeList => serde_json::from_slice::<NodeListDocument>(raw)?.locate(name),
            Self::NodeInfo => serde_json::from_slice::<NodeInfoDocument>(raw)?.locate(name),
            Self::MacMap => serde_json::from_slice::<MacMapDocument>(raw)?.locate(name),
        };
        Ok(found)
    }
}

impl fmt::Display for FeedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NodeList => "node-list",
            Self::NodeInfo => "node-info",
            Self::MacMap => "mac-map",
        })
    }
}

// ── Shared pieces ───────────────────────────────────────────────────

/// Online flag as the feeds publish it: a native boolean in the node-list
/// schema, the strings `"true"` / `"false"` in the node-info schema.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OnlineFlag {
    Bool(bool),
    Text(String),
}

impl OnlineFlag {
    fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s == "true",
        }
    }
}

impl Default for OnlineFlag {
    // A record without an online flag must not be reported as online.
    fn default() -> Self {
        Self::Bool(false)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Flags {
    #[serde(default)]
    online: OnlineFlag,
}

/// A count is only meaningful for an online router; offline records never
/// carry one forward, whatever the feed claims.
fn clients_when_online(online: bool, count: Option<u32>) -> Option<u32> {
    if online { count } else { None }
}

// ── Schema (a): flat node list ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NodeListDocument {
    #[serde(default)]
    nodes: Vec<NodeListEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeListEntry {
    name: Option<String>,
    id: Option<String>,
    #[serde(default)]
    flags: Flags,
    clientcount: Option<u32>,
}

impl NodeListDocument {
    fn locate(&self, name: &str) -> Option<RouterStatus> {
        self.nodes
            .iter()
            .find(|node| node.name.as_deref() == Some(name))
            .map(|node| {
                let online = node.flags.online.as_bool();
                RouterStatus {
                    name: name.to_owned(),
                    id: node.id.clone().unwrap_or_default(),
                    online,
                    clients: clients_when_online(online, node.clientcount),
                }
            })
    }
}

// ── Schema (b): nodeinfo/statistics list ────────────────────────────

#[derive(Debug, Deserialize)]
struct NodeInfoDocument {
    #[serde(default)]
    nodes: Vec<NodeInfoEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeInfoEntry {
    #[serde(default)]
    nodeinfo: NodeInfo,
    #[serde(default)]
    flags: Flags,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
struct NodeInfo {
    hostname: Option<String>,
    node_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    clients: Option<u32>,
}

impl NodeInfoDocument {
    fn locate(&self, name: &str) -> Option<RouterStatus> {
        self.nodes
            .iter()
            .find(|node| node.nodeinfo.hostname.as_deref() == Some(name))
            .map(|node| {
                let online = node.flags.online.as_bool();
                RouterStatus {
                    name: name.to_owned(),
                    id: node.nodeinfo.node_id.clone().unwrap_or_default(),
                    online,
                    clients: clients_when_online(online, node.statistics.clients),
                }
            })
    }
}

// ── Schema (c): MAC-keyed map ───────────────────────────────────────

// IndexMap keeps document order, so duplicate hostnames resolve to the
// first record in the feed, matching the list schemas.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct MacMapDocument {
    nodes: IndexMap<String, MacMapEntry>,
}

#[derive(Debug, Deserialize)]
struct MacMapEntry {
    hostname: Option<String>,
    status: Option<String>,
    #[serde(default)]
    clients: Clients,
}

#[derive(Debug, Default, Deserialize)]
struct Clients {
    total: Option<u32>,
}

impl MacMapDocument {
    fn locate(&self, name: &str) -> Option<RouterStatus> {
        self.nodes
            .iter()
            .find(|(_, entry)| entry.hostname.as_deref() == Some(name))
            .map(|(mac, entry)| {
                let online = entry.status.as_deref() == Some("online");
                RouterStatus {
                    name: name.to_owned(),
                    id: mac.clone(),
                    online,
                    clients: clients_when_online(online, entry.clients.total),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NODE_LIST: &str = r#"{"nodes": [
        {"name": "gw-01", "id": "abc", "flags": {"online": true}, "clientcount": 12},
        {"name": "gw-02", "id": "def", "flags": {"online": false}, "clientcount": 7}
    ]}"#;

    const NODE_INFO: &str = r#"{"nodes": [
        {"nodeinfo": {"hostname": "gw-01", "node_id": "abc"},
         "flags": {"online": "true"},
         "statistics": {"clients": 12}},
        {"nodeinfo": {"hostname": "gw-02", "node_id": "def"},
         "flags": {"online": "false"},
         "statistics": {"clients": 7}}
    ]}"#;

    const MAC_MAP: &str = r#"{
        "66:33:11:22:44:55": {"hostname": "gw-01", "status": "online",
                              "clients": {"total": 12}},
        "66:33:11:22:44:56": {"hostname": "gw-02", "status": "offline",
                              "clients": {"total": 7}}
    }"#;

    fn locate(schema: FeedSchema, doc: &str, name: &str) -> Option<RouterStatus> {
        schema
            .locate(doc.as_bytes(), name)
            .expect("document should parse")
    }

    #[test]
    fn online_router_with_clients_in_every_schema() {
        for (schema, doc, id) in [
            (FeedSchema::NodeList, NODE_LIST, "abc"),
            (FeedSchema::NodeInfo, NODE_INFO, "abc"),
            (FeedSchema::MacMap, MAC_MAP, "66:33:11:22:44:55"),
        ] {
            let found = locate(schema, doc, "gw-01").expect("gw-01 is present");
            assert_eq!(
                found,
                RouterStatus {
                    name: "gw-01".into(),
                    id: id.into(),
                    online: true,
                    clients: Some(12),
                }
            );
        }
    }

    #[test]
    fn offline_router_drops_client_count_in_every_schema() {
        for (schema, doc) in [
            (FeedSchema::NodeList, NODE_LIST),
            (FeedSchema::NodeInfo, NODE_INFO),
            (FeedSchema::MacMap, MAC_MAP),
        ] {
            let found = locate(schema, doc, "gw-02").expect("gw-02 is present");
            assert!(!found.online);
            assert_eq!(found.clients, None);
        }
    }

    #[test]
    fn absent_router_is_not_found_in_every_schema() {
        for (schema, doc) in [
            (FeedSchema::NodeList, NODE_LIST),
            (FeedSchema::NodeInfo, NODE_INFO),
            (FeedSchema::MacMap, MAC_MAP),
        ] {
            assert_eq!(locate(schema, doc, "gw-99"), None);
        }
    }

    #[test]
    fn name_match_is_case_sensitive() {
        assert_eq!(locate(FeedSchema::NodeList, NODE_LIST, "GW-01"), None);
    }

    #[test]
    fn first_record_wins_on_duplicate_names() {
        let doc = r#"{"nodes": [
            {"name": "gw-01", "id": "first", "flags": {"online": true}, "clientcount": 1},
            {"name": "gw-01", "id": "second", "flags": {"online": false}}
        ]}"#;
        let found = locate(FeedSchema::NodeList, doc, "gw-01").expect("present");
        assert_eq!(found.id, "first");
        assert!(found.online);
    }

    #[test]
    fn online_without_count_stays_absent_not_zero() {
        let doc = r#"{"nodes": [{"name": "gw-01", "id": "abc", "flags": {"online": true}}]}"#;
        let found = locate(FeedSchema::NodeList, doc, "gw-01").expect("present");
        assert!(found.online);
        assert_eq!(found.clients, None);
    }

    #[test]
    fn nameless_records_are_skipped() {
        let doc = r#"{"nodes": [
            {"id": "ignored", "flags": {"online": true}},
            {"name": "gw-01", "id": "abc", "flags": {"online": true}, "clientcount": 3}
        ]}"#;
        let found = locate(FeedSchema::NodeList, doc, "gw-01").expect("present");
        assert_eq!(found.id, "abc");
    }

    #[test]
    fn node_info_accepts_native_boolean_flags() {
        let doc = r#"{"nodes": [
            {"nodeinfo": {"hostname": "gw-01", "node_id": "abc"},
             "flags": {"online": true},
             "statistics": {"clients": 4}}
        ]}"#;
        let found = locate(FeedSchema::NodeInfo, doc, "gw-01").expect("present");
        assert!(found.online);
        assert_eq!(found.clients, Some(4));
    }

    #[test]
    fn mac_map_treats_any_other_status_as_offline() {
        let doc = r#"{"aa:bb": {"hostname": "gw-01", "status": "unknown",
                                "clients": {"total": 9}}}"#;
        let found = locate(FeedSchema::MacMap, doc, "gw-01").expect("present");
        assert!(!found.online);
        assert_eq!(found.clients, None);
    }

    #[test]
    fn missing_flags_default_to_offline() {
        let doc = r#"{"nodes": [{"name": "gw-01", "id": "abc"}]}"#;
        let found = locate(FeedSchema::NodeList, doc, "gw-01").expect("present");
        assert!(!found.online);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = FeedSchema::NodeList.locate(b"not json", "gw-01");
        assert!(matches!(result, Err(DocumentError::Malformed(_))));
    }

    #[test]
    fn schema_names_round_trip_through_serde() {
        for (schema, text) in [
            (FeedSchema::NodeList, "\"node-list\""),
            (FeedSchema::NodeInfo, "\"node-info\""),
            (FeedSchema::MacMap, "\"mac-map\""),
        ] {
            let parsed: FeedSchema = serde_json::from_str(text).expect("known name");
            assert_eq!(parsed, schema);
            assert_eq!(format!("\"{schema}\""), text);
        }
    }
}
