//! Contract Test: Applying Plans
//!
//! Verifies the request sequence produced by `apply`.
//!
//! Constraints verified:
//! - Changes are sent one at a time, in plan order
//! - A missing zone is created and bootstrapped before any record change
//! - The first failing change aborts the rest
//! - The zone's cache entry is invalidated after every apply, even a failed one

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use zonesync_core::{Error, ZoneProvider};
use zonesync_provider_edgedns::{EdgeDnsSettings, Method};

const ZONE_BODY: &str = r#"{"zone": "unit.tests", "type": "primary", "activationState": "ACTIVE"}"#;

/// Transport for a zone that already exists and accepts every write
fn existing_zone() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(Method::Get, 200, r#"{"recordsets": []}"#)
        .on_path(Method::Get, "zones/unit.tests", 200, ZONE_BODY)
        .accept_writes();
    transport
}

/// Transport for a zone the API does not know yet
fn missing_zone() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(Method::Get, 404, r#"{"message": "not found"}"#)
        .accept_writes();
    transport
}

#[tokio::test]
async fn changes_are_sent_in_order() {
    let transport = existing_zone();
    let provider = provider(&transport, full_settings());

    let plan = plan(vec![
        create(a("www", &["1.2.3.4"])),
        update(a("", &["1.2.3.5"]), a("", &["1.2.3.4"])),
        delete(txt("old", &["gone"])),
    ]);

    let applied = provider.apply(&plan).await.unwrap();
    assert_eq!(applied, 3);

    assert_eq!(
        transport.call_log(),
        vec![
            "GET zones/unit.tests",
            "POST zones/unit.tests/names/www.unit.tests/types/A",
            "PUT zones/unit.tests/names/unit.tests/types/A",
            "DELETE zones/unit.tests/names/old.unit.tests/types/TXT",
        ]
    );
}

#[tokio::test]
async fn record_bodies_use_wire_format() {
    let transport = existing_zone();
    let provider = provider(&transport, full_settings());

    let plan = plan(vec![
        create(a("www", &["1.2.3.4", "1.2.3.5"])),
        update(txt("", &["v=spf1;-all"]), txt("", &["v=spf1 -all"])),
        delete(a("old", &["1.2.3.4"])),
    ]);
    provider.apply(&plan).await.unwrap();

    let writes = transport.writes();
    assert_eq!(
        writes[0].body,
        Some(json!({
            "name": "www.unit.tests",
            "type": "A",
            "ttl": 300,
            "rdata": ["1.2.3.4", "1.2.3.5"],
        }))
    );
    assert_eq!(
        writes[1].body,
        Some(json!({
            "name": "unit.tests",
            "type": "TXT",
            "ttl": 600,
            "rdata": ["\"v=spf1\\;-all\""],
        }))
    );
    assert_eq!(writes[2].body, None);
}

#[tokio::test]
async fn long_txt_is_sent_in_segments() {
    let transport = existing_zone();
    let provider = provider(&transport, full_settings());

    let long = "a".repeat(300);
    provider
        .apply(&plan(vec![create(txt("dkim", &[long.as_str()]))]))
        .await
        .unwrap();

    let writes = transport.writes();
    let expected = format!("\"{}\" \"{}\"", "a".repeat(255), "a".repeat(45));
    assert_eq!(writes[0].body.as_ref().unwrap()["rdata"], json!([expected]));
}

#[tokio::test]
async fn empty_plan_only_checks_zone() {
    let transport = existing_zone();
    let provider = provider(&transport, full_settings());

    let applied = provider.apply(&plan(Vec::new())).await.unwrap();

    assert_eq!(applied, 0);
    assert_eq!(transport.call_log(), vec!["GET zones/unit.tests"]);
}

#[tokio::test]
async fn missing_zone_is_bootstrapped_first() {
    let transport = missing_zone();
    let provider = provider(&transport, full_settings());

    let applied = provider
        .apply(&plan(vec![create(a("www", &["1.2.3.4"]))]))
        .await
        .unwrap();
    assert_eq!(applied, 1);

    assert_eq!(
        transport.call_log(),
        vec![
            "GET zones/unit.tests",
            "POST zones",
            "POST changelists",
            "POST changelists/unit.tests/submit",
            "POST zones/unit.tests/names/www.unit.tests/types/A",
        ]
    );

    let writes = transport.writes();

    let create_zone = &writes[0];
    assert_eq!(create_zone.query_param("contractId"), Some("cid"));
    assert_eq!(create_zone.query_param("gid"), Some("gid"));
    assert_eq!(
        create_zone.body,
        Some(json!({
            "zone": "unit.tests",
            "type": "primary",
            "comment": null,
            "masters": [],
        }))
    );

    assert_eq!(writes[1].query_param("zone"), Some("unit.tests"));
    assert_eq!(writes[2].query_param("comment"), Some("managed by zonesync"));
}

#[tokio::test]
async fn bootstrap_without_group_omits_gid() {
    let transport = missing_zone();
    let settings = EdgeDnsSettings {
        contract_id: Some("cid".to_string()),
        ..EdgeDnsSettings::default()
    };
    let provider = provider(&transport, settings);

    provider.apply(&plan(Vec::new())).await.unwrap();

    let writes = transport.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0].query_param("contractId"), Some("cid"));
    assert_eq!(writes[0].query_param("gid"), None);
    // No comment configured
    assert_eq!(writes[2].query_param("comment"), None);
}

#[tokio::test]
async fn bootstrap_requires_contract() {
    let transport = missing_zone();
    transport.on(Method::Get, 200, r#"{"recordsets": []}"#);
    transport.on_path(Method::Get, "zones/unit.tests", 404, r#"{"message": "not found"}"#);
    let provider = provider(&transport, EdgeDnsSettings::default());

    // Prime the cache
    provider.populate(&mut zone(), false).await.unwrap();
    assert!(provider.cache().contains(ZONE).await);

    let err = provider
        .apply(&plan(vec![create(a("www", &["1.2.3.4"]))]))
        .await
        .unwrap_err();

    match err {
        Error::Config(msg) => assert!(msg.contains("contractId")),
        other => panic!("expected config error, got {:?}", other),
    }
    assert!(transport.writes().is_empty());
    assert!(!provider.cache().contains(ZONE).await);
}

#[tokio::test]
async fn failing_change_aborts_the_rest() {
    let transport = existing_zone();
    transport.on_path(
        Method::Post,
        "zones/unit.tests/names/c.unit.tests/types/A",
        500,
        "Things caught fire",
    );
    let provider = provider(&transport, full_settings());

    provider.populate(&mut zone(), false).await.unwrap();
    assert!(provider.cache().contains(ZONE).await);

    let plan = plan(vec![
        create(a("a", &["1.1.1.1"])),
        create(a("b", &["2.2.2.2"])),
        create(a("c", &["3.3.3.3"])),
        create(a("d", &["4.4.4.4"])),
    ]);
    let err = provider.apply(&plan).await.unwrap_err();

    match &err {
        Error::ChangeFailed { index, change, .. } => {
            assert_eq!(*index, 2);
            assert_eq!(change, "Create c A");
        }
        other => panic!("expected change failure, got {:?}", other),
    }
    assert_eq!(err.status(), Some(500));

    let paths: Vec<String> = transport.writes().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "zones/unit.tests/names/a.unit.tests/types/A",
            "zones/unit.tests/names/b.unit.tests/types/A",
            "zones/unit.tests/names/c.unit.tests/types/A",
        ]
    );
    assert!(!provider.cache().contains(ZONE).await);
}

#[tokio::test]
async fn zone_lookup_failure_propagates() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::Get, 500, "Things caught fire").accept_writes();
    let provider = provider(&transport, full_settings());

    let err = provider
        .apply(&plan(vec![create(a("www", &["1.2.3.4"]))]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(transport.writes().is_empty());
}

#[tokio::test]
async fn populate_after_apply_refetches() {
    let transport = existing_zone();
    let provider = provider(&transport, full_settings());

    provider.populate(&mut zone(), false).await.unwrap();
    provider.populate(&mut zone(), false).await.unwrap();
    assert_eq!(transport.request_count(), 1);

    provider
        .apply(&plan(vec![create(a("www", &["1.2.3.4"]))]))
        .await
        .unwrap();
    transport.clear_requests();

    provider.populate(&mut zone(), false).await.unwrap();
    assert_eq!(transport.call_log(), vec!["GET zones/unit.tests/recordsets"]);
}

#[tokio::test]
async fn populated_txt_is_sent_back_unchanged() {
    let spf = r#""v=spf1 include:a.example" " include:b.example -all""#;
    let quoted = r#""say \"hi\"""#;
    let body = json!({
        "recordsets": [
            {"name": "unit.tests", "type": "TXT", "ttl": 600, "rdata": [spf, quoted]}
        ]
    })
    .to_string();

    let transport = existing_zone();
    transport.on_path(Method::Get, "zones/unit.tests/recordsets", 200, &body);
    let provider = provider(&transport, full_settings());

    let mut current = zone();
    provider.populate(&mut current, false).await.unwrap();
    let existing = current.records()[0].clone();
    let mut new = existing.clone();
    new.ttl = 300;

    provider
        .apply(&plan(vec![update(new, existing)]))
        .await
        .unwrap();

    let writes = transport.writes();
    assert_eq!(writes[0].body.as_ref().unwrap()["rdata"], json!([spf, quoted]));
}
