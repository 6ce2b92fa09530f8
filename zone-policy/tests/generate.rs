use clap::Parser;
use maplit::btreemap;
use serde::Deserialize;
use std::{collections::BTreeMap, ffi::OsStr, path::Path};
use zone_policy::{
    ingest::{self, Sheets},
    write, Args,
};
use zone_policy_k8s_api::{NetworkPolicy, PolicyType};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/network_policies.yaml");
const WORKBOOK: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/network_policy.xlsx");

fn read_stream(yaml: &str) -> Vec<NetworkPolicy> {
    serde_yaml::Deserializer::from_str(yaml)
        .map(|doc| NetworkPolicy::deserialize(doc).expect("stream must contain policies"))
        .collect()
}

#[test]
fn reads_the_manifest() {
    let tables = ingest::read(Path::new(FIXTURE), &Sheets::default()).unwrap();
    let zones = tables
        .zones
        .iter()
        .map(|z| (z.name.as_str(), z.cidrs.clone()))
        .collect::<Vec<_>>();
    assert_eq!(
        zones,
        vec![
            (
                "Front End",
                vec!["10.10.1.0/24".to_string(), "10.10.2.0/24".to_string()]
            ),
            ("Back End", vec!["10.11.0.0/24".to_string()]),
            ("Infrastructure", vec!["10.12.0.0/24".to_string()]),
        ]
    );
    assert_eq!(tables.rules.len(), 2);
}

#[test]
fn reads_the_workbook() {
    let tables = ingest::read(Path::new(WORKBOOK), &Sheets::default()).unwrap();
    assert_eq!(
        tables.zones.iter().map(|z| z.name.as_str()).collect::<Vec<_>>(),
        ["Front End", "Back End", "Infrastructure"]
    );
    assert_eq!(
        tables.zones[0].cidrs,
        ["10.10.1.0/24".to_string(), "10.10.2.0/24".to_string()]
    );
    let rules = tables
        .rules
        .iter()
        .map(|r| (r.from.as_str(), r.to.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(rules, [("Front End", "Back End"), ("Back End", "Front End")]);

    // The workbook and the manifest describe the same zones.
    let manifest = ingest::read(Path::new(FIXTURE), &Sheets::default()).unwrap();
    assert_eq!(tables, manifest);
}

#[test]
fn workbook_tables_may_start_anywhere() {
    let shifted = Sheets {
        zones: "ShiftedZones".to_string(),
        rules: "ShiftedRules".to_string(),
    };
    assert_eq!(
        ingest::read(Path::new(WORKBOOK), &shifted).unwrap(),
        ingest::read(Path::new(WORKBOOK), &Sheets::default()).unwrap()
    );
}

#[test]
fn workbooks_need_both_sheets() {
    for sheets in [
        Sheets {
            zones: "Zonen".to_string(),
            ..Sheets::default()
        },
        Sheets {
            rules: "Regeln".to_string(),
            ..Sheets::default()
        },
    ] {
        let missing = if sheets.zones == "Zonen" { "Zonen" } else { "Regeln" };
        match ingest::read(Path::new(WORKBOOK), &sheets) {
            Err(ingest::Error::MissingSheet(name)) => assert_eq!(name, missing),
            res => panic!("expected a missing {} sheet, got {:?}", missing, res),
        }
    }
}

#[test]
fn writes_a_policy_per_zone() {
    let registry = ingest::read(Path::new(FIXTURE), &Sheets::default())
        .unwrap()
        .into_registry()
        .unwrap();
    let mut buf = Vec::new();
    write::write_stream(&mut buf, &registry.emit_documents()).unwrap();

    let docs = read_stream(std::str::from_utf8(&buf).unwrap());
    assert_eq!(docs.len(), 4);

    let peers = docs
        .iter()
        .map(|doc| {
            let ingress = doc
                .spec
                .ingress
                .iter()
                .flatten()
                .flat_map(|rule| rule.from.iter())
                .count();
            let egress = doc
                .spec
                .egress
                .iter()
                .flatten()
                .flat_map(|rule| rule.to.iter())
                .count();
            (doc.name().unwrap_or_default().to_string(), (ingress, egress))
        })
        .collect::<BTreeMap<_, _>>();
    assert_eq!(
        peers,
        btreemap! {
            "default-deny".to_string() => (0, 0),
            // Self, two networks, and the back end.
            "front-end-zone".to_string() => (4, 4),
            "back-end-zone".to_string() => (3, 3),
            "infrastructure-zone".to_string() => (2, 2),
        }
    );

    for doc in &docs {
        assert!(
            doc.spec.policy_types.contains(&PolicyType::Ingress)
                && doc.spec.policy_types.contains(&PolicyType::Egress),
            "{:?}",
            doc.name()
        );
    }
}

#[test]
fn runs_end_to_end() {
    for (input, output) in [
        (FIXTURE, "network_policies.yml"),
        (WORKBOOK, "network_policy.yml"),
    ] {
        let output = Path::new(env!("CARGO_TARGET_TMPDIR")).join(output);
        let args = Args::try_parse_from([
            OsStr::new("zone-policy"),
            OsStr::new("--output"),
            output.as_os_str(),
            OsStr::new(input),
        ])
        .unwrap();
        args.run().unwrap();

        let yaml = std::fs::read_to_string(&output).unwrap();
        let names = read_stream(&yaml)
            .iter()
            .map(|doc| doc.name().unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "default-deny",
                "front-end-zone",
                "back-end-zone",
                "infrastructure-zone"
            ],
            "{}",
            input
        );
    }
}

#[test]
fn unknown_zones_fail_the_run() {
    let input = Path::new(env!("CARGO_TARGET_TMPDIR")).join("unknown_zone.yaml");
    std::fs::write(
        &input,
        "zones:\n  - name: Front End\nallow:\n  - from: Front End\n    to: Back End\n",
    )
    .unwrap();
    let output = Path::new(env!("CARGO_TARGET_TMPDIR")).join("unknown_zone.yml");

    let args = Args::try_parse_from([
        OsStr::new("zone-policy"),
        OsStr::new("-o"),
        output.as_os_str(),
        input.as_os_str(),
    ])
    .unwrap();
    let error = args.run().unwrap_err();
    assert_eq!(
        error.downcast_ref::<zone_policy::Error>(),
        Some(&zone_policy::Error::UnknownZone("Back End".to_string()))
    );
}
