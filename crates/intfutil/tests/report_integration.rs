//! Integration tests for intfutil reports
//!
//! Tests the full report workflow over in-memory stores including:
//! - Multi-namespace fan-out
//! - LAG speed aggregation
//! - Sub-interface inheritance
//! - Switchport mode precedence
//! - Display filtering and error isolation
//! - Watermark clear requests

use pretty_assertions::assert_eq;

use sonic_db_common::{DbId, MemoryDatabase};
use sonic_intfutil::{
    select_namespaces, watermark, DisplayMode, EntityKind, EntityRef, FanOutRunner,
    IntfUtilConfig, IntfUtilError, MemoryConnector, MemoryStores, Namespace, PortCapabilities,
    Report, ReportKind, ReportQuery, WatermarkKind,
};

/// Test fixture: one namespace worth of stores
struct TestSetup {
    stores: MemoryStores,
}

impl TestSetup {
    fn new() -> Self {
        Self {
            stores: MemoryStores::new(),
        }
    }

    /// Add a front-panel port to CONFIG_DB and APPL_DB
    fn add_port(self, port: &str, speed: &str, oper: &str) -> Self {
        self.stores
            .config_db
            .set_entry("PORT", port, &[("speed", speed), ("mtu", "9100")]);
        self.stores.appl_db.set_entry(
            "PORT_TABLE",
            port,
            &[
                ("speed", speed),
                ("mtu", "9100"),
                ("oper_status", oper),
                ("admin_status", "up"),
            ],
        );
        self
    }

    fn set_config(self, table: &str, key: &str, fields: &[(&str, &str)]) -> Self {
        self.stores.config_db.set_entry(table, key, fields);
        self
    }

    fn set_appl(self, table: &str, key: &str, fields: &[(&str, &str)]) -> Self {
        self.stores.appl_db.set_entry(table, key, fields);
        self
    }

    fn set_state(self, table: &str, key: &str, fields: &[(&str, &str)]) -> Self {
        self.stores.state_db.set_entry(table, key, fields);
        self
    }
}

async fn run_single(setup: TestSetup, kind: ReportKind, filter: Option<&str>) -> Report {
    let connector = MemoryConnector::new().with_namespace(Namespace::default(), setup.stores);
    let runner = FanOutRunner::new(connector, PortCapabilities::new(["Ethernet48"]));
    let query = ReportQuery::new(kind, filter).expect("valid query");

    runner
        .run(&[Namespace::default()], &query, &DisplayMode::All)
        .await
        .expect("report succeeds")
}

fn row<'a>(report: &'a Report, name: &str) -> &'a [String] {
    report
        .rows
        .iter()
        .find(|r| r[0] == name)
        .unwrap_or_else(|| panic!("no row for {}", name))
}

#[tokio::test]
async fn test_two_namespaces_do_not_leak() {
    // Both namespaces use PortChannel1, with different members.
    let asic0 = TestSetup::new()
        .add_port("Ethernet0", "100000", "down")
        .add_port("Ethernet4", "100000", "down")
        .set_config("PORTCHANNEL_MEMBER", "PortChannel1|Ethernet0", &[])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel1|Ethernet4", &[]);
    let asic1 = TestSetup::new()
        .add_port("Ethernet8", "40000", "down")
        .set_config("PORTCHANNEL_MEMBER", "PortChannel1|Ethernet8", &[])
        .set_config("PORTCHANNEL", "PortChannel1", &[("mode", "trunk")]);

    let connector = MemoryConnector::new()
        .with_namespace(Namespace::new("asic0"), asic0.stores)
        .with_namespace(Namespace::new("asic1"), asic1.stores);
    let runner = FanOutRunner::new(connector, PortCapabilities::default());
    let query = ReportQuery::new(ReportKind::Status, None).unwrap();

    let report = runner
        .run(
            &[Namespace::new("asic0"), Namespace::new("asic1")],
            &query,
            &DisplayMode::All,
        )
        .await
        .unwrap();

    // 2 ports + 1 LAG, then 1 port + 1 LAG
    assert_eq!(report.rows.len(), 5);
    let lag_rows: Vec<(&str, &str)> = report
        .rows
        .iter()
        .filter(|r| r[0] == "PortChannel1")
        .map(|r| (r[2].as_str(), r[6].as_str()))
        .collect();
    assert_eq!(lag_rows, vec![("200G", "routed"), ("40G", "trunk")]);

    assert_eq!(row(&report, "Ethernet0")[6], "routed");
    assert_eq!(row(&report, "Ethernet8")[6], "trunk");
}

#[tokio::test]
async fn test_lag_speeds() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "25000", "up")
        .add_port("Ethernet4", "25000", "up")
        .add_port("Ethernet8", "10000", "down")
        .set_state("PORT_TABLE", "Ethernet0", &[("speed", "50000")])
        .set_config("PORTCHANNEL", "PortChannel10", &[])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel20|Ethernet8", &[])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel30|Ethernet0", &[])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel30|Ethernet4", &[]);

    let report = run_single(setup, ReportKind::Status, None).await;

    assert_eq!(row(&report, "PortChannel10")[2], "N/A");
    assert_eq!(row(&report, "PortChannel20")[2], "10G");
    // 50000 from STATE_DB plus 25000 from APPL_DB
    assert_eq!(row(&report, "PortChannel30")[2], "75G");
}

#[tokio::test]
async fn test_sub_interfaces() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .set_config("VLAN_SUB_INTERFACE", "Ethernet0.100", &[("admin_status", "up")])
        .set_config("VLAN_SUB_INTERFACE", "Ethernet0.100|192.168.0.1/24", &[])
        .set_config("VLAN_SUB_INTERFACE", "Ethernet96.5", &[])
        .set_appl(
            "INTF_TABLE",
            "Ethernet0.100",
            &[("vlan", "100"), ("admin_status", "up")],
        );

    let report = run_single(setup, ReportKind::Status, Some("subport")).await;
    assert_eq!(
        report.header,
        vec!["Sub port interface", "Speed", "MTU", "Vlan", "Admin", "Type"]
    );
    assert_eq!(
        report.rows,
        vec![
            vec!["Ethernet0.100", "100G", "9100", "100", "up", "802.1q-encapsulation"],
            vec!["Ethernet96.5", "N/A", "N/A", "N/A", "N/A", "802.1q-encapsulation"],
        ]
    );
}

#[tokio::test]
async fn test_single_sub_interface_filter() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .set_config("VLAN_SUB_INTERFACE", "Eth0.10", &[])
        .set_config("VLAN_SUB_INTERFACE", "Eth0.20", &[]);

    let report = run_single(setup, ReportKind::Status, Some("Ethernet0.20")).await;
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], "Eth0.20");
    assert_eq!(report.rows[0][2], "9100");
}

#[tokio::test]
async fn test_switch_mode_precedence() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .add_port("Ethernet4", "100000", "up")
        .add_port("Ethernet8", "100000", "up")
        .add_port("Ethernet12", "100000", "up")
        .set_config("PORT", "Ethernet0", &[("mode", "trunk")])
        .set_config("VLAN_MEMBER", "Vlan100|Ethernet4", &[("tagging_mode", "tagged")])
        .set_config("PORTCHANNEL", "PortChannel1", &[("mode", "trunk")])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel1|Ethernet12", &[]);

    let report = run_single(setup, ReportKind::Status, None).await;

    assert_eq!(row(&report, "Ethernet0")[6], "trunk");
    assert_eq!(row(&report, "Ethernet4")[6], "trunk");
    assert_eq!(row(&report, "Ethernet8")[6], "routed");
    assert_eq!(row(&report, "Ethernet12")[6], "trunk");
}

#[tokio::test]
async fn test_port_type_column() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .add_port("Ethernet48", "1000", "up")
        .set_state("TRANSCEIVER_INFO", "Ethernet0", &[("type", "QSFP28 or later")]);

    let report = run_single(setup, ReportKind::Status, None).await;

    assert_eq!(row(&report, "Ethernet0")[9], "QSFP28 or later");
    assert_eq!(row(&report, "Ethernet48")[9], "RJ45");
    assert_eq!(row(&report, "Ethernet48")[2], "1000M");
}

#[tokio::test]
async fn test_autoneg_and_link_training_reports() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .set_appl(
            "PORT_TABLE",
            "Ethernet0",
            &[
                ("autoneg", "on"),
                ("adv_speeds", "40000,100000"),
                ("interface_type", "CR4"),
                ("link_training", "on"),
            ],
        )
        .set_state(
            "PORT_TABLE",
            "Ethernet0",
            &[("rmt_adv_speeds", "100000"), ("link_training_status", "trained")],
        );

    let report = run_single(setup, ReportKind::Autoneg, None).await;
    assert_eq!(
        report.rows,
        vec![vec![
            "Ethernet0", "enabled", "100G", "40G,100G", "100G", "CR4", "N/A", "up", "up"
        ]]
    );

    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .set_appl("PORT_TABLE", "Ethernet0", &[("link_training", "on")])
        .set_state("PORT_TABLE", "Ethernet0", &[("link_training_status", "trained")]);
    let report = run_single(setup, ReportKind::LinkTraining, None).await;
    assert_eq!(report.rows, vec![vec!["Ethernet0", "trained", "on", "up", "up"]]);
}

#[tokio::test]
async fn test_frontend_display_hides_internal() {
    let setup = TestSetup::new()
        .add_port("Ethernet0", "100000", "up")
        .add_port("Ethernet-BP0", "100000", "up")
        .set_config("PORT", "Ethernet-BP0", &[("role", "Int")])
        .set_config("PORTCHANNEL_MEMBER", "PortChannel4001|Ethernet-BP0", &[]);

    let connector = MemoryConnector::new().with_namespace(Namespace::new("asic0"), setup.stores);
    let runner = FanOutRunner::new(connector, PortCapabilities::default());
    let query = ReportQuery::new(ReportKind::Status, None).unwrap();

    let report = runner
        .run(&[Namespace::new("asic0")], &query, &DisplayMode::Frontend)
        .await
        .unwrap();
    let names: Vec<&str> = report.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["Ethernet0"]);

    // A caller-supplied predicate sees every candidate exactly once.
    let seen = std::sync::Mutex::new(Vec::new());
    let record = |e: &EntityRef<'_>| {
        if let Ok(mut seen) = seen.lock() {
            seen.push((e.kind, e.name.to_string()));
        }
        false
    };
    let connector = MemoryConnector::new().with_namespace(
        Namespace::new("asic0"),
        TestSetup::new().add_port("Ethernet0", "100000", "up").stores,
    );
    let runner = FanOutRunner::new(connector, PortCapabilities::default());
    runner.run(&[Namespace::new("asic0")], &query, &record).await.unwrap();
    assert_eq!(
        seen.into_inner().unwrap(),
        vec![(EntityKind::Port, "Ethernet0".to_string())]
    );
}

#[tokio::test]
async fn test_catalog_failure_is_isolated() {
    let broken = TestSetup::new().add_port("Ethernet0", "100000", "up");
    broken.stores.config_db.set_unavailable(true);
    let healthy = TestSetup::new().add_port("Ethernet4", "100000", "up");

    let connector = MemoryConnector::new()
        .with_namespace(Namespace::new("asic0"), broken.stores)
        .with_namespace(Namespace::new("asic1"), healthy.stores);
    let runner = FanOutRunner::new(connector, PortCapabilities::default());
    let query = ReportQuery::new(ReportKind::Description, None).unwrap();

    let report = runner
        .run(
            &[Namespace::new("asic0"), Namespace::new("asic1")],
            &query,
            &DisplayMode::All,
        )
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0][0], "Ethernet4");
}

#[tokio::test]
async fn test_store_unavailable_is_fatal() {
    let mut connector = MemoryConnector::new().with_namespace(
        Namespace::new("asic0"),
        TestSetup::new().add_port("Ethernet0", "100000", "up").stores,
    );
    connector.mark_unreachable(Namespace::new("asic0"));
    let runner = FanOutRunner::new(connector, PortCapabilities::default());
    let query = ReportQuery::new(ReportKind::Status, None).unwrap();

    let err = runner
        .run(&[Namespace::new("asic0")], &query, &DisplayMode::All)
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, IntfUtilError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_rendered_output() {
    let setup = TestSetup::new()
        .add_port("Ethernet8", "10000", "down")
        .add_port("Ethernet0", "100000", "up");

    let report = run_single(setup, ReportKind::Fec, None).await;
    assert_eq!(
        report.render(),
        "Interface  FEC Oper  FEC Admin\n\
         ---------  --------  ---------\n\
         Ethernet0       N/A        N/A\n\
         Ethernet8       N/A        N/A\n"
    );
}

#[test]
fn test_namespace_selection_from_config() {
    let config = IntfUtilConfig::from_toml(
        r#"
        [[namespaces]]
        name = "asic0"

        [[namespaces]]
        name = "asic1"
        "#,
    )
    .unwrap();

    let selected = select_namespaces(&config.namespace_list(), Some("asic1")).unwrap();
    assert_eq!(selected, vec![Namespace::new("asic1")]);
    assert!(select_namespaces(&config.namespace_list(), Some("asic2")).is_err());
}

#[tokio::test]
async fn test_watermark_clear() {
    let counters_db = MemoryDatabase::new(DbId::CountersDb);
    watermark::clear(&counters_db, WatermarkKind::QSharedUni, false)
        .await
        .unwrap();

    assert_eq!(
        counters_db.published(),
        vec![(
            "WATERMARK_CLEAR_REQUEST".to_string(),
            r#"["USER","Q_SHARED_UNI"]"#.to_string()
        )]
    );
}
