use std::time::Duration;

use hostfilter::{
    CheckStatus, ComputerRecord, DomainLookup, FilterChange, FilterConfig, FilterController,
    MemoryHistory, ServerFilter, SortField, SortOrder, TablePagination, TableSort,
};

fn immediate() -> FilterConfig {
    FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 0,
    }
}

fn controller(query: &str, records: Vec<ComputerRecord>) -> FilterController<MemoryHistory> {
    let mut controller = FilterController::new(immediate(), query, MemoryHistory::new(query));
    controller.set_records(records);
    controller
}

fn hostnames(controller: &FilterController<MemoryHistory>) -> Vec<String> {
    controller
        .page()
        .records
        .iter()
        .map(|r| r.hostname.clone())
        .collect()
}

fn fleet() -> Vec<ComputerRecord> {
    vec![
        ComputerRecord::new(1, "web1")
            .with_os("Windows Server 2019")
            .with_domain(1)
            .with_ip("10.0.3.55")
            .with_status(CheckStatus::Success),
        ComputerRecord::new(2, "web2")
            .with_os("Ubuntu 22.04")
            .with_domain(2)
            .with_ip("10.0.5.1")
            .with_status(CheckStatus::Failed),
        ComputerRecord::new(3, "db1")
            .with_os("Microsoft Hyper-V Server 2016")
            .with_domain(1)
            .with_status(CheckStatus::Unreachable),
        ComputerRecord::new(4, "old-pc")
            .with_os("Windows 7")
            .with_status(CheckStatus::Disabled),
        ComputerRecord::new(5, "gone")
            .with_os("Windows 10")
            .with_status(CheckStatus::IsDeleted),
        ComputerRecord::new(6, "laptop").with_os("Windows 11").with_ip("10.0.2.9"),
    ]
}

#[test]
fn hostname_prefix_selects_web_hosts() {
    let records = vec![
        ComputerRecord::new(1, "web1").with_status(CheckStatus::Success),
        ComputerRecord::new(2, "web2").with_status(CheckStatus::Success),
        ComputerRecord::new(3, "db1").with_status(CheckStatus::Success),
    ];
    let mut controller = controller("", records);

    controller.set_field(FilterChange::Hostname("web".into()));

    assert_eq!(hostnames(&controller), ["web1", "web2"]);
    assert_eq!(controller.page().total, 2);
}

#[test]
fn explicit_client_filter_excludes_server_os() {
    let records = vec![ComputerRecord::new(1, "srv").with_os("Windows Server 2019")];
    let mut controller = controller("", records);

    controller.set_field(FilterChange::ServerFilter(Some(ServerFilter::Client)));

    assert!(controller.state().os_name.is_empty());
    assert_eq!(controller.page().total, 0);
}

#[test]
fn bracket_range_matches_third_octet_bucket() {
    let mut controller = controller("", fleet());

    controller.set_field(FilterChange::IpRange("10.0.[2-4].0".into()));

    assert_eq!(hostnames(&controller), ["laptop", "web1"]);
}

#[test]
fn url_round_trip_preserves_foreign_parameters() {
    let query = "tab=computers&hostname=abc&page=2&limit=10";
    let controller = controller(query, Vec::new());

    let state = controller.state();
    assert_eq!(state.hostname, "abc");
    assert_eq!(state.page, 2);
    assert_eq!(state.page_size, 10);
    assert_eq!(controller.query(), query);
    assert_eq!(controller.history().replacements(), 0);
}

#[test]
fn disabled_records_never_leak_while_hidden() {
    let mut controller = controller("", fleet());
    let hidden = |c: &FilterController<MemoryHistory>| {
        c.page()
            .records
            .iter()
            .any(|r| r.check_status.is_some_and(|s| s.is_hidden_by_default()))
    };

    assert!(!hidden(&controller));

    controller.set_field(FilterChange::CheckStatus(Some(CheckStatus::Disabled)));
    assert!(controller.state().show_disabled);
    assert_eq!(hostnames(&controller), ["old-pc"]);

    controller.set_field(FilterChange::ShowDisabled(false));
    assert_eq!(controller.state().check_status, None);
    assert!(!hidden(&controller));
    assert_eq!(controller.page().total, 4);
}

#[test]
fn os_text_auto_classifies_servers() {
    let mut controller = controller("", fleet());
    controller.set_field(FilterChange::ShowDisabled(true));

    controller.set_field(FilterChange::OsName("server".into()));
    assert_eq!(controller.state().server_filter, Some(ServerFilter::Server));
    assert_eq!(hostnames(&controller), ["db1", "web1"]);
    assert!(controller.query().contains("server_filter=server"));

    controller.set_field(FilterChange::OsName("windows".into()));
    assert_eq!(controller.state().server_filter, None);
    assert_eq!(hostnames(&controller), ["gone", "laptop", "old-pc", "web1"]);
}

#[test]
fn domain_filter_resolves_ids() {
    let mut controller = controller("", fleet());
    controller.set_domains([(1, "Corp.Local"), (2, "lab.local")].into_iter().collect::<DomainLookup>());

    controller.set_field(FilterChange::Domain("corp.local".into()));

    assert_eq!(hostnames(&controller), ["db1", "web1"]);
}

#[test]
fn pages_partition_the_filtered_set() {
    let records: Vec<ComputerRecord> = (0..45)
        .map(|i| ComputerRecord::new(i, format!("host{i:02}")))
        .collect();
    let mut controller = controller("", records);

    let mut seen = Vec::new();
    for current in 1..=4 {
        controller.on_table_change(
            TablePagination {
                current,
                page_size: 20,
            },
            TableSort {
                field: Some(SortField::Hostname),
                order: Some(SortOrder::Asc),
            },
        );
        let page = controller.page();
        assert!(page.records.len() <= 20);
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
        seen.extend(page.records.iter().map(|r| r.id));
    }
    assert_eq!(seen, (0..45).collect::<Vec<i64>>());
}

#[test]
fn filter_change_after_paging_returns_to_first_page() {
    let mut controller = controller("page=3", fleet());

    controller.set_field(FilterChange::SortOrder(SortOrder::Desc));

    assert_eq!(controller.state().page, 1);
    assert_eq!(controller.query(), "sort_order=desc");
    assert_eq!(hostnames(&controller)[0], "web2");
}

#[test]
fn unknown_os_sentinel_selects_missing_os() {
    let mut records = fleet();
    records.push(ComputerRecord::new(7, "mystery"));
    let mut controller = controller("", records);

    controller.set_field(FilterChange::OsName("unknown".into()));

    assert_eq!(hostnames(&controller), ["mystery"]);
}

#[tokio::test(start_paused = true)]
async fn typing_reaches_the_list_after_the_debounce_window() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "page=2", MemoryHistory::default());
    controller.set_records(fleet());

    for typed in ["w", "we", "web"] {
        controller.set_hostname_debounced(typed);
        tokio::time::advance(Duration::from_millis(50)).await;
    }
    // nothing applied while typing
    assert!(controller.state().hostname.is_empty());
    assert_eq!(controller.state().page, 2);
    assert!(controller.is_pending());

    controller.settle().await;

    assert_eq!(controller.state().hostname, "web");
    assert_eq!(controller.state().page, 1);
    assert_eq!(controller.query(), "hostname=web");
    assert_eq!(hostnames(&controller), ["web1", "web2"]);
    assert!(!controller.is_pending());
}

#[tokio::test(start_paused = true)]
async fn text_filters_lag_the_canonical_state() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "", MemoryHistory::default());
    controller.set_records(fleet());

    controller.set_field(FilterChange::Hostname("db".into()));

    // the URL follows immediately, the pipeline after the window
    assert_eq!(controller.query(), "hostname=db");
    assert_eq!(controller.page().total, 4);

    tokio::time::sleep(Duration::from_millis(301)).await;
    assert_eq!(hostnames(&controller), ["db1"]);
}

#[tokio::test(start_paused = true)]
async fn flush_applies_pending_input_immediately() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "", MemoryHistory::default());
    controller.set_records(fleet());

    controller.set_hostname_debounced("lap");
    controller.flush_pending();

    assert_eq!(controller.state().hostname, "lap");
    assert_eq!(hostnames(&controller), ["laptop"]);
}

#[tokio::test(start_paused = true)]
async fn clear_all_drops_pending_input() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "tab=computers", MemoryHistory::default());
    controller.set_records(fleet());

    controller.set_hostname_debounced("web");
    controller.clear_all();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!controller.sync_pending());
    assert!(controller.state().hostname.is_empty());
    assert_eq!(controller.query(), "tab=computers");
}

#[tokio::test(start_paused = true)]
async fn hiding_disabled_applies_before_the_debounce_window() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "", MemoryHistory::default());
    controller.set_records(fleet());

    controller.set_field(FilterChange::CheckStatus(Some(CheckStatus::Disabled)));
    controller.settle().await;
    assert_eq!(hostnames(&controller), ["old-pc"]);

    controller.set_field(FilterChange::ShowDisabled(false));

    let effective = controller.effective_state();
    assert!(!effective.show_disabled);
    assert_eq!(effective.check_status, None);
    assert_eq!(controller.page().total, 4);

    controller.settle().await;
    assert_eq!(controller.effective_state().check_status, None);
    assert_eq!(controller.page().total, 4);
}

#[tokio::test(start_paused = true)]
async fn published_hostname_input_stays_pending_until_applied() {
    let config = FilterConfig {
        default_page_size: 20,
        debounce_window_ms: 300,
    };
    let mut controller = FilterController::new(config, "", MemoryHistory::default());
    controller.set_records(fleet());

    controller.set_hostname_debounced("web");
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(controller.state().hostname.is_empty());
    assert!(controller.is_pending());

    assert!(controller.sync_pending());
    assert_eq!(controller.state().hostname, "web");
    controller.settle().await;
    assert!(!controller.is_pending());
}
