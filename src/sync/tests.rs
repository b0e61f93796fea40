//! Unit tests for the reconciliation loop.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::{Navigation, SyncOptions, TableQuerySync};
use crate::query::{QueryMap, QueryValue};
use crate::router::{MemoryRouter, MockQueryRouter, QueryRouter};
use crate::state::{FilterTemplate, FilterValue, Pagination, SortOrder, SortSpec};
use crate::telemetry::TelemetryEvent;
use crate::telemetry::test_support::RecordingTelemetrySink;

fn router_at(query: &str) -> MemoryRouter {
    let url = format!("https://example.test/items?{query}");
    MemoryRouter::parse(&url).expect("valid URL")
}

#[fixture]
fn table_options() -> SyncOptions {
    SyncOptions::default()
        .with_filters(
            FilterTemplate::new()
                .with("status", "all")
                .with("tags", Vec::<String>::new()),
        )
        .with_pagination(Pagination::new(1, 25))
}

/// Router mock backed by a shared query so replaces are visible to reads.
fn shared_mock(initial: QueryMap, replaces: usize) -> MockQueryRouter {
    let store = Arc::new(Mutex::new(initial));
    let reader = Arc::clone(&store);
    let writer = Arc::clone(&store);

    let mut router = MockQueryRouter::new();
    router
        .expect_query()
        .returning(move || reader.lock().expect("query lock").clone());
    router
        .expect_replace_query()
        .times(replaces)
        .returning(move |query| *writer.lock().expect("query lock") = query);
    router
}

#[rstest]
fn end_to_end_tags_change_writes_expected_query(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));

    let outcome = sync.update(|state| {
        state.filters.set("tags", vec!["a", "b"]);
    });

    assert!(outcome.replaced());
    let query = sync.router().query();
    assert_eq!(
        query.get("filters[tags]"),
        Some(&QueryValue::Multiple(vec!["a".to_owned(), "b".to_owned()]))
    );
    assert_eq!(query.non_empty("filters[status]"), Some("all"));
    assert_eq!(query.non_empty("page"), Some("1"));
    assert_eq!(query.non_empty("itemsPerPage"), Some("25"));
    assert_eq!(
        sync.router().url().query(),
        Some("filters%5Bstatus%5D=all&page=1&itemsPerPage=25&filters%5Btags%5D=a&filters%5Btags%5D=b")
    );
}

#[rstest]
#[case::word("open")]
#[case::spaced("needs review")]
#[case::symbols("a&b=c")]
fn scalar_filters_round_trip(#[case] value: &str) {
    let template = FilterTemplate::new().with("status", "");
    let options = SyncOptions::default().with_filters(template);
    let mut writer = TableQuerySync::initialize(options.clone(), router_at(""));
    writer.update(|state| {
        state.filters.set("status", value);
    });

    let (_, router) = writer.into_parts();
    let reader = TableQuerySync::initialize(options, router);

    assert_eq!(reader.filters().get("status"), Some(&FilterValue::from(value)));
}

#[rstest]
fn sequence_filters_round_trip_in_order() {
    let options = SyncOptions::default()
        .with_filters(FilterTemplate::new().with("tags", Vec::<String>::new()));
    let mut writer = TableQuerySync::initialize(options.clone(), router_at(""));
    writer.update(|state| {
        state.filters.set("tags", vec!["b", "a", "c"]);
    });

    let (_, router) = writer.into_parts();
    let reader = TableQuerySync::initialize(options, router);

    assert_eq!(
        reader.filters().get("tags"),
        Some(&FilterValue::from(vec!["b", "a", "c"]))
    );
}

#[rstest]
#[case::literal_true("true", true)]
#[case::one("1", false)]
#[case::literal_false("false", false)]
#[case::yes("yes", false)]
fn boolean_filters_restore_from_literal_true(#[case] raw: &str, #[case] expected: bool) {
    let options =
        SyncOptions::default().with_filters(FilterTemplate::new().with("archived", false));

    let sync = TableQuerySync::initialize(options, router_at(&format!("filters[archived]={raw}")));

    assert_eq!(
        sync.filters().get("archived"),
        Some(&FilterValue::Flag(expected))
    );
}

#[rstest]
fn activation_restores_before_projecting(table_options: SyncOptions) {
    let router = router_at("filters[status]=open&sortBy=name&sortOrder=desc&page=3&tab=mine");

    let sync = TableQuerySync::initialize(table_options, router);

    assert_eq!(sync.filters().get("status"), Some(&FilterValue::from("open")));
    assert_eq!(
        sync.sort_by(),
        &SortSpec::single("name", SortOrder::descending())
    );
    assert_eq!(sync.pagination().page_number(), Some(3));
    assert_eq!(sync.pagination().items_per_page_number(), Some(25));
    assert_eq!(sync.active_tab(), Some("mine"));
    assert_eq!(sync.router().query().non_empty("filters[status]"), Some("open"));
    assert_eq!(sync.router().query().non_empty("itemsPerPage"), Some("25"));
}

#[rstest]
fn canonical_url_does_not_navigate_on_activation(table_options: SyncOptions) {
    let router = shared_mock(
        QueryMap::parse("filters[status]=all&page=1&itemsPerPage=25"),
        0,
    );

    let mut sync = TableQuerySync::initialize(table_options, router);

    assert!(sync.reconcile().is_idle());
}

#[rstest]
fn repeated_projection_navigates_once(table_options: SyncOptions) {
    let router = shared_mock(QueryMap::new(), 1);
    let mut sync = TableQuerySync::initialize(table_options, router);

    assert_eq!(sync.update_query(), Navigation::Skipped);
    assert_eq!(sync.update_query(), Navigation::Skipped);
}

#[rstest]
fn partial_sort_pair_is_not_restored(table_options: SyncOptions) {
    let options = table_options.with_sort_by(SortSpec::single("name", SortOrder::ascending()));

    let sync = TableQuerySync::initialize(options, router_at("sortBy=created"));

    assert_eq!(sync.sort_by(), &SortSpec::single("name", SortOrder::ascending()));
    assert_eq!(sync.router().query().non_empty("sortBy"), Some("name"));
    assert_eq!(sync.router().query().non_empty("sortOrder"), Some("asc"));
}

#[rstest]
fn external_navigation_restores_without_echo(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));
    let replacements = sync.router().replacements();

    let pushed = QueryMap::parse("filters[status]=closed&page=2&itemsPerPage=25");
    sync.router_mut().push_query(&pushed);
    let outcome = sync.reconcile();

    assert!(outcome.restored);
    assert_eq!(outcome.navigation, Some(Navigation::Skipped));
    assert_eq!(sync.router().replacements(), replacements);
    assert_eq!(sync.filters().get("status"), Some(&FilterValue::from("closed")));
    assert_eq!(sync.pagination().page_number(), Some(2));
}

#[rstest]
fn back_navigation_restores_previous_state(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));
    sync.router_mut()
        .push_query(&QueryMap::parse("filters[status]=closed&page=1&itemsPerPage=25"));
    sync.reconcile();

    sync.router_mut()
        .push_query(&QueryMap::parse("filters[status]=open&page=1&itemsPerPage=25"));
    sync.reconcile();
    assert_eq!(sync.filters().get("status"), Some(&FilterValue::from("open")));

    assert!(sync.router_mut().back());
    sync.reconcile();
    assert_eq!(sync.filters().get("status"), Some(&FilterValue::from("closed")));
}

#[rstest]
fn query_wins_when_both_sides_change_together(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));

    sync.state_mut().filters.set("status", "open");
    sync.state_mut().active_tab = Some("mine".to_owned());
    sync.router_mut()
        .push_query(&QueryMap::parse("filters[status]=closed&page=1&itemsPerPage=25"));
    let outcome = sync.reconcile();

    assert!(outcome.restored);
    assert!(outcome.replaced());
    assert_eq!(sync.filters().get("status"), Some(&FilterValue::from("closed")));
    assert_eq!(sync.router().query().non_empty("tab"), Some("mine"));
}

#[rstest]
fn unrelated_query_keys_survive_projection(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at("utm_source=mail"));

    sync.update(|state| {
        state.filters.set("status", "open");
    });

    let query = sync.router().query();
    assert_eq!(query.non_empty("utm_source"), Some("mail"));
    assert_eq!(query.iter().next().map(|(key, _)| key), Some("utm_source"));
}

#[rstest]
fn cleared_pagination_leaves_stale_values(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));

    sync.update(|state| {
        state.pagination.page = None;
        state.active_tab = None;
    });

    assert_eq!(sync.router().query().non_empty("page"), Some("1"));
}

#[rstest]
fn zero_page_from_the_query_is_written_back(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at("page=0"));

    sync.router_mut()
        .push_query(&QueryMap::parse("filters[status]=closed"));
    let outcome = sync.reconcile();

    assert!(outcome.restored);
    let query = sync.router().query();
    assert_eq!(query.non_empty("filters[status]"), Some("closed"));
    assert_eq!(query.non_empty("page"), Some("0"));
}

#[rstest]
fn untouched_state_reconciles_idle(table_options: SyncOptions) {
    let mut sync = TableQuerySync::initialize(table_options, router_at(""));

    assert!(sync.reconcile().is_idle());
}

#[rstest]
fn telemetry_reports_restore_and_replace(table_options: SyncOptions) {
    let sink = Arc::new(RecordingTelemetrySink::default());
    let mut sync =
        TableQuerySync::with_telemetry(table_options, router_at("tab=mine"), sink.clone());

    sync.update(|state| {
        state.filters.set("status", "all");
    });

    let events = sink.events();
    assert!(matches!(
        events.first(),
        Some(TelemetryEvent::StateRestored { query }) if query == "tab=mine"
    ));
    assert!(matches!(events.get(1), Some(TelemetryEvent::QueryReplaced { .. })));
    assert_eq!(events.get(2), Some(&TelemetryEvent::ProjectionSkipped));
    assert_eq!(sink.replacements(), 1);
}
