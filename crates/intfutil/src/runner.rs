//! Namespace fan-out.
//!
//! Namespaces are processed strictly one after another. Each gets fresh
//! store handles, a fresh catalog and a fresh LAG speed map; the handles
//! are dropped before the next namespace is opened.

use tracing::{error, info, instrument, warn};

use crate::catalog::EntityCatalog;
use crate::display::DisplayFilter;
use crate::error::{IntfUtilError, IntfUtilResult};
use crate::lag_speed::LagSpeedMap;
use crate::namespace::{DbConnector, Namespace, NamespaceDbs};
use crate::port_type::PortCapabilities;
use crate::render::{render_table, sort_rows};
use crate::report::{ReportGenerator, ReportQuery, Row};
use crate::resolver::FieldResolver;

/// Rows collected across namespaces.
#[derive(Debug)]
pub struct Report {
    pub header: Vec<&'static str>,
    pub rows: Vec<Row>,
    /// Namespaces that failed and were left out.
    pub failures: Vec<(Namespace, IntfUtilError)>,
}

impl Report {
    /// Returns true if every namespace contributed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Renders the rows naturally sorted by interface name.
    pub fn render(&self) -> String {
        let mut rows = self.rows.clone();
        sort_rows(&mut rows);
        render_table(&self.header, &rows)
    }
}

/// Picks the namespaces to visit. `filter` must name a known namespace.
pub fn select_namespaces(
    available: &[Namespace],
    filter: Option<&str>,
) -> IntfUtilResult<Vec<Namespace>> {
    match filter {
        None => Ok(available.to_vec()),
        Some(name) => available
            .iter()
            .find(|ns| ns.name() == name)
            .map(|ns| vec![ns.clone()])
            .ok_or_else(|| IntfUtilError::UnknownNamespace {
                namespace: name.to_string(),
            }),
    }
}

/// Runs a report over a list of namespaces.
pub struct FanOutRunner<C> {
    connector: C,
    caps: PortCapabilities,
}

impl<C: DbConnector> FanOutRunner<C> {
    pub fn new(connector: C, caps: PortCapabilities) -> Self {
        Self { connector, caps }
    }

    /// Runs `query` over `namespaces` in order.
    ///
    /// A namespace whose stores cannot be opened aborts the run. A namespace
    /// whose catalog or fields cannot be read is logged, recorded in
    /// [`Report::failures`] and skipped.
    pub async fn run(
        &self,
        namespaces: &[Namespace],
        query: &ReportQuery,
        display: &dyn DisplayFilter,
    ) -> IntfUtilResult<Report> {
        let mut report = Report {
            header: query.header(),
            rows: Vec::new(),
            failures: Vec::new(),
        };

        for namespace in namespaces {
            let dbs = self.connector.connect(namespace).await.map_err(|source| {
                IntfUtilError::StoreUnavailable {
                    namespace: namespace.to_string(),
                    source,
                }
            })?;

            match self.run_namespace(&dbs, query, display).await {
                Ok(rows) => report.rows.extend(rows),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(namespace = %namespace, "{}", e);
                    report.failures.push((namespace.clone(), e));
                }
            }
        }

        info!(
            namespaces = namespaces.len(),
            rows = report.rows.len(),
            failures = report.failures.len(),
            "Report complete"
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(namespace = %dbs.namespace))]
    async fn run_namespace(
        &self,
        dbs: &NamespaceDbs,
        query: &ReportQuery,
        display: &dyn DisplayFilter,
    ) -> IntfUtilResult<Vec<Row>> {
        let catalog = EntityCatalog::build(dbs).await?;
        if !catalog.membership_conflicts().is_empty() {
            warn!(
                ports = ?catalog.membership_conflicts(),
                "Ports are members of more than one LAG; each is shown in the last one"
            );
        }

        let query_error = |source| IntfUtilError::Query {
            namespace: dbs.namespace.to_string(),
            source,
        };

        let lag_speeds = LagSpeedMap::compute_all(&catalog, dbs, &self.caps)
            .await
            .map_err(query_error)?;
        let resolver = FieldResolver::new(dbs, &catalog, &lag_speeds, &self.caps);

        ReportGenerator::new(query, dbs, &catalog, resolver, display)
            .rows()
            .await
            .map_err(query_error)
    }
}
