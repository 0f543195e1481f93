//! Dashboard filter state: a draft edited by the user, an applied copy that
//! alone drives the primary data load, and the dependent series dropdown.
//!
//! [`DashboardState`] is a plain state machine: every load is started by a
//! transition that hands back a request, and finished by passing the request
//! back with its result. [`DashboardSession`] runs those requests against a
//! [`CarService`].

use crate::{
    car_api::{CarApiError, CarService, CarTransport},
    dashboard_data::DashboardData,
    filters::{is_sentinel, DashboardFilters, FilterField, SENTINEL_ALL_TR},
    options::OptionLevel,
};

pub const PRIMARY_LOAD_ERROR: &str = "Could not connect to the server.";

/// What to do with a primary response that is not the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Apply every response in the order it resolves.
    #[default]
    LastResolvedWins,
    /// Drop responses whose request was superseded by a later commit.
    LatestOnly,
}

/// Sequence number of a primary load, increasing with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A primary load in flight: its ticket and the applied filters it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRequest {
    pub ticket: RequestTicket,
    pub filters: DashboardFilters,
}

/// A series reload for the brand selected in the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub ticket: u64,
    pub brand: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    PrimaryData,
    DependentOptions,
}

/// Coarse view of the state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPhase {
    Idle,
    LoadingPrimaryData,
    LoadingDependentOptions,
    Error { target: LoadTarget, message: String },
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    draft: DashboardFilters,
    applied: DashboardFilters,
    policy: StalePolicy,
    data: Option<DashboardData>,
    displayed: Option<RequestTicket>,
    primary_error: Option<String>,
    issued: u64,
    outstanding: usize,
    all_brands: Option<Vec<String>>,
    series: OptionLevel,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl DashboardState {
    pub fn new(policy: StalePolicy) -> Self {
        Self {
            draft: DashboardFilters::initial(),
            applied: DashboardFilters::initial(),
            policy,
            data: None,
            displayed: None,
            primary_error: None,
            issued: 0,
            outstanding: 0,
            all_brands: None,
            series: OptionLevel::default(),
        }
    }

    pub fn draft(&self) -> &DashboardFilters {
        &self.draft
    }

    pub fn applied(&self) -> &DashboardFilters {
        &self.applied
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    /// Ticket of the response currently shown.
    pub fn displayed(&self) -> Option<RequestTicket> {
        self.displayed
    }

    /// Brands captured from the first successful load.
    pub fn all_brands(&self) -> &[String] {
        self.all_brands.as_deref().unwrap_or_default()
    }

    pub fn series(&self) -> &OptionLevel {
        &self.series
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding > 0
    }

    pub fn primary_error(&self) -> Option<&str> {
        self.primary_error.as_deref()
    }

    /// The series dropdown is usable only for a concrete brand with items.
    pub fn series_selectable(&self) -> bool {
        let brand = self.draft.brand.as_deref().unwrap_or_default();
        !self.series.items().is_empty() && !is_sentinel(brand) && !self.series.is_loading()
    }

    pub fn phase(&self) -> DashboardPhase {
        if let Some(message) = &self.primary_error {
            return DashboardPhase::Error {
                target: LoadTarget::PrimaryData,
                message: message.clone(),
            };
        }
        if self.is_loading() {
            return DashboardPhase::LoadingPrimaryData;
        }
        if self.series.is_loading() {
            return DashboardPhase::LoadingDependentOptions;
        }
        if let Some(message) = self.series.error() {
            return DashboardPhase::Error {
                target: LoadTarget::DependentOptions,
                message: message.to_string(),
            };
        }
        DashboardPhase::Idle
    }

    /// First load with the initial filters.
    pub fn mount(&mut self) -> PrimaryRequest {
        self.begin_primary()
    }

    /// Edit one draft field. Changing the brand resets the draft series and
    /// returns the series reload to run; nothing here refetches primary data.
    pub fn set_field(&mut self, field: FilterField, value: &str) -> Option<SeriesRequest> {
        match field {
            FilterField::Brand => self.select_brand(value),
            _ => {
                self.draft.set(field, value);
                None
            },
        }
    }

    pub fn select_brand(&mut self, brand: &str) -> Option<SeriesRequest> {
        self.draft.set(FilterField::Brand, brand);
        self.draft.set(FilterField::Series, SENTINEL_ALL_TR);

        if is_sentinel(brand) {
            self.series.reset();
            return None;
        }
        let ticket = self.series.begin(brand);
        Some(SeriesRequest {
            ticket,
            brand: brand.to_string(),
        })
    }

    pub fn finish_series(
        &mut self,
        request: &SeriesRequest,
        result: Result<Vec<String>, CarApiError>,
    ) {
        let result = result.map_err(|err| {
            tracing::warn!(brand = %request.brand, "series load failed: {err}");
            err.to_string()
        });
        self.series.finish(request.ticket, result);
    }

    /// Promote the draft to the applied filters and start the refetch.
    pub fn commit(&mut self) -> PrimaryRequest {
        self.applied = self.draft.clone();
        self.begin_primary()
    }

    /// Re-run the load for the currently applied filters.
    pub fn retry(&mut self) -> PrimaryRequest {
        self.begin_primary()
    }

    /// Apply a primary response. Returns `false` if it was discarded.
    pub fn resolve_primary(
        &mut self,
        request: &PrimaryRequest,
        result: Result<DashboardData, CarApiError>,
    ) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);

        let latest = RequestTicket(self.issued);
        if self.policy == StalePolicy::LatestOnly && request.ticket != latest {
            tracing::debug!(
                ticket = request.ticket.seq(),
                latest = latest.seq(),
                "discarding superseded dashboard response"
            );
            return false;
        }

        match result {
            Ok(data) => {
                if self.all_brands.is_none() {
                    self.all_brands = Some(data.brands.clone());
                }
                if request.filters.effective_brand().is_none() {
                    self.series.replace(data.series_list.clone());
                }
                self.data = Some(data);
                self.displayed = Some(request.ticket);
                self.primary_error = None;
            },
            Err(err) => {
                tracing::error!(ticket = request.ticket.seq(), "dashboard load failed: {err}");
                self.primary_error = Some(PRIMARY_LOAD_ERROR.to_string());
            },
        }
        true
    }

    fn begin_primary(&mut self) -> PrimaryRequest {
        self.issued += 1;
        self.outstanding += 1;
        self.primary_error = None;
        PrimaryRequest {
            ticket: RequestTicket(self.issued),
            filters: self.applied.clone(),
        }
    }
}

/// Drives a [`DashboardState`] against the car service, one request at a time.
pub struct DashboardSession<T> {
    service: CarService<T>,
    state: DashboardState,
}

impl<T: CarTransport> DashboardSession<T> {
    pub fn new(service: CarService<T>, policy: StalePolicy) -> Self {
        Self {
            service,
            state: DashboardState::new(policy),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn service(&self) -> &CarService<T> {
        &self.service
    }

    pub async fn mount(&mut self) {
        let request = self.state.mount();
        self.load(request).await;
    }

    /// Draft edit; a brand change also reloads the series dropdown.
    pub async fn set_field(&mut self, field: FilterField, value: &str) {
        if let Some(request) = self.state.set_field(field, value) {
            let result = self.service.get_series_by_brand(&request.brand).await;
            self.state.finish_series(&request, result);
        }
    }

    pub async fn apply(&mut self) {
        let request = self.state.commit();
        self.load(request).await;
    }

    pub async fn retry(&mut self) {
        let request = self.state.retry();
        self.load(request).await;
    }

    async fn load(&mut self, request: PrimaryRequest) {
        let result = self.service.get_dashboard_data(&request.filters).await;
        self.state.resolve_primary(&request, result);
    }
}
