#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use folio_shared::{
        car_api::{CarApiError, CarService, CarTransport, ShapImage},
        dashboard::{DashboardPhase, DashboardSession, StalePolicy, PRIMARY_LOAD_ERROR},
        options::LoadState,
        predict_form::{
            AnalysisStatus, DriftComparison, PredictForm, PredictStatus, ANALYSIS_FAILED,
            PREDICTION_FAILED, SAME_VERSION, VERSIONS_FAILED,
        },
        FilterField, SENTINEL_ALL_TR,
    };
    use serde_json::{json, Value};

    /// In-memory service that records every call.
    #[derive(Default)]
    struct FakeTransport {
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
        offline: AtomicBool,
        fail_predict: AtomicBool,
    }

    impl FakeTransport {
        fn calls_to(&self, path: &str) -> Vec<Vec<(String, String)>> {
            self.calls
                .lock()
                .expect("calls lock")
                .iter()
                .filter(|(called, _)| called == path)
                .map(|(_, query)| query.clone())
                .collect()
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn record(&self, path: &str, query: &[(&str, String)]) -> Result<(), CarApiError> {
            self.calls.lock().expect("calls lock").push((
                path.to_string(),
                query
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect(),
            ));
            if self.offline.load(Ordering::SeqCst) {
                return Err(CarApiError::Status {
                    endpoint: path.to_string(),
                    status: 503,
                });
            }
            Ok(())
        }
    }

    fn query_value<'a>(query: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value.as_str())
    }

    #[async_trait]
    impl CarTransport for FakeTransport {
        fn url(&self, path: &str) -> String {
            format!("memory://{path}")
        }

        async fn get_json(
            &self,
            path: &str,
            query: &[(&str, String)],
        ) -> Result<Value, CarApiError> {
            self.record(path, query)?;
            let brand = query_value(query, "brand");
            let body = match path {
                "/api/dashboard-data" => json!({
                    "kpi": {"total": 10, "avgPrice": 1.0},
                    "brands": ["BMW", "Fiat"],
                    "seriesList": match brand {
                        Some("BMW") => json!(["X1"]),
                        _ => json!(["3 Serisi", "Egea"]),
                    },
                }),
                "/api/options" => match (brand, query_value(query, "series")) {
                    (None, _) => json!({"brands": ["BMW", "Fiat"]}),
                    (Some(_), None) => json!({"series": ["3 Serisi", "5 Serisi"]}),
                    (Some(_), Some(_)) => json!({"models": ["320i", "320d"]}),
                },
                "/versions" => json!([
                    {"version_id": "v3", "date": "2024-07-01"},
                    {"version_id": "v2", "date": "2024-06-01"}
                ]),
                "/drift/v2/v3" => json!({"results": [{
                    "feature": "year",
                    "p_value": 0.3,
                    "emd_score": 0.1,
                    "drift_detected": false
                }]}),
                other => {
                    return Err(CarApiError::Status {
                        endpoint: other.to_string(),
                        status: 404,
                    })
                },
            };
            Ok(body)
        }

        async fn post_json(&self, path: &str, _body: &Value) -> Result<Value, CarApiError> {
            self.record(path, &[])?;
            if self.fail_predict.load(Ordering::SeqCst) {
                return Err(CarApiError::Status {
                    endpoint: path.to_string(),
                    status: 500,
                });
            }
            Ok(json!({
                "price": 900000.0,
                "price_range": {"min": 850000.0, "max": 950000.0},
                "calculated_risk_score": 0.2,
                "currency": "TRY"
            }))
        }

        async fn get_bytes(&self, path: &str) -> Result<ShapImage, CarApiError> {
            self.record(path, &[])?;
            Ok(ShapImage {
                bytes: Vec::new(),
                content_type: None,
            })
        }
    }

    fn new_session(policy: StalePolicy) -> DashboardSession<FakeTransport> {
        DashboardSession::new(CarService::new(FakeTransport::default()), policy)
    }

    #[tokio::test]
    async fn only_apply_refetches_primary_data() {
        let mut session = new_session(StalePolicy::default());
        session.mount().await;
        assert_eq!(session.state().all_brands(), ["BMW".to_string(), "Fiat".to_string()]);
        assert_eq!(session.state().series().items().len(), 2);

        session.set_field(FilterField::MinYear, "2018").await;
        session.set_field(FilterField::Brand, "BMW").await;
        let transport = session.service().transport();
        assert_eq!(transport.calls_to("/api/dashboard-data").len(), 1);
        assert_eq!(transport.calls_to("/api/options").len(), 1);
        assert_eq!(session.state().draft().series.as_deref(), Some(SENTINEL_ALL_TR));
        assert_eq!(
            session.state().series().items(),
            ["3 Serisi".to_string(), "5 Serisi".to_string()]
        );

        session.apply().await;
        let loads = session.service().transport().calls_to("/api/dashboard-data");
        assert_eq!(loads.len(), 2);
        assert_eq!(
            loads[1],
            vec![
                ("brand".to_string(), "BMW".to_string()),
                ("min_year".to_string(), "2018".to_string()),
            ]
        );
        // Scoped load: the payload's series list is not adopted.
        assert_eq!(session.state().series().items().len(), 2);
        assert_eq!(session.state().phase(), DashboardPhase::Idle);
    }

    #[tokio::test]
    async fn sentinel_brand_skips_series_request() {
        let mut session = new_session(StalePolicy::default());
        session.set_field(FilterField::Brand, SENTINEL_ALL_TR).await;
        assert!(session.service().transport().calls_to("/api/options").is_empty());
        assert!(session.state().series().items().is_empty());
        assert!(!session.state().series_selectable());
    }

    #[tokio::test]
    async fn failed_load_recovers_on_retry() {
        let mut session = new_session(StalePolicy::LatestOnly);
        session.service().transport().set_offline(true);
        session.mount().await;
        assert_eq!(session.state().primary_error(), Some(PRIMARY_LOAD_ERROR));
        assert!(session.state().data().is_none());

        session.service().transport().set_offline(false);
        session.retry().await;
        assert_eq!(session.state().primary_error(), None);
        assert_eq!(session.state().data().map(|data| data.kpi.total), Some(10));
    }

    #[tokio::test]
    async fn predict_form_cascade_and_submit() {
        let service = CarService::new(FakeTransport::default());
        let mut form = PredictForm::new();
        form.load_brands(&service).await;
        assert_eq!(form.brands().items().len(), 2);

        form.select_brand(&service, "BMW").await;
        form.select_series(&service, "3 Serisi").await;
        assert_eq!(form.models().items(), ["320i".to_string(), "320d".to_string()]);
        form.set_model("320i");

        form.select_brand(&service, "Fiat").await;
        assert_eq!(form.input().series, "");
        assert_eq!(form.input().model, "");
        assert!(form.models().items().is_empty());

        form.select_series(&service, "Egea").await;
        form.set_model("1.3 Multijet");
        let status = form.submit(&service).await.clone();
        assert!(matches!(status, PredictStatus::Done(ref result) if result.currency == "TRY"));
        assert_eq!(service.transport().calls_to("/predict/v3").len(), 1);
    }

    #[tokio::test]
    async fn predict_form_reports_validation_and_service_failures() {
        let service = CarService::new(FakeTransport::default());
        let mut form = PredictForm::new();

        let status = form.submit(&service).await.clone();
        assert_eq!(
            status,
            PredictStatus::Failed(
                "Please complete Brand, Series, and Model selections.".to_string()
            )
        );
        assert!(service.transport().calls_to("/versions").is_empty());

        form.select_brand(&service, "BMW").await;
        form.select_series(&service, "3 Serisi").await;
        form.set_model("320i");
        service.transport().fail_predict.store(true, Ordering::SeqCst);
        let status = form.submit(&service).await.clone();
        assert_eq!(status, PredictStatus::Failed(PREDICTION_FAILED.to_string()));
    }

    #[tokio::test]
    async fn drift_comparison_defaults_and_same_version_guard() {
        let service = CarService::new(FakeTransport::default());
        let mut drift = DriftComparison::default();
        drift.load_versions(&service).await;
        assert_eq!(drift.reference(), Some("v2"));
        assert_eq!(drift.current(), Some("v3"));

        assert_eq!(drift.analyze(&service).await, &AnalysisStatus::Done);
        assert_eq!(drift.results().len(), 1);

        drift.set_reference("v3");
        assert_eq!(
            drift.analyze(&service).await,
            &AnalysisStatus::Failed(SAME_VERSION.to_string())
        );
        assert_eq!(service.transport().calls_to("/drift/v2/v3").len(), 1);
        assert!(service.transport().calls_to("/drift/v3/v3").is_empty());
    }

    #[tokio::test]
    async fn drift_comparison_reports_fixed_failure_messages() {
        let service = CarService::new(FakeTransport::default());
        let mut drift = DriftComparison::default();

        service.transport().set_offline(true);
        drift.load_versions(&service).await;
        assert_eq!(drift.versions_state(), &LoadState::Failed(VERSIONS_FAILED.to_string()));
        assert_eq!(drift.empty_message(), None);

        service.transport().set_offline(false);
        drift.load_versions(&service).await;
        assert_eq!(drift.versions_state(), &LoadState::Loaded);

        service.transport().set_offline(true);
        assert_eq!(
            drift.analyze(&service).await,
            &AnalysisStatus::Failed(ANALYSIS_FAILED.to_string())
        );
        assert!(drift.results().is_empty());
    }
}
