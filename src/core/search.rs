use crate::domain::model::{
    Category, Coordinate, Place, Region, SearchFailure, SearchOutcome, SearchState,
};
use crate::domain::ports::{PlaceQuery, PlaceSearchProvider, ProviderError, ReviewSource};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_coordinate, validate_radius};
use std::sync::Arc;

pub const CONNECTIVITY_MESSAGE: &str =
    "Sin conexión a internet. Verifica tu conexión e intenta de nuevo.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "No se pudieron cargar los resultados. Intenta con otra categoría.";

pub const DEFAULT_RESULT_LIMIT: usize = 25;

pub fn no_results_message(category: Category) -> String {
    format!(
        "No se encontraron {} en esta área",
        category.display_name().to_lowercase()
    )
}

/// 將提供者錯誤轉為兩種使用者訊息之一
pub fn classify_failure(error: &ProviderError) -> (SearchFailure, &'static str) {
    match error {
        ProviderError::NoNetwork(_) => (SearchFailure::Connectivity, CONNECTIVITY_MESSAGE),
        _ => (SearchFailure::Provider, GENERIC_FAILURE_MESSAGE),
    }
}

/// 緊急地點搜尋服務：一次查詢、裝飾評論、回傳結果
pub struct PlaceSearchService {
    provider: Arc<dyn PlaceSearchProvider>,
    reviews: Arc<dyn ReviewSource>,
    limit: usize,
}

impl PlaceSearchService {
    pub fn new(provider: Arc<dyn PlaceSearchProvider>, reviews: Arc<dyn ReviewSource>) -> Self {
        Self {
            provider,
            reviews,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// 輸入不合法時回傳 `Err`；提供者的失敗則轉成 `SearchOutcome::Failed`
    pub async fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        category: Category,
    ) -> Result<SearchOutcome> {
        // 呼叫端傳入的參數錯誤，不是設定檔錯誤
        validate_coordinate("center", &center)
            .and_then(|_| validate_radius("radius_meters", radius_meters))
            .map_err(|e| AppError::validation(e.to_string()))?;

        let query = PlaceQuery {
            query: category.query_term().to_string(),
            region: Region::around(center, radius_meters),
            limit: self.limit,
        };

        tracing::debug!(
            "Searching '{}' around {} (radius {}m)",
            query.query,
            center,
            radius_meters
        );

        let outcome = match self.provider.search(&query).await {
            Ok(items) if items.is_empty() => {
                tracing::info!("No {} found near {}", category.query_term(), center);
                SearchOutcome::NoResults {
                    message: no_results_message(category),
                }
            }
            Ok(items) => {
                let places: Vec<Place> = items
                    .into_iter()
                    .map(|raw| {
                        let name = raw.name.clone().unwrap_or_default();
                        let reviews = self.reviews.reviews_for(&name, category);
                        Place::from_provider(raw, reviews)
                    })
                    .collect();
                tracing::info!("Found {} {} places", places.len(), category.query_term());
                SearchOutcome::Results(places)
            }
            Err(e) => {
                let (kind, message) = classify_failure(&e);
                tracing::warn!("Place search failed ({:?}): {}", kind, e);
                SearchOutcome::Failed {
                    kind,
                    message: message.to_string(),
                }
            }
        };

        Ok(outcome)
    }
}

/// 由 `SearchSession::begin` 發出，用來辨識過期的回應
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    pub category: Category,
    pub sequence: u64,
}

/// 單一畫面的搜尋狀態
#[derive(Debug, Default)]
pub struct SearchSession {
    state: SearchState,
    latest_sequence: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, category: Category) -> SearchTicket {
        self.latest_sequence += 1;
        self.state = SearchState::Searching {
            category,
            sequence: self.latest_sequence,
        };
        SearchTicket {
            category,
            sequence: self.latest_sequence,
        }
    }

    /// 只套用最新一次請求的結果；過期回應被丟棄並回傳 `false`
    pub fn complete(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        if ticket.sequence != self.latest_sequence {
            tracing::debug!(
                "Discarding stale {} response (sequence {}, latest {})",
                ticket.category.query_term(),
                ticket.sequence,
                self.latest_sequence
            );
            return false;
        }
        self.apply(ticket.category, outcome);
        true
    }

    /// 不檢查序號：最後抵達的回應覆蓋狀態，即使它屬於較舊的請求
    pub fn complete_unsequenced(&mut self, ticket: SearchTicket, outcome: SearchOutcome) {
        self.apply(ticket.category, outcome);
    }

    pub async fn run(
        &mut self,
        service: &PlaceSearchService,
        center: Coordinate,
        radius_meters: f64,
        category: Category,
    ) -> Result<&SearchState> {
        let ticket = self.begin(category);
        match service.search(center, radius_meters, category).await {
            Ok(outcome) => {
                self.complete(ticket, outcome);
                Ok(&self.state)
            }
            Err(e) => {
                self.state = SearchState::Idle;
                Err(e)
            }
        }
    }

    fn apply(&mut self, category: Category, outcome: SearchOutcome) {
        self.state = match outcome {
            SearchOutcome::Results(places) => SearchState::Results { category, places },
            SearchOutcome::NoResults { message } => SearchState::NoResults { category, message },
            SearchOutcome::Failed { kind, message } => SearchState::Error {
                category,
                failure: kind,
                message,
            },
        };
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, SearchState::Searching { .. })
    }

    pub fn places(&self) -> &[Place] {
        match &self.state {
            SearchState::Results { places, .. } => places,
            _ => &[],
        }
    }

    /// 無結果訊息或錯誤訊息
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SearchState::NoResults { message, .. } | SearchState::Error { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SearchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProviderPlace, Review};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct StubProvider {
        response: std::result::Result<Vec<ProviderPlace>, ProviderError>,
        queries: Mutex<Vec<PlaceQuery>>,
    }

    impl StubProvider {
        fn new(response: std::result::Result<Vec<ProviderPlace>, ProviderError>) -> Self {
            Self {
                response,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlaceSearchProvider for StubProvider {
        async fn search(
            &self,
            query: &PlaceQuery,
        ) -> std::result::Result<Vec<ProviderPlace>, ProviderError> {
            self.queries.lock().unwrap().push(query.clone());
            self.response.clone()
        }
    }

    struct FixedReviews;

    impl ReviewSource for FixedReviews {
        fn reviews_for(&self, _place_name: &str, _category: Category) -> Vec<Review> {
            vec![Review::new("Luis", 4, "Buena atención", Utc::now(), None).unwrap()]
        }
    }

    fn raw(name: &str) -> ProviderPlace {
        ProviderPlace {
            name: Some(name.to_string()),
            coordinate: Coordinate::new(20.67, -103.35),
            phone: Some("+52 33 1234 5678".to_string()),
            url: None,
        }
    }

    fn service(provider: Arc<StubProvider>) -> PlaceSearchService {
        PlaceSearchService::new(provider, Arc::new(FixedReviews))
    }

    fn center() -> Coordinate {
        Coordinate::new(20.6597, -103.3496)
    }

    #[tokio::test]
    async fn test_results_are_decorated_with_reviews() {
        let provider = Arc::new(StubProvider::new(Ok(vec![
            raw("Hospital Civil"),
            raw("Cruz Verde"),
        ])));
        let outcome = service(provider.clone())
            .search(center(), 3500.0, Category::Hospital)
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Results(places) => {
                assert_eq!(places.len(), 2);
                assert!(places.iter().all(|p| p.reviews.len() == 1));
                assert_ne!(places[0].id, places[1].id);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query, "hospital");
        assert_eq!(queries[0].region.span_meters, 7000.0);
    }

    #[tokio::test]
    async fn test_empty_response_is_no_results() {
        let provider = Arc::new(StubProvider::new(Ok(vec![])));
        let outcome = service(provider)
            .search(center(), 3500.0, Category::Hospital)
            .await
            .unwrap();

        match outcome {
            SearchOutcome::NoResults { message } => assert!(message.contains("hospitales")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_network_maps_to_connectivity_message() {
        let provider = Arc::new(StubProvider::new(Err(ProviderError::NoNetwork(
            "connection refused".into(),
        ))));
        let outcome = service(provider)
            .search(center(), 3500.0, Category::Pharmacy)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::Failed {
                kind: SearchFailure::Connectivity,
                message: CONNECTIVITY_MESSAGE.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_other_failures_map_to_generic_message() {
        for error in [
            ProviderError::Status {
                status: 503,
                body: "unavailable".into(),
            },
            ProviderError::Decode("bad json".into()),
            ProviderError::Other("timeout".into()),
        ] {
            let provider = Arc::new(StubProvider::new(Err(error)));
            let outcome = service(provider)
                .search(center(), 3500.0, Category::Police)
                .await
                .unwrap();
            assert_eq!(
                outcome,
                SearchOutcome::Failed {
                    kind: SearchFailure::Provider,
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_query() {
        let provider = Arc::new(StubProvider::new(Ok(vec![])));
        let svc = service(provider.clone());

        let err = svc.search(center(), 0.0, Category::Fire).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));
        assert_eq!(err.severity(), crate::utils::error::ErrorSeverity::Low);

        let err = svc
            .search(Coordinate::new(120.0, 0.0), 3500.0, Category::Fire)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));
        assert!(provider.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_never_holds_results_and_error() {
        for category in Category::ALL {
            let provider = Arc::new(StubProvider::new(Ok(vec![raw("Lugar")])));
            let svc = service(provider);
            let mut session = SearchSession::new();
            session
                .run(&svc, center(), 3500.0, category)
                .await
                .unwrap();
            assert!(!session.places().is_empty());
            assert!(session.error_message().is_none());
            assert!(!session.is_searching());
        }
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = SearchSession::new();
        let first = session.begin(Category::Hospital);
        let second = session.begin(Category::Pharmacy);

        assert!(session.complete(
            second,
            SearchOutcome::NoResults {
                message: no_results_message(Category::Pharmacy),
            },
        ));
        assert!(!session.complete(first, SearchOutcome::Results(vec![])));

        match session.state() {
            SearchState::NoResults { category, .. } => assert_eq!(*category, Category::Pharmacy),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_unsequenced_completion_last_arrival_wins() {
        let mut session = SearchSession::new();
        let first = session.begin(Category::Hospital);
        let second = session.begin(Category::Pharmacy);

        session.complete_unsequenced(
            second,
            SearchOutcome::NoResults {
                message: no_results_message(Category::Pharmacy),
            },
        );
        // the older response arrives last and overwrites the newer one
        session.complete_unsequenced(
            first,
            SearchOutcome::Failed {
                kind: SearchFailure::Provider,
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            },
        );

        match session.state() {
            SearchState::Error { category, .. } => assert_eq!(*category, Category::Hospital),
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
