use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use codao::config::SignatureAlgorithm;
use codao::db::DbRow;
use codao::services::robots::CrawlerPolicy;
use codao::services::slug::validate_slug;
use codao::services::upload::{sign_params, UploadSigner};
use codao::web::{router, AppState};
use codao::{slugify, slugify_opt, Config, Database, Slug};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct CountingDatabase {
    calls: AtomicUsize,
    healthy: bool,
}

impl CountingDatabase {
    fn new(healthy: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            healthy,
        }
    }
}

#[async_trait]
impl Database for CountingDatabase {
    async fn query(&self, _sql: &str, _params: &[Value]) -> anyhow::Result<Vec<DbRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            let mut row = DbRow::new();
            row.insert("1".to_string(), json!(1));
            Ok(vec![row])
        } else {
            anyhow::bail!("Can't connect to MySQL server on 'localhost'")
        }
    }
}

mod slug_integration_tests {
    use super::*;

    #[test]
    fn test_documented_scenarios() {
        assert_eq!(slugify("Bánh Tằm Cô Đào"), "banh-tam-co-dao");
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify_opt(None), "");
        assert_eq!(slugify("Đà Nẵng"), "da-nang");
        assert_eq!(slugify("a___b---c"), "a-b-c");
    }

    #[test]
    fn test_menu_titles_produce_valid_slugs() {
        let titles = [
            "Bánh tằm bì nước cốt dừa",
            "Bánh tằm xíu mại",
            "Chè ba màu",
            "Trà đá (miễn phí)",
            "Combo gia đình #1",
        ];
        for title in titles {
            let slug = Slug::new(title);
            assert!(validate_slug(slug.as_str()), "{title} -> {slug}");
        }
        assert_eq!(slugify("Trà đá (miễn phí)"), "tra-da-mien-phi");
        assert_eq!(slugify("Combo gia đình #1"), "combo-gia-dinh-1");
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..200)
                        .map(|_| slugify("Bánh Tằm Cô Đào"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for slug in handle.join().unwrap() {
                assert_eq!(slug, "banh-tam-co-dao");
            }
        }
    }
}

mod signing_integration_tests {
    use super::*;

    #[test]
    fn test_signer_uses_configured_algorithm() {
        let mut config = Config::default();
        config.media.api_secret = "secret".to_string();
        config.media.signature_algorithm = SignatureAlgorithm::Sha256;

        let signer = UploadSigner::new(&config.media);
        let params = json!({ "timestamp": 1700000000, "folder": "menu" });
        let signed = signer.sign(params.as_object().unwrap().clone()).unwrap();

        assert_eq!(signed.signature_algorithm, "sha256");
        assert_eq!(
            signed.signature,
            sign_params(
                params.as_object().unwrap(),
                "secret",
                SignatureAlgorithm::Sha256
            )
            .unwrap()
        );
    }

    #[test]
    fn test_robots_follows_site_url() {
        let mut config = Config::default();
        config
            .apply_env(|key| (key == "BASE_URL").then(|| "https://codao.vn".to_string()))
            .unwrap();
        let policy = CrawlerPolicy::for_site(&config.site.url);
        assert!(policy
            .render()
            .ends_with("Sitemap: https://codao.vn/sitemap.xml\n"));
    }
}

mod http_integration_tests {
    use super::*;

    fn app(db: Arc<CountingDatabase>) -> axum::Router {
        let state = AppState::new(Config::default(), db).expect("state builds");
        router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_health_hits_database_each_time() {
        let db = Arc::new(CountingDatabase::new(true));
        let app = app(db.clone());

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(db.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_health_failure_is_structured() {
        let db = Arc::new(CountingDatabase::new(false));
        let response = app(db)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("MySQL"));
    }

    #[tokio::test]
    async fn test_logout_is_post_only() {
        let db = Arc::new(CountingDatabase::new(true));
        let response = app(db)
            .oneshot(Request::get("/api/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
