//! Test harness with testcontainers for integration testing.
//!
//! Uses a shared Postgres container across all tests in a binary.
//! The container and migrations are initialized once on first test, then reused.

use anyhow::{Context, Result};
use axum::Router;
use estate_core::kernel::{MockIdentityVerifier, MockSmsService, TestDependencies};
use estate_core::server::build_app;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness: a fresh pool plus the real router wired to mock SMS and
/// identity collaborators.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let res = ctx.get("/health").await;
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub deps: TestDependencies,
    app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        let _ = tokio::fs::remove_dir_all(&self.deps.upload_dir).await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        Self::with_deps(TestDependencies::new()).await
    }

    /// Build the harness around custom mocks.
    pub async fn with_deps(deps: TestDependencies) -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let server_deps = deps.clone().into_server_deps(db_pool.clone())?;
        let app = build_app(server_deps, &["http://localhost:3000".to_string()]);

        Ok(Self { db_pool, deps, app })
    }

    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn sms(&self) -> Arc<MockSmsService> {
        self.deps.sms.clone()
    }

    pub fn identity(&self) -> Arc<MockIdentityVerifier> {
        self.deps.identity.clone()
    }
}
