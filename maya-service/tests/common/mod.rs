use maya_service::config::MayaConfig;
use maya_service::services::RelayService;
use maya_service::startup::Application;
use secrecy::SecretString;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// Upstream endpoints for a test run. A `None` key leaves that provider
/// unconfigured while still pointing it at `base_url`.
pub struct Upstreams {
    pub v0_base_url: String,
    pub v0_key: Option<&'static str>,
    pub gemini_base_url: String,
    pub gemini_key: Option<&'static str>,
}

pub fn test_config(upstreams: &Upstreams) -> MayaConfig {
    let mut config = MayaConfig::unconfigured();
    config.common.port = 0;
    config.v0.base_url = upstreams.v0_base_url.clone();
    config.v0.api_key = upstreams.v0_key.map(|k| SecretString::new(k.to_string()));
    config.v0.timeout = Duration::from_secs(5);
    config.gemini.base_url = upstreams.gemini_base_url.clone();
    config.gemini.api_key = upstreams.gemini_key.map(|k| SecretString::new(k.to_string()));
    config.gemini.timeout = Duration::from_secs(5);
    config
}

impl TestApp {
    pub async fn spawn(config: MayaConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    pub async fn spawn_with_relay(config: MayaConfig, relay: RelayService) -> Self {
        let app = Application::build_with_relay(config, relay)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    async fn run(app: Application) -> Self {
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send request")
    }
}

pub fn message_form(message: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().text("message", message.to_string())
}
