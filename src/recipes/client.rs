//! Client for the recipe backend
//!
//! Every operation is a single JSON `POST` against `{backend_url}:{port}`.
//! There are no retries and no authentication.

use crate::integration::AppConfig;
use crate::recipes::types::Recipe;
use crate::{FlavorError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Audio settings the backend forwards to its speech recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

/// Body of `/get-recipes`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    /// Base64-encoded recording
    pub audio_url: String,
    pub audio_config: AudioConfig,
}

/// Reply of `/get-recipes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// What the recognizer heard
    #[serde(default)]
    pub input: String,
    /// Optional natural-language reply to speak back
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Default, Deserialize)]
struct RecipesResponse {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopularRequest {
    on_home_page: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendedRequest<'a> {
    liked_recipe_ids: &'a [String],
    on_home_page: bool,
}

#[derive(Serialize)]
struct CategoryRequest<'a> {
    category: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdsRequest<'a> {
    recipe_ids: &'a [String],
}

pub const POPULAR_PATH: &str = "/get-popular-recipes";
pub const RECOMMENDED_PATH: &str = "/get-recommended-recipes";
pub const CATEGORY_PATH: &str = "/get-recipes-by-category";
pub const IDS_PATH: &str = "/get-recipes-by-ids";
pub const TRANSCRIBE_PATH: &str = "/get-recipes";

/// Remote operations consumed by the views and the voice search
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn popular(&self, on_home_page: bool) -> Result<Vec<Recipe>>;

    async fn recommended(&self, liked_ids: &[String], on_home_page: bool) -> Result<Vec<Recipe>>;

    async fn by_category(&self, category: &str) -> Result<Vec<Recipe>>;

    async fn by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>>;

    async fn transcribe_and_search(&self, request: &TranscribeRequest) -> Result<SearchResponse>;
}

/// [`RecipeService`] over HTTP
pub struct HttpRecipeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecipeClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FlavorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config.base_url()))
    }

    /// Use an already configured reqwest client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let start = Instant::now();
        let response = self.client.post(self.url(path)).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FlavorError::Http { status, body });
        }

        let reply = response.json::<R>().await?;
        debug!("POST {} took {}ms", path, start.elapsed().as_millis());
        Ok(reply)
    }
}

#[async_trait]
impl RecipeService for HttpRecipeClient {
    async fn popular(&self, on_home_page: bool) -> Result<Vec<Recipe>> {
        let reply: RecipesResponse = self
            .post(POPULAR_PATH, &PopularRequest { on_home_page })
            .await?;
        Ok(reply.recipes)
    }

    async fn recommended(&self, liked_ids: &[String], on_home_page: bool) -> Result<Vec<Recipe>> {
        let body = RecommendedRequest {
            liked_recipe_ids: liked_ids,
            on_home_page,
        };
        let reply: RecipesResponse = self.post(RECOMMENDED_PATH, &body).await?;
        Ok(reply.recipes)
    }

    async fn by_category(&self, category: &str) -> Result<Vec<Recipe>> {
        let reply: RecipesResponse = self
            .post(CATEGORY_PATH, &CategoryRequest { category })
            .await?;
        Ok(reply.recipes)
    }

    async fn by_ids(&self, ids: &[String]) -> Result<Vec<Recipe>> {
        let reply: RecipesResponse = self.post(IDS_PATH, &IdsRequest { recipe_ids: ids }).await?;
        Ok(reply.recipes)
    }

    async fn transcribe_and_search(&self, request: &TranscribeRequest) -> Result<SearchResponse> {
        info!(
            "Uploading {} bytes of encoded audio ({}, {} Hz)",
            request.audio_url.len(),
            request.audio_config.encoding,
            request.audio_config.sample_rate_hertz
        );
        self.post(TRANSCRIBE_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    #[test]
    fn test_request_bodies_use_camel_case() {
        let ids = vec!["a".to_string(), "b".to_string()];

        let body = serde_json::to_value(RecommendedRequest {
            liked_recipe_ids: &ids,
            on_home_page: true,
        })
        .unwrap();
        assert_eq!(body, json!({"likedRecipeIds": ["a", "b"], "onHomePage": true}));

        let body = serde_json::to_value(IdsRequest { recipe_ids: &ids }).unwrap();
        assert_eq!(body, json!({"recipeIds": ["a", "b"]}));

        let body = serde_json::to_value(PopularRequest { on_home_page: false }).unwrap();
        assert_eq!(body, json!({"onHomePage": false}));

        let body = serde_json::to_value(CategoryRequest { category: "baking" }).unwrap();
        assert_eq!(body, json!({"category": "baking"}));
    }

    #[test]
    fn test_transcribe_request_shape() {
        let request = TranscribeRequest {
            audio_url: "UklGRg==".into(),
            audio_config: AudioConfig {
                encoding: "LINEAR16".into(),
                sample_rate_hertz: 16000,
                language_code: "en-GB".into(),
            },
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "audioUrl": "UklGRg==",
                "audioConfig": {
                    "encoding": "LINEAR16",
                    "sampleRateHertz": 16000,
                    "languageCode": "en-GB"
                }
            })
        );
    }

    #[test]
    fn test_search_response_defaults() {
        let reply: SearchResponse = serde_json::from_str(r#"{"input": "pasta"}"#).unwrap();
        assert_eq!(reply.input, "pasta");
        assert!(reply.answer.is_empty());
        assert!(reply.recipes.is_empty());

        let reply: RecipesResponse =
            serde_json::from_str(r#"{"recipes": [], "message": "No recipes found."}"#).unwrap();
        assert!(reply.recipes.is_empty());
    }

    /// Serve one canned reply and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (base_url, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(raw).unwrap()
    }

    fn client(base_url: &str) -> HttpRecipeClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpRecipeClient::with_client(client, base_url)
    }

    #[tokio::test]
    async fn test_popular_posts_json_to_its_path() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"recipes": [{"Id": "a", "Name": "Apple pie"}]}"#).await;

        let recipes = client(&base_url).popular(true).await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Apple pie");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /get-popular-recipes HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"onHomePage":true}"#));
    }

    #[tokio::test]
    async fn test_backend_error_reply_maps_to_http_error() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"error": "database unavailable"}"#).await;

        let err = client(&base_url).by_category("baking").await.unwrap_err();
        match err {
            FlavorError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error": "database unavailable"}"#);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /get-recipes-by-category HTTP/1.1\r\n"));
        assert!(request.ends_with(r#"{"category":"baking"}"#));
    }

    #[tokio::test]
    async fn test_reply_without_recipes_is_empty() {
        let (base_url, server) = serve_once("200 OK", r#"{"message": "No recipes found."}"#).await;

        let ids = vec!["x".to_string()];
        let recipes = client(&base_url).by_ids(&ids).await.unwrap();
        assert!(recipes.is_empty());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /get-recipes-by-ids HTTP/1.1\r\n"));
        assert!(request.ends_with(r#"{"recipeIds":["x"]}"#));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_a_decode_error() {
        let (base_url, server) = serve_once("200 OK", "not json").await;

        let err = client(&base_url).popular(false).await.unwrap_err();
        assert!(matches!(err, FlavorError::Decode(_)), "got {:?}", err);
        server.await.unwrap();
    }

    #[test]
    fn test_client_base_url() {
        let config = AppConfig::default().with_backend("http://10.0.0.5");
        let client = HttpRecipeClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:8000");
        assert_eq!(client.url(IDS_PATH), "http://10.0.0.5:8000/get-recipes-by-ids");
    }
}
