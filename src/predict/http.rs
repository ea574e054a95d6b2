// src/predict/http.rs

use super::{
    PredictionClient, PredictionRequest, PredictionSet, TransportError, TODAY_PART, TOMORROW_PART,
};
use crate::dataset::SelectedFile;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// `reqwest`-backed client posting both uploads as one multipart form.
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn file_part(file: &SelectedFile) -> Part {
    Part::bytes(file.contents.to_vec()).file_name(file.name.clone())
}

impl PredictionClient for HttpPredictionClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionSet, TransportError> {
        let form = Form::new()
            .part(TODAY_PART, file_part(&request.today))
            .part(TOMORROW_PART, file_part(&request.tomorrow));

        let resp = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            warn!(status = status.as_u16(), "prediction service rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let set: PredictionSet = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        info!(rows = set.len(), "received predictions");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::PredictionRow;
    use futures::TryStreamExt;
    use std::{net::SocketAddr, sync::Arc};
    use tokio::sync::Mutex;
    use warp::{multipart::FormData, Buf, Filter};

    type Seen = Arc<Mutex<Vec<Received>>>;

    type Received = (String, Option<String>, Vec<u8>);

    async fn collect_parts(form: FormData) -> Result<Vec<Received>, warp::Error> {
        form.and_then(|mut part| async move {
            let name = part.name().to_string();
            let filename = part.filename().map(str::to_string);
            let mut bytes = Vec::new();
            while let Some(chunk) = part.data().await {
                bytes.extend_from_slice(chunk?.chunk());
            }
            Ok::<_, warp::Error>((name, filename, bytes))
        })
        .try_collect()
        .await
    }

    /// Fake prediction service answering with `status` and `body`.
    fn spawn_service(status: u16, body: &'static str) -> (SocketAddr, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let store = seen.clone();
        let route = warp::path("predict")
            .and(warp::post())
            .and(warp::multipart::form().max_length(1 << 20))
            .and_then(move |form: FormData| {
                let store = store.clone();
                async move {
                    let parts = collect_parts(form).await.map_err(|_| warp::reject())?;
                    store.lock().await.extend(parts);
                    Ok::<_, warp::Rejection>(warp::reply::with_status(
                        body,
                        warp::http::StatusCode::from_u16(status).unwrap(),
                    ))
                }
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        (addr, seen)
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            today: SelectedFile::new("today.csv", b"a,b\n1,2\n".to_vec()),
            tomorrow: SelectedFile::new("tomorrow.xlsx", vec![0x50, 0x4b, 0x03, 0x04]),
        }
    }

    fn client_for(addr: SocketAddr) -> HttpPredictionClient {
        let url = Url::parse(&format!("http://{}/predict", addr)).unwrap();
        HttpPredictionClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_both_files_and_decodes_rows() {
        let (addr, seen) = spawn_service(
            200,
            r#"{"rows":[{"predicted_mean_per_hour":2.5,"predicted_day_total":60.0}]}"#,
        );

        let set = client_for(addr).predict(&request()).await.unwrap();
        assert_eq!(
            set.rows,
            vec![PredictionRow {
                predicted_mean_per_hour: 2.5,
                predicted_day_total: 60.0,
            }]
        );

        let parts = seen.lock().await;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, TODAY_PART);
        assert_eq!(parts[0].1.as_deref(), Some("today.csv"));
        assert_eq!(parts[0].2, b"a,b\n1,2\n");
        assert_eq!(parts[1].0, TOMORROW_PART);
        assert_eq!(parts[1].1.as_deref(), Some("tomorrow.xlsx"));
    }

    #[tokio::test]
    async fn test_error_status_surfaces_raw_body() {
        let (addr, _) = spawn_service(422, "hours_sale_today is malformed");

        let err = client_for(addr).predict(&request()).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 422,
                body: "hours_sale_today is malformed".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_decode_error() {
        let (addr, _) = spawn_service(200, "not json");
        let err = client_for(addr).predict(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_error() {
        // bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr).predict(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
