use {
  super::*,
  http::header,
  reqwest::Client,
  serde::de::DeserializeOwned,
  std::sync::atomic::AtomicU64,
  tokio::runtime::Runtime,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcRequest<P> {
  pub jsonrpc: String,
  pub id: u64,
  pub method: String,
  pub params: P,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<R> {
  pub jsonrpc: String,
  pub id: u64,
  pub result: Option<R>,
  pub error: Option<RpcError>,
}

#[derive(Debug, Serialize, Deserialize, thiserror::Error)]
#[error("rpc error {code}: {message}")]
pub struct RpcError {
  pub code: i64,
  pub message: String,
}

/// A JSON-RPC 2.0 client over HTTP.
pub struct JsonRpcClient {
  pub client: Client,
  pub url: String,
  next_id: AtomicU64,
}

impl JsonRpcClient {
  pub fn new(url: &str, timeout: Duration) -> Result<JsonRpcClient> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
      header::CONTENT_TYPE,
      header::HeaderValue::from_static("application/json"),
    );
    let client = Client::builder()
      .default_headers(headers)
      .timeout(timeout)
      .build()?;

    Ok(JsonRpcClient {
      client,
      url: url.to_string(),
      next_id: AtomicU64::new(1),
    })
  }

  pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
  where
    P: Serialize,
    R: DeserializeOwned,
  {
    let request = RpcRequest {
      jsonrpc: "2.0".into(),
      id: self.next_id.fetch_add(1, atomic::Ordering::Relaxed),
      method: method.into(),
      params,
    };

    log::trace!("rpc request {} to {}", request.method, self.url);

    let response = self
      .client
      .post(&self.url)
      .json(&request)
      .send()
      .await?
      .error_for_status()?
      .json::<RpcResponse<R>>()
      .await?;

    if let Some(error) = response.error {
      return Err(Error::new(error).context(format!("rpc method {method} failed")));
    }

    response
      .result
      .ok_or_else(|| anyhow!("rpc method {method} returned no result"))
  }
}

pub(crate) fn init_tokio_runtime() -> Result<Runtime> {
  Ok(
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()?,
  )
}
