use {
  super::*,
  futures::{StreamExt, TryStreamExt},
  http::{header, StatusCode},
  reqwest::Client,
  tokio::runtime::Runtime,
};

#[derive(Debug, Deserialize)]
struct InscriptionsPage {
  inscriptions: Vec<InscriptionId>,
  #[serde(default)]
  more: bool,
}

#[derive(Debug, Deserialize)]
struct InscriptionJson {
  number: i64,
  genesis_height: u64,
  timestamp: i64,
  content_type: Option<String>,
  satpoint: Option<SatPoint>,
}

/// Client for the JSON API of an `ord server`.
pub struct OrdClient {
  client: Client,
  url: String,
  runtime: Runtime,
  retry: RetryPolicy,
  concurrency: usize,
}

impl OrdClient {
  pub fn new(url: &str, config: &config::RpcConfig) -> Result<Self> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
      header::ACCEPT,
      header::HeaderValue::from_static("application/json"),
    );

    Ok(Self {
      client: Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout))
        .build()?,
      url: url.trim_end_matches('/').to_string(),
      runtime: rpc::init_tokio_runtime()?,
      retry: RetryPolicy::new(config),
      concurrency: config.batch_concurrency.max(1),
    })
  }

  async fn get(&self, path: &str) -> Result<Option<reqwest::Response>> {
    let response = self
      .client
      .get(format!("{}{path}", self.url))
      .send()
      .await?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }

    Ok(Some(response.error_for_status()?))
  }

  async fn fetch_inscription(&self, inscription_id: InscriptionId) -> Result<InscriptionInfo> {
    let json = self
      .get(&format!("/inscription/{inscription_id}"))
      .await?
      .ok_or_else(|| anyhow!("inscription {inscription_id} not found on ord server"))?
      .json::<InscriptionJson>()
      .await?;

    Ok(InscriptionInfo {
      inscription_id,
      number: json.number,
      genesis_height: json.genesis_height,
      timestamp: u32::try_from(json.timestamp)
        .with_context(|| format!("invalid timestamp for inscription {inscription_id}"))?,
      content_type: json.content_type,
      satpoint: json.satpoint,
    })
  }
}

impl OrdRpc for OrdClient {
  fn latest_height(&self) -> Result<u64> {
    with_retries(&self.retry, "get ord block height", || {
      self.runtime.block_on(async {
        let text = self
          .get("/blockheight")
          .await?
          .ok_or_else(|| anyhow!("ord server has no block height"))?
          .text()
          .await?;
        text
          .trim()
          .parse::<u64>()
          .with_context(|| format!("invalid ord block height: {text}"))
      })
    })
  }

  fn inscriptions_by_block(&self, height: u64) -> Result<Vec<InscriptionId>> {
    let mut inscriptions = Vec::new();
    let mut page_index = 0u32;

    loop {
      let page = with_retries(
        &self.retry,
        format_args!("get inscriptions of block {height} page {page_index}"),
        || {
          self.runtime.block_on(async {
            match self
              .get(&format!("/inscriptions/block/{height}/{page_index}"))
              .await?
            {
              Some(response) => Ok(response.json::<InscriptionsPage>().await?),
              None => Ok(InscriptionsPage {
                inscriptions: Vec::new(),
                more: false,
              }),
            }
          })
        },
      )?;

      inscriptions.extend(page.inscriptions);

      if !page.more {
        break;
      }
      page_index += 1;
    }

    Ok(inscriptions)
  }

  fn inscription(&self, inscription_id: &InscriptionId) -> Result<InscriptionInfo> {
    with_retries(
      &self.retry,
      format_args!("get inscription {inscription_id}"),
      || self.runtime.block_on(self.fetch_inscription(*inscription_id)),
    )
  }

  fn inscriptions(&self, inscription_ids: &[InscriptionId]) -> Result<Vec<InscriptionInfo>> {
    with_retries(
      &self.retry,
      format_args!("get {} inscriptions", inscription_ids.len()),
      || {
        self.runtime.block_on(
          futures::stream::iter(
            inscription_ids
              .iter()
              .map(|inscription_id| self.fetch_inscription(*inscription_id)),
          )
          .buffered(self.concurrency)
          .try_collect(),
        )
      },
    )
  }

  fn content(&self, inscription_id: &InscriptionId) -> Result<Option<Vec<u8>>> {
    with_retries(
      &self.retry,
      format_args!("get content of inscription {inscription_id}"),
      || {
        self.runtime.block_on(async {
          match self.get(&format!("/content/{inscription_id}")).await? {
            Some(response) => Ok(Some(response.bytes().await?.to_vec())),
            None => Ok(None),
          }
        })
      },
    )
  }
}
