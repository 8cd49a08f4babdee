use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use config::{HttpConfig, NotionConfig};
use errors::{NotesError, NotesResult};
use quiz_core::traits::NotesSource;
use quiz_core::types::{
    Block, BlockKind, BlockPage, Document, DocumentFilter, DocumentPage, DocumentQuery, RichText
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// Notion REST client implementing [`NotesSource`].
pub struct NotionClient {
    client: Client,
    config: NotionConfig
}

impl NotionClient {
    pub fn new(config: NotionConfig, http: &HttpConfig) -> NotesResult<Self> {
        let client = Client::builder()
            .timeout(http.timeout())
            .build()
            .map_err(|e| NotesError::Transport {
                reason: e.to_string()
            })?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn children_url(&self, block_id: &str, cursor: Option<&str>) -> NotesResult<Url> {
        let page_size = PAGE_SIZE.to_string();
        let mut params = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = cursor {
            params.push(("start_cursor", cursor));
        }

        Url::parse_with_params(&self.api_url(&format!("/blocks/{}/children", block_id)), params)
            .map_err(|e| NotesError::Transport {
                reason: e.to_string()
            })
    }

    fn query_body(&self, query: &DocumentQuery) -> Value {
        let filter = match &query.filter {
            DocumentFilter::TitleEquals(title) => json!({
                "property": self.config.title_property,
                "title": { "equals": title }
            }),
            DocumentFilter::EditedOnOrAfter(since) => json!({
                "timestamp": "last_edited_time",
                "last_edited_time": {
                    "on_or_after": since.to_rfc3339_opts(SecondsFormat::Millis, true)
                }
            })
        };

        let mut body = json!({ "filter": filter, "page_size": PAGE_SIZE });
        if let Some(direction) = query.sort {
            body["sorts"] = json!([{ "timestamp": "last_edited_time", "direction": direction }]);
        }
        if let Some(cursor) = &query.start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> NotesResult<T> {
        match response.status() {
            status if status.is_success() => {
                response.json::<T>().await.map_err(|e| NotesError::Decode {
                    reason: e.to_string()
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(NotesError::RateLimited { retry_after })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(NotesError::Unauthorized { reason: body })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(NotesError::Api {
                    status: status.as_u16(),
                    message: body
                })
            }
        }
    }
}

#[async_trait]
impl NotesSource for NotionClient {
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>
    ) -> NotesResult<BlockPage> {
        let url = self.children_url(block_id, cursor)?;
        debug!(url = %url, "Listing Notion block children");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| NotesError::Transport {
                reason: e.to_string()
            })?;

        let list: ListResponse = Self::read_json(response).await?;

        Ok(BlockPage {
            blocks: list.results.iter().filter_map(decode_block).collect(),
            has_more: list.has_more,
            next_cursor: list.next_cursor
        })
    }

    async fn query_documents(&self, query: &DocumentQuery) -> NotesResult<DocumentPage> {
        let url = self.api_url(&format!("/databases/{}/query", self.config.database_id));
        debug!(url = %url, filter = ?query.filter, "Querying Notion database");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.query_body(query))
            .send()
            .await
            .map_err(|e| NotesError::Transport {
                reason: e.to_string()
            })?;

        let list: ListResponse = Self::read_json(response).await?;

        Ok(DocumentPage {
            documents: list.results.iter().filter_map(decode_page).collect(),
            has_more: list.has_more,
            next_cursor: list.next_cursor
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    object: String,
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: HashMap<String, Value>
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
    language: Option<String>,
    checked: Option<bool>
}

#[derive(Debug, Deserialize)]
struct RawPage {
    object: String,
    id: String,
    last_edited_time: DateTime<Utc>,
    #[serde(default)]
    properties: HashMap<String, RawProperty>
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    #[serde(rename = "type")]
    property_type: String,
    #[serde(default)]
    title: Vec<RichText>
}

/// Decodes one listing entry. Partial objects (no `type`) are skipped.
fn decode_block(value: &Value) -> Option<Block> {
    let raw: RawBlock = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "Skipping partial block object");
            return None;
        }
    };
    if raw.object != "block" {
        return None;
    }

    let payload: RawPayload = raw
        .payloads
        .get(&raw.block_type)
        .and_then(|p| serde_json::from_value(p.clone()).ok())
        .unwrap_or_default();

    let kind = match raw.block_type.as_str() {
        "paragraph" => BlockKind::Paragraph,
        "heading_1" => BlockKind::Heading1,
        "heading_2" => BlockKind::Heading2,
        "heading_3" => BlockKind::Heading3,
        "bulleted_list_item" => BlockKind::BulletedListItem,
        "numbered_list_item" => BlockKind::NumberedListItem,
        "code" => BlockKind::Code {
            language: payload.language.clone().unwrap_or_default()
        },
        "quote" => BlockKind::Quote,
        "callout" => BlockKind::Callout,
        "toggle" => BlockKind::Toggle,
        "to_do" => BlockKind::ToDo {
            checked: payload.checked.unwrap_or(false)
        },
        "divider" => BlockKind::Divider,
        other => BlockKind::Unsupported {
            type_name: other.to_string()
        }
    };

    Some(Block {
        id: raw.id,
        kind,
        rich_text: payload.rich_text,
        has_children: raw.has_children
    })
}

fn decode_page(value: &Value) -> Option<Document> {
    let raw: RawPage = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "Skipping partial page object");
            return None;
        }
    };
    if raw.object != "page" {
        return None;
    }

    let title = raw
        .properties
        .values()
        .find(|p| p.property_type == "title")
        .map(|p| p.title.iter().map(|t| t.plain_text.as_str()).collect())
        .unwrap_or_default();

    Some(Document {
        id: raw.id,
        title,
        last_edited: raw.last_edited_time
    })
}

pub fn create_notion_client(
    config: NotionConfig,
    http: &HttpConfig
) -> NotesResult<Arc<dyn NotesSource>> {
    Ok(Arc::new(NotionClient::new(config, http)?))
}
