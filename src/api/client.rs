//! 上游 API 客户端
//!
//! 封装所有与错题 API 相关的 GET 调用。所有传输层错误（超时、连接失败、
//! 非 2xx）都在这里截获并记录日志，向调用方返回 None，调用方把 None
//! 当作"本单元无数据，跳过"处理，绝不视为致命错误。

use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 接口版本：错题列表走 v2，其余走 v1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

/// 错题 API 客户端
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    base_url_v2: String,
    timeout_secs: u64,
}

impl ApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: build_http(&config.token, config.timeout_secs),
            base_url: config.base_url.clone(),
            base_url_v2: config.base_url_v2.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// 更新 Token，重建默认请求头，对后续请求立即生效
    pub fn set_token(&mut self, token: &str) {
        self.http = build_http(token, self.timeout_secs);
    }

    /// 发起一次 GET 请求
    ///
    /// # 参数
    /// - `path`: 相对路径（以 / 开头）
    /// - `params`: 查询参数
    /// - `version`: 接口版本
    ///
    /// # 返回
    /// 成功返回响应 JSON；网络失败、超时或非 2xx 返回 None
    pub async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
        version: ApiVersion,
    ) -> Option<Value> {
        let base = match version {
            ApiVersion::V1 => &self.base_url,
            ApiVersion::V2 => &self.base_url_v2,
        };
        let full_url = format!("{}{}", base, path);
        debug!("Fetching from: {} with params: {:?}", full_url, params);

        let response = match self.http.get(&full_url).query(params).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("请求失败 {} (params: {:?}): {}", full_url, params, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "请求失败 {} (params: {:?}): HTTP {}",
                full_url,
                params,
                response.status()
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("响应解析失败 {}: {}", full_url, e);
                None
            }
        }
    }

    /// 按类型获取错题列表（v2 接口）
    pub async fn get_error_list(&self, type_code: i64) -> Vec<Value> {
        let resp = self
            .request(
                "/tk/getError",
                &[("type", type_code.to_string())],
                ApiVersion::V2,
            )
            .await;
        data_array(resp)
    }

    /// 获取一批题目详情（不分批，分批由 api::batch 负责）
    pub async fn get_questions(&self, qids: &[i64]) -> Vec<Value> {
        if qids.is_empty() {
            return Vec::new();
        }
        let qids_str = qids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let resp = self
            .request("/tk/getQuestions", &[("qids", qids_str)], ApiVersion::V1)
            .await;
        data_array(resp)
    }

    /// 获取某题的第一页评论，只保留每条的 content 字段
    pub async fn get_comments(&self, qid: i64) -> Vec<String> {
        let resp = self
            .request(
                "/note/getAll",
                &[("qid", qid.to_string()), ("page", "1".to_string())],
                ApiVersion::V1,
            )
            .await;
        data_array(resp)
            .iter()
            .filter_map(|item| item.get("content").and_then(|v| v.as_str()))
            .map(|s| s.to_string())
            .collect()
    }

    /// 获取名师班级下的书目
    pub async fn get_books(&self, class_id: i64) -> Vec<Value> {
        let resp = self
            .request(
                "/tk/famousTk/getBooks",
                &[("classId", class_id.to_string())],
                ApiVersion::V1,
            )
            .await;
        data_array(resp)
    }

    /// 获取某本书按章节组织的错题列表
    pub async fn get_famous_by_error(&self, class_id: i64, book_id: i64) -> Vec<Value> {
        let resp = self
            .request(
                "/tk/getFamousByError",
                &[
                    ("classId", class_id.to_string()),
                    ("bookId", book_id.to_string()),
                ],
                ApiVersion::V1,
            )
            .await;
        data_array(resp)
    }
}

/// 从响应中取出 data 数组，缺失或非数组时为空
fn data_array(resp: Option<Value>) -> Vec<Value> {
    resp.and_then(|v| v.get("data").and_then(|d| d.as_array()).cloned())
        .unwrap_or_default()
}

fn build_http(token: &str, timeout_secs: u64) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, value);
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()
        .expect("failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(uri: &str) -> Config {
        Config {
            token: "test-token".to_string(),
            base_url: uri.to_string(),
            base_url_v2: format!("{}/v2", uri),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn request_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tk/getQuestions"))
            .and(header("Authorization", "Bearer test-token"))
            .and(query_param("qids", "1,2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": [{"id": 1}, {"id": 2}]})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let details = client.get_questions(&[1, 2]).await;
        assert_eq!(details.len(), 2);
    }

    #[tokio::test]
    async fn server_error_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let resp = client
            .request("/tk/getError", &[("type", "5".to_string())], ApiVersion::V2)
            .await;
        assert!(resp.is_none());
        // 上层读 data 数组时得到空集
        assert!(client.get_error_list(5).await.is_empty());
    }

    #[tokio::test]
    async fn comments_keep_only_content_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/note/getAll"))
            .and(query_param("qid", "7"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"content": "第一条", "user": "x"},
                    {"user": "没有正文"},
                    {"content": "第二条"}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let comments = client.get_comments(7).await;
        assert_eq!(comments, vec!["第一条".to_string(), "第二条".to_string()]);
    }

    #[tokio::test]
    async fn set_token_takes_effect_for_later_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer updated"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": [{"id": 9}]})),
            )
            .mount(&server)
            .await;

        let mut client = ApiClient::new(&test_config(&server.uri()));
        // 旧 token 不匹配任何 mock，wiremock 返回 404 -> None
        assert!(client.get_questions(&[9]).await.is_empty());

        client.set_token("updated");
        assert_eq!(client.get_questions(&[9]).await.len(), 1);
    }

    #[tokio::test]
    async fn empty_qids_issue_no_request() {
        let server = MockServer::start().await;
        let client = ApiClient::new(&test_config(&server.uri()));
        assert!(client.get_questions(&[]).await.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
