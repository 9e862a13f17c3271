// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use bytes::Bytes;
use hmacsign_core::{Context, Error, Result, Signer};
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode};
use log::debug;

use crate::constants::DEFAULT_ENDPOINT;
use crate::Credential;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client sends signed OpenAPI calls to a volcengine endpoint.
///
/// Every call is a `POST {endpoint}/?Action={action}&Version={version}` with a
/// form encoded body. The response body is returned as opaque json.
#[derive(Debug, Clone)]
pub struct Client {
    signer: Signer<Credential>,
    endpoint: String,
    timeout: Duration,
}

impl Client {
    /// Create a new client that signs with the given signer.
    ///
    /// Requests are sent through the signer's [`Context`].
    pub fn new(signer: Signer<Credential>) -> Self {
        Self {
            signer,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the endpoint, `https://visual.volcengineapi.com` by default.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout of a whole call, 30s by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn context(&self) -> &Context {
        self.signer.context()
    }

    /// Call `action` of `version` with the given form fields.
    pub async fn call(
        &self,
        action: &str,
        version: &str,
        form: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", action)
            .append_pair("Version", version)
            .finish();
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let body = Bytes::from(body);

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/?{query}", self.endpoint))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(())?;
        let (mut parts, _) = req.into_parts();
        self.signer.sign(&mut parts, &body).await?;
        let req = Request::from_parts(parts, body);

        debug!("sending volcengine request: {} {}", req.method(), req.uri());
        let resp = tokio::time::timeout(self.timeout, self.context().http_send(req))
            .await
            .map_err(|_| {
                Error::unexpected(format!("request timed out after {:?}", self.timeout))
            })??;

        let status = resp.status();
        let body = resp.into_body();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::credential_denied(format!(
                    "request rejected with {status}: {}",
                    String::from_utf8_lossy(&body)
                )));
            }
            s if !s.is_success() => {
                return Err(Error::unexpected(format!(
                    "request failed with {status}: {}",
                    String::from_utf8_lossy(&body)
                )));
            }
            _ => {}
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::unexpected("response is not valid json").with_source(e))
    }

    /// Recognize the text of a base64 encoded image through `OCRPdf`.
    pub async fn ocr_pdf(&self, image_base64: &str) -> Result<serde_json::Value> {
        self.call(
            "OCRPdf",
            "2021-08-23",
            &[
                ("image_base64", image_base64),
                ("file_type", "image"),
                ("version", "v3"),
            ],
        )
        .await
    }
}
