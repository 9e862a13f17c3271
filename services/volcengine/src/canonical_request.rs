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

use std::fmt::{self, Display, Write};

use http::header::CONTENT_TYPE;
use hmacsign_core::hash::hex_sha256;
use hmacsign_core::{Error, Result, SigningRequest};
use percent_encoding::utf8_percent_encode;

use crate::constants::{QUERY_ENCODE_SET, SIGNED_HEADERS};

/// CanonicalRequest is the deterministic form of a request that gets hashed and signed.
///
/// ```text
/// POST
/// /
/// Action=OCRPdf&Version=2021-08-23
/// host:example.com
/// x-date:20240101T000000Z
/// x-content-sha256:<hex sha256 of body>
/// content-type:application/x-www-form-urlencoded
///
/// host;x-date;x-content-sha256;content-type
/// <hex sha256 of body>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    path: String,
    query: String,
    headers: String,
    content_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// `x_date` is the signing time in ISO8601 basic format and `body` the
    /// exact bytes that will be sent. A request without `content-type` is
    /// rejected.
    pub fn build(req: &SigningRequest, x_date: &str, body: &[u8]) -> Result<Self> {
        let content_type = req
            .header_get(&CONTENT_TYPE)?
            .ok_or_else(|| Error::request_invalid("content-type header is required for signing"))?;
        let host = req.host()?;
        let content_hash = hex_sha256(body);

        // Values are taken as is, only the names are fixed.
        let mut headers = String::with_capacity(128);
        writeln!(headers, "host:{host}")?;
        writeln!(headers, "x-date:{x_date}")?;
        writeln!(headers, "x-content-sha256:{content_hash}")?;
        writeln!(headers, "content-type:{content_type}")?;

        Ok(Self {
            method: req.method.to_string(),
            path: req.path.clone(),
            query: canonical_query_string(&req.query),
            headers,
            content_hash,
        })
    }

    /// Signed headers, always `host;x-date;x-content-sha256;content-type`.
    pub fn signed_headers(&self) -> &'static str {
        SIGNED_HEADERS
    }

    /// Hex encoded SHA256 of the body.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Canonical query string.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        // headers block is newline terminated already.
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.signed_headers())?;
        write!(f, "{}", self.content_hash)
    }
}

/// Sort query by name, then encode and join as `k=v&k=v`.
///
/// Parameters without value still render as `k=`.
fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut query = query.iter().collect::<Vec<_>>();
    query.sort();

    let mut s = String::with_capacity(64);
    for (idx, (k, v)) in query.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
        s.push('=');
        s.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
    }

    s
}
