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

use std::mem;

use http::header::HeaderName;
use http::header::HOST;
use http::uri::Authority;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use percent_encoding::percent_decode_str;

use crate::Error;
use crate::Result;

/// Signing context for request.
///
/// The uri of the original request is never rewritten: the query is decoded
/// here only to be canonicalized, while the bytes on the wire stay as the
/// caller built them.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, verbatim.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = &parts.uri;
        let authority = uri.authority().cloned().ok_or_else(|| {
            Error::request_invalid("request without authority is invalid for signing")
        })?;
        let path = match uri.path() {
            "" => "/".to_string(),
            v => v.to_string(),
        };

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme().cloned().unwrap_or(Scheme::HTTP),
            authority,
            path,
            query: uri.query().map(parse_query).transpose()?.unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Only headers are written back.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        Ok(())
    }

    /// Host value used for signing.
    ///
    /// Returns the `host` header if the caller set one, the authority otherwise.
    pub fn host(&self) -> Result<&str> {
        match self.headers.get(HOST) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(self.authority.as_str()),
        }
    }

    /// Get header value by name.
    ///
    /// Returns `None` if header not found.
    #[inline]
    pub fn header_get(&self, key: &HeaderName) -> Result<Option<&str>> {
        match self.headers.get(key) {
            Some(v) => Ok(Some(v.to_str()?)),
            None => Ok(None),
        }
    }
}

/// Decode `application/x-www-form-urlencoded` query pairs.
///
/// Escapes that don't decode to valid utf-8 are rejected instead of being
/// replaced, the signature would not match the bytes on the wire otherwise.
fn parse_query(query: &str) -> Result<Vec<(String, String)>> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode_query_component(k)?, decode_query_component(v)?))
        })
        .collect()
}

fn decode_query_component(s: &str) -> Result<String> {
    let s = s.replace('+', " ");
    let decoded = percent_decode_str(&s).decode_utf8().map_err(|e| {
        Error::request_invalid(format!("query component {s:?} is not valid utf-8")).with_source(e)
    })?;
    Ok(decoded.into_owned())
}
