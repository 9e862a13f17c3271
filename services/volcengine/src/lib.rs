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

//! Volcengine HMAC-SHA256 signing.
//!
//! This crate signs HTTP requests for volcengine OpenAPI services such as the
//! visual (`cv`) service. The signature covers the method, path, sorted query,
//! a fixed set of headers and the hash of the body.
//!
//! ## Example
//!
//! ```no_run
//! use hmacsign_core::{Context, OsEnv, Signer};
//! use hmacsign_volcengine::{DefaultCredentialProvider, RequestSigner};
//!
//! # async fn example() -> hmacsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("cv", "cn-north-1"),
//! );
//!
//! let body = b"image_base64=abc";
//! let req = http::Request::post("https://visual.volcengineapi.com/?Action=OCRPdf&Version=2021-08-23")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body(())
//!     .unwrap();
//! let (mut parts, _) = req.into_parts();
//! signer.sign(&mut parts, body).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod canonical_request;
pub use canonical_request::CanonicalRequest;

mod sign_request;
pub use sign_request::{generate_signing_key, RequestSigner, SignatureResult};

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::Client;
