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

//! Recognize a local image with the visual `OCRPdf` action.
//!
//! ```shell
//! VOLCENGINE_ACCESS_KEY=xxx VOLCENGINE_SECRET_KEY=xxx \
//!     cargo run --example ocr_pdf -- image.base64
//! ```

use hmacsign_core::{Context, OsEnv, Signer};
use hmacsign_http_send_reqwest::ReqwestHttpSend;
use hmacsign_volcengine::{Client, Config, DefaultCredentialProvider, RequestSigner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: ocr_pdf <file containing base64 image>"))?;
    let image_base64 = tokio::fs::read_to_string(&path).await?;

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::new().from_env(&ctx);

    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new(config.service(), config.region()),
    );
    let client = Client::new(signer);

    let resp = client.ocr_pdf(image_base64.trim()).await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);

    Ok(())
}
