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

//! Plug a custom signing scheme into [`Signer`].

use async_trait::async_trait;
use hmacsign_core::hash::{hex_hmac_sha256, hex_sha256};
use hmacsign_core::{
    Context, Error, ProvideCredential, Result, SignRequest, Signer, SigningCredential, StaticEnv,
};
use http::request::Parts;
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct ApiKey {
    key: String,
    secret: String,
}

impl SigningCredential for ApiKey {
    fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

#[derive(Debug)]
struct EnvApiKeyProvider;

#[async_trait]
impl ProvideCredential for EnvApiKeyProvider {
    type Credential = ApiKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match (ctx.env_var("MY_API_KEY"), ctx.env_var("MY_API_SECRET")) {
            (Some(key), Some(secret)) => Ok(Some(ApiKey { key, secret })),
            _ => Ok(None),
        }
    }
}

/// Signs `METHOD\nPATH\nhex(sha256(body))` with the api secret.
#[derive(Debug)]
struct BodyDigestSigner;

#[async_trait]
impl SignRequest for BodyDigestSigner {
    type Credential = ApiKey;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("api key is required"));
        };

        let payload = format!("{}\n{}\n{}", req.method, req.uri.path(), hex_sha256(body));
        let signature = hex_hmac_sha256(cred.secret.as_bytes(), payload.as_bytes());

        req.headers.insert("x-api-key", cred.key.parse()?);
        req.headers.insert("x-api-signature", signature.parse()?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            ("MY_API_KEY".to_string(), "demo-key".to_string()),
            ("MY_API_SECRET".to_string(), "demo-secret".to_string()),
        ]),
    });
    let signer = Signer::new(ctx, EnvApiKeyProvider, BodyDigestSigner);

    let (mut parts, _) = http::Request::post("https://api.example.com/v1/users")
        .body(())?
        .into_parts();
    signer.sign(&mut parts, br#"{"name":"demo"}"#).await?;

    println!("signed headers: {:?}", parts.headers);
    Ok(())
}
