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

use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// The credential is loaded lazily on first use and cached until it becomes
/// invalid. Cloning a signer shares the cache.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    ///
    /// `body` must be the exact bytes that will be sent with `req`.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let cred = self.loader.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = cred.clone();
            cred
        };

        let Some(cred) = credential.filter(|v| v.is_valid()) else {
            return Err(Error::credential_invalid(
                "no valid credential found, please check your configuration",
            ));
        };

        self.builder
            .sign_request(&self.ctx, req, body, Some(&cred))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential {
        key: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.key.is_empty()
        }
    }

    #[derive(Debug)]
    struct TestLoader {
        key: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for TestLoader {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.key == "none" {
                return Ok(None);
            }
            Ok(Some(TestCredential {
                key: self.key.to_string(),
            }))
        }
    }

    #[derive(Debug)]
    struct TestBuilder;

    #[async_trait::async_trait]
    impl SignRequest for TestBuilder {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            body: &[u8],
            credential: Option<&Self::Credential>,
        ) -> Result<()> {
            let cred = credential.ok_or_else(|| Error::credential_invalid("missing"))?;
            let value = format!("{}:{}", cred.key, body.len());
            req.headers.insert("x-test-signature", value.parse()?);
            Ok(())
        }
    }

    fn parts() -> http::request::Parts {
        http::Request::get("https://example.com")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_sign_caches_credential() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            TestLoader {
                key: "key",
                calls: calls.clone(),
            },
            TestBuilder,
        );

        let mut req = parts();
        signer.sign(&mut req, b"hello").await?;
        assert_eq!(req.headers["x-test-signature"], "key:5");

        let mut req = parts();
        signer.clone().sign(&mut req, b"").await?;
        assert_eq!(req.headers["x-test-signature"], "key:0");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_without_credential() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            TestLoader {
                key: "none",
                calls: calls.clone(),
            },
            TestBuilder,
        );

        let mut req = parts();
        let err = signer.sign(&mut req, b"").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(req.headers.get("x-test-signature").is_none());
    }

    #[tokio::test]
    async fn test_sign_with_invalid_credential_reloads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            TestLoader {
                key: "",
                calls: calls.clone(),
            },
            TestBuilder,
        );

        let mut req = parts();
        assert!(signer.sign(&mut req, b"").await.is_err());
        assert!(signer.sign(&mut req, b"").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
