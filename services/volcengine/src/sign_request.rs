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

use std::fmt::Write;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, HOST};
use http::request::Parts;
use http::HeaderValue;
use hmacsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use hmacsign_core::time::{format_date, format_iso8601, now, DateTime};
use hmacsign_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};
use log::debug;

use crate::canonical_request::CanonicalRequest;
use crate::constants::{ALGORITHM, SCOPE_TERMINATOR, X_CONTENT_SHA256, X_DATE};
use crate::Credential;

/// RequestSigner that implements the volcengine HMAC-SHA256 signature.
///
/// - [Signature process](https://www.volcengine.com/docs/6369/67269)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for volcengine signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Calculate the signature for the request without modifying it.
    ///
    /// The clock is read once, so `x_date` and the credential scope always
    /// agree on the date.
    pub fn calculate(
        &self,
        req: &SigningRequest,
        body: &[u8],
        cred: &Credential,
    ) -> Result<SignatureResult> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret access key must not be empty",
            ));
        }
        if self.region.is_empty() || self.service.is_empty() {
            return Err(Error::config_invalid(
                "region and service must not be empty",
            ));
        }

        let time = self.time.unwrap_or_else(now);
        let x_date = format_iso8601(time);
        let date = format_date(time);

        let creq = CanonicalRequest::build(req, &x_date, body)?;
        let encoded_req = creq.to_string();
        debug!("calculated canonical request: {encoded_req}");

        // Scope: "20220313/<region>/<service>/request"
        let scope = format!(
            "{date}/{}/{}/{SCOPE_TERMINATOR}",
            self.region, self.service
        );
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&x_date, &scope, &encoded_req)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, &date, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        Ok(SignatureResult {
            authorization: format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
                cred.access_key_id,
                creq.signed_headers(),
            ),
            x_date,
            x_content_sha256: creq.content_hash().to_string(),
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "credential is required to sign volcengine requests",
            ));
        };

        let mut signed_req = SigningRequest::build(req)?;
        let result = self
            .calculate(&signed_req, body, cred)
            .and_then(|signature| signature.apply(&mut signed_req));

        // Return headers back even if signing failed.
        signed_req.apply(req)?;
        result
    }
}

/// SignatureResult carries the header values produced by signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `X-Date` header.
    pub x_date: String,
    /// Value of the `X-Content-Sha256` header.
    pub x_content_sha256: String,
}

impl SignatureResult {
    fn apply(self, req: &mut SigningRequest) -> Result<()> {
        // Insert HOST header if not present.
        if !req.headers.contains_key(HOST) {
            req.headers
                .insert(HOST, HeaderValue::from_str(req.authority.as_str())?);
        }
        req.headers
            .insert(X_DATE, HeaderValue::from_str(&self.x_date)?);
        req.headers
            .insert(X_CONTENT_SHA256, HeaderValue::from_str(&self.x_content_sha256)?);

        let mut authorization = HeaderValue::from_str(&self.authorization)?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        Ok(())
    }
}

/// Build the string to sign.
///
/// ```text
/// HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/request
/// <hashed_canonical_request>
/// ```
fn string_to_sign(x_date: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{x_date}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// Derive the signing key for one date, region and service.
///
/// `date` is formatted as `YYYYMMDD`. The returned key is raw bytes and must
/// not be logged or reused for another scope.
pub fn generate_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmacsign_core::time::parse_iso8601;
    use hmacsign_core::ErrorKind;
    use http::header::CONTENT_TYPE;
    use http::{Method, Request};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const BODY: &str = "image_base64=abc&file_type=image&version=v3";
    const GOLDEN_AUTHORIZATION: &str = "HMAC-SHA256 Credential=AKID/20240101/cn-north-1/cv/request, SignedHeaders=host;x-date;x-content-sha256;content-type, Signature=0af2cb19284b23b0af37aa9b125327ec62418fcb871a461232f42e5dad2de0db";

    fn signer() -> RequestSigner {
        RequestSigner::new("cv", "cn-north-1")
            .with_time(parse_iso8601("20240101T000000Z").expect("time must be valid"))
    }

    fn credential() -> Credential {
        Credential::new("AKID", "SECRET")
    }

    fn build(method: Method, uri: &str) -> SigningRequest {
        let (mut parts, _) = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(())
            .expect("request must be valid")
            .into_parts();
        SigningRequest::build(&mut parts).expect("request must be valid")
    }

    fn golden_request() -> SigningRequest {
        build(
            Method::POST,
            "https://example.com/?Action=OCRPdf&Version=2021-08-23",
        )
    }

    #[test]
    fn test_generate_signing_key() {
        let key = generate_signing_key("SECRET", "20240101", "cn-north-1", "cv");
        assert_eq!(
            hex::encode(key),
            "27f488370a285c624a0dbe6ecfa75300fc84c81d0b1582d91936f3bf75c38457"
        );
    }

    #[test]
    fn test_string_to_sign() -> Result<()> {
        let creq = CanonicalRequest::build(&golden_request(), "20240101T000000Z", BODY.as_bytes())?;
        let sts = string_to_sign(
            "20240101T000000Z",
            "20240101/cn-north-1/cv/request",
            &creq.to_string(),
        )?;

        assert_eq!(
            sts,
            "HMAC-SHA256\n\
             20240101T000000Z\n\
             20240101/cn-north-1/cv/request\n\
             71f719d6da8380ca82fd138873e54eaac30c33e377a259d9d3680abcb75fc672"
        );
        Ok(())
    }

    #[test]
    fn test_calculate_golden() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let result = signer().calculate(&golden_request(), BODY.as_bytes(), &credential())?;
        assert_eq!(result.authorization, GOLDEN_AUTHORIZATION);
        assert_eq!(result.x_date, "20240101T000000Z");
        assert_eq!(
            result.x_content_sha256,
            "723e60e3f484c191738e1d779825dde1b6ed43f8fd33cf2b195440d5089ddc8c"
        );
        Ok(())
    }

    #[test]
    fn test_calculate_is_deterministic() -> Result<()> {
        let signer = signer();
        let a = signer.calculate(&golden_request(), BODY.as_bytes(), &credential())?;
        let b = signer.calculate(&golden_request(), BODY.as_bytes(), &credential())?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_calculate_empty_body() -> Result<()> {
        let req = build(Method::GET, "https://example.com/");
        let result = signer().calculate(&req, b"", &credential())?;
        assert_eq!(
            result.x_content_sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        Ok(())
    }

    #[test]
    fn test_query_order_independent() -> Result<()> {
        let a = build(Method::POST, "https://example.com/?B=2&A=1");
        let b = build(Method::POST, "https://example.com/?A=1&B=2");

        let a = signer().calculate(&a, BODY.as_bytes(), &credential())?;
        let b = signer().calculate(&b, BODY.as_bytes(), &credential())?;
        assert_eq!(a.authorization, b.authorization);
        Ok(())
    }

    #[test_case(Method::POST, "https://example.com/?Action=OCRPdf&Version=2021-08-23", "image_base64=abd&file_type=image&version=v3"; "body")]
    #[test_case(Method::PUT, "https://example.com/?Action=OCRPdf&Version=2021-08-23", BODY; "method")]
    #[test_case(Method::POST, "https://example.com/ocr?Action=OCRPdf&Version=2021-08-23", BODY; "path")]
    #[test_case(Method::POST, "https://example.com/?Action=OCRNormal&Version=2021-08-23", BODY; "query value")]
    #[test_case(Method::POST, "https://example.com/?Action=OCRPdf&Version=2021-08-23&x=1", BODY; "extra query")]
    #[test_case(Method::POST, "https://example.org/?Action=OCRPdf&Version=2021-08-23", BODY; "host")]
    fn test_tamper_changes_signature(method: Method, uri: &str, body: &str) -> Result<()> {
        let req = build(method, uri);
        let result = signer().calculate(&req, body.as_bytes(), &credential())?;
        assert_ne!(result.authorization, GOLDEN_AUTHORIZATION);
        Ok(())
    }

    #[test]
    fn test_signing_key_is_scope_bound() -> Result<()> {
        let creq = CanonicalRequest::build(&golden_request(), "20240102T000000Z", BODY.as_bytes())?;
        let sts = string_to_sign(
            "20240102T000000Z",
            "20240102/cn-north-1/cv/request",
            &creq.to_string(),
        )?;

        let expected = hex_hmac_sha256(
            &generate_signing_key("SECRET", "20240102", "cn-north-1", "cv"),
            sts.as_bytes(),
        );
        for key in [
            generate_signing_key("SECRET", "20240101", "cn-north-1", "cv"),
            generate_signing_key("SECRET", "20240102", "cn-beijing", "cv"),
            generate_signing_key("SECRET", "20240102", "cn-north-1", "iam"),
            generate_signing_key("SECRET2", "20240102", "cn-north-1", "cv"),
        ] {
            assert_ne!(hex_hmac_sha256(&key, sts.as_bytes()), expected);
        }
        Ok(())
    }

    #[test]
    fn test_scope_date_follows_signing_time() -> Result<()> {
        let result = RequestSigner::new("cv", "cn-north-1")
            .with_time(parse_iso8601("20231231T235959Z")?)
            .calculate(&golden_request(), BODY.as_bytes(), &credential())?;

        assert_eq!(result.x_date, "20231231T235959Z");
        assert!(result
            .authorization
            .starts_with("HMAC-SHA256 Credential=AKID/20231231/cn-north-1/cv/request, "));
        Ok(())
    }

    #[test]
    fn test_calculate_invalid_credential() {
        let err = signer()
            .calculate(&golden_request(), b"", &Credential::new("AKID", ""))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_calculate_empty_region() {
        let err = RequestSigner::new("cv", "")
            .calculate(&golden_request(), b"", &credential())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_sign_request() -> Result<()> {
        let req = Request::post("https://example.com/?Action=OCRPdf&Version=2021-08-23")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(BODY)?;
        let (mut parts, body) = req.into_parts();

        signer()
            .sign_request(&Context::new(), &mut parts, body.as_bytes(), Some(&credential()))
            .await?;

        assert_eq!(parts.headers[HOST], "example.com");
        assert_eq!(parts.headers[X_DATE], "20240101T000000Z");
        assert_eq!(
            parts.headers[X_CONTENT_SHA256],
            "723e60e3f484c191738e1d779825dde1b6ed43f8fd33cf2b195440d5089ddc8c"
        );
        assert_eq!(parts.headers[AUTHORIZATION], GOLDEN_AUTHORIZATION);
        assert!(parts.headers[AUTHORIZATION].is_sensitive());
        assert_eq!(
            parts.uri.to_string(),
            "https://example.com/?Action=OCRPdf&Version=2021-08-23"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_request_without_credential() -> Result<()> {
        let (mut parts, _) = Request::get("https://example.com/")
            .header(CONTENT_TYPE, "application/json")
            .body(())?
            .into_parts();

        let err = signer()
            .sign_request(&Context::new(), &mut parts, b"", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(parts.headers.get(AUTHORIZATION).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_request_failure_keeps_headers() -> Result<()> {
        let (mut parts, _) = Request::get("https://example.com/")
            .header("user-agent", "hmacsign")
            .body(())?
            .into_parts();

        let err = signer()
            .sign_request(&Context::new(), &mut parts, b"", Some(&credential()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert_eq!(parts.headers["user-agent"], "hmacsign");
        assert!(parts.headers.get(X_DATE).is_none());
        Ok(())
    }
}
