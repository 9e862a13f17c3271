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

use std::fmt::{Debug, Formatter};

use crate::constants::*;
use hmacsign_core::utils::Redact;
use hmacsign_core::Context;

/// Config carries all the configuration for volcengine services.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VOLCENGINE_ACCESS_KEY`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VOLCENGINE_SECRET_KEY`]
    pub secret_access_key: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VOLCENGINE_REGION`]
    /// - `cn-north-1` otherwise, see [`Config::region`]
    pub region: Option<String>,
    /// `service` to sign for, `cv` if not set.
    pub service: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set service
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(VOLCENGINE_ACCESS_KEY) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VOLCENGINE_SECRET_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(VOLCENGINE_REGION) {
            self.region.get_or_insert(v);
        }

        self
    }

    /// Region to sign for.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Service to sign for.
    pub fn service(&self) -> &str {
        self.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id.as_ref().map(Redact::from))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(Redact::from),
            )
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmacsign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.region(), "cn-north-1");
        assert_eq!(config.service(), "cv");
    }

    #[test]
    fn test_config_from_env_keeps_explicit_values() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (VOLCENGINE_ACCESS_KEY.to_string(), "env_ak".to_string()),
                (VOLCENGINE_SECRET_KEY.to_string(), "env_sk".to_string()),
                (VOLCENGINE_REGION.to_string(), "cn-beijing".to_string()),
            ]),
        });

        let config = Config::new()
            .with_access_key_id("explicit_ak")
            .with_service("iam")
            .from_env(&ctx);

        assert_eq!(config.access_key_id.as_deref(), Some("explicit_ak"));
        assert_eq!(config.secret_access_key.as_deref(), Some("env_sk"));
        assert_eq!(config.region(), "cn-beijing");
        assert_eq!(config.service(), "iam");
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = Config::new().with_secret_access_key("a-very-long-secret-key");
        let s = format!("{config:?}");
        assert!(!s.contains("a-very-long-secret-key"));
    }
}
