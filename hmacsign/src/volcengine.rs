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

//! Volcengine service support.

pub use hmacsign_volcengine::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Signer};

/// Signer with volcengine credentials.
#[cfg(feature = "default-context")]
pub type DefaultSigner = Signer<Credential>;

/// Create a signer with the default context and credential chain.
#[cfg(feature = "default-context")]
pub fn default_signer(service: &str, region: &str) -> DefaultSigner {
    let ctx = default_context();
    let provider = DefaultCredentialProvider::new();
    let signer = RequestSigner::new(service, region);
    Signer::new(ctx, provider, signer)
}
