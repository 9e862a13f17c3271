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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in volcengine signing.
pub const X_DATE: &str = "x-date";
pub const X_CONTENT_SHA256: &str = "x-content-sha256";

// Protocol literals.
pub const ALGORITHM: &str = "HMAC-SHA256";
pub const SCOPE_TERMINATOR: &str = "request";
pub const SIGNED_HEADERS: &str = "host;x-date;x-content-sha256;content-type";

// Env values used in volcengine services.
pub const VOLCENGINE_ACCESS_KEY: &str = "VOLCENGINE_ACCESS_KEY";
pub const VOLCENGINE_SECRET_KEY: &str = "VOLCENGINE_SECRET_KEY";
pub const VOLCENGINE_REGION: &str = "VOLCENGINE_REGION";

// Defaults for the visual (OCR) service.
pub const DEFAULT_REGION: &str = "cn-north-1";
pub const DEFAULT_SERVICE: &str = "cv";
pub const DEFAULT_ENDPOINT: &str = "https://visual.volcengineapi.com";

/// AsciiSet for query canonicalization.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
