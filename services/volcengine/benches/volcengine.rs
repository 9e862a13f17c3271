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

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use hmacsign_core::SigningRequest;
use hmacsign_volcengine::{generate_signing_key, Credential, RequestSigner};

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("volcengine");

    let cred = Credential::new("access_key_id", "secret_access_key");
    let signer = RequestSigner::new("cv", "cn-north-1");
    let body = "image_base64=".to_string() + &"A".repeat(64 * 1024);

    group.bench_function("calculate", |b| {
        b.iter(|| {
            let (mut parts, _) = http::Request::post(
                "https://visual.volcengineapi.com/?Action=OCRPdf&Version=2021-08-23",
            )
            .header("content-type", "application/x-www-form-urlencoded")
            .body(())
            .expect("request must be valid")
            .into_parts();
            let req = SigningRequest::build(&mut parts).expect("request must be valid");

            signer
                .calculate(&req, body.as_bytes(), &cred)
                .expect("must success")
        })
    });

    group.bench_function("generate_signing_key", |b| {
        b.iter(|| generate_signing_key("secret_access_key", "20240101", "cn-north-1", "cv"))
    });

    group.finish()
}
