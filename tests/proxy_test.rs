//! Integration tests for the proxy route.

use std::time::Duration;

use playstore_proxy::ProxyConfig;

mod common;

#[tokio::test]
async fn proxied_body_matches_upstream_byte_for_byte() {
    let upstream = common::start_mock_upstream("store listing body".into()).await;
    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "store listing body");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn empty_upstream_body_is_relayed() {
    let upstream = common::start_mock_upstream(String::new()).await;
    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.bytes().await.unwrap().is_empty());

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn large_upstream_body_is_relayed() {
    // 1.5 MiB, larger than any internal buffer.
    let body = "x".repeat(1_572_864);
    let expected = body.clone();
    let upstream = common::start_mock_upstream(body).await;
    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), expected);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_yields_502() {
    // Bind and immediately drop a listener so the port is known-closed.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(addr);
    config.upstream.connect_timeout_secs = 1;
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn slow_upstream_yields_504() {
    let upstream = common::start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "too late".to_string())
    })
    .await;

    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    config.upstream.request_timeout_secs = 1;
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 504);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn upstream_status_is_mirrored() {
    let upstream =
        common::start_programmable_upstream(|| async { (503, "maintenance".to_string()) }).await;
    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    let proxy = common::spawn_proxy(config).await;

    let res = reqwest::get(format!("http://{}/playstore/check_version", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "maintenance");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn unmatched_route_yields_404() {
    let proxy = common::spawn_proxy(ProxyConfig::default()).await;

    let res = reqwest::get(format!("http://{}/no/such/route", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    // Randomized latency plus injected failures; one request's outcome must
    // never leak into another's.
    let upstream = common::start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_millis(fastrand::u64(0..30))).await;
        if fastrand::u8(0..5) == 0 {
            (500, "boom".to_string())
        } else {
            (200, "ok".to_string())
        }
    })
    .await;

    let mut config = ProxyConfig::default();
    config.upstream.url = common::upstream_url(upstream);
    let proxy = common::spawn_proxy(config).await;

    let client = reqwest::Client::new();
    let url = format!("http://{}/playstore/check_version", proxy.addr);

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let res = client.get(&url).send().await.unwrap();
            let status = res.status().as_u16();
            let body = res.text().await.unwrap();
            (status, body)
        }));
    }

    let mut successes = 0;
    for task in tasks {
        let (status, body) = task.await.unwrap();
        match status {
            200 => {
                assert_eq!(body, "ok");
                successes += 1;
            }
            500 => assert_eq!(body, "boom"),
            other => panic!("unexpected status {other}"),
        }
    }
    assert!(successes > 0, "expected at least one successful request");

    proxy.shutdown.trigger();
}
