//! End-to-end static-asset gatekeeping.

mod common;

use common::{echo_executor, start, write_asset};

#[tokio::test]
async fn serving_an_entry_script_makes_its_imports_servable() {
    let server = start(|_| {}, echo_executor()).await;
    write_asset(
        server.asset_root(),
        "/front/app.js",
        b"import { dep } from '../js/dep.js'\n",
    );
    write_asset(
        server.asset_root(),
        "/js/dep.js",
        b"import './dep2.js'\nexport const dep = 1\n",
    );
    write_asset(server.asset_root(), "/js/dep2.js", b"export const two = 2\n");

    let client = reqwest::Client::new();

    // Before the entry script was ever served, its dependency is not a
    // servable asset: the request falls through to the executor.
    let response = client.get(server.url("/js/dep.js")).send().await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["executed"], true);

    // Serving the entry script under the front prefix scans it.
    let response = client.get(server.url("/front/app.js")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/javascript"
    );

    // Now the direct dependency is served as a file.
    let response = client.get(server.url("/js/dep.js")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("export const dep"));

    // Discovery is lazy: serving dep.js is what registered dep2.js.
    let response = client.get(server.url("/js/dep2.js")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("two"));
}

#[tokio::test]
async fn transitive_dependency_is_not_servable_before_its_parent_was_served() {
    let server = start(|_| {}, echo_executor()).await;
    write_asset(
        server.asset_root(),
        "/front/app.js",
        b"import '../js/dep.js'\n",
    );
    write_asset(server.asset_root(), "/js/dep.js", b"import './dep2.js'\n");
    write_asset(server.asset_root(), "/js/dep2.js", b"export {}\n");

    let client = reqwest::Client::new();
    client.get(server.url("/front/app.js")).send().await.unwrap();

    // app.js was scanned, dep.js is registered; dep2.js is not yet,
    // because dep.js itself has not been served.
    let response = client.get(server.url("/js/dep2.js")).send().await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["executed"], true);
}

#[tokio::test]
async fn configured_entry_scripts_are_servable_outside_the_front_prefix() {
    let server = start(
        |config| {
            config.assets.entry_scripts = vec!["/bundle/main.js".to_string()];
        },
        echo_executor(),
    )
    .await;
    write_asset(server.asset_root(), "/bundle/main.js", b"export {}\n");

    let response = reqwest::get(server.url("/bundle/main.js")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("export"));
}

#[tokio::test]
async fn custom_loader_calls_register_dependencies() {
    let server = start(
        |config| {
            config.assets.script_calls = vec!["loadPlugin".to_string()];
        },
        echo_executor(),
    )
    .await;
    write_asset(
        server.asset_root(),
        "/front/app.js",
        b"loadPlugin('/node_modules/widgets/chart.js')\n",
    );
    write_asset(
        server.asset_root(),
        "/node_modules/widgets/chart.js",
        b"export const chart = true\n",
    );

    let client = reqwest::Client::new();
    client.get(server.url("/front/app.js")).send().await.unwrap();

    let response = client
        .get(server.url("/node_modules/widgets/chart.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("chart"));
}

#[tokio::test]
async fn non_script_assets_are_served_without_registration() {
    let server = start(|_| {}, echo_executor()).await;
    write_asset(server.asset_root(), "/css/site.css", b"body { margin: 0 }");

    let response = reqwest::get(server.url("/css/site.css")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/css"
    );
}

#[tokio::test]
async fn favicon_serves_the_configured_file() {
    let server = start(
        |config| {
            config.assets.favicon = "/img/icon.ico".to_string();
        },
        echo_executor(),
    )
    .await;
    write_asset(server.asset_root(), "/img/icon.ico", b"ICONBYTES");

    let response = reqwest::get(server.url("/favicon.ico")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"ICONBYTES");
}

#[tokio::test]
async fn paths_without_usable_extension_fall_through() {
    let server = start(|_| {}, echo_executor()).await;

    for path in ["/users/42", "/data/file.xyz", "/v1.products/list"] {
        let response = reqwest::get(server.url(path)).await.unwrap();
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["executed"], true, "{path} must reach the executor");
        assert_eq!(body["path"], path);
    }
}

#[tokio::test]
async fn missing_asset_file_is_a_generic_500() {
    let server = start(|_| {}, echo_executor()).await;

    // Registered mime type, file absent on disk.
    let response = reqwest::get(server.url("/css/missing.css")).await.unwrap();
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["statusCode"], 500);
}

#[tokio::test]
async fn failing_executor_is_a_generic_500() {
    let server = start(|_| {}, |_request: frontgate::CanonicalRequest| async {
        Err::<frontgate::CanonicalResponse, frontgate::ExecuteError>("app exploded".into())
    })
    .await;

    let response = reqwest::get(server.url("/boom")).await.unwrap();
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Something went wrong. We are working on it.");
}
