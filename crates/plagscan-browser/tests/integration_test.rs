use plagscan_browser::actions::BrowserActions;
use plagscan_browser::BrowserEngine;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_engine_creation() {
    let engine = BrowserEngine::new().await;
    assert!(engine.is_ok(), "Failed to create browser engine");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_in_isolated_page() {
    let engine = BrowserEngine::new().await.unwrap();
    let page = engine.open_isolated_page().await.unwrap();

    let result = page.navigate("https://example.com").await;
    assert!(result.is_ok(), "Navigation failed");
    assert!(page.is_visible("h1").await.unwrap());
    assert_eq!(page.text_content("#does-not-exist").await.unwrap(), None);

    engine.close_isolated_page(page).await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_contexts_do_not_share_storage() {
    let engine = BrowserEngine::new().await.unwrap();
    let first = engine.open_isolated_page().await.unwrap();
    let second = engine.open_isolated_page().await.unwrap();
    assert_ne!(first.context_id(), second.context_id());

    first.navigate("https://example.com").await.unwrap();
    second.navigate("https://example.com").await.unwrap();

    first.set_viewport(1080, 1080).await.unwrap();
    assert!(first.is_present("body").await.unwrap());

    engine.close_isolated_page(first).await;
    engine.close_isolated_page(second).await;
}
