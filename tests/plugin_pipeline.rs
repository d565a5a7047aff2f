use anyhow::Result;
use glm_vision::config::Settings;
use glm_vision::plugin::{EventAction, EventContext, PluginChain, VisionPlugin};
use image::{ImageFormat, RgbImage};
use serde_json::json;
use std::io::{Cursor, Write};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png(width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    RgbImage::new(width, height).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn settings_file(base_url: &str, max_pixels: u32) -> Result<tempfile::NamedTempFile> {
    let body = json!({
        "api": {
            "base_url": base_url,
            "model": "glm-4v-plus",
            "key": "integration-key",
            "timeout": 5,
            "temperature": 0.3
        },
        "image": {"max_size": 5, "max_pixels": max_pixels},
        "video": {"max_size": 20, "max_duration": 30}
    });
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(body.to_string().as_bytes())?;
    Ok(file)
}

async fn chain_for(server: &MockServer, max_pixels: u32) -> Result<PluginChain> {
    let file = settings_file(&server.uri(), max_pixels)?;
    let settings = Arc::new(Settings::from_file(file.path())?);
    let mut chain = PluginChain::new();
    chain.register(Arc::new(VisionPlugin::new(settings)?));
    Ok(chain)
}

#[tokio::test]
async fn test_image_message_end_to_end() -> Result<()> {
    let server = MockServer::start().await;
    let image_url = format!("{}/media/cat.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/media/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(120, 80)?))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "glm-4v-plus",
            "temperature": 0.3,
            "top_p": 0.7,
            "stream": false,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": image_url}},
                    {"type": "text", "text": "请描述这张图片"}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "一只黑色的猫"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let chain = chain_for(&server, 4096).await?;
    let mut ctx = EventContext::text(format!("智谱识图 {image_url}"));
    chain.dispatch(&mut ctx).await;

    assert_eq!(ctx.reply.as_deref(), Some("一只黑色的猫"));
    assert_eq!(ctx.action, EventAction::BreakPass);
    Ok(())
}

#[tokio::test]
async fn test_dimension_limit_stops_before_api_call() -> Result<()> {
    let server = MockServer::start().await;
    let image_url = format!("{}/media/wide.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/media/wide.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(300, 20)?))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let chain = chain_for(&server, 256).await?;
    let mut ctx = EventContext::text(format!("看图 {image_url}"));
    chain.dispatch(&mut ctx).await;

    assert_eq!(
        ctx.reply.as_deref(),
        Some("处理失败: 图片尺寸超过限制 (300 > 256)")
    );
    Ok(())
}

#[tokio::test]
async fn test_video_message_is_forwarded_without_download() -> Result<()> {
    let server = MockServer::start().await;
    let video_url = "https://videos.example.com/clip.mp4";

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "video_url", "video_url": {"url": video_url}},
                    {"type": "text", "text": "请描述这个视频"}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "一段海边的视频"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let chain = chain_for(&server, 4096).await?;
    let mut ctx = EventContext::text(format!("分析视频 {video_url}"));
    chain.dispatch(&mut ctx).await;

    assert_eq!(ctx.reply.as_deref(), Some("一段海边的视频"));
    Ok(())
}

#[tokio::test]
async fn test_unrelated_message_is_not_claimed() -> Result<()> {
    let server = MockServer::start().await;
    let chain = chain_for(&server, 4096).await?;

    let mut ctx = EventContext::text("https://example.com/cat.png 好看吗");
    chain.dispatch(&mut ctx).await;

    assert_eq!(ctx.reply, None);
    assert_eq!(ctx.action, EventAction::Continue);
    Ok(())
}

#[tokio::test]
async fn test_missing_key_fails_initialization() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(
        br#"{
            "api": {"base_url": "http://localhost", "model": "glm-4v", "key": "", "timeout": 5},
            "image": {"max_size": 5, "max_pixels": 4096},
            "video": {"max_size": 20, "max_duration": 30}
        }"#,
    )?;

    assert!(Settings::from_file(file.path()).is_err());
    Ok(())
}
