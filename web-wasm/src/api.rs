//! サーバーAPIとデータセットの取得
//!
//! エラーは画面の通知にそのまま使える文字列で返す。

use art_observe_common::{
    ErrorResponse, HintRequest, HintsResponse, PromptRequest, PromptResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub const ARTWORKS_URL: &str = "data/artworks.json";
pub const ANALYSES_URL: &str = "data/analyses.json";
const HINTS_ENDPOINT: &str = "/api/ai_hints";
const PROMPT_ENDPOINT: &str = "/api/generate_prompt";

fn js_message(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

async fn fetch(request: &Request) -> Result<Response, String> {
    let window = web_sys::window().ok_or("window がありません")?;
    let resp_value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_message)?;
    resp_value.dyn_into().map_err(js_message)
}

async fn response_text(resp: &Response) -> Result<String, String> {
    let text = JsFuture::from(resp.text().map_err(js_message)?)
        .await
        .map_err(js_message)?;
    Ok(text.as_string().unwrap_or_default())
}

/// JSON を POST して JSON を受け取る
///
/// 失敗時は `{"error": ...}` のメッセージを優先する。
async fn post_json<B: Serialize, R: DeserializeOwned>(url: &str, body: &B) -> Result<R, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_message)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_message)?;

    let resp = fetch(&request).await?;
    let text = response_text(&resp).await?;

    if !resp.ok() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("HTTP {}", resp.status()));
        return Err(message);
    }

    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// AIヒントを取得（空のヒントは失敗扱い）
pub async fn request_hints(request: &HintRequest) -> Result<String, String> {
    let resp: HintsResponse = post_json(HINTS_ENDPOINT, request).await?;
    if resp.hints.trim().is_empty() {
        return Err("Empty AI hints".to_string());
    }
    Ok(resp.hints)
}

/// 画像生成プロンプトを取得
pub async fn generate_prompt(request: &PromptRequest) -> Result<String, String> {
    let resp: PromptResponse = post_json(PROMPT_ENDPOINT, request).await?;
    Ok(resp.prompt)
}

/// 静的ファイルをテキストで取得（404 は None）
pub async fn fetch_text(url: &str) -> Result<Option<String>, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(url, &opts).map_err(js_message)?;

    let resp = fetch(&request).await?;
    if resp.status() == 404 {
        return Ok(None);
    }
    if !resp.ok() {
        return Err(format!("{}: HTTP {}", url, resp.status()));
    }
    response_text(&resp).await.map(Some)
}

/// ページの origin（相対画像URLの解決用）
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// クリップボードへ書き込む
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("window がありません")?;
    let clipboard = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))
        .map_err(js_message)?;
    let write_text: js_sys::Function =
        js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .map_err(js_message)?
            .dyn_into()
            .map_err(|_| "클립보드를 사용할 수 없습니다".to_string())?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(js_message)?
        .dyn_into()
        .map_err(js_message)?;
    JsFuture::from(promise).await.map(|_| ()).map_err(js_message)
}

/// テキストファイルとしてダウンロードさせる
pub fn download_text(file_name: &str, text: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let props = web_sys::BlobPropertyBag::new();
    props.set_type("text/plain;charset=utf-8");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &props)
        .map_err(js_message)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_message)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("document がありません")?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_message)?
        .dyn_into()
        .map_err(|_| "a 要素を作れません".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_message)
}

/// 今日の日付 `YYYY-MM-DD`
pub fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.chars().take(10).collect()
}
